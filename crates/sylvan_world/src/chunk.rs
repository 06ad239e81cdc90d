//! # Chunk System
//!
//! The world is a row of fixed-width chunks keyed by a signed index.
//! Chunk `i` spans `[i * chunk_width, (i + 1) * chunk_width)`.
//!
//! ## Generation
//!
//! [`ChunkGenerator`] walks a cursor from the left edge margin to the right
//! edge margin. At each slot it draws a category from the
//! [`ContentCatalog`]:
//!
//! - `empty`: nothing is placed
//! - `cluster`: 3-5 trees of one variant at the tight cluster step
//! - anything else: one object of a uniformly chosen variant
//!
//! After every slot the cursor advances by a uniform draw in
//! `[spacing.min, spacing.max]`, so object lists come out x-ascending.

use rand::Rng;
use serde::Serialize;

use crate::catalog::{Category, ContentCatalog, ObjectKind, SpriteSheet, Variant};
use crate::config::{ClusterSize, RegenerationPolicy, SpacingConfig, WorldConfig};
use crate::error::WorldResult;
use crate::seed::{WorldRng, WorldSeed};

/// Chunk index (identifies a chunk in the world row).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ChunkIndex(pub i64);

impl ChunkIndex {
    /// Creates a new chunk index.
    #[inline]
    #[must_use]
    pub const fn new(index: i64) -> Self {
        Self(index)
    }

    /// Returns the chunk covering world position `x`.
    ///
    /// The caller is responsible for passing a finite `x`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_world_x(x: f64, chunk_width: f64) -> Self {
        Self((x / chunk_width).floor() as i64)
    }

    /// World X of the chunk's left edge.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn world_x(self, chunk_width: f64) -> f64 {
        self.0 as f64 * chunk_width
    }

    /// Index `offset` chunks away.
    #[inline]
    #[must_use]
    pub const fn offset(self, offset: i64) -> Self {
        Self(self.0.saturating_add(offset))
    }

    /// Absolute index distance to another chunk.
    #[inline]
    #[must_use]
    pub const fn distance(self, other: Self) -> u64 {
        self.0.abs_diff(other.0)
    }
}

impl std::fmt::Display for ChunkIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an object was placed, which decides the spacing rule it obeys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "placement", rename_all = "snake_case")]
pub enum Placement {
    /// Stand-alone object; neighbours are `spacing.min..=spacing.max` away.
    Single,
    /// Member of a cluster; neighbours within the run use the cluster step.
    Cluster {
        /// Zero-based position within the run.
        member: u32,
        /// Number of members actually placed may be lower near the chunk edge.
        size: u32,
    },
}

/// A piece of scenery placed in the world.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedObject {
    /// Object kind.
    pub kind: ObjectKind,
    /// Placement tag.
    pub placement: Placement,
    /// Variant identifier.
    pub variant: String,
    /// Absolute world X of the left edge.
    pub x: f64,
    /// Top edge, planted on the ground line.
    pub y: f64,
    /// Footprint width.
    pub width: f64,
    /// Footprint height.
    pub height: f64,
    /// Source sheet.
    pub sprite_sheet: SpriteSheet,
    /// Source rectangle X offset.
    pub sprite_x: f64,
    /// Source rectangle Y offset.
    pub sprite_y: f64,
}

impl PlacedObject {
    fn plant(
        kind: ObjectKind,
        placement: Placement,
        variant: &Variant,
        x: f64,
        ground_y: f64,
    ) -> Self {
        Self {
            kind,
            placement,
            variant: variant.name.clone(),
            x,
            y: ground_y - variant.height + variant.vertical_offset,
            width: variant.width,
            height: variant.height,
            sprite_sheet: variant.sprite_sheet,
            sprite_x: variant.sprite_x,
            sprite_y: variant.sprite_y,
        }
    }

    /// Right edge in world space.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Screen-space X for a camera offset.
    #[inline]
    #[must_use]
    pub fn screen_x(&self, camera_x: f64) -> f64 {
        self.x - camera_x
    }

    /// Returns true for members of a cluster run.
    #[inline]
    #[must_use]
    pub const fn is_clustered(&self) -> bool {
        matches!(self.placement, Placement::Cluster { .. })
    }
}

/// A fixed-width segment of the world and its scenery.
///
/// Immutable after generation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Chunk {
    index: ChunkIndex,
    world_x: f64,
    objects: Vec<PlacedObject>,
}

impl Chunk {
    /// Chunk index.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> ChunkIndex {
        self.index
    }

    /// World X of the left edge.
    #[inline]
    #[must_use]
    pub const fn world_x(&self) -> f64 {
        self.world_x
    }

    /// Placed objects, ascending by `x`.
    #[inline]
    #[must_use]
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    /// Number of placed objects.
    #[inline]
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

/// Placement rules shared by every chunk: catalog, spacing and geometry.
struct PlacementRules {
    catalog: ContentCatalog,
    spacing: SpacingConfig,
    cluster_size: ClusterSize,
    chunk_width: f64,
    edge_margin: f64,
    ground_y: f64,
}

impl PlacementRules {
    fn generate<R: Rng + ?Sized>(&self, index: ChunkIndex, rng: &mut R) -> Chunk {
        let world_x = index.world_x(self.chunk_width);
        let end = world_x + self.chunk_width - self.edge_margin;
        let mut cursor = world_x + self.edge_margin;
        let mut objects = Vec::new();

        while cursor < end {
            let category = self.catalog.classify(rng.gen::<f64>());

            if let Some(kind) = category.object_kind() {
                // An empty variant table degrades to an empty slot.
                if let Some(variant) = self.catalog.pick_variant(kind, rng.gen::<f64>()) {
                    if category == Category::Cluster {
                        cursor = self.place_cluster(variant, cursor, end, rng, &mut objects);
                    } else {
                        objects.push(PlacedObject::plant(
                            kind,
                            Placement::Single,
                            variant,
                            cursor,
                            self.ground_y,
                        ));
                    }
                }
            }

            let next = cursor + self.spacing_step(rng);
            if next <= cursor {
                stall_warning(index, cursor);
                break;
            }
            cursor = next;
        }

        Chunk {
            index,
            world_x,
            objects,
        }
    }

    /// Places a run of one tree variant and returns the advanced cursor.
    fn place_cluster<R: Rng + ?Sized>(
        &self,
        variant: &Variant,
        mut cursor: f64,
        end: f64,
        rng: &mut R,
        objects: &mut Vec<PlacedObject>,
    ) -> f64 {
        let planned = rng.gen_range(self.cluster_size.min..=self.cluster_size.max);
        let first = objects.len();

        for member in 0..planned {
            if cursor >= end {
                break;
            }
            objects.push(PlacedObject::plant(
                ObjectKind::Tree,
                Placement::Cluster { member, size: planned },
                variant,
                cursor,
                self.ground_y,
            ));
            let next = cursor + self.spacing.cluster + rng.gen::<f64>() * self.spacing.cluster_jitter;
            if next <= cursor {
                break;
            }
            cursor = next;
        }

        // Runs cut short by the chunk edge report the members that fit.
        #[allow(clippy::cast_possible_truncation)]
        let placed = (objects.len() - first) as u32;
        for object in &mut objects[first..] {
            if let Placement::Cluster { size, .. } = &mut object.placement {
                *size = placed;
            }
        }
        cursor
    }

    fn spacing_step<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let span = self.spacing.max - self.spacing.min;
        (self.spacing.min + rng.gen::<f64>() * span).min(self.spacing.max)
    }
}

/// Far from the origin an f64 step can round away to nothing.
fn stall_warning(index: ChunkIndex, cursor: f64) {
    tracing::warn!(
        "Chunk {} walk stalled at x={}: spacing below float resolution",
        index,
        cursor
    );
}

/// Produces populated chunks from the catalog and spacing policy.
pub struct ChunkGenerator {
    rules: PlacementRules,
    seed: WorldSeed,
    policy: RegenerationPolicy,
    /// Session stream, only drawn from under [`RegenerationPolicy::Fresh`].
    stream: WorldRng,
}

impl ChunkGenerator {
    /// Sub-seed purpose for the session stream.
    const STREAM_PURPOSE: u64 = 0x5354_5245_414d;

    /// Validates the configuration and creates a generator from it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WorldError::InvalidConfig`] if validation fails.
    pub fn new(config: &WorldConfig) -> WorldResult<Self> {
        config.validate()?;
        Ok(Self {
            rules: PlacementRules {
                catalog: config.catalog.clone(),
                spacing: config.spacing,
                cluster_size: config.cluster_size,
                chunk_width: config.chunk_width,
                edge_margin: config.edge_margin,
                ground_y: config.ground_y(),
            },
            seed: config.seed,
            policy: config.regeneration,
            stream: config.seed.derive(Self::STREAM_PURPOSE).rng(),
        })
    }

    /// The catalog this generator places from.
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &ContentCatalog {
        &self.rules.catalog
    }

    /// Chunk width.
    #[inline]
    #[must_use]
    pub const fn chunk_width(&self) -> f64 {
        self.rules.chunk_width
    }

    /// Generates the chunk at `index` using the configured regeneration policy.
    pub fn generate(&mut self, index: ChunkIndex) -> Chunk {
        let chunk = match self.policy {
            RegenerationPolicy::Stable => {
                #[allow(clippy::cast_sign_loss)]
                let mut rng = self.seed.derive(index.0 as u64).rng();
                self.rules.generate(index, &mut rng)
            }
            RegenerationPolicy::Fresh => self.rules.generate(index, &mut self.stream),
        };

        tracing::debug!(
            "Generated chunk {} with {} objects at x={}",
            chunk.index,
            chunk.objects.len(),
            chunk.world_x
        );
        chunk
    }

    /// Generates the chunk at `index`, drawing from `rng` instead of the
    /// configured policy.
    ///
    /// Never fails: an empty variant table turns that slot into an empty one.
    pub fn generate_with<R: Rng + ?Sized>(&self, index: ChunkIndex, rng: &mut R) -> Chunk {
        self.rules.generate(index, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryWeights;

    fn generator(config: &WorldConfig) -> ChunkGenerator {
        ChunkGenerator::new(config).unwrap()
    }

    #[test]
    fn test_chunk_index_from_world_x() {
        assert_eq!(ChunkIndex::from_world_x(0.0, 800.0), ChunkIndex(0));
        assert_eq!(ChunkIndex::from_world_x(799.9, 800.0), ChunkIndex(0));
        assert_eq!(ChunkIndex::from_world_x(800.0, 800.0), ChunkIndex(1));
        assert_eq!(ChunkIndex::from_world_x(-0.1, 800.0), ChunkIndex(-1));
        assert_eq!(ChunkIndex::from_world_x(-800.0, 800.0), ChunkIndex(-1));
        assert_eq!(ChunkIndex::from_world_x(-800.1, 800.0), ChunkIndex(-2));
        assert_eq!(ChunkIndex::from_world_x(8000.0, 800.0), ChunkIndex(10));
    }

    #[test]
    fn test_chunk_index_distance() {
        assert_eq!(ChunkIndex(-2).distance(ChunkIndex(3)), 5);
        assert_eq!(ChunkIndex(3).offset(-5), ChunkIndex(-2));
    }

    #[test]
    fn test_chunk_world_x_and_bounds() {
        let config = WorldConfig::default();
        let mut gen = generator(&config);
        for i in [-3, 0, 4] {
            let chunk = gen.generate(ChunkIndex(i));
            let left = f64::from(i as i32) * 800.0;
            assert!((chunk.world_x() - left).abs() < f64::EPSILON);
            for object in chunk.objects() {
                assert!(object.x >= left + 50.0);
                assert!(object.x < left + 750.0, "object at {} past edge", object.x);
            }
        }
    }

    #[test]
    fn test_objects_ascending() {
        let config = WorldConfig::default();
        let mut gen = generator(&config);
        for i in -20..20 {
            let chunk = gen.generate(ChunkIndex(i));
            for pair in chunk.objects().windows(2) {
                assert!(pair[0].x <= pair[1].x);
            }
        }
    }

    #[test]
    fn test_objects_planted_on_ground() {
        let config = WorldConfig::default();
        let mut gen = generator(&config);
        let ground = config.ground_y();
        for i in 0..50 {
            for object in gen.generate(ChunkIndex(i)).objects() {
                let variant = gen
                    .catalog()
                    .variants(object.kind)
                    .iter()
                    .find(|v| v.name == object.variant)
                    .unwrap();
                let expected = ground - variant.height + variant.vertical_offset;
                assert!((object.y - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_stable_policy_rebuilds_identical_chunk() {
        let config = WorldConfig::default();
        let mut gen = generator(&config);
        let first = gen.generate(ChunkIndex(7));
        let _ = gen.generate(ChunkIndex(8));
        let again = gen.generate(ChunkIndex(7));
        assert_eq!(first, again);
    }

    #[test]
    fn test_fresh_policy_is_replayable_per_seed() {
        let config = WorldConfig {
            regeneration: RegenerationPolicy::Fresh,
            ..WorldConfig::default()
        };
        let mut a = generator(&config);
        let mut b = generator(&config);
        let sequence = [0, 1, 2, 0, 1, 2];
        for i in sequence {
            assert_eq!(a.generate(ChunkIndex(i)), b.generate(ChunkIndex(i)));
        }
    }

    #[test]
    fn test_fresh_policy_reshuffles_on_revisit() {
        let config = WorldConfig {
            regeneration: RegenerationPolicy::Fresh,
            ..WorldConfig::default()
        };
        let mut gen = generator(&config);
        let visits: Vec<Chunk> = (0..8).map(|_| gen.generate(ChunkIndex(3))).collect();
        assert!(visits.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn test_all_empty_catalog_gives_empty_chunk() {
        let mut config = WorldConfig::default();
        config.catalog.probabilities = CategoryWeights {
            tree: 0.0,
            structure: 0.0,
            decoration: 0.0,
            cluster: 0.0,
            empty: 1.0,
        };
        let mut gen = generator(&config);
        assert_eq!(gen.generate(ChunkIndex(0)).object_count(), 0);
    }

    #[test]
    fn test_missing_variants_fall_back_to_empty() {
        let mut config = WorldConfig::default();
        config.catalog.probabilities = CategoryWeights {
            tree: 0.0,
            structure: 0.5,
            decoration: 0.5,
            cluster: 0.0,
            empty: 0.0,
        };
        config.catalog.structures.clear();
        let mut gen = generator(&config);
        for i in 0..20 {
            for object in gen.generate(ChunkIndex(i)).objects() {
                assert_eq!(object.kind, ObjectKind::Decoration);
            }
        }
    }

    #[test]
    fn test_cluster_members_share_variant_and_step() {
        let mut config = WorldConfig::default();
        config.catalog.probabilities = CategoryWeights {
            tree: 0.0,
            structure: 0.0,
            decoration: 0.0,
            cluster: 1.0,
            empty: 0.0,
        };
        let mut gen = generator(&config);
        let mut clusters_seen = 0;

        for i in 0..30 {
            let chunk = gen.generate(ChunkIndex(i));
            let objects = chunk.objects();
            let mut start = 0;
            while start < objects.len() {
                let Placement::Cluster { size, .. } = objects[start].placement else {
                    panic!("expected only cluster members");
                };
                let run = &objects[start..start + size as usize];
                assert!((1..=5).contains(&size));
                for (member, object) in run.iter().enumerate() {
                    assert_eq!(object.kind, ObjectKind::Tree);
                    assert_eq!(object.variant, run[0].variant);
                    assert_eq!(
                        object.placement,
                        Placement::Cluster { member: member as u32, size }
                    );
                }
                for pair in run.windows(2) {
                    let gap = pair[1].x - pair[0].x;
                    assert!((50.0 - 1e-9..80.0 + 1e-9).contains(&gap), "cluster gap {gap}");
                }
                start += size as usize;
                clusters_seen += 1;
            }
        }
        assert!(clusters_seen > 0);
    }

    #[test]
    fn test_cluster_stops_at_chunk_edge() {
        let mut config = WorldConfig::default();
        config.catalog.probabilities = CategoryWeights {
            tree: 0.0,
            structure: 0.0,
            decoration: 0.0,
            cluster: 1.0,
            empty: 0.0,
        };
        config.cluster_size = ClusterSize { min: 40, max: 40 };
        let mut gen = generator(&config);
        let chunk = gen.generate(ChunkIndex(0));
        assert!(chunk.object_count() < 40);
        assert!(chunk.objects().iter().all(|o| o.x < 750.0));
    }

    #[test]
    fn test_walk_ends_where_spacing_is_below_float_resolution() {
        let config = WorldConfig::default();
        let mut gen = generator(&config);
        // World x 2.4e18: one ULP is 512, so every spacing step rounds away.
        for i in [3_000_000_000_000_000, -3_000_000_000_000_000, i64::MAX, i64::MIN] {
            let chunk = gen.generate(ChunkIndex(i));
            assert!(chunk.object_count() <= 2);
            for pair in chunk.objects().windows(2) {
                assert!(pair[0].x < pair[1].x);
            }
        }
    }

    #[test]
    fn test_cluster_walk_ends_with_zero_cluster_step() {
        let mut config = WorldConfig::default();
        config.catalog.probabilities = CategoryWeights {
            tree: 0.0,
            structure: 0.0,
            decoration: 0.0,
            cluster: 1.0,
            empty: 0.0,
        };
        config.spacing.cluster = 0.0;
        config.spacing.cluster_jitter = 0.0;
        let mut gen = generator(&config);
        let chunk = gen.generate(ChunkIndex(0));
        for pair in chunk.objects().windows(2) {
            assert!(pair[0].x < pair[1].x);
        }
    }

    #[test]
    fn test_inverted_cluster_size_rejected() {
        let mut config = WorldConfig::default();
        config.cluster_size = ClusterSize { min: 5, max: 3 };
        assert!(matches!(
            ChunkGenerator::new(&config),
            Err(crate::WorldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_spacing_rejected() {
        let mut config = WorldConfig::default();
        config.spacing.min = 0.0;
        config.spacing.max = 0.0;
        assert!(matches!(
            ChunkGenerator::new(&config),
            Err(crate::WorldError::InvalidConfig(_))
        ));
    }
}
