//! # Placement Spacing Tests
//!
//! Checks the spacing law across many seeds: objects come out ascending,
//! stand-alone neighbours are never closer than `spacing.min`, and with
//! empty slots switched off they are never further than `spacing.max`.

use sylvan_world::{
    CategoryWeights, Chunk, ChunkGenerator, ChunkIndex, Placement, WorldConfig, WorldSeed,
};

const SEEDS: u64 = 200;
const EPS: f64 = 1e-9;

fn chunks_for(config: &WorldConfig) -> impl Iterator<Item = Chunk> + '_ {
    let generator = ChunkGenerator::new(config).unwrap();
    (0..SEEDS).flat_map(move |s| {
        let mut rng = WorldSeed::new(s).rng();
        (-3..3)
            .map(|i| generator.generate_with(ChunkIndex(i), &mut rng))
            .collect::<Vec<_>>()
    })
}

/// True when both objects sit in the same cluster run.
fn same_run(a: &Placement, b: &Placement) -> bool {
    match (a, b) {
        (Placement::Cluster { member: ma, .. }, Placement::Cluster { member: mb, .. }) => {
            *mb == *ma + 1
        }
        _ => false,
    }
}

#[test]
fn test_objects_ascending_for_all_seeds() {
    let config = WorldConfig::default();
    for chunk in chunks_for(&config) {
        for pair in chunk.objects().windows(2) {
            assert!(pair[0].x < pair[1].x, "chunk {} not ascending", chunk.index());
        }
    }
}

#[test]
fn test_objects_inside_edge_margins() {
    let config = WorldConfig::default();
    for chunk in chunks_for(&config) {
        let left = chunk.world_x() + config.edge_margin;
        let right = chunk.world_x() + config.chunk_width - config.edge_margin;
        for object in chunk.objects() {
            assert!(object.x >= left - EPS);
            assert!(object.x < right);
        }
    }
}

#[test]
fn test_minimum_spacing_between_slots() {
    let config = WorldConfig::default();
    let mut checked = 0_u32;
    for chunk in chunks_for(&config) {
        for pair in chunk.objects().windows(2) {
            if same_run(&pair[0].placement, &pair[1].placement) {
                continue;
            }
            let gap = pair[1].x - pair[0].x;
            assert!(
                gap >= config.spacing.min - EPS,
                "gap {gap} below minimum in chunk {}",
                chunk.index()
            );
            checked += 1;
        }
    }
    assert!(checked > 100);
}

#[test]
fn test_spacing_within_bounds_without_empty_slots() {
    let mut config = WorldConfig::default();
    config.catalog.probabilities = CategoryWeights {
        tree: 0.4,
        structure: 0.3,
        decoration: 0.3,
        cluster: 0.0,
        empty: 0.0,
    };

    for chunk in chunks_for(&config) {
        let objects = chunk.objects();
        assert!(!objects.is_empty());
        // First slot sits right on the left edge margin.
        assert!((objects[0].x - chunk.world_x() - config.edge_margin).abs() < EPS);
        for pair in objects.windows(2) {
            let gap = pair[1].x - pair[0].x;
            assert!(gap >= config.spacing.min - EPS, "gap {gap} too small");
            assert!(gap <= config.spacing.max + EPS, "gap {gap} too large");
        }
    }
}

#[test]
fn test_cluster_runs_use_tight_step() {
    let mut config = WorldConfig::default();
    config.catalog.probabilities = CategoryWeights {
        tree: 0.0,
        structure: 0.0,
        decoration: 0.0,
        cluster: 1.0,
        empty: 0.0,
    };
    let tight_max = config.spacing.cluster + config.spacing.cluster_jitter;

    for chunk in chunks_for(&config) {
        for pair in chunk.objects().windows(2) {
            let gap = pair[1].x - pair[0].x;
            if same_run(&pair[0].placement, &pair[1].placement) {
                assert!(gap >= config.spacing.cluster - EPS);
                assert!(gap <= tight_max + EPS);
                assert_eq!(pair[0].variant, pair[1].variant);
            } else {
                assert!(gap >= config.spacing.min - EPS);
            }
        }
    }
}

#[test]
fn test_same_seed_same_chunks() {
    let config = WorldConfig::default();
    let a: Vec<Chunk> = chunks_for(&config).collect();
    let b: Vec<Chunk> = chunks_for(&config).collect();
    assert_eq!(a, b);
}
