//! # World Configuration
//!
//! The spatial configuration bundle, loaded once at start-up from TOML and
//! immutable afterwards. Every field has a default matching the shipped
//! game, so a partial file only overrides what it names.
//!
//! ```toml
//! chunk_width = 800.0
//! seed = 42
//!
//! [window]
//! generate_ahead = 2
//! lookback = 2
//! retention_radius = 5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, ContentCatalog};
use crate::error::{WorldError, WorldResult};
use crate::seed::WorldSeed;

/// Slack allowed when checking that probabilities sum to one.
const PROBABILITY_EPSILON: f64 = 1e-6;

/// Viewport dimensions in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Visible width.
    pub width: f64,
    /// Visible height.
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 390.0,
        }
    }
}

/// Horizontal spacing policy for placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingConfig {
    /// Minimum cursor advance between slots.
    pub min: f64,
    /// Maximum cursor advance between slots.
    pub max: f64,
    /// Base step between members of a cluster.
    pub cluster: f64,
    /// Extra random step added per cluster member, in `[0, cluster_jitter)`.
    pub cluster_jitter: f64,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            min: 80.0,
            max: 200.0,
            cluster: 50.0,
            cluster_jitter: 30.0,
        }
    }
}

/// Inclusive range of members per cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSize {
    /// Fewest members.
    pub min: u32,
    /// Most members.
    pub max: u32,
}

impl Default for ClusterSize {
    fn default() -> Self {
        Self { min: 3, max: 5 }
    }
}

/// Streaming window extents, in chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Chunks generated ahead of the camera chunk.
    pub generate_ahead: u32,
    /// Chunks generated behind the camera chunk.
    pub lookback: u32,
    /// Chunks farther than this from the camera chunk are evicted.
    pub retention_radius: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            generate_ahead: 2,
            lookback: 2,
            retention_radius: 5,
        }
    }
}

/// Camera follow settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered per tick, in `(0, 1]`.
    pub smoothing: f64,
    /// When set, smoothing becomes frame-rate independent with this time
    /// constant (seconds) and `smoothing` is ignored.
    pub time_constant_secs: Option<f64>,
    /// Initial camera X.
    pub start_x: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.15,
            time_constant_secs: None,
            start_x: 0.0,
        }
    }
}

/// What happens to a chunk index that re-enters the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationPolicy {
    /// Every index has its own seeded stream; revisits rebuild identical content.
    #[default]
    Stable,
    /// One stream for the whole session; revisits get fresh content.
    Fresh,
}

/// One repeating background layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayerConfig {
    /// Scroll factor relative to the camera (0 = fixed, 1 = world speed).
    pub speed: f64,
    /// Width of one tile of the layer image.
    pub tile_width: f64,
}

/// Backdrop geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Background layers, drawn in order.
    pub layers: Vec<ParallaxLayerConfig>,
    /// Height of the ground strip.
    pub ground_height: f64,
    /// Height of the grass band on top of the ground strip.
    pub grass_height: f64,
    /// How far the ground strip extends past each viewport edge.
    pub overscan: f64,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            layers: vec![ParallaxLayerConfig {
                speed: 0.3,
                tile_width: 640.0,
            }],
            ground_height: 50.0,
            grass_height: 8.0,
            overscan: 100.0,
        }
    }
}

/// Complete world configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Viewport dimensions.
    pub viewport: Viewport,
    /// Distance from the viewport bottom to the ground line.
    pub ground_margin: f64,
    /// Width of one chunk.
    pub chunk_width: f64,
    /// Margin at each chunk edge where nothing starts.
    pub edge_margin: f64,
    /// Spacing policy.
    pub spacing: SpacingConfig,
    /// Cluster member count range.
    pub cluster_size: ClusterSize,
    /// Streaming window extents.
    pub window: WindowConfig,
    /// Camera follow.
    pub camera: CameraConfig,
    /// World seed.
    pub seed: WorldSeed,
    /// Revisit behaviour.
    pub regeneration: RegenerationPolicy,
    /// Placeable content.
    pub catalog: ContentCatalog,
    /// Backdrop geometry.
    pub backdrop: BackdropConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            ground_margin: 50.0,
            chunk_width: 800.0,
            edge_margin: 50.0,
            spacing: SpacingConfig::default(),
            cluster_size: ClusterSize::default(),
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            seed: WorldSeed::default(),
            regeneration: RegenerationPolicy::default(),
            catalog: ContentCatalog::default(),
            backdrop: BackdropConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigParse`] for malformed TOML and
    /// [`WorldError::InvalidConfig`] for values that fail validation.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigIo`] if the file cannot be read, plus
    /// everything [`WorldConfig::from_toml_str`] can return.
    pub fn load(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| WorldError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Y coordinate of the ground line.
    #[inline]
    #[must_use]
    pub fn ground_y(&self) -> f64 {
        self.viewport.height - self.ground_margin
    }

    /// Checks every invariant the streaming window and generator rely on.
    ///
    /// Soft problems (probabilities not summing to one, selectable
    /// categories without variants) are logged and tolerated: they only
    /// make the world sparser.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] describing the first violation.
    pub fn validate(&self) -> WorldResult<()> {
        fn invalid(message: String) -> WorldResult<()> {
            Err(WorldError::InvalidConfig(message))
        }

        if !(self.viewport.width.is_finite() && self.viewport.width > 0.0)
            || !(self.viewport.height.is_finite() && self.viewport.height > 0.0)
        {
            return invalid(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            ));
        }
        if !(self.chunk_width.is_finite() && self.chunk_width > 0.0) {
            return invalid(format!("chunk_width must be positive, got {}", self.chunk_width));
        }
        if !(self.edge_margin.is_finite() && self.edge_margin >= 0.0) {
            return invalid(format!("edge_margin must be non-negative, got {}", self.edge_margin));
        }

        let spacing = &self.spacing;
        if !(spacing.min.is_finite() && spacing.min > 0.0) {
            return invalid(format!("spacing.min must be positive, got {}", spacing.min));
        }
        if !spacing.max.is_finite() || spacing.max < spacing.min {
            return invalid(format!(
                "spacing.max ({}) must be at least spacing.min ({})",
                spacing.max, spacing.min
            ));
        }
        if !(spacing.cluster.is_finite() && spacing.cluster >= 0.0)
            || !(spacing.cluster_jitter.is_finite() && spacing.cluster_jitter >= 0.0)
        {
            return invalid(format!(
                "cluster spacing must be non-negative, got {} + {}",
                spacing.cluster, spacing.cluster_jitter
            ));
        }

        if self.cluster_size.min == 0 || self.cluster_size.max < self.cluster_size.min {
            return invalid(format!(
                "cluster_size must satisfy 1 <= min <= max, got {}..={}",
                self.cluster_size.min, self.cluster_size.max
            ));
        }

        let window = &self.window;
        let reach = window.generate_ahead.max(window.lookback);
        if window.retention_radius < reach {
            return invalid(format!(
                "retention_radius ({}) must cover generate_ahead ({}) and lookback ({})",
                window.retention_radius, window.generate_ahead, window.lookback
            ));
        }

        let camera = &self.camera;
        if !(camera.smoothing > 0.0 && camera.smoothing <= 1.0) {
            return invalid(format!("camera.smoothing must be in (0, 1], got {}", camera.smoothing));
        }
        if let Some(tau) = camera.time_constant_secs {
            if !(tau.is_finite() && tau > 0.0) {
                return invalid(format!("camera.time_constant_secs must be positive, got {tau}"));
            }
        }
        if !camera.start_x.is_finite() {
            return invalid(format!("camera.start_x must be finite, got {}", camera.start_x));
        }

        for category in Category::ORDER {
            let probability = self.catalog.probabilities.get(category);
            if !(probability.is_finite() && probability >= 0.0) {
                return invalid(format!(
                    "probability for {category:?} must be a non-negative number, got {probability}"
                ));
            }
        }

        for layer in &self.backdrop.layers {
            if !(layer.tile_width.is_finite() && layer.tile_width > 0.0) || !layer.speed.is_finite() {
                return invalid(format!(
                    "backdrop layer needs a positive tile width and finite speed, got {layer:?}"
                ));
            }
        }

        self.warn_soft_problems();
        Ok(())
    }

    fn warn_soft_problems(&self) {
        let total = self.catalog.probabilities.total();
        if total < 1.0 - PROBABILITY_EPSILON {
            tracing::warn!(
                "Category probabilities sum to {:.3}; the residual is treated as empty",
                total
            );
        } else if total > 1.0 + PROBABILITY_EPSILON {
            tracing::warn!(
                "Category probabilities sum to {:.3}; later categories are partly unreachable",
                total
            );
        }
        for category in self.catalog.unplaceable_categories() {
            tracing::warn!(
                "Category {:?} is selectable but has no variants; it will place nothing",
                category
            );
        }
        if 2.0 * self.edge_margin >= self.chunk_width {
            tracing::warn!(
                "edge_margin {} leaves no placeable span in a {} wide chunk",
                self.edge_margin,
                self.chunk_width
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.ground_y() - 340.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WorldConfig::from_toml_str(
            r#"
            chunk_width = 1000.0
            seed = 7
            regeneration = "fresh"

            [window]
            generate_ahead = 3
            retention_radius = 6
            "#,
        )
        .unwrap();

        assert!((config.chunk_width - 1000.0).abs() < f64::EPSILON);
        assert_eq!(config.seed, WorldSeed::new(7));
        assert_eq!(config.regeneration, RegenerationPolicy::Fresh);
        assert_eq!(config.window.generate_ahead, 3);
        assert_eq!(config.window.lookback, 2);
        assert_eq!(config.catalog.trees.len(), 3);
    }

    #[test]
    fn test_catalog_tables_from_toml() {
        let config = WorldConfig::from_toml_str(
            r#"
            [catalog.probabilities]
            tree = 0.5
            empty = 0.5

            [[catalog.trees]]
            name = "oak"
            width = 100.0
            height = 120.0
            vertical_offset = 10.0
            sprite_sheet = "trees"
            sprite_x = 0.0
            sprite_y = 10.0
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.trees.len(), 1);
        assert_eq!(config.catalog.trees[0].name, "oak");
        // Unnamed weights fall back to the defaults.
        assert!((config.catalog.probabilities.structure - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_retention_must_cover_window() {
        let mut config = WorldConfig::default();
        config.window.generate_ahead = 6;
        assert!(matches!(config.validate(), Err(WorldError::InvalidConfig(_))));
    }

    #[test]
    fn test_spacing_bounds_checked() {
        let mut config = WorldConfig::default();
        config.spacing.max = 10.0;
        assert!(config.validate().is_err());

        let mut config = WorldConfig::default();
        config.spacing.min = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_smoothing_range_checked() {
        let mut config = WorldConfig::default();
        config.camera.smoothing = 0.0;
        assert!(config.validate().is_err());
        config.camera.smoothing = 1.0;
        assert!(config.validate().is_ok());
        config.camera.time_constant_secs = Some(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_probability_rejected() {
        let mut config = WorldConfig::default();
        config.catalog.probabilities.cluster = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sparse_catalog_is_tolerated() {
        let mut config = WorldConfig::default();
        config.catalog.structures.clear();
        config.catalog.probabilities.empty = 0.1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = WorldConfig::from_toml_str("chunk_width = \"wide\"");
        assert!(matches!(result, Err(WorldError::ConfigParse(_))));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped = include_str!("../../../config/world.toml");
        let config = WorldConfig::from_toml_str(shipped).unwrap();
        assert_eq!(config, WorldConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = WorldConfig::load("/nonexistent/sylvan/world.toml");
        assert!(matches!(result, Err(WorldError::ConfigIo { .. })));
    }
}
