//! # Backdrop Geometry
//!
//! World-space positions for the repeating parallax layers and the ground
//! strip. Only geometry lives here; the renderer does the drawing.

use serde::Serialize;

use crate::config::{BackdropConfig, ParallaxLayerConfig, WorldConfig};

/// Axis-aligned rectangle in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Ground strip for one frame: soil plus the grass band on top.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GroundStrip {
    /// Soil rectangle.
    pub soil: Rect,
    /// Grass rectangle, same top edge as the soil.
    pub grass: Rect,
}

/// One repeating background layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxLayer {
    speed: f64,
    tile_width: f64,
}

impl ParallaxLayer {
    /// Creates a layer scrolling at `speed` relative to the camera.
    #[must_use]
    pub const fn new(speed: f64, tile_width: f64) -> Self {
        Self { speed, tile_width }
    }

    /// Scroll factor.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Tile width.
    #[must_use]
    pub const fn tile_width(&self) -> f64 {
        self.tile_width
    }

    /// Layer shift for a camera position.
    #[inline]
    #[must_use]
    pub fn offset(&self, camera_x: f64) -> f64 {
        -camera_x * self.speed
    }

    /// World-space X of every tile needed to cover the viewport.
    ///
    /// Starts one tile boundary at or left of the viewport and covers
    /// `viewport_width + 2 * tile_width`.
    pub fn tile_positions(&self, camera_x: f64, viewport_width: f64) -> impl Iterator<Item = f64> {
        let width = self.tile_width;
        let offset = self.offset(camera_x);
        let start = ((camera_x + offset) / width).floor() * width - offset;
        let end = start + viewport_width + width * 2.0;
        (0_u32..)
            .map(move |i| start + f64::from(i) * width)
            .take_while(move |x| *x < end)
    }
}

impl From<&ParallaxLayerConfig> for ParallaxLayer {
    fn from(config: &ParallaxLayerConfig) -> Self {
        Self::new(config.speed, config.tile_width)
    }
}

/// Parallax layers plus ground geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Backdrop {
    layers: Vec<ParallaxLayer>,
    ground_y: f64,
    ground_height: f64,
    grass_height: f64,
    overscan: f64,
    viewport_width: f64,
}

impl Backdrop {
    /// Builds the backdrop from configuration.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        let BackdropConfig {
            layers,
            ground_height,
            grass_height,
            overscan,
        } = &config.backdrop;
        Self {
            layers: layers.iter().map(ParallaxLayer::from).collect(),
            ground_y: config.ground_y(),
            ground_height: *ground_height,
            grass_height: *grass_height,
            overscan: *overscan,
            viewport_width: config.viewport.width,
        }
    }

    /// Background layers in draw order.
    #[must_use]
    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    /// Ground strip spanning the viewport plus overscan on both sides.
    #[must_use]
    pub fn ground(&self, camera_x: f64) -> GroundStrip {
        let x = camera_x - self.overscan;
        let width = self.viewport_width + self.overscan * 2.0;
        GroundStrip {
            soil: Rect {
                x,
                y: self.ground_y,
                width,
                height: self.ground_height,
            },
            grass: Rect {
                x,
                y: self.ground_y,
                width,
                height: self.grass_height,
            },
        }
    }
}
