//! # Scene Seams
//!
//! The two collaborators the frame driver talks to: something that knows
//! where the player is, and something that draws.
//!
//! Renderers draw in world space. [`SceneRenderer::begin_frame`] hands over
//! the camera offset once per frame; subtract it (or apply it as a
//! translation) to get screen space.

use sylvan_world::{CameraOffset, DebugSummary, GroundStrip, PlacedObject, Rect};

/// Player position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerPosition {
    /// World X.
    pub x: f64,
    /// World Y.
    pub y: f64,
}

/// Anything the camera can follow.
pub trait PlayerSource {
    /// Advances the player by one frame of `dt` seconds.
    ///
    /// Controllers driven elsewhere can leave this as a no-op.
    fn update(&mut self, _dt: f64) {}

    /// Current position.
    fn position(&self) -> PlayerPosition;
}

/// Draw calls issued by the frame driver, in this order every frame.
pub trait SceneRenderer {
    /// Called first with the camera offset for this frame.
    fn begin_frame(&mut self, camera: CameraOffset);

    /// One tile of a repeating background layer.
    fn draw_background_tile(&mut self, layer: usize, tile: Rect);

    /// The ground strip.
    fn draw_ground(&mut self, ground: &GroundStrip);

    /// One placed object.
    fn draw_object(&mut self, object: &PlacedObject);

    /// Diagnostic overlay, only when the overlay is enabled.
    fn draw_overlay(&mut self, summary: &DebugSummary);
}

/// Renderer that only counts what it was asked to draw.
///
/// Used by headless runs and tests.
#[derive(Clone, Debug, Default)]
pub struct FrameRecorder {
    /// Frames begun.
    pub frames: u64,
    /// Camera offset of the latest frame.
    pub last_camera: CameraOffset,
    /// Background tiles drawn in the latest frame.
    pub background_tiles: u32,
    /// Ground strip of the latest frame.
    pub ground: Option<GroundStrip>,
    /// Objects drawn in the latest frame.
    pub objects: Vec<PlacedObject>,
    /// Latest overlay text.
    pub overlay: Option<String>,
}

impl SceneRenderer for FrameRecorder {
    fn begin_frame(&mut self, camera: CameraOffset) {
        self.frames += 1;
        self.last_camera = camera;
        self.background_tiles = 0;
        self.ground = None;
        self.objects.clear();
    }

    fn draw_background_tile(&mut self, _layer: usize, _tile: Rect) {
        self.background_tiles += 1;
    }

    fn draw_ground(&mut self, ground: &GroundStrip) {
        self.ground = Some(*ground);
    }

    fn draw_object(&mut self, object: &PlacedObject) {
        self.objects.push(object.clone());
    }

    fn draw_overlay(&mut self, summary: &DebugSummary) {
        self.overlay = Some(summary.to_string());
    }
}
