//! # World Streaming Context
//!
//! The single value the frame driver owns. Holds the camera, the streaming
//! window and the backdrop; there is no global world state.
//!
//! Per frame:
//!
//! ```text
//! step(player_x, dt)
//!   ├─ camera.update_with_delta(player_x, viewport_width, dt)
//!   └─ window.reconcile(camera.x)
//! ```
//!
//! Renderers then read `active_chunks()` and `camera_offset()`.

use std::fmt;

use serde::Serialize;

use crate::backdrop::Backdrop;
use crate::camera::{Camera, CameraOffset};
use crate::chunk::{Chunk, ChunkGenerator, ChunkIndex, PlacedObject};
use crate::config::WorldConfig;
use crate::error::WorldResult;
use crate::streaming::{ReconcileReport, StreamingStats, StreamingWindow};

/// Snapshot for the on-screen diagnostic overlay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DebugSummary {
    /// Camera X.
    pub camera_x: f64,
    /// Camera Y (always zero).
    pub camera_y: f64,
    /// Resident chunks.
    pub chunk_count: usize,
    /// Camera chunk of the last applied reconcile.
    pub current_index: Option<ChunkIndex>,
    /// Placed objects across resident chunks.
    pub object_count: usize,
    /// Background layers.
    pub background_layers: usize,
}

impl fmt::Display for DebugSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WORLD:")?;
        writeln!(
            f,
            "Camera: {}, {}",
            round_half_up(self.camera_x),
            round_half_up(self.camera_y)
        )?;
        match self.current_index {
            Some(index) => writeln!(f, "Chunks: {} (current: {index})", self.chunk_count)?,
            None => writeln!(f, "Chunks: {} (current: -)", self.chunk_count)?,
        }
        writeln!(f, "Objects: {}", self.object_count)?;
        write!(f, "Backgrounds: {}", self.background_layers)
    }
}

/// Rounds half toward positive infinity, never yielding negative zero.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor() + 0.0
}

/// Everything the world system needs between frames.
pub struct WorldStreamingContext {
    config: WorldConfig,
    camera: Camera,
    window: StreamingWindow,
    backdrop: Backdrop,
}

impl WorldStreamingContext {
    /// Validates the configuration and pre-generates the window around the
    /// starting camera position.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WorldError::InvalidConfig`] if validation fails.
    pub fn new(config: WorldConfig) -> WorldResult<Self> {
        let generator = ChunkGenerator::new(&config)?;

        let camera = Camera::from_config(&config.camera);
        let window = StreamingWindow::new(generator, config.window);
        let backdrop = Backdrop::new(&config);

        let mut context = Self {
            config,
            camera,
            window,
            backdrop,
        };
        context.window.reconcile(context.camera.x());

        tracing::info!(
            "World streaming initialised: {} chunks, {} objects, seed {}",
            context.window.len(),
            context.window.total_objects(),
            context.config.seed.value()
        );
        Ok(context)
    }

    /// Runs one frame: camera follow, then reconcile.
    ///
    /// A non-finite `player_x` leaves the camera where it is.
    pub fn step(&mut self, player_x: f64, dt: f64) -> Option<ReconcileReport> {
        if player_x.is_finite() {
            self.camera
                .update_with_delta(player_x, self.config.viewport.width, dt);
        } else {
            tracing::warn!("Ignoring non-finite player position {}", player_x);
        }
        self.window.reconcile(self.camera.x())
    }

    /// Centres the camera on the player immediately and reconciles.
    pub fn snap_to(&mut self, player_x: f64) -> Option<ReconcileReport> {
        if player_x.is_finite() {
            self.camera.snap_to(player_x, self.config.viewport.width);
        }
        self.window.reconcile(self.camera.x())
    }

    /// Resident chunks, ascending by index.
    pub fn active_chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.window.active_chunks()
    }

    /// Objects overlapping the viewport, in chunk then x order.
    pub fn visible_objects(&self) -> impl Iterator<Item = &PlacedObject> + '_ {
        let left = self.camera.x();
        let right = left + self.config.viewport.width;
        self.window
            .active_chunks()
            .flat_map(Chunk::objects)
            .filter(move |object| object.right() >= left && object.x <= right)
    }

    /// Camera offset for world-to-screen translation.
    #[must_use]
    pub const fn camera_offset(&self) -> CameraOffset {
        self.camera.offset()
    }

    /// The camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The streaming window.
    #[must_use]
    pub const fn window(&self) -> &StreamingWindow {
        &self.window
    }

    /// Backdrop geometry.
    #[must_use]
    pub const fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    /// Streaming statistics.
    #[must_use]
    pub const fn stats(&self) -> StreamingStats {
        self.window.stats()
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Diagnostic snapshot.
    #[must_use]
    pub fn debug_summary(&self) -> DebugSummary {
        let offset = self.camera.offset();
        DebugSummary {
            camera_x: offset.x,
            camera_y: offset.y,
            chunk_count: self.window.len(),
            current_index: self.window.current_index(),
            object_count: self.window.total_objects(),
            background_layers: self.backdrop.layers().len(),
        }
    }
}
