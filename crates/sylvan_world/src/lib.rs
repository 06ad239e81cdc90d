//! # Sylvan World
//!
//! Environment streaming for the Sylvan side-scrolling runner: an endless,
//! camera-relative row of chunks filled with procedural scenery.
//!
//! ## Design Principles
//!
//! 1. **Chunked**: the world is a row of fixed-width chunks keyed by index
//! 2. **Streamable**: chunks are generated ahead of the camera and evicted
//!    once they leave the retention radius
//! 3. **Seeded**: all randomness comes from one injected [`WorldSeed`]
//! 4. **Never fatal**: bad frames are skipped, sparse catalogs place less
//!
//! ## Core Components
//!
//! - `ContentCatalog`: category probabilities and variant tables
//! - `ChunkGenerator`: walks a chunk left to right placing scenery
//! - `StreamingWindow`: generates ahead/behind, evicts the rest
//! - `Camera`: smoothed horizontal follow
//! - `WorldStreamingContext`: owns all of the above for the frame driver
//!
//! ## Example
//!
//! ```rust
//! use sylvan_world::{WorldConfig, WorldStreamingContext};
//!
//! let mut world = WorldStreamingContext::new(WorldConfig::default()).unwrap();
//!
//! // Player runs right
//! for frame in 0..120 {
//!     world.step(50.0 + f64::from(frame) * 2.5, 1.0 / 60.0);
//! }
//!
//! let camera = world.camera_offset();
//! for chunk in world.active_chunks() {
//!     for object in chunk.objects() {
//!         let _screen_x = object.screen_x(camera.x);
//!     }
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod backdrop;
pub mod camera;
pub mod catalog;
pub mod chunk;
pub mod config;
pub mod context;
pub mod error;
pub mod seed;
pub mod streaming;

pub use backdrop::{Backdrop, GroundStrip, ParallaxLayer, Rect};
pub use camera::{Camera, CameraOffset, Smoothing};
pub use catalog::{Category, CategoryWeights, ContentCatalog, ObjectKind, SpriteSheet, Variant};
pub use chunk::{Chunk, ChunkGenerator, ChunkIndex, PlacedObject, Placement};
pub use config::{
    BackdropConfig, CameraConfig, ClusterSize, ParallaxLayerConfig, RegenerationPolicy,
    SpacingConfig, Viewport, WindowConfig, WorldConfig,
};
pub use context::{DebugSummary, WorldStreamingContext};
pub use error::{WorldError, WorldResult};
pub use seed::{WorldRng, WorldSeed};
pub use streaming::{ReconcileReport, StreamingStats, StreamingWindow};
