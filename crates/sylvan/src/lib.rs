//! # Sylvan
//!
//! Frame driver for the Sylvan side-scrolling runner.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   position   ┌───────────────────────────┐
//! │  PlayerSource    │─────────────>│  GameLoop                 │
//! └──────────────────┘              │   └─ WorldStreamingContext │
//!                                   │       (sylvan_world)      │
//! ┌──────────────────┐  draw calls  │                           │
//! │  SceneRenderer   │<─────────────│                           │
//! └──────────────────┘              └───────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `game_loop`: Frame orchestration and timing
//! - `scene`: Player and renderer seams
//! - `runner`: Scripted player for headless runs

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod game_loop;
pub mod runner;
pub mod scene;

// Re-export the world core
pub use sylvan_world as world;

pub use game_loop::{FrameStats, FrameStatsAccumulator, GameLoop, GameLoopConfig};
pub use runner::ScriptedRunner;
pub use scene::{FrameRecorder, PlayerPosition, PlayerSource, SceneRenderer};
