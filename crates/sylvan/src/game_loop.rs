//! # Sylvan Game Loop
//!
//! One frame, in order:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. DELTA                                                            │
//! │    └─ Wall-clock time since last frame, clamped to 100ms            │
//! │                                                                     │
//! │ 2. UPDATE                                                           │
//! │    ├─ Player advances                                               │
//! │    ├─ Camera follows player                                         │
//! │    └─ Streaming window reconciles around camera                     │
//! │                                                                     │
//! │ 3. RENDER (world space, camera offset handed over first)            │
//! │    ├─ Parallax background tiles                                     │
//! │    ├─ Ground strip                                                  │
//! │    ├─ Objects overlapping the viewport                              │
//! │    └─ Diagnostic overlay (optional)                                 │
//! │                                                                     │
//! │ 4. END FRAME                                                        │
//! │    └─ Record timing, warn on budget overrun                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use sylvan_world::{Rect, WorldStreamingContext};

use crate::scene::{PlayerSource, SceneRenderer};

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Maximum allowed frame time before warning.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(33);

/// Longest frame delta fed to the world, in seconds.
pub const MAX_DELTA_SECS: f64 = 0.1;

/// Configuration for the game loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct GameLoopConfig {
    /// Enable frame timing logs.
    pub enable_timing_logs: bool,
    /// Draw the diagnostic overlay.
    pub show_overlay: bool,
}

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Player, camera and streaming update in microseconds.
    pub update_us: u64,
    /// Render submission in microseconds.
    pub render_us: u64,
    /// Objects handed to the renderer.
    pub objects_drawn: u32,
    /// Chunks generated during this frame.
    pub chunks_generated: u32,
}

/// Drives the world one frame at a time.
pub struct GameLoop {
    /// World streaming state.
    world: WorldStreamingContext,
    /// Configuration.
    config: GameLoopConfig,
    /// Frame counter.
    frame_count: u64,
    /// Last frame start time.
    last_frame_time: Instant,
    /// Accumulated frame statistics.
    stats_accumulator: FrameStatsAccumulator,
}

impl GameLoop {
    /// Creates a new game loop around a world.
    #[must_use]
    pub fn new(world: WorldStreamingContext, config: GameLoopConfig) -> Self {
        Self {
            world,
            config,
            frame_count: 0,
            last_frame_time: Instant::now(),
            stats_accumulator: FrameStatsAccumulator::new(),
        }
    }

    /// Runs one frame using the wall-clock delta since the previous frame.
    pub fn tick<P, R>(&mut self, player: &mut P, renderer: &mut R) -> FrameStats
    where
        P: PlayerSource + ?Sized,
        R: SceneRenderer + ?Sized,
    {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;

        // Clamp delta so a stall does not fling the camera
        let dt = delta.as_secs_f64().min(MAX_DELTA_SECS);
        self.tick_with_delta(player, renderer, dt)
    }

    /// Runs one frame with an explicit delta in seconds.
    pub fn tick_with_delta<P, R>(&mut self, player: &mut P, renderer: &mut R, dt: f64) -> FrameStats
    where
        P: PlayerSource + ?Sized,
        R: SceneRenderer + ?Sized,
    {
        let frame_start = Instant::now();

        player.update(dt);
        let report = self.world.step(player.position().x, dt);
        let update_us = micros(frame_start.elapsed());

        let render_start = Instant::now();
        let objects_drawn = self.render(renderer);
        let render_us = micros(render_start.elapsed());

        let stats = FrameStats {
            frame: self.frame_count,
            total_us: micros(frame_start.elapsed()),
            update_us,
            render_us,
            objects_drawn,
            chunks_generated: report.map_or(0, |r| r.generated),
        };
        self.end_frame(stats);
        stats
    }

    /// Issues the frame's draw calls and returns the number of objects drawn.
    fn render<R: SceneRenderer + ?Sized>(&self, renderer: &mut R) -> u32 {
        let camera = self.world.camera_offset();
        let viewport = self.world.config().viewport;
        let backdrop = self.world.backdrop();

        renderer.begin_frame(camera);

        for (index, layer) in backdrop.layers().iter().enumerate() {
            for x in layer.tile_positions(camera.x, viewport.width) {
                renderer.draw_background_tile(
                    index,
                    Rect {
                        x,
                        y: 0.0,
                        width: layer.tile_width(),
                        height: viewport.height,
                    },
                );
            }
        }

        renderer.draw_ground(&backdrop.ground(camera.x));

        let mut drawn = 0;
        for object in self.world.visible_objects() {
            renderer.draw_object(object);
            drawn += 1;
        }

        if self.config.show_overlay {
            renderer.draw_overlay(&self.world.debug_summary());
        }
        drawn
    }

    /// Records timing and prepares for next frame.
    fn end_frame(&mut self, stats: FrameStats) {
        self.frame_count += 1;
        self.stats_accumulator.record(stats);

        if self.config.enable_timing_logs && stats.total_us > micros(MAX_FRAME_TIME) {
            tracing::warn!(
                "Frame {} exceeded budget: {}us (target: {}us)",
                stats.frame,
                stats.total_us,
                micros(TARGET_FRAME_TIME)
            );
        }
    }

    /// Returns the current frame count.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns the world.
    #[must_use]
    pub const fn world(&self) -> &WorldStreamingContext {
        &self.world
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of update times.
    pub update_us_sum: u64,
    /// Sum of render times.
    pub render_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Chunks generated across all frames.
    pub chunks_generated: u64,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            update_us_sum: 0,
            render_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            chunks_generated: 0,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.update_us_sum += stats.update_us;
        self.render_us_sum += stats.render_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        self.chunks_generated += u64::from(stats.chunks_generated);

        if stats.total_us > micros(TARGET_FRAME_TIME) {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns the share of frames over budget.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Logs a summary of the statistics.
    #[allow(clippy::cast_precision_loss)]
    pub fn log_summary(&self) {
        let min_ms = if self.frames_recorded == 0 {
            0.0
        } else {
            self.min_frame_us as f64 / 1000.0
        };
        tracing::info!(
            "Frames: {}, avg {:.3}ms, min {:.3}ms, max {:.3}ms",
            self.frames_recorded,
            self.avg_frame_ms(),
            min_ms,
            self.max_frame_us as f64 / 1000.0
        );
        tracing::info!(
            "Over budget: {} frames ({:.1}%), chunks generated: {}",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0,
            self.chunks_generated
        );
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScriptedRunner;
    use crate::scene::FrameRecorder;
    use sylvan_world::WorldConfig;

    const DT: f64 = 1.0 / 60.0;

    fn game_loop(config: GameLoopConfig) -> GameLoop {
        let world = WorldStreamingContext::new(WorldConfig::default()).unwrap();
        GameLoop::new(world, config)
    }

    #[test]
    fn test_game_loop_creation() {
        let game_loop = game_loop(GameLoopConfig::default());
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.stats().frames_recorded, 0);
    }

    #[test]
    fn test_frames_are_numbered() {
        let mut game_loop = game_loop(GameLoopConfig::default());
        let mut runner = ScriptedRunner::new(320.0, 300.0, 300.0);
        let mut recorder = FrameRecorder::default();

        for expected in 0..10 {
            let stats = game_loop.tick_with_delta(&mut runner, &mut recorder, DT);
            assert_eq!(stats.frame, expected);
        }
        assert_eq!(game_loop.frame_count(), 10);
        assert_eq!(recorder.frames, 10);
        assert_eq!(game_loop.stats().frames_recorded, 10);
    }

    #[test]
    fn test_render_order_and_contents() {
        let mut game_loop = game_loop(GameLoopConfig {
            show_overlay: true,
            ..GameLoopConfig::default()
        });
        let mut runner = ScriptedRunner::new(320.0, 300.0, 0.0);
        let mut recorder = FrameRecorder::default();

        let stats = game_loop.tick_with_delta(&mut runner, &mut recorder, DT);

        assert!(recorder.background_tiles >= 2);
        let ground = recorder.ground.unwrap();
        assert!((ground.soil.y - 340.0).abs() < f64::EPSILON);
        assert_eq!(stats.objects_drawn as usize, recorder.objects.len());
        assert!(recorder.overlay.unwrap().starts_with("WORLD:"));
    }

    #[test]
    fn test_drawn_objects_overlap_viewport() {
        let mut game_loop = game_loop(GameLoopConfig::default());
        let mut runner = ScriptedRunner::new(320.0, 300.0, 600.0);
        let mut recorder = FrameRecorder::default();

        for _ in 0..300 {
            game_loop.tick_with_delta(&mut runner, &mut recorder, DT);
            let left = recorder.last_camera.x;
            for object in &recorder.objects {
                assert!(object.right() >= left);
                assert!(object.x <= left + 640.0);
            }
        }
        assert!(recorder.overlay.is_none());
    }

    #[test]
    fn test_running_generates_chunks() {
        let mut game_loop = game_loop(GameLoopConfig::default());
        let mut runner = ScriptedRunner::new(320.0, 300.0, 600.0);
        let mut recorder = FrameRecorder::default();

        for _ in 0..600 {
            game_loop.tick_with_delta(&mut runner, &mut recorder, DT);
        }
        assert!(game_loop.stats().chunks_generated > 0);
        assert!(game_loop.world().camera_offset().x > 4000.0);
    }

    #[test]
    fn test_wall_clock_tick() {
        let mut game_loop = game_loop(GameLoopConfig::default());
        let mut runner = ScriptedRunner::new(320.0, 300.0, 60.0);
        let mut recorder = FrameRecorder::default();

        game_loop.tick(&mut runner, &mut recorder);
        // Even a long first frame is clamped.
        assert!(runner.position().x <= 320.0 + 60.0 * MAX_DELTA_SECS + 1e-9);
    }

    #[test]
    fn test_accumulator() {
        let mut acc = FrameStatsAccumulator::new();
        acc.record(FrameStats {
            total_us: 10_000,
            ..FrameStats::default()
        });
        acc.record(FrameStats {
            total_us: 20_000,
            chunks_generated: 3,
            ..FrameStats::default()
        });
        assert!((acc.avg_frame_ms() - 15.0).abs() < 1e-9);
        assert_eq!(acc.min_frame_us, 10_000);
        assert_eq!(acc.max_frame_us, 20_000);
        assert_eq!(acc.frames_over_budget, 1);
        assert_eq!(acc.chunks_generated, 3);
        assert!((acc.over_budget_ratio() - 0.5).abs() < 1e-9);
    }
}
