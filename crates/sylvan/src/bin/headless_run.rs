//! # Headless World Run
//!
//! Drives the world with a scripted runner and no window, logging the
//! world summary as it goes.
//!
//! ## Usage
//!
//! ```bash
//! headless_run [CONFIG] --frames 3600 --speed 300 --turn-around 20000
//! ```
//!
//! `CONFIG` defaults to `config/world.toml`. Set `RUST_LOG=debug` to see
//! chunk generation and eviction.

use std::process::ExitCode;

use sylvan::world::{WorldConfig, WorldStreamingContext};
use sylvan::{FrameRecorder, GameLoop, GameLoopConfig, ScriptedRunner};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config/world.toml";
const DT: f64 = 1.0 / 60.0;

struct Options {
    config_path: String,
    frames: u64,
    speed: f64,
    turn_around: Option<f64>,
    summary_every: u64,
}

fn parse_args() -> Option<Options> {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options {
        config_path: DEFAULT_CONFIG.to_owned(),
        frames: 3_600,
        speed: 300.0,
        turn_around: None,
        summary_every: 600,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--frames" | "-f" => {
                if i + 1 < args.len() {
                    options.frames = args[i + 1].parse().unwrap_or(options.frames);
                    i += 1;
                }
            }
            "--speed" | "-s" => {
                if i + 1 < args.len() {
                    options.speed = args[i + 1].parse().unwrap_or(options.speed);
                    i += 1;
                }
            }
            "--turn-around" | "-t" => {
                if i + 1 < args.len() {
                    options.turn_around = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--summary-every" => {
                if i + 1 < args.len() {
                    options.summary_every = args[i + 1].parse().unwrap_or(options.summary_every);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: headless_run [CONFIG] [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -f, --frames <N>           Frames to run (default: 3600)");
                println!("  -s, --speed <UNITS>        Runner speed per second (default: 300)");
                println!("  -t, --turn-around <DIST>   Reverse every DIST units from start");
                println!("      --summary-every <N>    Log the world summary every N frames");
                println!("  -h, --help                 Show this help");
                return None;
            }
            path => options.config_path = path.to_owned(),
        }
        i += 1;
    }
    Some(options)
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let Some(options) = parse_args() else {
        return ExitCode::SUCCESS;
    };

    let config = match WorldConfig::load(&options.config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load {}: {}", options.config_path, e);
            return ExitCode::FAILURE;
        }
    };
    let player_y = config.ground_y();
    let start_x = config.camera.start_x + config.viewport.width / 2.0;

    let world = match WorldStreamingContext::new(config) {
        Ok(world) => world,
        Err(e) => {
            tracing::error!("World rejected configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut runner = ScriptedRunner::new(start_x, player_y, options.speed);
    if let Some(distance) = options.turn_around {
        runner = runner.with_turn_around(distance);
    }
    let mut recorder = FrameRecorder::default();
    let mut game_loop = GameLoop::new(
        world,
        GameLoopConfig {
            enable_timing_logs: true,
            show_overlay: false,
        },
    );

    tracing::info!(
        "Running {} frames from {} ({} units/s)",
        options.frames,
        options.config_path,
        options.speed
    );

    for frame in 0..options.frames {
        game_loop.tick_with_delta(&mut runner, &mut recorder, DT);
        if options.summary_every > 0 && frame % options.summary_every == 0 {
            tracing::info!("frame {}\n{}", frame, game_loop.world().debug_summary());
        }
    }

    let stats = game_loop.world().stats();
    tracing::info!("\n{}", game_loop.world().debug_summary());
    tracing::info!(
        "Generated {} chunks, evicted {}, skipped {} reconciles",
        stats.generated_this_session,
        stats.evicted_this_session,
        stats.skipped_reconciles
    );
    game_loop.stats().log_summary();
    ExitCode::SUCCESS
}
