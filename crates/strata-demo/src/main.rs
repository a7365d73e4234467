//! Headless streaming demo.
//!
//! Walks an observer across the world in a straight line, digs and builds a
//! few blocks along the way, and logs streaming statistics. Useful for
//! profiling generation throughput with `RUST_LOG=debug`.
//!
//! Run with: `cargo run -p strata-demo -- --seed 42 --render-distance 3`

use std::time::{Duration, Instant};

use clap::Parser;
use glam::DVec3;
use strata_config::{CliArgs, Config};
use strata_mesh::MeshOptions;
use strata_voxel::BlockType;
use strata_world::{EditOutcome, SceneEvent, StreamingSettings, WorldController};
use tracing::{info, warn};

/// Simulated frame length.
const FRAME: Duration = Duration::from_millis(16);
/// Frames spent walking before the world is left to settle.
const WALK_FRAMES: u32 = 240;
/// Observer speed in blocks per frame.
const WALK_SPEED: f64 = 0.5;

fn streaming_settings(config: &Config) -> StreamingSettings {
    let streaming = &config.streaming;
    StreamingSettings {
        render_distance: streaming.render_distance,
        drain_interval: Duration::from_millis(streaming.drain_interval_ms),
        worker_threads: streaming.worker_threads,
        request_capacity: streaming.request_capacity,
        mesh: MeshOptions {
            strategy: streaming.strategy,
            boundary: streaming.boundary,
        },
    }
}

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args
        .config
        .clone()
        .or_else(Config::default_dir)
        .unwrap_or_else(|| std::path::PathBuf::from("strata"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    info!(
        "seed {} | chunk {}x{} | render distance {}",
        config.world.seed,
        config.world.chunk_width,
        config.world.chunk_height,
        config.streaming.render_distance
    );

    let settings = streaming_settings(&config);
    let mut world = match WorldController::new(config.world.clone(), settings) {
        Ok(world) => world,
        Err(e) => {
            eprintln!("Failed to start world: {e}");
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let surface_y = (config.world.chunk_height / 2) as f64;
    let mut observer = DVec3::new(0.5, surface_y, 0.5);
    let mut integrated = 0usize;
    let mut removed = 0usize;

    for frame in 0..WALK_FRAMES {
        let frame_start = Instant::now();
        observer.x += WALK_SPEED;
        world.update(observer, frame_start);

        // Dig a shaft and plant a marker every 60 frames.
        if frame % 60 == 59 {
            let (x, z) = (observer.x.floor() as i64, observer.z.floor() as i64);
            let top = (0..config.world.chunk_height as i64)
                .rev()
                .find(|&y| world.block_at(x, y, z).is_some_and(|b| !b.is_air()));
            match top {
                Some(y) => {
                    world.remove_block(x, y, z);
                    if let EditOutcome::Applied { live } = world.add_block(x, y - 1, z, BlockType::OakLog) {
                        info!("edited column ({x}, {z}) at y={y} (live: {live})");
                    }
                }
                None => warn!("column ({x}, {z}) not loaded yet; skipping edit"),
            }
        }

        for event in world.drain_events() {
            match event {
                SceneEvent::ChunkIntegrated { .. } => integrated += 1,
                SceneEvent::ChunkRemoved { .. } => removed += 1,
                _ => {}
            }
        }

        if frame % 30 == 0 {
            let stats = world.stats();
            info!(
                "frame {frame}: loaded {} requested {} queued {} in flight {} discarded {}",
                stats.loaded, stats.requested, stats.queued, stats.in_flight, stats.discarded
            );
        }

        if let Some(rest) = FRAME.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    // Let the last requests land, then integrate everything.
    let deadline = Instant::now() + Duration::from_secs(10);
    while world.stats().requested > 0 && Instant::now() < deadline {
        world.update(observer, Instant::now());
        world.flush_idle_tasks();
        std::thread::sleep(Duration::from_millis(5));
    }
    let stale: Vec<_> = world
        .loaded_coords()
        .filter(|&c| world.chunk(c).is_some_and(|r| !r.mesh_ready()))
        .collect();
    for coord in stale {
        world.remesh(coord);
    }

    let stats = world.stats();
    info!(
        "done in {:.2}s: {} chunks integrated, {} torn down, {} loaded, {} discarded, {} edits",
        start.elapsed().as_secs_f64(),
        integrated,
        removed,
        stats.loaded,
        stats.discarded,
        stats.edits
    );
    world.shutdown();
}
