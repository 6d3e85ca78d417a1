//! Windowless Shoreline run: generates a world frame by frame against the
//! in-memory mesh backend and reports what it built.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p shoreline-demo -- --preset small --seed 7`.

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use shoreline_config::{CliArgs, Config};
use shoreline_mesh::{HeadlessBackend, MeshBackend};
use shoreline_world::{GenerationProgress, World, WorldGenerator};
use tracing::{error, info, warn};

/// Target frame time while polling the generator.
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Frames rendered after the world is ready.
const SHOWCASE_FRAMES: u32 = 3;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(Config::default_dir)
        .unwrap_or_else(|| std::env::temp_dir().join("shoreline"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    shoreline_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let mut generator = match WorldGenerator::new(config.world.clone()) {
        Ok(generator) => generator,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut backend = HeadlessBackend::new();
    match drive(&mut generator, &mut backend, args.frames) {
        Some(mut world) => {
            report(&world);
            for _ in 0..SHOWCASE_FRAMES {
                if let Err(e) = world.render(&mut backend) {
                    error!("Render failed: {e}");
                }
            }
            info!(
                draws = backend.draws().len(),
                anim_time = world.water.anim_time(),
                "Rendered showcase frames"
            );
            if let Err(e) = world.release(&mut backend) {
                warn!("Failed to release world meshes: {e}");
            }
            ExitCode::SUCCESS
        }
        None => {
            generator.cancel(&mut backend);
            ExitCode::FAILURE
        }
    }
}

/// Poll once per frame until the world is ready, the frame cap runs out, or
/// generation fails.
fn drive(
    generator: &mut WorldGenerator,
    backend: &mut dyn MeshBackend,
    max_frames: Option<u64>,
) -> Option<World> {
    let start = Instant::now();
    let mut frame: u64 = 0;
    loop {
        if max_frames.is_some_and(|max| frame >= max) {
            warn!(frame, stage = %generator.stage(), "Frame limit reached before the world was ready");
            return None;
        }
        let frame_start = Instant::now();

        match generator.poll(backend) {
            Ok(GenerationProgress::Finished(world)) => {
                info!(
                    frames = frame + 1,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "World ready"
                );
                return Some(world);
            }
            Ok(GenerationProgress::Working(_)) => {}
            Ok(GenerationProgress::Stopped(stage)) => {
                warn!(%stage, "Generator stopped without a world");
                return None;
            }
            Err(e) => {
                error!("{e}");
                return None;
            }
        }

        frame += 1;
        if let Some(rest) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}

fn report(world: &World) {
    let peak = world.peak;
    info!(
        seed = world.seed,
        size_x = world.terrain.size_x(),
        size_z = world.terrain.size_z(),
        water_level = world.water.y(),
        water_vertices = world.water.vertex_count(),
        "World summary"
    );
    info!(
        x = peak.x,
        z = peak.z,
        height = peak.height,
        "Highest point"
    );
    info!(
        creatures = world.creature_count(),
        food = world.food_count(),
        "Population"
    );
}
