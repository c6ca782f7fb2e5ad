//! Demo driver for the Fixation gaze simulation.
//!
//! Loads configuration, builds the demo scene, runs a fixed number of
//! frames, and logs where everyone looked.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$FIXATION_CONFIG` or `fixation-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Validate the configuration and create the arena
//! 4. Build the demo scene and create the observers
//! 5. Push scene targets into every registry
//! 6. Run the frame loop, optionally writing a debug trace
//! 7. Log the summary

mod demo;
mod error;
mod trace;

use std::path::PathBuf;

use fixation_core::NoOpCallback;
use fixation_core::{FixationConfig, GazeArena, run_frames, scene_targets};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::trace::TraceCallback;

/// Environment variable that overrides the config file location.
const CONFIG_ENV: &str = "FIXATION_CONFIG";

/// Default config file, relative to the working directory.
const CONFIG_FILE: &str = "fixation-config.yaml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging is configured from the file, so load it first.
    let (config, source) = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("fixation-engine starting");
    let source = source.map_or_else(|| "defaults".to_owned(), |path| path.display().to_string());
    info!(
        source,
        seed = config.world.seed,
        frame_rate = config.world.frame_rate,
        ticks = config.world.ticks,
        "Configuration loaded"
    );

    run(config)?;
    info!("fixation-engine shutdown complete");
    Ok(())
}

fn run(config: FixationConfig) -> Result<(), EngineError> {
    let mut arena = GazeArena::new(config)?;
    let demo = demo::build();

    for observer in &demo.observers {
        let id = arena.create(&observer.name, observer.base)?;
        if observer.looks_at_camera {
            arena.look_at_camera(id)?;
        }
    }

    let targets = scene_targets(&demo.cast, &arena.config().scene_targets);
    info!(
        characters = arena.len(),
        scene_targets = targets.len(),
        "Demo scene assembled, entering frame loop"
    );
    arena.replace_scene_targets(targets, &demo.scene)?;

    let ticks = arena.config().world.ticks;
    let delta_time = arena.config().world.frame_delta();
    let trace_path = arena.config().logging.debug_trace.clone();

    let summary = if let Some(path) = trace_path {
        let mut trace = TraceCallback::create(&path, &demo.scene)?;
        let summary = run_frames(&mut arena, &demo.scene, ticks, delta_time, &mut trace);
        let lines = trace.finish()?;
        info!(path = %path.display(), lines, "Debug trace written");
        summary
    } else {
        run_frames(&mut arena, &demo.scene, ticks, delta_time, &mut NoOpCallback)
    };

    for (key, frames) in &summary.frames_on_key {
        info!(key, frames, "Time on target");
    }
    info!(
        frames = summary.frames,
        transfers = summary.transfers,
        mean_eye_offset = summary.mean_eye_offset,
        "Run summary"
    );
    Ok(())
}

/// Load the configuration.
///
/// A path named by `$FIXATION_CONFIG` must exist. Otherwise
/// `fixation-config.yaml` is used if present, and the defaults if not.
/// Returns the path the configuration came from, if any.
fn load_config() -> Result<(FixationConfig, Option<PathBuf>), EngineError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        let config = FixationConfig::from_file(&path)?;
        return Ok((config, Some(path)));
    }
    let path = PathBuf::from(CONFIG_FILE);
    if path.exists() {
        let config = FixationConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        Ok((FixationConfig::default(), None))
    }
}
