//! Per-character gaze composition and orchestration for Fixation.
//!
//! This crate ties the eye simulator and the point-of-interest registry
//! together for each character, owns the characters in a [`GazeArena`], and
//! loads the YAML configuration that parameterizes both.
//!
//! # Modules
//!
//! - [`arena`] -- Explicit character ownership ([`GazeArena`], [`ArenaError`])
//! - [`character`] -- One character's gaze ([`CharacterGaze`], [`GazeFrame`])
//! - [`config`] -- YAML configuration ([`FixationConfig`], [`ConfigError`])
//! - [`ids`] -- Type-safe identifiers ([`CharacterId`])
//! - [`runner`] -- Fixed-step frame loop ([`run_frames`])
//! - [`scene_targets`] -- Candidates generated from scene characters

pub mod arena;
pub mod character;
pub mod config;
pub mod ids;
pub mod runner;
pub mod scene_targets;

pub use arena::{ArenaError, GazeArena};
pub use character::{CharacterGaze, GazeFrame, MAIN_TARGET_KEY};
pub use config::{ConfigError, FixationConfig};
pub use ids::CharacterId;
pub use runner::{FrameCallback, NoOpCallback, RunSummary, run_frames};
pub use scene_targets::{
    BodyPart, SCENE_PREFIX, SceneCharacter, SceneTargetConfig, is_own_target, scene_targets,
};
