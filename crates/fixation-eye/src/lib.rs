//! Fixational eye movements for the Fixation gaze simulation.
//!
//! A resting eye is never perfectly still: it drifts slowly and is pulled back
//! by small, fast microsaccades. This crate produces that jitter as a 2D
//! angular offset (degrees) that the host adds on top of its own gaze
//! direction every frame.
//!
//! # Modules
//!
//! - [`config`] -- Tunable parameters ([`EyeMovementConfig`])
//! - [`error`] -- Error types ([`EyeError`])
//! - [`simulator`] -- The per-character state machine ([`EyeMovementSimulator`])

pub mod config;
pub mod error;
pub mod simulator;

pub use config::EyeMovementConfig;
pub use error::EyeError;
pub use simulator::{DriftState, EyeMovementSimulator, SaccadeState};
