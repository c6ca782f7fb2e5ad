//! Point-of-interest selection for the Fixation gaze simulation.
//!
//! A [`PointOfInterestRegistry`] holds a keyed set of weighted candidates and
//! decides, tick by tick, which one a character looks at. Candidates must be
//! inside a view cone ([`ViewAngle`]) between the near and far clip distances
//! unless flagged `always_present`. How long the character keeps looking is
//! governed by a stochastic transfer test whose probability grows with stare
//! time relative to the candidate's weight.
//!
//! The host scene is reached only through [`SceneQuery`]; randomness is
//! injected by the caller.
//!
//! # Modules
//!
//! - [`config`] -- Scheduler and clip parameters ([`PoiConfig`])
//! - [`debug`] -- Serializable per-frame selection view ([`DebugSnapshot`])
//! - [`error`] -- Error types ([`PoiError`])
//! - [`pose`] -- The character's head transform ([`BasePose`])
//! - [`registry`] -- The selector state machine ([`PointOfInterestRegistry`])
//! - [`scene`] -- Host scene seam ([`SceneQuery`], [`SceneSnapshot`])
//! - [`scoring`] -- Pluggable candidate scorers
//! - [`selection`] -- Transfer test and weighted pick
//! - [`target`] -- Gaze targets ([`PoiTarget`], [`PointOfInterest`])
//! - [`view`] -- View-cone geometry ([`ViewAngle`])

pub mod config;
pub mod debug;
pub mod error;
pub mod pose;
pub mod registry;
pub mod scene;
pub mod scoring;
pub mod selection;
pub mod target;
pub mod view;

pub use config::PoiConfig;
pub use debug::{DebugCandidate, DebugSnapshot};
pub use error::PoiError;
pub use pose::BasePose;
pub use registry::{PointOfInterestRegistry, RegistryState};
pub use scene::{SceneNode, SceneQuery, SceneSnapshot, TransformHandle};
pub use scoring::{TargetScorer, constant_score, continuity_bonus, distance_falloff};
pub use target::{PoiTarget, PointOfInterest};
pub use view::ViewAngle;
