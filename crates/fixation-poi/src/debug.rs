//! Serializable view of one selection pass, for offline inspection.
//!
//! The engine writes one [`DebugSnapshot`] per frame as a JSON line when a
//! trace path is configured.

use glam::Vec3;
use serde::Serialize;

/// What the registry saw from one base pose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugSnapshot {
    /// Base position the tests were run from.
    pub origin: Vec3,
    /// Direction the view cone was centred on.
    pub guide_direction: Vec3,
    /// Key of the current target, if any.
    pub current_key: Option<String>,
    /// World position of the current target, if any.
    pub current_position: Option<Vec3>,
    /// Seconds spent on the current target.
    pub stare_time: f32,
    /// Every registered candidate, in key order.
    pub candidates: Vec<DebugCandidate>,
}

/// One registered candidate as seen from the base pose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugCandidate {
    /// Registry key.
    pub key: String,
    /// Display name of the target.
    pub target: String,
    /// Configured weight.
    pub weight: f32,
    /// Whether the candidate bypasses the view-cone test.
    pub always_present: bool,
    /// World position, if the target still exists.
    pub position: Option<Vec3>,
    /// Whether the position is inside the admissible view cone.
    pub in_view: bool,
    /// Whether the occlusion probe passed.
    pub unoccluded: bool,
}
