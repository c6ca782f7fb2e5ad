//! Gaze targets and the weighted entries that wrap them.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::PoiError;
use crate::pose::BasePose;
use crate::scene::{SceneQuery, TransformHandle};

/// Something a character can look at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PoiTarget {
    /// A host transform, tracked through the scene.
    Transform {
        /// The tracked transform.
        handle: TransformHandle,
        /// Whether this target may steer the search direction when it is the
        /// main target.
        #[serde(default = "default_true")]
        can_guide: bool,
    },
    /// The active camera. Never guides the search and is never occluded.
    Camera,
    /// A fixed point in the base pose's local frame.
    Offset {
        /// Local-frame offset from the base position.
        offset: Vec3,
    },
}

impl PoiTarget {
    /// A guiding transform target.
    pub const fn transform(handle: TransformHandle) -> Self {
        Self::Transform {
            handle,
            can_guide: true,
        }
    }

    /// A local-frame offset target.
    pub const fn offset(offset: Vec3) -> Self {
        Self::Offset { offset }
    }

    /// Current world position, or `None` if the target no longer exists.
    pub fn world_position<S>(&self, base: &BasePose, scene: &S) -> Option<Vec3>
    where
        S: SceneQuery + ?Sized,
    {
        match *self {
            Self::Transform { handle, .. } => scene.transform_position(handle),
            Self::Camera => Some(scene.camera_position()),
            Self::Offset { offset } => Some(base.transform_point(offset)),
        }
    }

    /// Whether the target still exists.
    pub fn is_still_valid<S>(&self, scene: &S) -> bool
    where
        S: SceneQuery + ?Sized,
    {
        match *self {
            Self::Transform { handle, .. } => scene.is_alive(handle),
            Self::Camera | Self::Offset { .. } => true,
        }
    }

    /// Whether this target, as main target, steers the search direction.
    pub const fn can_guide_search(&self) -> bool {
        match *self {
            Self::Transform { can_guide, .. } => can_guide,
            Self::Camera => false,
            Self::Offset { .. } => true,
        }
    }

    /// Occlusion test along `direction`, the vector from the base position
    /// to the target.
    ///
    /// A transform target passes when the ray hits nothing before reaching
    /// the target, or hits something in the target's own hierarchy (the
    /// target, a child, or a parent).
    pub fn should_be_selected<S>(&self, base: &BasePose, direction: Vec3, scene: &S) -> bool
    where
        S: SceneQuery + ?Sized,
    {
        match *self {
            Self::Transform { handle, .. } => scene
                .raycast(base.position, direction, direction.length())
                .is_none_or(|hit| scene.is_descendant(hit, handle) || scene.is_descendant(handle, hit)),
            Self::Camera | Self::Offset { .. } => true,
        }
    }

    /// Human-readable name for logs and debug output.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PoiTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transform { handle, .. } => write!(f, "{handle}"),
            Self::Camera => f.write_str("camera"),
            Self::Offset { offset } => write!(f, "offset({}, {}, {})", offset.x, offset.y, offset.z),
        }
    }
}

/// A weighted candidate in a registry.
///
/// `weight` doubles as the stare budget: the larger it is, the longer the
/// character tends to keep looking once selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// What to look at.
    pub target: PoiTarget,
    /// Selection weight and stare budget (seconds). Must be `>= 0`.
    pub weight: f32,
    /// Skip the view-cone and occlusion tests for this candidate.
    #[serde(default)]
    pub always_present: bool,
}

impl PointOfInterest {
    /// A candidate that must be inside the view cone to be picked.
    pub const fn new(target: PoiTarget, weight: f32) -> Self {
        Self {
            target,
            weight,
            always_present: false,
        }
    }

    /// Set whether the candidate bypasses the view-cone test.
    #[must_use]
    pub const fn with_always_present(mut self, always_present: bool) -> Self {
        self.always_present = always_present;
        self
    }

    /// Reject a negative or non-finite weight. `key` names the candidate in
    /// the error.
    pub fn check(&self, key: &str) -> Result<(), PoiError> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(PoiError::InvalidWeight {
                key: key.to_owned(),
                weight: self.weight,
            });
        }
        Ok(())
    }
}

const fn default_true() -> bool {
    true
}
