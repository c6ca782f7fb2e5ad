//! The character's head transform.
//!
//! Selection is done relative to a [`BasePose`]: its position is the origin
//! of every distance and ray test, and its local `+Y` axis is the forward
//! (look) axis that guides the search when no main target is set.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of the character's head.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasePose {
    /// World-space position.
    pub position: Vec3,
    /// World-space rotation. Local `+Y` is forward.
    pub rotation: Quat,
}

impl Default for BasePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl BasePose {
    /// A pose at the origin looking along world `+Y`.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a pose from a position and rotation.
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create a pose at `position` whose forward axis points along `forward`.
    ///
    /// A zero `forward` leaves the rotation at identity.
    pub fn looking_along(position: Vec3, forward: Vec3) -> Self {
        let rotation = forward
            .try_normalize()
            .map_or(Quat::IDENTITY, |dir| Quat::from_rotation_arc(Vec3::Y, dir));
        Self { position, rotation }
    }

    /// World-space forward axis (local `+Y`).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Map a point from the pose's local frame into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Map a world-space direction into the pose's local frame.
    pub fn to_local_direction(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * world
    }

    /// Map a local-frame direction into world space.
    pub fn to_world_direction(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }
}
