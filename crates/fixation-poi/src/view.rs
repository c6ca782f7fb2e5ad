//! View-cone geometry.
//!
//! The cone is described by four half-angles, one per side of the forward
//! axis. In the base's local frame `x` is left/right and `z` is up/down; the
//! cone boundary between two sides is interpolated as a quarter ellipse.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::PoiError;
use crate::pose::BasePose;

/// Asymmetric half-angle bounds of a view cone (degrees).
///
/// `x_neg` and `z_neg` are negative; `x_pos` and `z_pos` positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewAngle {
    /// Bound toward local `+X` (degrees, positive).
    #[serde(default = "default_x_pos")]
    pub x_pos: f32,
    /// Bound toward local `-X` (degrees, negative).
    #[serde(default = "default_x_neg")]
    pub x_neg: f32,
    /// Bound toward local `+Z` (degrees, positive).
    #[serde(default = "default_z_pos")]
    pub z_pos: f32,
    /// Bound toward local `-Z` (degrees, negative).
    #[serde(default = "default_z_neg")]
    pub z_neg: f32,
}

impl Default for ViewAngle {
    fn default() -> Self {
        Self {
            x_pos: default_x_pos(),
            x_neg: default_x_neg(),
            z_pos: default_z_pos(),
            z_neg: default_z_neg(),
        }
    }
}

impl ViewAngle {
    /// Build a view angle and check its signs and magnitudes.
    ///
    /// # Errors
    ///
    /// Returns [`PoiError::InvalidViewAngle`] if a bound has the wrong sign,
    /// is zero, or exceeds 180 degrees.
    pub fn new(x_pos: f32, x_neg: f32, z_pos: f32, z_neg: f32) -> Result<Self, PoiError> {
        let view = Self {
            x_pos,
            x_neg,
            z_pos,
            z_neg,
        };
        view.check()?;
        Ok(view)
    }

    /// Check signs and magnitudes of all four bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PoiError::InvalidViewAngle`] naming the first offending bound.
    pub fn check(&self) -> Result<(), PoiError> {
        let positive = [("x_pos", self.x_pos), ("z_pos", self.z_pos)];
        let negative = [("x_neg", self.x_neg), ("z_neg", self.z_neg)];
        for (name, value) in positive {
            if !(value > 0.0 && value <= 180.0) {
                return Err(PoiError::InvalidViewAngle {
                    reason: format!("{name} must be in (0, 180], got {value}"),
                });
            }
        }
        for (name, value) in negative {
            if !(value < 0.0 && value >= -180.0) {
                return Err(PoiError::InvalidViewAngle {
                    reason: format!("{name} must be in [-180, 0), got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Whether `rotation`, applied to the forward axis (local `+Y`), keeps it
    /// inside the cone.
    ///
    /// The forward axis is rotated and its deviation angle compared against
    /// the elliptical boundary for the direction it tipped toward. Only the
    /// forward axis matters, so roll about it is ignored.
    pub fn contains(&self, rotation: Quat) -> bool {
        let forward = rotation * Vec3::Y;
        let deviation = forward.y.clamp(-1.0, 1.0).acos().to_degrees();
        let Some(tilt) = Vec2::new(forward.x, forward.z).try_normalize() else {
            // Straight ahead or straight behind.
            return forward.y > 0.0;
        };
        deviation < self.limit_toward(tilt)
    }

    /// Whether the separate `x` and `z` angles (degrees) are both inside
    /// their respective bounds.
    pub const fn contains_xz(&self, x: f32, z: f32) -> bool {
        x > self.x_neg && x < self.x_pos && z > self.z_neg && z < self.z_pos
    }

    /// Half-angle limit (degrees) toward the unit planar direction `tilt`.
    fn limit_toward(&self, tilt: Vec2) -> f32 {
        let x_limit = if tilt.x >= 0.0 { self.x_pos } else { -self.x_neg };
        let z_limit = if tilt.y >= 0.0 { self.z_pos } else { -self.z_neg };
        let a = tilt.x / x_limit;
        let b = tilt.y / z_limit;
        a.mul_add(a, b * b).sqrt().recip()
    }
}

/// Whether `position` is admissible from `base` when looking along `guide`.
///
/// The squared distance must lie within `[near², far²]`; then the rotation
/// from the guide direction to the target direction, both in the base's
/// local frame, must lie inside `view`. A zero guide falls back to the base
/// forward axis.
pub fn in_view_cone(
    base: &BasePose,
    guide: Vec3,
    position: Vec3,
    near_clip: f32,
    far_clip: f32,
    view: &ViewAngle,
) -> bool {
    let to_target = position - base.position;
    let distance_sq = to_target.length_squared();
    if distance_sq < near_clip * near_clip || distance_sq > far_clip * far_clip {
        return false;
    }
    let Some(target_local) = base.to_local_direction(to_target).try_normalize() else {
        return false;
    };
    let guide_local = base
        .to_local_direction(guide)
        .try_normalize()
        .unwrap_or(Vec3::Y);
    let frame = Quat::from_rotation_arc(Vec3::Y, guide_local);
    let relative = frame.inverse() * target_local;
    view.contains(Quat::from_rotation_arc(Vec3::Y, relative))
}

const fn default_x_pos() -> f32 {
    60.0
}

const fn default_x_neg() -> f32 {
    -60.0
}

const fn default_z_pos() -> f32 {
    40.0
}

const fn default_z_neg() -> f32 {
    -50.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Rotation tipping forward by `degrees` toward the local planar direction
    /// `(x, z)`.
    fn tipped(degrees: f32, x: f32, z: f32) -> Quat {
        let tilt = Vec3::new(x, 0.0, z).normalize();
        let axis = Vec3::Y.cross(tilt).normalize();
        Quat::from_axis_angle(axis, degrees.to_radians())
    }

    #[test]
    fn tipped_helper_moves_forward_toward_tilt() {
        let forward = tipped(90.0, 1.0, 0.0) * Vec3::Y;
        assert!(forward.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn straight_ahead_is_inside() {
        assert!(ViewAngle::default().contains(Quat::IDENTITY));
    }

    #[test]
    fn straight_behind_is_outside() {
        let behind = Quat::from_rotation_arc(Vec3::Y, Vec3::NEG_Y);
        assert!(!ViewAngle::default().contains(behind));
    }

    #[test]
    fn roll_about_forward_is_ignored() {
        let roll = Quat::from_axis_angle(Vec3::Y, 2.0);
        assert!(ViewAngle::default().contains(roll));
    }

    #[test]
    fn each_quadrant_uses_its_own_bound() {
        let view = ViewAngle::new(60.0, -30.0, 40.0, -20.0).unwrap();
        assert!(view.contains(tipped(55.0, 1.0, 0.0)));
        assert!(!view.contains(tipped(65.0, 1.0, 0.0)));
        assert!(view.contains(tipped(25.0, -1.0, 0.0)));
        assert!(!view.contains(tipped(35.0, -1.0, 0.0)));
        assert!(view.contains(tipped(35.0, 0.0, 1.0)));
        assert!(!view.contains(tipped(45.0, 0.0, 1.0)));
        assert!(view.contains(tipped(15.0, 0.0, -1.0)));
        assert!(!view.contains(tipped(25.0, 0.0, -1.0)));
    }

    #[test]
    fn diagonal_uses_elliptical_boundary() {
        let view = ViewAngle::new(60.0, -60.0, 60.0, -60.0).unwrap();
        // Equal bounds make the boundary a circle.
        assert!(view.contains(tipped(59.0, 1.0, 1.0)));
        assert!(!view.contains(tipped(61.0, 1.0, 1.0)));

        let squashed = ViewAngle::new(60.0, -60.0, 20.0, -20.0).unwrap();
        // Along the diagonal the limit is between the two bounds.
        let limit = squashed.limit_toward(Vec2::new(1.0, 1.0).normalize());
        assert!(limit > 20.0 && limit < 60.0, "limit {limit}");
    }

    #[test]
    fn contains_xz_is_strict_per_axis() {
        let view = ViewAngle::default();
        assert!(view.contains_xz(0.0, 0.0));
        assert!(view.contains_xz(59.0, -49.0));
        assert!(!view.contains_xz(60.0, 0.0));
        assert!(!view.contains_xz(0.0, -50.0));
    }

    #[test]
    fn invalid_bounds_rejected() {
        assert!(ViewAngle::new(0.0, -60.0, 40.0, -50.0).is_err());
        assert!(ViewAngle::new(60.0, 10.0, 40.0, -50.0).is_err());
        assert!(ViewAngle::new(60.0, -60.0, 200.0, -50.0).is_err());
        assert!(ViewAngle::new(f32::NAN, -60.0, 40.0, -50.0).is_err());
    }

    #[test]
    fn view_cone_rejects_out_of_clip() {
        let base = BasePose::IDENTITY;
        let view = ViewAngle::default();
        assert!(!in_view_cone(&base, Vec3::Y, Vec3::new(0.0, 0.05, 0.0), 0.1, 50.0, &view));
        assert!(!in_view_cone(&base, Vec3::Y, Vec3::new(0.0, 60.0, 0.0), 0.1, 50.0, &view));
        assert!(in_view_cone(&base, Vec3::Y, Vec3::new(0.0, 5.0, 0.0), 0.1, 50.0, &view));
    }

    #[test]
    fn view_cone_clip_bounds_are_inclusive() {
        let base = BasePose::IDENTITY;
        let view = ViewAngle::default();
        assert!(in_view_cone(&base, Vec3::Y, Vec3::new(0.0, 2.0, 0.0), 1.0, 2.0, &view));
    }

    #[test]
    fn view_cone_follows_guide_direction() {
        let base = BasePose::IDENTITY;
        let view = ViewAngle::default();
        let right = Vec3::new(5.0, 0.0, 0.0);
        // 90 degrees off the forward axis.
        assert!(!in_view_cone(&base, Vec3::Y, right, 0.1, 50.0, &view));
        // Guided toward +X, the same point is dead ahead.
        assert!(in_view_cone(&base, Vec3::X, right, 0.1, 50.0, &view));
    }

    #[test]
    fn view_cone_respects_base_rotation() {
        let base = BasePose::looking_along(Vec3::ZERO, Vec3::NEG_X);
        let view = ViewAngle::default();
        let ahead = Vec3::new(-5.0, 0.0, 0.0);
        assert!(in_view_cone(&base, base.forward(), ahead, 0.1, 50.0, &view));
        assert!(!in_view_cone(&base, base.forward(), -ahead, 0.1, 50.0, &view));
    }
}
