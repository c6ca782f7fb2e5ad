//! One character's gaze: eye jitter on top of target selection.
//!
//! [`CharacterGaze`] owns an [`EyeMovementSimulator`] and a
//! [`PointOfInterestRegistry`] and combines their output each frame into a
//! [`GazeFrame`]. It also carries the main-target hooks a host uses when a
//! scene script tells a character to look at something specific.

use glam::{Quat, Vec2, Vec3};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use fixation_eye::EyeMovementSimulator;
use fixation_poi::{
    BasePose, PoiTarget, PointOfInterest, PointOfInterestRegistry, SceneQuery, TransformHandle,
};

use crate::arena::ArenaError;
use crate::config::FixationConfig;

/// Registry key of the main target candidate.
pub const MAIN_TARGET_KEY: &str = "target";

/// Weight of the main target candidate.
pub const MAIN_TARGET_WEIGHT: f32 = 2.0;

/// Output of one gaze tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GazeFrame {
    /// The selected target, if any.
    pub target: Option<PoiTarget>,
    /// World position of the selected target, if any.
    pub look_at: Option<Vec3>,
    /// Unit world-space gaze direction including the eye offset.
    pub look_direction: Vec3,
    /// Fixational offset applied this frame (degrees).
    pub eye_offset: Vec2,
}

/// Gaze state of one character.
#[derive(Debug)]
pub struct CharacterGaze {
    name: String,
    base: BasePose,
    eye: EyeMovementSimulator,
    poi: PointOfInterestRegistry,
}

impl CharacterGaze {
    /// Build a character from a validated configuration.
    pub fn new(
        name: impl Into<String>,
        base: BasePose,
        config: &FixationConfig,
        rng: &mut impl Rng,
    ) -> Result<Self, ArenaError> {
        let eye = EyeMovementSimulator::new(config.eye.clone(), rng)?;
        let poi = PointOfInterestRegistry::new(config.poi.clone(), config.view_angle)?;
        Ok(Self {
            name: name.into(),
            base,
            eye,
            poi,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current head pose.
    pub const fn base(&self) -> &BasePose {
        &self.base
    }

    /// Move the head. Call before [`tick`](Self::tick) each frame.
    pub const fn set_base(&mut self, base: BasePose) {
        self.base = base;
    }

    /// The eye simulator.
    pub const fn eye(&self) -> &EyeMovementSimulator {
        &self.eye
    }

    /// The target registry.
    pub const fn poi(&self) -> &PointOfInterestRegistry {
        &self.poi
    }

    /// Mutable access to the target registry.
    pub const fn poi_mut(&mut self) -> &mut PointOfInterestRegistry {
        &mut self.poi
    }

    /// Swap in new eye, selection, and view-cone parameters.
    ///
    /// Running timers and the current selection are kept.
    pub fn apply_config(&mut self, config: &FixationConfig) -> Result<(), ArenaError> {
        self.eye.set_config(config.eye.clone())?;
        self.poi.set_config(config.poi.clone())?;
        self.poi.set_view_angle(config.view_angle)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Main-target hooks
    // -----------------------------------------------------------------------

    /// Make `handle` the main target.
    ///
    /// It is registered under [`MAIN_TARGET_KEY`] as an always-present
    /// candidate and steers the search direction.
    pub fn look_at_transform(&mut self, handle: TransformHandle) -> Result<(), ArenaError> {
        self.set_main(PoiTarget::transform(handle))
    }

    /// Make the camera the main target.
    ///
    /// The camera never steers the search, so other candidates are still
    /// judged against the head's forward axis.
    pub fn look_at_camera(&mut self) -> Result<(), ArenaError> {
        self.set_main(PoiTarget::Camera)
    }

    /// Drop the main target, as when the host switches to a fixed look
    /// position.
    pub fn look_at_position<S>(&mut self, scene: &S, rng: &mut impl Rng)
    where
        S: SceneQuery + ?Sized,
    {
        self.clear_main_target(scene, rng);
    }

    /// Drop the main target and its candidate.
    pub fn clear_main_target<S>(&mut self, scene: &S, rng: &mut impl Rng)
    where
        S: SceneQuery + ?Sized,
    {
        self.poi.set_main_target(None);
        if self.poi.remove(MAIN_TARGET_KEY, &self.base, scene, rng) {
            debug!(character = %self.name, "Main target cleared");
        }
    }

    fn set_main(&mut self, target: PoiTarget) -> Result<(), ArenaError> {
        let poi = PointOfInterest::new(target, MAIN_TARGET_WEIGHT).with_always_present(true);
        self.poi.add_or_replace(MAIN_TARGET_KEY, poi)?;
        self.poi.set_main_target(Some(target));
        debug!(character = %self.name, target = %target, "Main target set");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance both processes by `delta_time` seconds.
    ///
    /// With selection disabled the character looks at the main target, if
    /// any. With eye movement disabled the offset is zero.
    pub fn tick<S>(
        &mut self,
        delta_time: f32,
        force_saccade: bool,
        scene: &S,
        rng: &mut impl Rng,
    ) -> GazeFrame
    where
        S: SceneQuery + ?Sized,
    {
        let target = if self.poi.config().enabled {
            self.poi.tick(delta_time, &self.base, scene, rng)
        } else {
            self.poi
                .main_target()
                .filter(|main| main.is_still_valid(scene))
        };
        let look_at = target.and_then(|t| t.world_position(&self.base, scene));

        let eye_offset = if self.eye.config().enabled {
            self.eye.tick(delta_time, force_saccade, rng)
        } else {
            Vec2::ZERO
        };

        let aim = look_at
            .and_then(|position| (position - self.base.position).try_normalize())
            .unwrap_or_else(|| self.base.forward());

        GazeFrame {
            target,
            look_at,
            look_direction: apply_eye_offset(&self.base, aim, eye_offset),
            eye_offset,
        }
    }
}

/// Rotate `aim` by an eye offset expressed in the base's local frame.
///
/// `offset.x` turns about local X and `offset.y` about local Z (degrees).
pub fn apply_eye_offset(base: &BasePose, aim: Vec3, offset: Vec2) -> Vec3 {
    let local =
        Quat::from_rotation_x(offset.x.to_radians()) * Quat::from_rotation_z(offset.y.to_radians());
    let world = base.rotation * local * base.rotation.inverse();
    (world * aim).normalize_or(aim)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use fixation_poi::{SceneNode, SceneSnapshot};

    use super::*;

    const DT: f32 = 1.0 / 30.0;

    fn gaze(config: &FixationConfig, rng: &mut SmallRng) -> CharacterGaze {
        CharacterGaze::new("aoi", BasePose::IDENTITY, config, rng).unwrap()
    }

    #[test]
    fn zero_offset_keeps_aim() {
        let aim = Vec3::new(0.0, 1.0, 0.0);
        let out = apply_eye_offset(&BasePose::IDENTITY, aim, Vec2::ZERO);
        assert!(out.abs_diff_eq(aim, 1e-6));
    }

    #[test]
    fn offset_rotates_about_local_axes() {
        let base = BasePose::IDENTITY;
        // 90 degrees about local X tips forward (+Y) onto +Z.
        let out = apply_eye_offset(&base, Vec3::Y, Vec2::new(90.0, 0.0));
        assert!(out.abs_diff_eq(Vec3::Z, 1e-5));
        // 90 degrees about local Z tips forward onto -X.
        let out = apply_eye_offset(&base, Vec3::Y, Vec2::new(0.0, 90.0));
        assert!(out.abs_diff_eq(Vec3::NEG_X, 1e-5));
    }

    #[test]
    fn offset_follows_base_rotation() {
        let base = BasePose::looking_along(Vec3::ZERO, Vec3::X);
        let local = apply_eye_offset(&BasePose::IDENTITY, Vec3::Y, Vec2::new(10.0, 5.0));
        let world = apply_eye_offset(&base, base.forward(), Vec2::new(10.0, 5.0));
        assert!(world.abs_diff_eq(base.to_world_direction(local), 1e-5));
    }

    #[test]
    fn look_at_transform_registers_main_target() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut scene = SceneSnapshot::default();
        let handle = TransformHandle(5);
        scene.insert(handle, SceneNode::at(Vec3::new(0.0, 3.0, 0.0)));
        let mut gaze = gaze(&FixationConfig::default(), &mut rng);

        gaze.look_at_transform(handle).unwrap();
        let poi = gaze.poi().get(MAIN_TARGET_KEY).unwrap();
        assert!(poi.always_present);
        assert!((poi.weight - MAIN_TARGET_WEIGHT).abs() < f32::EPSILON);
        assert_eq!(gaze.poi().main_target(), Some(PoiTarget::transform(handle)));

        let frame = gaze.tick(DT, false, &scene, &mut rng);
        assert_eq!(frame.target, Some(PoiTarget::transform(handle)));
        assert_eq!(frame.look_at, Some(Vec3::new(0.0, 3.0, 0.0)));
        assert!((frame.look_direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn clear_main_target_removes_candidate() {
        let mut rng = SmallRng::seed_from_u64(2);
        let scene = SceneSnapshot::default();
        let mut gaze = gaze(&FixationConfig::default(), &mut rng);
        gaze.look_at_camera().unwrap();
        gaze.tick(DT, false, &scene, &mut rng);

        gaze.look_at_position(&scene, &mut rng);
        assert!(gaze.poi().get(MAIN_TARGET_KEY).is_none());
        assert!(gaze.poi().main_target().is_none());
        assert!(gaze.poi().current().is_none());
    }

    #[test]
    fn disabled_selection_follows_main_target() {
        let mut rng = SmallRng::seed_from_u64(3);
        let scene = SceneSnapshot::new(Vec3::new(0.0, -2.0, 0.0));
        let mut config = FixationConfig::default();
        config.poi.enabled = false;
        let mut gaze = gaze(&config, &mut rng);

        let frame = gaze.tick(DT, false, &scene, &mut rng);
        assert_eq!(frame.target, None);

        gaze.look_at_camera().unwrap();
        let frame = gaze.tick(DT, false, &scene, &mut rng);
        assert_eq!(frame.target, Some(PoiTarget::Camera));
        assert!(gaze.poi().current().is_none());
    }

    #[test]
    fn disabled_eye_yields_zero_offset() {
        let mut rng = SmallRng::seed_from_u64(4);
        let scene = SceneSnapshot::default();
        let mut config = FixationConfig::default();
        config.eye.enabled = false;
        let mut gaze = gaze(&config, &mut rng);
        for _ in 0..100 {
            let frame = gaze.tick(DT, true, &scene, &mut rng);
            assert_eq!(frame.eye_offset, Vec2::ZERO);
            assert!(frame.look_direction.abs_diff_eq(Vec3::Y, 1e-6));
        }
    }

    #[test]
    fn enabled_eye_jitters_around_target() {
        let mut rng = SmallRng::seed_from_u64(5);
        let scene = SceneSnapshot::default();
        let mut gaze = gaze(&FixationConfig::default(), &mut rng);
        let mut moved = false;
        for _ in 0..300 {
            let frame = gaze.tick(DT, false, &scene, &mut rng);
            moved |= frame.eye_offset != Vec2::ZERO;
            // Jitter is a fraction of a degree plus drift; stays near forward.
            assert!(frame.look_direction.angle_between(Vec3::Y).to_degrees() < 5.0);
        }
        assert!(moved);
    }

    #[test]
    fn apply_config_rejects_bad_values() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut gaze = gaze(&FixationConfig::default(), &mut rng);
        let mut config = FixationConfig::default();
        config.poi.far_clip = 0.01;
        assert!(gaze.apply_config(&config).is_err());
        config = FixationConfig::default();
        config.view_angle.z_pos = 15.0;
        assert!(gaze.apply_config(&config).is_ok());
        assert!((gaze.poi().view_angle().z_pos - 15.0).abs() < f32::EPSILON);
    }
}
