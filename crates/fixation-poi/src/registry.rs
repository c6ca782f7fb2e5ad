//! Keyed set of weighted gaze candidates and the transfer state machine.
//!
//! The registry is either idle (no current target) or locked onto one key.
//! Each tick it accumulates stare time and counts down to the next transfer
//! check. A check also fires whenever the current target leaves the view
//! cone. When a check passes the transfer test, a new target is drawn from
//! the admissible candidates by weight.
//!
//! ```text
//! Idle      --(pick succeeds)-----------> Locked(X)
//! Locked(X) --(X invalid)---------------> Idle
//! Locked(X) --(check fires, transfer)---> Locked(Y) | Idle
//! Locked(X) --(check fires, stay)-------> Locked(X)
//! ```

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, trace};

use fixation_random::log_normal_from_mean_std;

use crate::config::PoiConfig;
use crate::debug::{DebugCandidate, DebugSnapshot};
use crate::error::PoiError;
use crate::pose::BasePose;
use crate::scene::SceneQuery;
use crate::scoring::{TargetScorer, constant_score};
use crate::selection::{pick_weighted, should_transfer};
use crate::target::{PoiTarget, PointOfInterest};
use crate::view::{ViewAngle, in_view_cone};

/// Observable scheduler state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryState {
    /// Key of the current target, if any.
    pub current_key: Option<String>,
    /// Seconds spent on the current target.
    pub stare_time: f32,
    /// Seconds until the next scheduled transfer check.
    pub time_until_next_check: f32,
}

/// Per-character point-of-interest selector.
pub struct PointOfInterestRegistry {
    config: PoiConfig,
    view_angle: ViewAngle,
    scorer: TargetScorer,
    points: BTreeMap<String, PointOfInterest>,
    current: Option<String>,
    main_target: Option<PoiTarget>,
    stare_time: f32,
    time_until_next_check: f32,
}

impl fmt::Debug for PointOfInterestRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointOfInterestRegistry")
            .field("config", &self.config)
            .field("view_angle", &self.view_angle)
            .field("points", &self.points)
            .field("current", &self.current)
            .field("main_target", &self.main_target)
            .field("stare_time", &self.stare_time)
            .field("time_until_next_check", &self.time_until_next_check)
            .finish_non_exhaustive()
    }
}

impl PointOfInterestRegistry {
    /// Create an empty registry with the constant scorer.
    ///
    /// The first tick with a positive `dt` runs a transfer check.
    pub fn new(config: PoiConfig, view_angle: ViewAngle) -> Result<Self, PoiError> {
        config.check()?;
        view_angle.check()?;
        Ok(Self {
            config,
            view_angle,
            scorer: constant_score(),
            points: BTreeMap::new(),
            current: None,
            main_target: None,
            stare_time: 0.0,
            time_until_next_check: 0.0,
        })
    }

    /// Replace the scorer.
    #[must_use]
    pub fn with_scorer(mut self, scorer: TargetScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Replace the scorer in place.
    pub fn set_scorer(&mut self, scorer: TargetScorer) {
        self.scorer = scorer;
    }

    /// Current configuration.
    pub const fn config(&self) -> &PoiConfig {
        &self.config
    }

    /// Swap in a new configuration. The running check timer is kept.
    pub fn set_config(&mut self, config: PoiConfig) -> Result<(), PoiError> {
        config.check()?;
        self.config = config;
        Ok(())
    }

    /// Current view cone.
    pub const fn view_angle(&self) -> &ViewAngle {
        &self.view_angle
    }

    /// Swap in a new view cone.
    pub fn set_view_angle(&mut self, view_angle: ViewAngle) -> Result<(), PoiError> {
        view_angle.check()?;
        self.view_angle = view_angle;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Candidate lifecycle
    // -----------------------------------------------------------------------

    /// Insert or replace a candidate. Never changes the current selection.
    ///
    /// Returns the replaced candidate, if any.
    pub fn add_or_replace(
        &mut self,
        key: impl Into<String>,
        poi: PointOfInterest,
    ) -> Result<Option<PointOfInterest>, PoiError> {
        let key = key.into();
        poi.check(&key)?;
        debug!(key = %key, target = %poi.target, weight = poi.weight, "POI registered");
        Ok(self.points.insert(key, poi))
    }

    /// Remove a candidate. If it was current, a new one is picked at once.
    pub fn remove<S>(&mut self, key: &str, base: &BasePose, scene: &S, rng: &mut impl Rng) -> bool
    where
        S: SceneQuery + ?Sized,
    {
        let previous = self.current_position(base, scene);
        if self.points.remove(key).is_none() {
            return false;
        }
        debug!(key, "POI removed");
        if self.current.as_deref() == Some(key) {
            self.reselect(base, scene, previous, rng);
        }
        true
    }

    /// Remove every candidate whose key starts with `prefix`.
    ///
    /// If the current target was among them, a new one is picked at once.
    /// Returns how many candidates were removed.
    pub fn remove_by_prefix<S>(
        &mut self,
        prefix: &str,
        base: &BasePose,
        scene: &S,
        rng: &mut impl Rng,
    ) -> usize
    where
        S: SceneQuery + ?Sized,
    {
        let previous = self.current_position(base, scene);
        let before = self.points.len();
        self.points.retain(|key, _| !key.starts_with(prefix));
        let removed = before.saturating_sub(self.points.len());
        if removed > 0 {
            debug!(prefix, removed, "POIs removed by prefix");
        }
        if self.current.as_deref().is_some_and(|key| key.starts_with(prefix)) {
            self.reselect(base, scene, previous, rng);
        }
        removed
    }

    /// Drop every candidate and the current selection.
    pub fn clear(&mut self) {
        self.points.clear();
        self.current = None;
        self.stare_time = 0.0;
    }

    /// Designate (or clear) the main target that steers the search.
    ///
    /// The main target is not a candidate by itself; callers that want it
    /// selectable also register it.
    pub const fn set_main_target(&mut self, target: Option<PoiTarget>) {
        self.main_target = target;
    }

    /// The designated main target.
    pub const fn main_target(&self) -> Option<PoiTarget> {
        self.main_target
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Look up a candidate by key.
    pub fn get(&self, key: &str) -> Option<&PointOfInterest> {
        self.points.get(key)
    }

    /// The current key and candidate.
    pub fn current(&self) -> Option<(&str, &PointOfInterest)> {
        let key = self.current.as_deref()?;
        self.points.get(key).map(|poi| (key, poi))
    }

    /// The current target.
    pub fn current_target(&self) -> Option<PoiTarget> {
        self.current().map(|(_, poi)| poi.target)
    }

    /// Snapshot of the scheduler state.
    pub fn state(&self) -> RegistryState {
        RegistryState {
            current_key: self.current.clone(),
            stare_time: self.stare_time,
            time_until_next_check: self.time_until_next_check,
        }
    }

    /// Every candidate, in key order.
    pub fn points(&self) -> impl Iterator<Item = (&str, &PointOfInterest)> {
        self.points.iter().map(|(key, poi)| (key.as_str(), poi))
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// Direction the view cone is centred on.
    ///
    /// Toward the main target when one is set, valid, and allowed to guide;
    /// otherwise the base forward axis.
    pub fn direction_vector<S>(&self, base: &BasePose, scene: &S) -> Vec3
    where
        S: SceneQuery + ?Sized,
    {
        self.main_target
            .filter(|main| main.can_guide_search() && main.is_still_valid(scene))
            .and_then(|main| main.world_position(base, scene))
            .map(|position| position - base.position)
            .filter(|direction| direction.length_squared() > f32::EPSILON)
            .unwrap_or_else(|| base.forward())
    }

    /// Whether `position` is within the clip range and inside the view cone
    /// centred on `guide`.
    pub fn viewport_contains(&self, base: &BasePose, guide: Vec3, position: Vec3) -> bool {
        in_view_cone(
            base,
            guide,
            position,
            self.config.near_clip,
            self.config.far_clip,
            &self.view_angle,
        )
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the scheduler by `delta_time` seconds and return the target to
    /// look at.
    ///
    /// An empty registry returns `None` without touching any state. A
    /// non-positive `delta_time` only drops a target that no longer exists;
    /// timers stay put and no check runs.
    pub fn tick<S>(
        &mut self,
        delta_time: f32,
        base: &BasePose,
        scene: &S,
        rng: &mut impl Rng,
    ) -> Option<PoiTarget>
    where
        S: SceneQuery + ?Sized,
    {
        if self.points.is_empty() {
            return None;
        }

        if self.current.is_some()
            && !self
                .current_point()
                .is_some_and(|poi| poi.target.is_still_valid(scene))
        {
            debug!(key = ?self.current, "Current POI no longer valid");
            self.current = None;
        }

        if delta_time <= 0.0 {
            return self.current_target();
        }

        self.stare_time += delta_time;
        self.time_until_next_check -= delta_time;

        let mut check = false;
        if self.time_until_next_check <= 0.0 {
            self.time_until_next_check = log_normal_from_mean_std(
                self.config.check_mean_interval,
                self.config.check_std_dev,
                rng,
            );
            check = true;
        }

        let previous = self.current_position(base, scene);
        if let Some(position) = previous {
            let guide = self.direction_vector(base, scene);
            if !self.viewport_contains(base, guide, position) {
                trace!(key = ?self.current, "Current POI left the view cone");
                check = true;
            }
        }

        if check && self.transfer_passes(rng) {
            let from = self.current.take();
            self.stare_time = 0.0;
            self.current = self.select_next(base, scene, previous, rng);
            if from != self.current {
                debug!(from = ?from, to = ?self.current, "Gaze transferred");
            }
        }

        self.current_target()
    }

    /// Describe what the registry sees from `base`.
    pub fn debug_snapshot<S>(&self, base: &BasePose, scene: &S) -> DebugSnapshot
    where
        S: SceneQuery + ?Sized,
    {
        let guide = self.direction_vector(base, scene);
        let candidates = self
            .points
            .iter()
            .map(|(key, poi)| {
                let position = poi.target.world_position(base, scene);
                let in_view = position.is_some_and(|p| self.viewport_contains(base, guide, p));
                let unoccluded = position
                    .is_some_and(|p| poi.target.should_be_selected(base, p - base.position, scene));
                DebugCandidate {
                    key: key.clone(),
                    target: poi.target.name(),
                    weight: poi.weight,
                    always_present: poi.always_present,
                    position,
                    in_view,
                    unoccluded,
                }
            })
            .collect();
        DebugSnapshot {
            origin: base.position,
            guide_direction: guide,
            current_key: self.current.clone(),
            current_position: self.current_position(base, scene),
            stare_time: self.stare_time,
            candidates,
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn current_point(&self) -> Option<&PointOfInterest> {
        self.current.as_deref().and_then(|key| self.points.get(key))
    }

    fn current_position<S>(&self, base: &BasePose, scene: &S) -> Option<Vec3>
    where
        S: SceneQuery + ?Sized,
    {
        self.current_point()
            .filter(|poi| poi.target.is_still_valid(scene))
            .and_then(|poi| poi.target.world_position(base, scene))
    }

    fn transfer_passes(&self, rng: &mut impl Rng) -> bool {
        self.current_point()
            .is_none_or(|poi| should_transfer(self.stare_time, poi.weight, rng))
    }

    fn reselect<S>(&mut self, base: &BasePose, scene: &S, previous: Option<Vec3>, rng: &mut impl Rng)
    where
        S: SceneQuery + ?Sized,
    {
        self.stare_time = 0.0;
        self.current = self.select_next(base, scene, previous, rng);
        debug!(to = ?self.current, "Gaze reselected after removal");
    }

    fn select_next<S>(
        &self,
        base: &BasePose,
        scene: &S,
        previous: Option<Vec3>,
        rng: &mut impl Rng,
    ) -> Option<String>
    where
        S: SceneQuery + ?Sized,
    {
        let guide = self.direction_vector(base, scene);
        let mut candidates: Vec<(&str, f32)> = Vec::with_capacity(self.points.len());
        for (key, poi) in &self.points {
            if !poi.target.is_still_valid(scene) {
                continue;
            }
            let Some(position) = poi.target.world_position(base, scene) else {
                continue;
            };
            if !poi.always_present {
                if !self.viewport_contains(base, guide, position) {
                    continue;
                }
                if self.config.occlusion_test
                    && !poi
                        .target
                        .should_be_selected(base, position - base.position, scene)
                {
                    trace!(key = %key, "POI occluded");
                    continue;
                }
            }
            let score = (poi.weight * (self.scorer)(base, position, previous)).max(0.0);
            if score > 0.0 {
                candidates.push((key.as_str(), score));
            }
        }
        trace!(candidates = candidates.len(), "Selection pass");
        pick_weighted(&candidates, rng).map(str::to_owned)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
