//! Fixed-step frame loop.
//!
//! [`run_frames`] ticks every character in a [`GazeArena`] a fixed number of
//! times and hands each frame to a [`FrameCallback`]. It also accumulates a
//! [`RunSummary`] (time spent per target key, transfer count, and mean eye
//! offset) for the closing log line.

use std::collections::BTreeMap;

use fixation_poi::SceneQuery;
use serde::Serialize;
use tracing::info;

use crate::arena::GazeArena;
use crate::character::GazeFrame;
use crate::ids::CharacterId;

/// Callback invoked after each frame.
pub trait FrameCallback {
    /// Called once per frame after every character has ticked.
    fn on_frame(&mut self, frame: u64, frames: &[(CharacterId, GazeFrame)], arena: &GazeArena);
}

/// A no-op frame callback for testing.
pub struct NoOpCallback;

impl FrameCallback for NoOpCallback {
    fn on_frame(&mut self, _frame: u64, _frames: &[(CharacterId, GazeFrame)], _arena: &GazeArena) {}
}

/// Aggregate statistics of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Frames executed.
    pub frames: u64,
    /// Character-frames spent on each target key. Idle frames count under
    /// `"<none>"`.
    pub frames_on_key: BTreeMap<String, u64>,
    /// Times any character's current key changed.
    pub transfers: u64,
    /// Mean magnitude of the eye offset over all character-frames (degrees).
    pub mean_eye_offset: f32,
}

/// Label used in [`RunSummary::frames_on_key`] for frames without a target.
pub const IDLE_KEY: &str = "<none>";

/// Run `frames` fixed steps of `delta_time` seconds.
pub fn run_frames<S>(
    arena: &mut GazeArena,
    scene: &S,
    frames: u64,
    delta_time: f32,
    callback: &mut dyn FrameCallback,
) -> RunSummary
where
    S: SceneQuery + ?Sized,
{
    info!(frames, delta_time, characters = arena.len(), "Run starting");

    let mut summary = RunSummary::default();
    let mut last_key: BTreeMap<CharacterId, Option<String>> = BTreeMap::new();
    let mut offset_sum = 0.0_f64;
    let mut samples = 0_u64;

    for frame in 0..frames {
        let ticked = arena.tick_all(delta_time, scene);
        for (id, gaze) in &ticked {
            let key = arena
                .get(*id)
                .and_then(|character| character.poi().state().current_key);
            let label = key.clone().unwrap_or_else(|| IDLE_KEY.to_owned());
            let count = summary.frames_on_key.entry(label).or_default();
            *count = count.saturating_add(1);

            let previous = last_key.insert(*id, key.clone());
            if previous.is_some_and(|previous| previous != key) {
                summary.transfers = summary.transfers.saturating_add(1);
            }

            offset_sum += f64::from(gaze.eye_offset.length());
            samples = samples.saturating_add(1);
        }
        callback.on_frame(frame, &ticked, arena);
        summary.frames = summary.frames.saturating_add(1);
    }

    if samples > 0 {
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let mean = (offset_sum / samples as f64) as f32;
        summary.mean_eye_offset = mean;
    }

    info!(
        frames = summary.frames,
        transfers = summary.transfers,
        mean_eye_offset = summary.mean_eye_offset,
        "Run complete"
    );
    summary
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use glam::Vec3;

    use fixation_poi::{BasePose, PoiTarget, PointOfInterest, SceneSnapshot};

    use super::*;
    use crate::config::FixationConfig;

    struct Counter(u64);

    impl FrameCallback for Counter {
        fn on_frame(&mut self, frame: u64, frames: &[(CharacterId, GazeFrame)], arena: &GazeArena) {
            assert_eq!(frame, self.0);
            assert_eq!(frames.len(), arena.len());
            self.0 += 1;
        }
    }

    #[test]
    fn runs_every_frame_and_counts_keys() {
        let scene = SceneSnapshot::default();
        let mut arena = GazeArena::new(FixationConfig::default()).unwrap();
        let a = arena.create("aoi", BasePose::IDENTITY).unwrap();
        arena.create("ren", BasePose::IDENTITY).unwrap();
        arena
            .get_mut(a)
            .unwrap()
            .poi_mut()
            .add_or_replace(
                "front",
                PointOfInterest::new(PoiTarget::offset(Vec3::new(0.0, 2.0, 0.0)), 1.0),
            )
            .unwrap();

        let mut counter = Counter(0);
        let summary = run_frames(&mut arena, &scene, 90, 1.0 / 30.0, &mut counter);
        assert_eq!(counter.0, 90);
        assert_eq!(summary.frames, 90);
        let total: u64 = summary.frames_on_key.values().sum();
        assert_eq!(total, 180);
        assert!(summary.frames_on_key.contains_key("front"));
        assert!(summary.frames_on_key.contains_key(IDLE_KEY));
        assert!(summary.mean_eye_offset > 0.0);
    }

    #[test]
    fn empty_arena_runs_cleanly() {
        let scene = SceneSnapshot::default();
        let mut arena = GazeArena::new(FixationConfig::default()).unwrap();
        let summary = run_frames(&mut arena, &scene, 10, 0.1, &mut NoOpCallback);
        assert_eq!(summary.frames, 10);
        assert!(summary.frames_on_key.is_empty());
        assert!(summary.mean_eye_offset.abs() < f32::EPSILON);
    }
}
