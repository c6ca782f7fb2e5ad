//! End-to-end gaze behavior across the public API.

#![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use fixation_core::{
    BodyPart, FixationConfig, GazeArena, SceneCharacter, SceneTargetConfig, run_frames,
    scene_targets,
};
use fixation_poi::{
    BasePose, PoiConfig, PoiTarget, PointOfInterest, PointOfInterestRegistry, SceneNode,
    SceneSnapshot, TransformHandle, ViewAngle,
};

const DT: f32 = 1.0 / 30.0;

/// Two characters facing each other along world Y, three metres apart.
fn two_character_scene() -> (SceneSnapshot, Vec<SceneCharacter>) {
    let mut scene = SceneSnapshot::new(Vec3::new(0.0, -5.0, 1.0));
    let parts = [
        (BodyPart::Face, TransformHandle(1), Vec3::new(0.0, 3.0, 0.0)),
        (BodyPart::LeftHand, TransformHandle(2), Vec3::new(-0.4, 2.9, -0.6)),
        (BodyPart::RightHand, TransformHandle(3), Vec3::new(0.4, 2.9, -0.6)),
        (BodyPart::LeftChest, TransformHandle(4), Vec3::new(-0.1, 2.9, -0.3)),
        (BodyPart::RightChest, TransformHandle(5), Vec3::new(0.1, 2.9, -0.3)),
    ];
    for (_, handle, position) in parts {
        scene.insert(handle, SceneNode::at(position));
    }
    let ren = SceneCharacter {
        name: "ren".to_owned(),
        visible: true,
        chest_visible: true,
        pelvis_visible: false,
        parts: parts.iter().map(|&(part, handle, _)| (part, handle)).collect(),
    };
    (scene, vec![ren])
}

#[test]
fn observer_looks_at_the_other_character() {
    let (scene, cast) = two_character_scene();
    let mut arena = GazeArena::new(FixationConfig::default()).unwrap();
    let aoi = arena.create("aoi", BasePose::IDENTITY).unwrap();
    arena
        .replace_scene_targets(scene_targets(&cast, &SceneTargetConfig::default()), &scene)
        .unwrap();

    let summary = run_frames(&mut arena, &scene, 30 * 60, DT, &mut fixation_core::NoOpCallback);
    let on_face = summary.frames_on_key.get("scene:ren:face").copied().unwrap_or_default();
    let on_hands = ["scene:ren:left_hand", "scene:ren:right_hand"]
        .iter()
        .filter_map(|key| summary.frames_on_key.get(*key))
        .sum::<u64>();
    assert!(on_face > 0 && on_hands > 0, "{:?}", summary.frames_on_key);
    // Chest targets were excluded by the default config.
    assert!(!summary.frames_on_key.contains_key("scene:ren:left_chest"));
    assert!(summary.transfers > 5, "{summary:?}");
    assert_eq!(arena.get(aoi).unwrap().poi().len(), 3);
}

#[test]
fn main_target_steers_attention_toward_it() {
    let (mut scene, cast) = two_character_scene();
    // A vase off to the right, outside the forward cone.
    let vase = TransformHandle(50);
    scene.insert(vase, SceneNode::at(Vec3::new(4.0, 0.5, 0.0)));

    let mut arena = GazeArena::new(FixationConfig::default()).unwrap();
    let aoi = arena.create("aoi", BasePose::IDENTITY).unwrap();
    let mut targets = scene_targets(&cast, &SceneTargetConfig::default());
    targets.push((
        "scene:vase".to_owned(),
        PointOfInterest::new(PoiTarget::transform(vase), 1.0),
    ));
    arena.replace_scene_targets(targets, &scene).unwrap();
    arena.look_at_transform(aoi, vase).unwrap();

    let summary = run_frames(&mut arena, &scene, 30 * 30, DT, &mut fixation_core::NoOpCallback);
    // Guided toward the vase, the face three metres ahead is out of the cone.
    assert!(!summary.frames_on_key.contains_key("scene:ren:face"));
    assert!(summary.frames_on_key.contains_key("target"));

    arena.clear_main_target(aoi, &scene).unwrap();
    let summary = run_frames(&mut arena, &scene, 30 * 60, DT, &mut fixation_core::NoOpCallback);
    assert!(summary.frames_on_key.contains_key("scene:ren:face"));
    // Unguided, the vase is back outside the cone.
    let current = arena.get(aoi).unwrap().poi().state().current_key;
    assert_ne!(current.as_deref(), Some("scene:vase"));
}

#[test]
fn always_present_weights_set_the_long_run_ratio() {
    let config = PoiConfig {
        near_clip: 0.0,
        far_clip: 1000.0,
        ..PoiConfig::default()
    };
    let mut registry = PointOfInterestRegistry::new(config, ViewAngle::default()).unwrap();
    let scene = SceneSnapshot::default();
    let mut rng = SmallRng::seed_from_u64(2024);
    registry
        .add_or_replace(
            "one",
            PointOfInterest::new(PoiTarget::offset(Vec3::new(0.0, -1.0, 0.0)), 1.0)
                .with_always_present(true),
        )
        .unwrap();
    registry
        .add_or_replace(
            "three",
            PointOfInterest::new(PoiTarget::offset(Vec3::new(0.0, 1.0, 0.0)), 3.0)
                .with_always_present(true),
        )
        .unwrap();

    let (mut one, mut three) = (0_u32, 0_u32);
    for _ in 0..180_000 {
        registry.tick(DT, &BasePose::IDENTITY, &scene, &mut rng);
        let state = registry.state();
        if state.stare_time <= 0.0 {
            match state.current_key.as_deref() {
                Some("one") => one += 1,
                Some("three") => three += 1,
                _ => {}
            }
        }
    }
    let ratio = three as f32 / one as f32;
    assert!((2.5..3.6).contains(&ratio), "ratio {ratio} ({one}:{three})");
}

#[test]
fn project_config_builds_an_arena() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixation-config.yaml");
    if path.exists() {
        let config = FixationConfig::from_file(&path).unwrap();
        let mut arena = GazeArena::new(config).unwrap();
        arena.create("aoi", BasePose::IDENTITY).unwrap();
        assert_eq!(arena.len(), 1);
    }
}
