//! The built-in demo scene.
//!
//! Three characters stand in a loose triangle with a pillar between two of
//! them and the camera behind. Two of them (`aoi` and `ren`) have gaze
//! state; everyone exposes body parts as scene targets.

use fixation_core::{BodyPart, SceneCharacter};
use fixation_poi::{BasePose, SceneNode, SceneSnapshot, TransformHandle};
use glam::Vec3;

/// Head height above the floor (metres). World `+Z` is up.
const HEAD_HEIGHT: f32 = 1.6;

/// Radius of every head collider.
const HEAD_RADIUS: f32 = 0.12;

/// A character that gets gaze state in the demo.
#[derive(Debug, Clone)]
pub struct Observer {
    /// Name, matching its [`SceneCharacter`].
    pub name: String,
    /// Head pose.
    pub base: BasePose,
    /// Whether the camera is this character's main target.
    pub looks_at_camera: bool,
}

/// Everything the engine needs to run the demo.
#[derive(Debug, Clone)]
pub struct DemoScene {
    /// Transforms, colliders, and the camera.
    pub scene: SceneSnapshot,
    /// Characters whose body parts become scene targets.
    pub cast: Vec<SceneCharacter>,
    /// Characters that get gaze state.
    pub observers: Vec<Observer>,
}

/// Allocates handles and lays out bodies.
struct SceneBuilder {
    scene: SceneSnapshot,
    next_handle: u64,
}

impl SceneBuilder {
    fn new(camera: Vec3) -> Self {
        Self {
            scene: SceneSnapshot::new(camera),
            next_handle: 1,
        }
    }

    fn insert(&mut self, node: SceneNode) -> TransformHandle {
        let handle = TransformHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        self.scene.insert(handle, node);
        handle
    }

    /// Add a standing body whose feet are at `feet` and who faces `facing`.
    fn body(&mut self, name: &str, feet: Vec3, facing: Vec3, uncovered: bool) -> SceneCharacter {
        let forward = Vec3::new(facing.x, facing.y, 0.0).normalize_or(Vec3::Y);
        let right = forward.cross(Vec3::Z);
        let head = feet + Vec3::Z * HEAD_HEIGHT;

        let root = self.insert(SceneNode::at(feet));
        let face = self.insert(
            SceneNode::at(head)
                .with_parent(root)
                .with_collider(HEAD_RADIUS),
        );
        let mut part = |offset: Vec3| {
            self.insert(SceneNode::at(head + offset).with_parent(root))
        };
        let parts = vec![
            (BodyPart::Face, face),
            (BodyPart::LeftHand, part(forward * 0.3 - right * 0.35 - Vec3::Z * 0.6)),
            (BodyPart::RightHand, part(forward * 0.3 + right * 0.35 - Vec3::Z * 0.6)),
            (BodyPart::LeftChest, part(forward * 0.1 - right * 0.1 - Vec3::Z * 0.3)),
            (BodyPart::RightChest, part(forward * 0.1 + right * 0.1 - Vec3::Z * 0.3)),
            (BodyPart::Pelvis, part(forward * 0.05 - Vec3::Z * 0.7)),
        ];
        SceneCharacter {
            name: name.to_owned(),
            visible: true,
            chest_visible: uncovered,
            pelvis_visible: false,
            parts,
        }
    }
}

/// Build the demo scene.
pub fn build() -> DemoScene {
    let mut builder = SceneBuilder::new(Vec3::new(0.0, -3.0, 1.7));

    let aoi_feet = Vec3::ZERO;
    let ren_feet = Vec3::new(0.0, 2.5, 0.0);
    let mio_feet = Vec3::new(1.8, 1.6, 0.0);

    let cast = vec![
        builder.body("aoi", aoi_feet, ren_feet - aoi_feet, false),
        builder.body("ren", ren_feet, aoi_feet - ren_feet, true),
        builder.body("mio", mio_feet, aoi_feet - mio_feet, false),
    ];

    // A pillar between aoi and mio, tall enough to hide mio's face.
    builder.insert(SceneNode::at(Vec3::new(0.9, 0.8, HEAD_HEIGHT)).with_collider(0.25));

    let head = |feet: Vec3, toward: Vec3| {
        BasePose::looking_along(feet + Vec3::Z * HEAD_HEIGHT, toward - feet)
    };
    let observers = vec![
        Observer {
            name: "aoi".to_owned(),
            base: head(aoi_feet, ren_feet),
            looks_at_camera: false,
        },
        Observer {
            name: "ren".to_owned(),
            base: head(ren_feet, aoi_feet),
            looks_at_camera: true,
        },
    ];

    DemoScene {
        scene: builder.scene,
        cast,
        observers,
    }
}
