//! The seam between selection and the host scene graph.
//!
//! Selection never touches engine objects directly. Everything it needs to
//! know about the world (where a transform is, whether it still exists,
//! where the camera is, what a ray hits) goes through [`SceneQuery`].
//! [`SceneSnapshot`] is a plain in-memory implementation used by the demo
//! driver and the tests.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque handle naming a transform owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformHandle(pub u64);

impl fmt::Display for TransformHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transform#{}", self.0)
    }
}

/// Read-only view of the host scene.
pub trait SceneQuery {
    /// World position of `handle`, or `None` if it no longer exists.
    fn transform_position(&self, handle: TransformHandle) -> Option<Vec3>;

    /// Whether `handle` still exists.
    fn is_alive(&self, handle: TransformHandle) -> bool {
        self.transform_position(handle).is_some()
    }

    /// World position of the active camera.
    fn camera_position(&self) -> Vec3;

    /// First transform hit by a ray from `origin` along `direction` within
    /// `max_distance` of the origin.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32)
    -> Option<TransformHandle>;

    /// Whether `child` is `ancestor` or lies beneath it in the hierarchy.
    fn is_descendant(&self, child: TransformHandle, ancestor: TransformHandle) -> bool;
}

/// One transform in a [`SceneSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// World position.
    pub position: Vec3,
    /// Parent transform, if any.
    #[serde(default)]
    pub parent: Option<TransformHandle>,
    /// Radius of a sphere collider centred on the transform, if any.
    #[serde(default)]
    pub collider_radius: Option<f32>,
}

impl SceneNode {
    /// A root transform with no collider.
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            parent: None,
            collider_radius: None,
        }
    }

    /// Attach this node under `parent`.
    #[must_use]
    pub const fn with_parent(mut self, parent: TransformHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Give this node a sphere collider.
    #[must_use]
    pub const fn with_collider(mut self, radius: f32) -> Self {
        self.collider_radius = Some(radius);
        self
    }
}

/// In-memory scene: transforms with parent links and sphere colliders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    camera: Vec3,
    nodes: BTreeMap<TransformHandle, SceneNode>,
}

impl SceneSnapshot {
    /// An empty scene with the camera at `camera`.
    pub const fn new(camera: Vec3) -> Self {
        Self {
            camera,
            nodes: BTreeMap::new(),
        }
    }

    /// Move the camera.
    pub const fn set_camera(&mut self, camera: Vec3) {
        self.camera = camera;
    }

    /// Insert or replace a transform.
    pub fn insert(&mut self, handle: TransformHandle, node: SceneNode) {
        self.nodes.insert(handle, node);
    }

    /// Remove a transform. Children keep their (now dangling) parent link.
    pub fn remove(&mut self, handle: TransformHandle) -> Option<SceneNode> {
        self.nodes.remove(&handle)
    }

    /// Move an existing transform. Returns `false` if it does not exist.
    pub fn set_position(&mut self, handle: TransformHandle, position: Vec3) -> bool {
        let Some(node) = self.nodes.get_mut(&handle) else {
            return false;
        };
        node.position = position;
        true
    }

    /// Look up a transform.
    pub fn node(&self, handle: TransformHandle) -> Option<&SceneNode> {
        self.nodes.get(&handle)
    }

    /// Number of transforms.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no transforms.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl SceneQuery for SceneSnapshot {
    fn transform_position(&self, handle: TransformHandle) -> Option<Vec3> {
        self.nodes.get(&handle).map(|node| node.position)
    }

    fn camera_position(&self) -> Vec3 {
        self.camera
    }

    /// Nearest sphere collider hit at a distance in `[0, max_distance]`.
    ///
    /// Colliders enclosing the ray origin are skipped so the looker's own
    /// head never occludes what it looks at.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<TransformHandle> {
        let direction = direction.try_normalize()?;
        self.nodes
            .iter()
            .filter_map(|(&handle, node)| {
                let radius = node.collider_radius?;
                ray_sphere(origin, direction, node.position, radius)
                    .filter(|&t| t <= max_distance)
                    .map(|t| (handle, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle)
    }

    fn is_descendant(&self, child: TransformHandle, ancestor: TransformHandle) -> bool {
        let mut cursor = Some(child);
        // Bounded walk; a malformed parent cycle cannot loop forever.
        for _ in 0..=self.nodes.len() {
            match cursor {
                Some(handle) if handle == ancestor => return true,
                Some(handle) => cursor = self.nodes.get(&handle).and_then(|node| node.parent),
                None => return false,
            }
        }
        false
    }
}

/// Distance along a unit ray to the first intersection with a sphere.
///
/// Returns `None` on a miss, when the sphere is behind the origin, or when
/// the origin is inside the sphere.
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let c = radius.mul_add(-radius, oc.length_squared());
    if c < 0.0 {
        return None;
    }
    let b = oc.dot(direction);
    let discriminant = b.mul_add(b, -c);
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HEAD: TransformHandle = TransformHandle(1);
    const BODY: TransformHandle = TransformHandle(2);
    const HAND: TransformHandle = TransformHandle(3);
    const WALL: TransformHandle = TransformHandle(4);

    fn scene() -> SceneSnapshot {
        let mut scene = SceneSnapshot::new(Vec3::new(0.0, -10.0, 0.0));
        scene.insert(BODY, SceneNode::at(Vec3::new(0.0, 5.0, 0.0)).with_collider(1.0));
        scene.insert(HAND, SceneNode::at(Vec3::new(0.0, 4.5, 0.0)).with_parent(BODY));
        scene.insert(HEAD, SceneNode::at(Vec3::ZERO).with_collider(0.2));
        scene
    }

    #[test]
    fn positions_and_liveness() {
        let mut scene = scene();
        assert_eq!(scene.transform_position(HAND), Some(Vec3::new(0.0, 4.5, 0.0)));
        assert!(scene.is_alive(BODY));
        assert!(scene.remove(BODY).is_some());
        assert!(!scene.is_alive(BODY));
        assert!(!scene.set_position(BODY, Vec3::ZERO));
    }

    #[test]
    fn raycast_hits_nearest_collider() {
        let mut scene = scene();
        scene.insert(WALL, SceneNode::at(Vec3::new(0.0, 2.0, 0.0)).with_collider(0.5));
        assert_eq!(scene.raycast(Vec3::ZERO, Vec3::Y, f32::INFINITY), Some(WALL));
    }

    #[test]
    fn raycast_skips_collider_around_origin() {
        // The ray starts inside HEAD's collider and must report BODY.
        assert_eq!(scene().raycast(Vec3::ZERO, Vec3::Y, f32::INFINITY), Some(BODY));
    }

    #[test]
    fn raycast_misses_behind_and_beside() {
        let scene = scene();
        assert_eq!(scene.raycast(Vec3::ZERO, Vec3::NEG_Y, f32::INFINITY), None);
        assert_eq!(scene.raycast(Vec3::ZERO, Vec3::X, f32::INFINITY), None);
        assert_eq!(scene.raycast(Vec3::ZERO, Vec3::ZERO, f32::INFINITY), None);
    }

    #[test]
    fn raycast_stops_at_max_distance() {
        let scene = scene();
        // BODY's surface is 4 units out.
        assert_eq!(scene.raycast(Vec3::ZERO, Vec3::Y, 3.9), None);
        assert_eq!(scene.raycast(Vec3::ZERO, Vec3::Y * 10.0, 4.0), Some(BODY));
    }

    #[test]
    fn descendant_walks_parents() {
        let scene = scene();
        assert!(scene.is_descendant(HAND, BODY));
        assert!(scene.is_descendant(BODY, BODY));
        assert!(!scene.is_descendant(BODY, HAND));
        assert!(!scene.is_descendant(HEAD, BODY));
    }

    #[test]
    fn descendant_survives_parent_cycle() {
        let mut scene = SceneSnapshot::default();
        scene.insert(HEAD, SceneNode::at(Vec3::ZERO).with_parent(BODY));
        scene.insert(BODY, SceneNode::at(Vec3::ZERO).with_parent(HEAD));
        assert!(!scene.is_descendant(HEAD, WALL));
    }

    #[test]
    fn snapshot_deserializes_from_json() {
        let json = r#"{"camera":[0.0,0.0,1.0],"nodes":{"7":{"position":[1.0,2.0,3.0]}}}"#;
        let scene: SceneSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(scene.transform_position(TransformHandle(7)), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(scene.camera_position(), Vec3::Z);
    }
}
