//! Ray casting and pick resolution
//!
//! Pointer → ray → every mesh intersected in its own model space → hits
//! sorted nearest first → first hit that resolves to a tagged object.

use crate::foundation::math::Vec2;
use crate::geometry::Ray;
use crate::render::{Camera, ResourceRegistry};
use crate::scene::{NodeKey, NodeKind, ObjectIdentity, ObjectKind, SceneGraph, VisualObjectIndex};

use super::pointer::{PointerEvent, Rect};

/// One ray/mesh intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Mesh that was hit
    pub node: NodeKey,
    /// World-space distance from the ray origin
    pub distance: f32,
}

/// Intersections ordered by ascending distance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitResult {
    hits: Vec<Hit>,
}

impl HitResult {
    /// Sort hits nearest first
    pub fn from_hits(mut hits: Vec<Hit>) -> Self {
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Self { hits }
    }

    /// Hits nearest first
    pub fn iter(&self) -> impl Iterator<Item = &Hit> {
        self.hits.iter()
    }

    /// Closest hit
    pub fn nearest(&self) -> Option<&Hit> {
        self.hits.first()
    }

    /// Number of hits
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Whether the ray hit nothing
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Which objects a pick may resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickPolicy {
    /// Tagged objects, falling back to a tagged immediate parent
    Interactive,
    /// Only objects tagged as rooms
    RoomsOnly,
}

/// World-space ray under a pointer position
pub fn pointer_ray(camera: &Camera, rect: &Rect, pointer: PointerEvent) -> Option<Ray> {
    let ndc: Vec2 = rect.to_ndc(pointer.client_x, pointer.client_y)?;
    camera.screen_to_world_ray(ndc.x, ndc.y)
}

/// Intersect a world-space ray with every mesh in the scene
///
/// Groups and lights are traversed but never hit.
pub fn raycast(graph: &SceneGraph, resources: &ResourceRegistry, ray: &Ray) -> HitResult {
    let mut hits = Vec::new();

    for (key, node) in graph.iter() {
        let NodeKind::Mesh { geometry, .. } = node.kind else {
            continue;
        };
        let Some(shape) = resources.geometry(geometry) else {
            continue;
        };
        let Some(to_local) = graph.world_matrix(key).and_then(|m| m.try_inverse()) else {
            log::trace!("Skipping '{}' with singular transform", node.label);
            continue;
        };

        if let Some(distance) = shape.intersect_ray(&ray.transformed(&to_local)) {
            hits.push(Hit { node: key, distance });
        }
    }

    HitResult::from_hits(hits)
}

/// Resolve the nearest hit that maps to a domain object
///
/// Nearest first, stop at the first match:
/// 1. the mesh itself is tagged;
/// 2. (rooms) the mesh is tagged as a room;
/// 3. the mesh's immediate parent is tagged.
///
/// [`PickPolicy::RoomsOnly`] only accepts room tags on the mesh itself.
pub fn resolve(
    hits: &HitResult,
    graph: &SceneGraph,
    index: &VisualObjectIndex,
    policy: PickPolicy,
) -> Option<ObjectIdentity> {
    hits.iter().find_map(|hit| {
        let own = index.identity_of(hit.node);
        let resolved = match policy {
            PickPolicy::RoomsOnly => own.filter(|identity| identity.kind == ObjectKind::Room),
            PickPolicy::Interactive => own.or_else(|| {
                graph
                    .parent(hit.node)
                    .and_then(|parent| index.identity_of(parent))
            }),
        };
        resolved.cloned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Transform, Vec3};
    use crate::geometry::Shape;
    use crate::render::{Color, Material};
    use crate::scene::{RenderFlags, SceneNode};

    struct Scene {
        graph: SceneGraph,
        resources: ResourceRegistry,
        index: VisualObjectIndex,
    }

    impl Scene {
        fn new() -> Self {
            Self {
                graph: SceneGraph::default(),
                resources: ResourceRegistry::new(),
                index: VisualObjectIndex::new(),
            }
        }

        fn mesh(&mut self, label: &'static str, shape: Shape, position: Vec3) -> SceneNode {
            let geometry = self.resources.acquire_geometry(shape);
            let material = self.resources.acquire_material(Material::phong(Color::WHITE));
            SceneNode::mesh(label, geometry, material, RenderFlags::empty(), Transform::from_position(position))
        }
    }

    fn forward_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_hits_are_sorted_by_distance() {
        let mut scene = Scene::new();
        let far = scene.mesh("far", Shape::Sphere { radius: 1.0 }, Vec3::new(0.0, 0.0, -5.0));
        let near = scene.mesh("near", Shape::Sphere { radius: 1.0 }, Vec3::new(0.0, 0.0, 2.0));
        let far = scene.graph.add_root(far);
        let near = scene.graph.add_root(near);

        let hits = raycast(&scene.graph, &scene.resources, &forward_ray());
        let order: Vec<_> = hits.iter().map(|hit| hit.node).collect();
        assert_eq!(order, vec![near, far]);
        assert!((hits.nearest().unwrap().distance - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_untagged_child_resolves_to_parent() {
        let mut scene = Scene::new();
        let body = scene.mesh("body", Shape::Box { width: 2.0, height: 2.0, depth: 2.0 }, Vec3::zeros());
        let body = scene.graph.add_root(body);
        // Sticks out toward the camera, so it is the nearest hit
        let knob = scene.mesh("knob", Shape::Sphere { radius: 0.5 }, Vec3::new(0.0, 0.0, 1.5));
        scene.graph.add_child(body, knob).unwrap();
        scene.index.register("light-7", ObjectKind::Light, body).unwrap();

        let hits = raycast(&scene.graph, &scene.resources, &forward_ray());
        assert_eq!(hits.len(), 2);

        let picked = resolve(&hits, &scene.graph, &scene.index, PickPolicy::Interactive).unwrap();
        assert_eq!(picked.domain_id, "light-7");
        assert_eq!(picked.kind, ObjectKind::Light);
    }

    #[test]
    fn test_rooms_only_skips_devices() {
        let mut scene = Scene::new();
        let bulb = scene.mesh("bulb", Shape::Sphere { radius: 0.5 }, Vec3::new(0.0, 0.0, 3.0));
        let room = scene.mesh("room", Shape::Box { width: 4.0, height: 4.0, depth: 4.0 }, Vec3::zeros());
        let bulb = scene.graph.add_root(bulb);
        let room = scene.graph.add_root(room);
        scene.index.register("bulb-1", ObjectKind::Light, bulb).unwrap();
        scene.index.register("kitchen", ObjectKind::Room, room).unwrap();

        let hits = raycast(&scene.graph, &scene.resources, &forward_ray());
        let interactive = resolve(&hits, &scene.graph, &scene.index, PickPolicy::Interactive).unwrap();
        let rooms = resolve(&hits, &scene.graph, &scene.index, PickPolicy::RoomsOnly).unwrap();

        assert_eq!(interactive.domain_id, "bulb-1");
        assert_eq!(rooms.domain_id, "kitchen");
    }

    #[test]
    fn test_empty_space_and_untagged_meshes() {
        let mut scene = Scene::new();
        let decoration = scene.mesh("decoration", Shape::Sphere { radius: 1.0 }, Vec3::zeros());
        scene.graph.add_root(decoration);

        let miss = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(raycast(&scene.graph, &scene.resources, &miss).is_empty());

        let hits = raycast(&scene.graph, &scene.resources, &forward_ray());
        assert_eq!(hits.len(), 1);
        assert!(resolve(&hits, &scene.graph, &scene.index, PickPolicy::Interactive).is_none());
    }

    #[test]
    fn test_rotated_plane_is_hit_from_above() {
        let mut scene = Scene::new();
        let mut floor = scene.mesh("floor", Shape::Plane { width: 2.0, height: 2.0 }, Vec3::zeros());
        floor.transform = floor.transform.with_rotation(Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0));
        scene.graph.add_root(floor);

        let down = Ray::new(Vec3::new(0.5, 3.0, 0.5), Vec3::new(0.0, -1.0, 0.0));
        let hits = raycast(&scene.graph, &scene.resources, &down);
        assert!((hits.nearest().unwrap().distance - 3.0).abs() < 1e-4);
    }
}
