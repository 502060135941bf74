//! Shared fixtures for integration tests

#![allow(dead_code)]

use home_scene::foundation::math::{Point3, Vec3};
use home_scene::prelude::*;
use home_scene::render::Material;
use home_scene::scene::SceneNode;

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;

pub type TestScene = SceneManager<HeadlessHost, HeadlessRenderer>;

pub fn new_scene() -> TestScene {
    let host = HeadlessHost::new(Rect::new(0.0, 0.0, WIDTH, HEIGHT));
    SceneManager::new(EngineConfig::default(), host, HeadlessRenderer::new()).unwrap()
}

/// One living room at the origin, floor on y = 0, with a lit light and a spinning fan
pub fn living_room() -> Room {
    Room::new("living-room", RoomKind::Living)
        .with_device(Device::light("light-1", true))
        .with_device(Device::fan("fan-1", true))
}

pub fn scene_with_room() -> TestScene {
    let mut scene = new_scene();
    scene.create_room(
        &living_room(),
        Vec3::new(0.0, 1.5, 0.0),
        Vec3::new(4.0, 3.0, 4.0),
        Color::from_hex(0xa0c4ff),
    );
    scene
}

/// Client coordinates at which a world point appears
pub fn client_position(scene: &TestScene, world: Vec3) -> (f32, f32) {
    let ndc = scene
        .camera()
        .view_projection_matrix()
        .transform_point(&Point3::from(world));
    ((ndc.x + 1.0) / 2.0 * WIDTH, (1.0 - ndc.y) / 2.0 * HEIGHT)
}

pub fn pointer_at(scene: &TestScene, world: Vec3) -> PointerEvent {
    let (x, y) = client_position(scene, world);
    PointerEvent::new(x, y)
}

pub fn drag_at(scene: &TestScene, world: Vec3) -> DragEvent {
    let (x, y) = client_position(scene, world);
    DragEvent::new(x, y)
}

pub fn material_of<'a>(scene: &'a TestScene, domain_id: &str) -> &'a Material {
    let key = scene
        .index()
        .lookup(domain_id)
        .and_then(|node| scene.graph().node(node))
        .and_then(SceneNode::material)
        .unwrap();
    scene.resources().material(key).unwrap()
}

/// Fire every scheduled frame once
pub fn run_due_frames(scene: &mut TestScene) -> usize {
    let due = scene.host_mut().take_due_frames();
    due.into_iter().filter(|handle| scene.on_frame(*handle)).count()
}
