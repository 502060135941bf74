//! Device state, animation and teardown through the scene manager

mod common;

use std::f32::consts::TAU;

use approx::assert_relative_eq;
use common::*;
use home_scene::foundation::math::{utils, Vec3};
use home_scene::prelude::*;
use home_scene::scene::{fan_blades, glow_count};

fn bulb(scene: &TestScene, id: &str) -> home_scene::scene::NodeKey {
    scene.index().lookup_kind(id, ObjectKind::Light).unwrap()
}

fn blade_rotation(scene: &TestScene, fan_id: &str) -> f32 {
    let fan = scene.index().lookup_kind(fan_id, ObjectKind::Fan).unwrap();
    let blades = fan_blades(scene.graph(), fan).unwrap();
    scene.graph().node(blades).unwrap().transform.rotation.y
}

#[test]
fn test_missing_container_is_an_error() {
    let result = SceneManager::new(
        EngineConfig::default(),
        HeadlessHost::without_container(),
        HeadlessRenderer::new(),
    );
    assert_eq!(result.err(), Some(SceneError::MissingContainer));
}

#[test]
fn test_new_scene_mounts_and_listens_for_resize() {
    let scene = new_scene();
    assert!(scene.host().is_surface_mounted());
    assert!(scene.host().has_listener(home_scene::platform::DomEventKind::Resize));
    assert_eq!(scene.renderer().size(), (800, 600));
    assert_relative_eq!(scene.camera().aspect, WIDTH / HEIGHT);
    assert_eq!(scene.graph().background(), Color::from_hex(0xf0f0f0));
}

#[test]
fn test_update_light_on_off_is_idempotent() {
    let mut scene = scene_with_room();
    let light = bulb(&scene, "light-1");

    for _ in 0..2 {
        scene.update_light("light-1", true);
        assert_relative_eq!(material_of(&scene, "light-1").emissive_intensity, 0.5);
        assert_eq!(glow_count(scene.graph(), light), 1);
    }

    for _ in 0..2 {
        scene.update_light("light-1", false);
        let material = material_of(&scene, "light-1");
        assert_eq!(material.color, Color::from_hex(0x888888));
        assert_eq!(material.emissive, Color::BLACK);
        assert_relative_eq!(material.emissive_intensity, 0.0);
        assert_eq!(glow_count(scene.graph(), light), 0);
    }

    scene.update_light("light-1", true);
    assert_eq!(material_of(&scene, "light-1").color, Color::from_hex(0xffff00));
}

#[test]
fn test_unknown_ids_are_ignored() {
    let mut scene = scene_with_room();
    let nodes = scene.graph().len();

    scene.update_light("no-such-light", true);
    scene.update_fan("no-such-fan", true);
    // Right id, wrong kind
    scene.update_light("fan-1", true);

    assert_eq!(scene.graph().len(), nodes);
}

#[test]
fn test_animate_twice_keeps_one_frame() {
    let mut scene = scene_with_room();
    scene.animate();
    scene.animate();

    assert_eq!(scene.host().pending_frame_count(), 1);
    assert_eq!(scene.animation_state(), LoopState::Running);
}

#[test]
fn test_stale_frames_do_not_tick() {
    let mut scene = scene_with_room();
    scene.animate();
    let stale = scene.host_mut().take_due_frames();
    scene.animate();

    assert!(!scene.on_frame(stale[0]));
    assert_eq!(run_due_frames(&mut scene), 1);
}

#[test]
fn test_fan_rotation_accumulates_per_tick() {
    let mut scene = scene_with_room();
    let ticks = 25;

    // The first tick runs inside animate()
    scene.animate();
    for _ in 1..ticks {
        assert_eq!(run_due_frames(&mut scene), 1);
    }

    #[allow(clippy::cast_precision_loss)]
    let expected = ticks as f32 * 0.1;
    assert_relative_eq!(
        utils::wrap_angle(blade_rotation(&scene, "fan-1")),
        utils::wrap_angle(expected),
        epsilon = 1e-3
    );
    assert_eq!(scene.renderer().frames_rendered(), ticks);
}

#[test]
fn test_stopped_fan_does_not_turn() {
    let mut scene = scene_with_room();
    scene.update_fan("fan-1", false);
    scene.animate();
    run_due_frames(&mut scene);

    assert_relative_eq!(blade_rotation(&scene, "fan-1"), 0.0);

    scene.update_fan("fan-1", true);
    run_due_frames(&mut scene);
    assert_relative_eq!(blade_rotation(&scene, "fan-1"), 0.1, epsilon = 1e-6);
    assert!(blade_rotation(&scene, "fan-1") < TAU);
}

#[test]
fn test_overload_flicker_uses_random_source() {
    let mut scene = scene_with_room();
    scene.set_flicker_rng(Box::new(ScriptedRng::new([0.1, 0.4])));
    scene.set_overload_state(true);

    scene.animate();

    assert_relative_eq!(material_of(&scene, "light-1").emissive_intensity, 0.2, epsilon = 1e-6);
}

#[test]
fn test_flicker_skips_when_roll_fails() {
    let mut scene = scene_with_room();
    scene.set_flicker_rng(Box::new(ScriptedRng::new([0.9])));
    scene.set_overload_state(true);

    scene.animate();

    assert_relative_eq!(material_of(&scene, "light-1").emissive_intensity, 0.5);
}

#[test]
fn test_no_flicker_without_overload_or_for_off_lights() {
    let mut scene = scene_with_room();
    scene.create_light(&Device::light("light-off", false), Vec3::new(10.0, 2.0, 0.0));
    scene.set_flicker_rng(Box::new(ScriptedRng::new([0.0, 0.0])));

    scene.animate();
    assert_relative_eq!(material_of(&scene, "light-1").emissive_intensity, 0.5);

    scene.set_overload_state(true);
    run_due_frames(&mut scene);
    assert_relative_eq!(material_of(&scene, "light-1").emissive_intensity, 0.0);
    assert_relative_eq!(material_of(&scene, "light-off").emissive_intensity, 0.0);
    assert_eq!(material_of(&scene, "light-off").color, Color::from_hex(0x888888));
}

#[test]
fn test_resize_updates_camera_and_surface() {
    let mut scene = new_scene();
    scene.host_mut().set_rect(Rect::new(0.0, 0.0, 1000.0, 500.0));

    scene.handle_dom_event(DomEvent::Resize);
    scene.handle_dom_event(DomEvent::Resize);

    assert_relative_eq!(scene.camera().aspect, 2.0);
    assert_eq!(scene.renderer().size(), (1000, 500));
}

#[test]
fn test_build_from_snapshot_lays_rooms_along_x() {
    let mut scene = new_scene();
    let snapshot = HouseSnapshot {
        rooms: vec![
            living_room(),
            Room::new("bedroom", RoomKind::Bedroom).with_device(Device::light("light-2", false)),
        ],
    };

    scene.build_from_snapshot(&snapshot);

    assert_eq!(scene.index().len(), 5);
    let bedroom = scene.index().lookup_kind("bedroom", ObjectKind::Room).unwrap();
    let position = scene.graph().node(bedroom).unwrap().transform.position;
    assert_relative_eq!(position, Vec3::new(2.25, 1.5, 0.0));
    assert_eq!(material_of(&scene, "bedroom").color, Color::from_hex(0xffc6ff));
}

#[test]
fn test_dispose_releases_everything_once() {
    let mut scene = scene_with_room();
    scene.setup_drag_and_drop();
    scene.animate();
    assert!(scene.resources().live_geometries() > 0);

    scene.dispose();

    assert!(scene.is_disposed());
    assert!(scene.index().is_empty());
    assert!(scene.graph().is_empty());
    assert!(!scene.host().is_surface_mounted());
    assert_eq!(scene.host().listener_count(), 0);
    assert_eq!(scene.host().pending_frame_count(), 0);
    assert_eq!(scene.animation_state(), LoopState::Disposed);

    let stats = scene.resources().stats();
    assert_eq!(scene.resources().live_geometries(), 0);
    assert_eq!(scene.resources().live_materials(), 0);
    assert_eq!(stats.geometries_acquired, stats.geometries_released);
    assert_eq!(stats.materials_acquired, stats.materials_released);

    // Second call is a no-op
    scene.dispose();
    assert_eq!(scene.resources().stats(), stats);
}

#[test]
fn test_no_tick_after_dispose() {
    let mut scene = scene_with_room();
    scene.animate();
    let due = scene.host_mut().take_due_frames();
    scene.dispose();

    assert!(!scene.on_frame(due[0]));
    scene.animate();
    assert_eq!(scene.host().pending_frame_count(), 0);
    assert_eq!(scene.renderer().frames_rendered(), 1);
}
