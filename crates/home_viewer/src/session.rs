//! Scripted headless session
//!
//! Builds the house, runs the animation loop for a number of frames while
//! toggling device state, exercises picking and drag-and-drop, then tears
//! the scene down and reports what happened.

use home_scene::animation::seeded_rng;
use home_scene::config::ConfigError;
use home_scene::domain::{DeviceKind, HouseSnapshot};
use home_scene::events::{EventType, SceneEvent};
use home_scene::input::{DragEvent, PointerEvent, Rect};
use home_scene::platform::{DomEvent, HeadlessHost};
use home_scene::render::HeadlessRenderer;
use home_scene::scene::ObjectKind;
use home_scene::{SceneError, SceneManager};
use thiserror::Error;

use crate::config::ViewerConfig;

/// Session errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Configuration or snapshot could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene could not be created
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Snapshot contains no rooms
    #[error("house snapshot has no rooms")]
    EmptyHouse,
}

/// What the session observed
#[derive(Debug, Default)]
pub struct SessionReport {
    /// Frames presented by the renderer
    pub frames_rendered: u64,
    /// Objects identified by clicking each room
    pub clicks: Vec<(String, ObjectKind)>,
    /// Events delivered to the application
    pub events: Vec<SceneEvent>,
    /// Geometries acquired over the session
    pub geometries_acquired: usize,
    /// Geometries still held after teardown
    pub geometries_leaked: usize,
}

type Scene = SceneManager<HeadlessHost, HeadlessRenderer>;

/// Run the scripted session
pub fn run(config: &ViewerConfig, house: &HouseSnapshot) -> Result<SessionReport, SessionError> {
    if house.rooms.is_empty() {
        return Err(SessionError::EmptyHouse);
    }

    let viewport = &config.viewport;
    let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, viewport.width, viewport.height));
    host.events_mut().register_handler(
        EventType::DeviceDropped,
        Box::new(|event: &SceneEvent| {
            log::info!("Application received {:?}", event);
            false
        }),
    );

    let mut scene = SceneManager::new(config.engine.clone(), host, HeadlessRenderer::new())?;
    if let Some(seed) = config.session.seed {
        scene.set_flicker_rng(seeded_rng(seed));
    }

    scene.build_from_snapshot(house);
    scene.setup_drag_and_drop();
    scene.animate();

    run_frames(&mut scene, config, house);

    let mut report = SessionReport::default();
    for room in &house.rooms {
        let Some(pointer) = scene
            .object_position(&room.id)
            .and_then(|position| scene.client_position(position))
            .map(|(x, y)| PointerEvent::new(x, y))
        else {
            continue;
        };
        scene.handle_click(pointer, |id, kind| report.clicks.push((id.to_string(), kind)));
    }

    if let Some(kind) = &config.session.drop_device {
        drop_on_first_room(&mut scene, house, kind);
    }

    scene.dispose();

    let stats = scene.resources().stats();
    report.frames_rendered = scene.renderer().frames_rendered();
    report.events = scene.host_mut().events_mut().take_history();
    report.geometries_acquired = stats.geometries_acquired;
    report.geometries_leaked = scene.resources().live_geometries();
    Ok(report)
}

fn run_frames(scene: &mut Scene, config: &ViewerConfig, house: &HouseSnapshot) {
    for frame in 1..config.session.frames {
        if config.session.overload_at == Some(frame) {
            scene.set_overload_state(true);
        }

        // Halfway through, flip every device once
        if frame == config.session.frames / 2 {
            for device in house.devices() {
                match device.kind {
                    DeviceKind::Light => scene.update_light(&device.id, !device.is_on),
                    DeviceKind::Fan => scene.update_fan(&device.id, !device.is_on),
                    DeviceKind::Thermostat | DeviceKind::Socket => {}
                }
            }
        }

        let due = scene.host_mut().take_due_frames();
        for handle in due {
            scene.on_frame(handle);
        }
    }
}

fn drop_on_first_room(scene: &mut Scene, house: &HouseSnapshot, kind: &str) {
    let Some((x, y)) = house
        .rooms
        .first()
        .and_then(|room| scene.object_position(&room.id))
        .and_then(|position| scene.client_position(position))
    else {
        return;
    };

    let drag = DragEvent::new(x, y).with_payload(kind);
    scene.handle_dom_event(DomEvent::DragOver(drag.clone()));
    if let Some(room) = scene.highlighted_room() {
        log::info!("Dragging over '{room}'");
    }
    scene.handle_dom_event(DomEvent::Drop(drag));
    scene.handle_dom_event(DomEvent::DragEnd);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use home_scene::config::{Config, ConfigFormat};

    fn bundled_house() -> HouseSnapshot {
        HouseSnapshot::from_str_with_format(include_str!("../assets/house.ron"), ConfigFormat::Ron)
            .unwrap()
    }

    fn short_session() -> ViewerConfig {
        ViewerConfig {
            session: SessionConfig {
                frames: 20,
                overload_at: Some(10),
                seed: Some(1),
                drop_device: Some("fan".to_string()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_clicking_each_room_identifies_it() {
        let house = bundled_house();
        let report = run(&short_session(), &house).unwrap();

        let expected: Vec<_> = house
            .rooms
            .iter()
            .map(|room| (room.id.clone(), ObjectKind::Room))
            .collect();
        assert_eq!(report.clicks, expected);
    }

    #[test]
    fn test_drop_on_first_room_reaches_application() {
        let report = run(&short_session(), &bundled_house()).unwrap();

        assert_eq!(
            report.events,
            vec![
                SceneEvent::DeviceDropped {
                    device_kind: DeviceKind::Fan,
                    room_id: "living-room".to_string(),
                },
                SceneEvent::DeviceDragEnd,
            ]
        );
    }

    #[test]
    fn test_session_releases_every_geometry() {
        let report = run(&short_session(), &bundled_house()).unwrap();

        assert!(report.frames_rendered > 0);
        assert!(report.geometries_acquired > 0);
        assert_eq!(report.geometries_leaked, 0);
    }

    #[test]
    fn test_empty_house_is_rejected() {
        let result = run(&short_session(), &HouseSnapshot::default());
        assert!(matches!(result, Err(SessionError::EmptyHouse)));
    }
}
