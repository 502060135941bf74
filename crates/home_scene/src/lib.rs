//! # Home Scene
//!
//! Interactive 3D view of a smart home: rooms, lights and fans built from a
//! read-only house snapshot and kept in step with device state.
//!
//! ## Features
//!
//! - **Scene construction**: rooms with floors, ceiling lights and fans
//! - **Picking**: pointer → ray → nearest tagged object, with parent fallback
//! - **Drag and drop**: room targeting with highlight and restore
//! - **Animation**: spinning fans and overload flicker on a cancellable loop
//! - **Deterministic teardown**: every acquired resource released once
//!
//! The engine is headless-capable. Windowing and drawing sit behind the
//! [`platform::Host`] and [`render::RenderBackend`] traits.
//!
//! ## Quick Start
//!
//! ```rust
//! use home_scene::prelude::*;
//!
//! let host = HeadlessHost::new(Rect::new(0.0, 0.0, 800.0, 600.0));
//! let mut scene = SceneManager::new(EngineConfig::default(), host, HeadlessRenderer::new())?;
//!
//! let room = Room::new("kitchen", RoomKind::Kitchen).with_device(Device::light("lamp", true));
//! scene.build_from_snapshot(&HouseSnapshot { rooms: vec![room] });
//! scene.animate();
//!
//! scene.update_light("lamp", false);
//! scene.dispose();
//! # Ok::<(), SceneError>(())
//! ```

pub mod animation;
pub mod config;
pub mod domain;
pub mod events;
pub mod foundation;
pub mod geometry;
pub mod input;
pub mod platform;
pub mod render;
pub mod scene;

mod manager;

pub use manager::{SceneError, SceneManager};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{FlickerRng, LoopState, ScriptedRng},
        config::{Config, ConfigError, EngineConfig},
        domain::{Device, DeviceKind, HouseSnapshot, Room, RoomKind},
        events::{EventBus, EventHandler, EventType, SceneEvent},
        foundation::math::{Transform, Vec3},
        input::{DragEvent, HitResult, PickPolicy, PointerEvent, Rect},
        platform::{DomEvent, EventResponse, FrameHandle, HeadlessHost, Host},
        render::{Color, HeadlessRenderer, RenderBackend},
        scene::{ObjectIdentity, ObjectKind},
        SceneError, SceneManager,
    };
}
