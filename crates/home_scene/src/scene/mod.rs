//! Scene graph, visual object index and object construction
//!
//! # Module Organization
//!
//! - [`node`] - Node payloads, keys and render flags
//! - [`graph`] - Slotmap-backed node hierarchy
//! - [`index`] - Domain id ↔ node mapping
//! - [`builder`] - Rooms, lights and fans built from domain records
//! - [`presentation`] - On/off driven bulb presentation

pub mod builder;
pub mod graph;
pub mod index;
pub mod node;
pub mod presentation;

pub use builder::{fan_blades, SceneBuilder, FAN_BLADES_LABEL};
pub use graph::SceneGraph;
pub use index::{IndexError, ObjectIdentity, ObjectKind, VisualObjectIndex};
pub use node::{LightData, LightKind, NodeKey, NodeKind, RenderFlags, SceneNode};
pub use presentation::{apply_light_state, glow_count, BULB_GLOW_LABEL};
