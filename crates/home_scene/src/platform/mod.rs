//! Host platform seam
//!
//! The engine never talks to a windowing system or document directly. It
//! asks a [`Host`] for the container rectangle, a drawing surface, event
//! listeners and per-frame callbacks, and it hands named events back to the
//! host for delivery.
//!
//! # Module Organization
//!
//! - [`listeners`] - Per-engine record of attached listeners
//! - [`headless`] - In-memory host used by tests and the demo binary

pub mod headless;
pub mod listeners;

pub use headless::HeadlessHost;
pub use listeners::ListenerRegistry;

use crate::events::SceneEvent;
use crate::input::{DragEvent, Rect};

/// Handle of a scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Handle of an attached listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerTarget {
    /// Top-level window
    Window,
    /// The element hosting the scene
    Container,
    /// The whole document
    Document,
}

/// Kind of platform event a listener receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DomEventKind {
    /// Window resized
    Resize,
    /// Drag moved over the container
    DragOver,
    /// Drag released over the container
    Drop,
    /// Drag left the container
    DragLeave,
    /// Drag gesture finished anywhere in the document
    DragEnd,
}

/// Platform event routed into the engine
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    /// Window resized
    Resize,
    /// Drag moved over the container
    DragOver(DragEvent),
    /// Drag released over the container
    Drop(DragEvent),
    /// Drag left the container
    DragLeave(DragEvent),
    /// Drag gesture finished
    DragEnd,
}

impl DomEvent {
    /// Listener kind that receives this event
    pub fn kind(&self) -> DomEventKind {
        match self {
            Self::Resize => DomEventKind::Resize,
            Self::DragOver(_) => DomEventKind::DragOver,
            Self::Drop(_) => DomEventKind::Drop,
            Self::DragLeave(_) => DomEventKind::DragLeave,
            Self::DragEnd => DomEventKind::DragEnd,
        }
    }
}

/// Cursor feedback requested during a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    /// Dropping copies the payload
    Copy,
}

/// How the host should treat an event after the engine saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    /// Suppress the platform default action
    pub prevent_default: bool,
    /// Drop effect to show, if any
    pub drop_effect: Option<DropEffect>,
}

impl EventResponse {
    /// The engine did not handle the event
    pub fn ignored() -> Self {
        Self::default()
    }

    /// Handled; suppress the platform default
    pub fn prevented() -> Self {
        Self {
            prevent_default: true,
            drop_effect: None,
        }
    }

    /// Handled; suppress the default and show a copy cursor
    pub fn copy() -> Self {
        Self {
            prevent_default: true,
            drop_effect: Some(DropEffect::Copy),
        }
    }
}

/// Per-frame callback scheduling
pub trait FrameScheduler {
    /// Schedule one callback for the next frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a scheduled callback; unknown handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Platform services the engine depends on
pub trait Host: FrameScheduler {
    /// Bounding rectangle of the mounting container, `None` if it is missing
    fn container_rect(&self) -> Option<Rect>;

    /// Attach the drawing surface to the container
    fn mount_surface(&mut self);

    /// Detach the drawing surface from the container
    fn unmount_surface(&mut self);

    /// Start delivering events of `kind` from `target`
    fn add_listener(&mut self, target: ListenerTarget, kind: DomEventKind) -> ListenerId;

    /// Stop delivering events for a listener
    fn remove_listener(&mut self, id: ListenerId);

    /// Deliver a named event to the application
    fn dispatch_event(&mut self, event: SceneEvent);
}
