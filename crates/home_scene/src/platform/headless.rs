//! In-memory host
//!
//! Frames are only "fired" when the driver calls [`HeadlessHost::take_due_frames`]
//! and hands each handle to the engine's `on_frame`.

use std::collections::{BTreeMap, BTreeSet};

use super::{DomEventKind, FrameHandle, FrameScheduler, Host, ListenerId, ListenerTarget};
use crate::events::{EventBus, SceneEvent};
use crate::input::Rect;

/// Host without a window, for tests and scripted sessions
#[derive(Debug, Default)]
pub struct HeadlessHost {
    rect: Option<Rect>,
    surface_mounted: bool,
    next_frame: u64,
    pending_frames: BTreeSet<FrameHandle>,
    next_listener: u64,
    listeners: BTreeMap<ListenerId, (ListenerTarget, DomEventKind)>,
    events: EventBus,
}

impl HeadlessHost {
    /// Host whose container has the given rectangle
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Some(rect),
            ..Self::default()
        }
    }

    /// Host without a mounting container
    pub fn without_container() -> Self {
        Self::default()
    }

    /// Change the container rectangle (simulates a resize)
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = Some(rect);
    }

    /// Fire every scheduled frame: returns and forgets the pending handles
    pub fn take_due_frames(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending_frames).into_iter().collect()
    }

    /// Number of scheduled, uncanceled frames
    pub fn pending_frame_count(&self) -> usize {
        self.pending_frames.len()
    }

    /// Whether a frame is still scheduled
    pub fn is_frame_pending(&self, handle: FrameHandle) -> bool {
        self.pending_frames.contains(&handle)
    }

    /// Whether the drawing surface is attached
    pub fn is_surface_mounted(&self) -> bool {
        self.surface_mounted
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether a listener of `kind` is attached anywhere
    pub fn has_listener(&self, kind: DomEventKind) -> bool {
        self.listeners.values().any(|(_, attached)| *attached == kind)
    }

    /// Application-facing event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Mutable event bus, for registering handlers
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }
}

impl FrameScheduler for HeadlessHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_frame += 1;
        let handle = FrameHandle(self.next_frame);
        self.pending_frames.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending_frames.remove(&handle);
    }
}

impl Host for HeadlessHost {
    fn container_rect(&self) -> Option<Rect> {
        self.rect
    }

    fn mount_surface(&mut self) {
        self.surface_mounted = true;
    }

    fn unmount_surface(&mut self) {
        self.surface_mounted = false;
    }

    fn add_listener(&mut self, target: ListenerTarget, kind: DomEventKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, (target, kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn dispatch_event(&mut self, event: SceneEvent) {
        self.events.publish(event);
    }
}
