//! Platform-level named events emitted by the scene
//!
//! Handlers register per event type and return `true` to consume an event,
//! which stops it reaching later handlers. Events are queued with
//! [`EventBus::send`] and delivered by [`EventBus::dispatch`].

use std::collections::HashMap;
use std::fmt;

use crate::domain::DeviceKind;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A device was dropped onto a room
    DeviceDropped,
    /// A device drag finished, dropped or not
    DeviceDragEnd,
}

impl EventType {
    /// Platform event name
    pub fn name(self) -> &'static str {
        match self {
            Self::DeviceDropped => "device-dropped",
            Self::DeviceDragEnd => "device-drag-end",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Event emitted by the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// A new device of `device_kind` should be placed in `room_id`
    DeviceDropped {
        /// Kind of device carried by the drag
        device_kind: DeviceKind,
        /// Room under the drop position
        room_id: String,
    },
    /// The drag gesture ended
    DeviceDragEnd,
}

impl SceneEvent {
    /// Type of this event
    pub fn event_type(&self) -> EventType {
        match self {
            Self::DeviceDropped { .. } => EventType::DeviceDropped,
            Self::DeviceDragEnd => EventType::DeviceDragEnd,
        }
    }
}

/// Event handler trait
///
/// Returns `true` if the event was consumed.
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &SceneEvent) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(&SceneEvent) -> bool,
{
    fn on_event(&mut self, event: &SceneEvent) -> bool {
        self(event)
    }
}

/// Event queue with per-type handler registration
#[derive(Default)]
pub struct EventBus {
    queue: Vec<SceneEvent>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
    history: Vec<SceneEvent>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("queued", &self.queue.len())
            .field("handler_types", &self.handlers.len())
            .field("history", &self.history)
            .finish()
    }
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific event type
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: SceneEvent) {
        self.queue.push(event);
    }

    /// Queue and immediately dispatch an event
    pub fn publish(&mut self, event: SceneEvent) {
        self.send(event);
        self.dispatch();
    }

    /// Deliver every queued event
    pub fn dispatch(&mut self) {
        for event in std::mem::take(&mut self.queue) {
            log::debug!("Dispatching {}", event.event_type());
            if let Some(handlers) = self.handlers.get_mut(&event.event_type()) {
                for handler in handlers.iter_mut() {
                    if handler.on_event(&event) {
                        break;
                    }
                }
            }
            self.history.push(event);
        }
    }

    /// Every dispatched event, oldest first
    pub fn history(&self) -> &[SceneEvent] {
        &self.history
    }

    /// Drain the dispatch history
    pub fn take_history(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.history)
    }

    /// Drop queued events
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
