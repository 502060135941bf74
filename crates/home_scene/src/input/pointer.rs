//! Pointer and drag events in client (pixel) coordinates

use crate::foundation::math::Vec2;

/// Bounding rectangle of the host container in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Rect {
    /// Create a rectangle
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether the rectangle has a drawable area
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Width over height, `None` for an empty rectangle
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.has_area().then(|| self.width / self.height)
    }

    /// Convert client coordinates to normalized device coordinates
    ///
    /// NDC range is `[-1, 1]` with -1 at the left and bottom edges. Returns
    /// `None` for an empty rectangle.
    pub fn to_ndc(&self, client_x: f32, client_y: f32) -> Option<Vec2> {
        if !self.has_area() {
            return None;
        }
        let x = (client_x - self.left) / self.width * 2.0 - 1.0;
        let y = -((client_y - self.top) / self.height) * 2.0 + 1.0;
        Some(Vec2::new(x, y))
    }

    /// Convert normalized device coordinates back to client coordinates
    pub fn ndc_to_client(&self, ndc: Vec2) -> (f32, f32) {
        (
            self.left + (ndc.x + 1.0) / 2.0 * self.width,
            self.top + (1.0 - ndc.y) / 2.0 * self.height,
        )
    }
}

/// A pointer click in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Horizontal client position
    pub client_x: f32,
    /// Vertical client position
    pub client_y: f32,
}

impl PointerEvent {
    /// Pointer event at the given client position
    pub fn new(client_x: f32, client_y: f32) -> Self {
        Self { client_x, client_y }
    }
}

/// Drag payload MIME type carrying a device kind name
pub const DEVICE_PAYLOAD_TYPE: &str = "application/device";

/// A drag-and-drop event in client coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct DragEvent {
    /// Horizontal client position
    pub client_x: f32,
    /// Vertical client position
    pub client_y: f32,
    /// Data stored under [`DEVICE_PAYLOAD_TYPE`], if any
    pub payload: Option<String>,
}

impl DragEvent {
    /// Drag event without payload
    pub fn new(client_x: f32, client_y: f32) -> Self {
        Self {
            client_x,
            client_y,
            payload: None,
        }
    }

    /// Attach a device payload (builder style)
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Position as a pointer event
    pub fn pointer(&self) -> PointerEvent {
        PointerEvent::new(self.client_x, self.client_y)
    }
}
