//! Render backend seam
//!
//! The engine hands a finished [`DrawList`] to a backend once per frame.
//! [`HeadlessRenderer`] keeps counters instead of drawing and is what the
//! tests and the demo binary run against.

use super::DrawList;

/// Something that can present a draw list
pub trait RenderBackend {
    /// Resize the drawing surface in pixels
    fn set_size(&mut self, width: u32, height: u32);

    /// Present one frame
    fn render(&mut self, frame: &DrawList);
}

/// Backend that records what it was asked to draw
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    size: (u32, u32),
    frames: u64,
    last_item_count: usize,
    last_light_count: usize,
    bytes_uploaded: usize,
    last_frame: Option<DrawList>,
}

impl HeadlessRenderer {
    /// Create a renderer with a zero-sized surface
    pub fn new() -> Self {
        Self::default()
    }

    /// Current surface size
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Frames presented so far
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Mesh count of the last frame
    pub fn last_item_count(&self) -> usize {
        self.last_item_count
    }

    /// Light count of the last frame
    pub fn last_light_count(&self) -> usize {
        self.last_light_count
    }

    /// Total draw data handed over, in bytes
    pub fn bytes_uploaded(&self) -> usize {
        self.bytes_uploaded
    }

    /// Copy of the last presented frame
    pub fn last_frame(&self) -> Option<&DrawList> {
        self.last_frame.as_ref()
    }
}

impl RenderBackend for HeadlessRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        if self.size != (width, height) {
            log::debug!("Headless surface resized to {width}x{height}");
        }
        self.size = (width, height);
    }

    fn render(&mut self, frame: &DrawList) {
        self.frames += 1;
        self.last_item_count = frame.items.len();
        self.last_light_count = frame.lights.len();
        self.bytes_uploaded += frame.item_bytes().len() + frame.light_bytes().len();
        self.last_frame = Some(frame.clone());
        log::trace!(
            "Frame {}: {} items, {} lights",
            self.frames,
            self.last_item_count,
            self.last_light_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_renderer_counts_frames() {
        let mut renderer = HeadlessRenderer::new();
        renderer.set_size(800, 600);
        renderer.render(&DrawList::default());
        renderer.render(&DrawList::default());

        assert_eq!(renderer.size(), (800, 600));
        assert_eq!(renderer.frames_rendered(), 2);
        assert_eq!(renderer.last_item_count(), 0);
        assert!(renderer.last_frame().is_some());
    }
}
