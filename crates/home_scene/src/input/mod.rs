//! Pointer input, picking and drag targeting
//!
//! # Module Organization
//!
//! - [`pointer`] - Client-space events and the container rectangle
//! - [`picking`] - Ray casting and precedence resolution
//! - [`drag`] - Room targeting and highlight bookkeeping

pub mod drag;
pub mod picking;
pub mod pointer;

pub use drag::{DragTargetResolver, SavedPresentation};
pub use picking::{pointer_ray, raycast, resolve, Hit, HitResult, PickPolicy};
pub use pointer::{DragEvent, PointerEvent, Rect, DEVICE_PAYLOAD_TYPE};
