//! Rendering data: colors, materials, camera, resources and the backend seam
//!
//! # Module Organization
//!
//! - [`color`] - Packed RGB colors
//! - [`material`] - Surface presentation
//! - [`camera`] - Perspective viewpoint and pointer unprojection
//! - [`resources`] - Geometry/material registry with release tracking
//! - [`draw_list`] - Packed per-frame data
//! - [`backend`] - Backend trait and the headless implementation

pub mod backend;
pub mod camera;
pub mod color;
pub mod draw_list;
pub mod material;
pub mod resources;

pub use backend::{HeadlessRenderer, RenderBackend};
pub use camera::Camera;
pub use color::Color;
pub use draw_list::{DrawItem, DrawList, LightUniform};
pub use material::{Material, ShadingModel};
pub use resources::{GeometryKey, MaterialKey, ResourceError, ResourceKind, ResourceRegistry, ResourceStats};
