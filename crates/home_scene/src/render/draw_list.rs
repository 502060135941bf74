//! Packed per-frame draw data
//!
//! The scene is flattened into plain-old-data structs once per frame. A
//! backend can upload the slices directly with `bytemuck::cast_slice`.

use bytemuck::{Pod, Zeroable};

use super::{Camera, ResourceRegistry};
use crate::foundation::math::{Mat4, Point3};
use crate::geometry::Shape;
use crate::scene::{LightKind, NodeKind, SceneGraph};

/// One drawable mesh instance
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawItem {
    /// Model-to-world matrix (column major)
    pub model: [[f32; 4]; 4],
    /// Base color (RGB + opacity)
    pub color: [f32; 4],
    /// Emission (RGB + intensity)
    pub emissive: [f32; 4],
    /// `RenderFlags` bits
    pub flags: u32,
    /// Shape code: 0 box, 1 sphere, 2 cylinder, 3 plane
    pub shape: u32,
    /// Padding for 16-byte stride
    pub _padding: [u32; 2],
}

/// Light kind codes used in [`LightUniform::position`]'s `w`
pub mod light_code {
    /// Ambient light
    pub const AMBIENT: f32 = 0.0;
    /// Directional light
    pub const DIRECTIONAL: f32 = 1.0;
    /// Point light
    pub const POINT: f32 = 2.0;
}

/// One light source
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// World position (xyz) and kind code (w)
    pub position: [f32; 4],
    /// Color and intensity (RGB + intensity)
    pub color: [f32; 4],
    /// Range, shadow map size, unused, unused
    pub params: [f32; 4],
}

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Combined view-projection matrix (column major)
    pub view_projection: [[f32; 4]; 4],
    /// Clear color (RGBA)
    pub background: [f32; 4],
    /// Mesh instances
    pub items: Vec<DrawItem>,
    /// Light sources
    pub lights: Vec<LightUniform>,
}

impl DrawList {
    /// Flatten the scene as seen from `camera`
    ///
    /// Meshes whose geometry or material has been released are skipped.
    pub fn build(graph: &SceneGraph, resources: &ResourceRegistry, camera: &Camera) -> Self {
        let mut items = Vec::new();
        let mut lights = Vec::new();

        for (key, node) in graph.iter() {
            let Some(world) = graph.world_matrix(key) else {
                continue;
            };

            match &node.kind {
                NodeKind::Group => {}
                NodeKind::Mesh {
                    geometry,
                    material,
                    flags,
                } => {
                    let (Some(shape), Some(material)) =
                        (resources.geometry(*geometry), resources.material(*material))
                    else {
                        log::trace!("Skipping '{}' with released resources", node.label);
                        continue;
                    };

                    let [r, g, b] = material.emissive.to_rgb();
                    let opacity = if material.transparent { material.opacity } else { 1.0 };
                    items.push(DrawItem {
                        model: world.into(),
                        color: material.color.to_rgba(opacity),
                        emissive: [r, g, b, material.emissive_intensity],
                        flags: flags.bits(),
                        shape: shape_code(shape),
                        _padding: [0; 2],
                    });
                }
                NodeKind::Light(light) => {
                    let origin = world.transform_point(&Point3::origin());
                    let (code, params) = match light.kind {
                        LightKind::Ambient => (light_code::AMBIENT, [0.0; 4]),
                        LightKind::Directional { shadow_map_size } => {
                            (light_code::DIRECTIONAL, [0.0, shadow_map_size as f32, 0.0, 0.0])
                        }
                        LightKind::Point { range } => (light_code::POINT, [range, 0.0, 0.0, 0.0]),
                    };
                    let [r, g, b] = light.color.to_rgb();
                    lights.push(LightUniform {
                        position: [origin.x, origin.y, origin.z, code],
                        color: [r, g, b, light.intensity],
                        params,
                    });
                }
            }
        }

        Self {
            view_projection: camera.view_projection_matrix().into(),
            background: graph.background().to_rgba(1.0),
            items,
            lights,
        }
    }

    /// View-projection matrix as a nalgebra matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        Mat4::from(self.view_projection)
    }

    /// Draw items as raw bytes
    pub fn item_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.items)
    }

    /// Lights as raw bytes
    pub fn light_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lights)
    }
}

fn shape_code(shape: &Shape) -> u32 {
    match shape {
        Shape::Box { .. } => 0,
        Shape::Sphere { .. } => 1,
        Shape::Cylinder { .. } => 2,
        Shape::Plane { .. } => 3,
    }
}
