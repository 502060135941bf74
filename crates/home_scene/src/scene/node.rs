//! Scene node types

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::foundation::math::Transform;
use crate::render::{Color, GeometryKey, MaterialKey};

new_key_type! {
    /// Handle to a node in the scene graph
    pub struct NodeKey;
}

bitflags! {
    /// Per-mesh render state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RenderFlags: u32 {
        /// Mesh is drawn into shadow maps
        const CAST_SHADOW = 1 << 0;
        /// Mesh receives shadows
        const RECEIVE_SHADOW = 1 << 1;
        /// Back faces are drawn
        const DOUBLE_SIDED = 1 << 2;
        /// Mesh is alpha blended
        const TRANSPARENT = 1 << 3;
    }
}

/// Light source variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform fill light
    Ambient,
    /// Infinitely distant light shining from the node position toward the origin
    Directional {
        /// Square shadow map resolution
        shadow_map_size: u32,
    },
    /// Omnidirectional light with finite range
    Point {
        /// Falloff distance
        range: f32,
    },
}

/// Light source attached to a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightData {
    /// Light variant
    pub kind: LightKind,
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
}

/// What a node carries
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Pure transform node grouping its children
    Group,
    /// Drawable, intersectable mesh
    Mesh {
        /// Shape in model space
        geometry: GeometryKey,
        /// Surface presentation
        material: MaterialKey,
        /// Render state
        flags: RenderFlags,
    },
    /// Light source (never intersectable)
    Light(LightData),
}

/// A node in the scene hierarchy
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Debug label ("room", "bulb", "fan-blade", ...)
    pub label: &'static str,
    /// Transform relative to the parent
    pub transform: Transform,
    /// Node payload
    pub kind: NodeKind,
    /// Spin flag read by the animation loop (fan groups only)
    pub spinning: bool,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl SceneNode {
    /// Create a detached node
    pub fn new(label: &'static str, kind: NodeKind, transform: Transform) -> Self {
        Self {
            label,
            transform,
            kind,
            spinning: false,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Group node at the given transform
    pub fn group(label: &'static str, transform: Transform) -> Self {
        Self::new(label, NodeKind::Group, transform)
    }

    /// Mesh node at the given transform
    pub fn mesh(
        label: &'static str,
        geometry: GeometryKey,
        material: MaterialKey,
        flags: RenderFlags,
        transform: Transform,
    ) -> Self {
        Self::new(label, NodeKind::Mesh { geometry, material, flags }, transform)
    }

    /// Light node at the given transform
    pub fn light(label: &'static str, light: LightData, transform: Transform) -> Self {
        Self::new(label, NodeKind::Light(light), transform)
    }

    /// Parent node, if any
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child nodes in insertion order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Material key for mesh nodes
    pub fn material(&self) -> Option<MaterialKey> {
        match self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Whether this node can be hit by a ray
    pub fn is_intersectable(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. })
    }

    /// Whether this node is a point light
    pub fn is_point_light(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Light(LightData {
                kind: LightKind::Point { .. },
                ..
            })
        )
    }
}
