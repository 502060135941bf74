//! Rendering resource registry
//!
//! Geometries and materials are acquired through the registry and referenced
//! from scene nodes by slotmap key. Keys are generation checked, so releasing
//! a key twice is reported instead of freeing an unrelated resource.

use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

use super::Material;
use crate::geometry::Shape;

new_key_type! {
    /// Handle to an acquired geometry
    pub struct GeometryKey;

    /// Handle to an acquired material
    pub struct MaterialKey;
}

/// Resource registry errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceError {
    /// The key no longer refers to a live resource
    #[error("{0} was already released")]
    AlreadyReleased(ResourceKind),
}

/// Which table a resource lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Geometry table
    Geometry,
    /// Material table
    Material,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Geometry => write!(f, "geometry"),
            Self::Material => write!(f, "material"),
        }
    }
}

/// Acquisition and release counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    /// Geometries acquired since creation
    pub geometries_acquired: usize,
    /// Geometries released since creation
    pub geometries_released: usize,
    /// Materials acquired since creation
    pub materials_acquired: usize,
    /// Materials released since creation
    pub materials_released: usize,
}

/// Owner of every geometry and material used by the scene
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    geometries: SlotMap<GeometryKey, Shape>,
    materials: SlotMap<MaterialKey, Material>,
    stats: ResourceStats,
}

impl ResourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a geometry
    pub fn acquire_geometry(&mut self, shape: Shape) -> GeometryKey {
        self.stats.geometries_acquired += 1;
        let key = self.geometries.insert(shape);
        log::trace!("Acquired {} geometry {:?}", shape.name(), key);
        key
    }

    /// Acquire a material
    pub fn acquire_material(&mut self, material: Material) -> MaterialKey {
        self.stats.materials_acquired += 1;
        self.materials.insert(material)
    }

    /// Geometry behind a key
    pub fn geometry(&self, key: GeometryKey) -> Option<&Shape> {
        self.geometries.get(key)
    }

    /// Material behind a key
    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    /// Mutable material behind a key
    pub fn material_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.materials.get_mut(key)
    }

    /// Release a geometry
    pub fn release_geometry(&mut self, key: GeometryKey) -> Result<Shape, ResourceError> {
        let shape = self
            .geometries
            .remove(key)
            .ok_or(ResourceError::AlreadyReleased(ResourceKind::Geometry))?;
        self.stats.geometries_released += 1;
        Ok(shape)
    }

    /// Release a material
    pub fn release_material(&mut self, key: MaterialKey) -> Result<Material, ResourceError> {
        let material = self
            .materials
            .remove(key)
            .ok_or(ResourceError::AlreadyReleased(ResourceKind::Material))?;
        self.stats.materials_released += 1;
        Ok(material)
    }

    /// Release whatever is still live, returning how many resources that was
    pub fn release_all(&mut self) -> usize {
        let leaked = self.geometries.len() + self.materials.len();
        self.stats.geometries_released += self.geometries.len();
        self.stats.materials_released += self.materials.len();
        self.geometries.clear();
        self.materials.clear();
        leaked
    }

    /// Number of live geometries
    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    /// Number of live materials
    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    /// Acquisition and release counters
    pub fn stats(&self) -> ResourceStats {
        self.stats
    }
}
