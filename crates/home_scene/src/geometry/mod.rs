//! Geometric primitives and ray intersection
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, bounding boxes and spheres
//! - [`shape`] - Model-space mesh shapes used for picking
//!
//! Shapes are stored in model space. A world-space ray is carried into a
//! mesh's model space with [`Ray::transformed`], which keeps the ray
//! parameter intact so the hit distance stays a world-space distance.

pub mod primitives;
pub mod shape;

pub use primitives::{Aabb, BoundingSphere, Ray};
pub use shape::Shape;
