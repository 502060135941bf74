//! Model-space shapes
//!
//! Every shape is centered on its local origin:
//!
//! - `Box` spans `±width/2`, `±height/2`, `±depth/2`
//! - `Sphere` has its center at the origin
//! - `Cylinder` has its axis along Y, caps at `±height/2`
//! - `Plane` lies in the XY plane facing +Z, spanning `±width/2`, `±height/2`

use super::primitives::{smallest_non_negative_root, Aabb, BoundingSphere, Ray};
use crate::foundation::math::{utils, Vec3};

const PARALLEL_EPSILON: f32 = 1e-8;

/// Geometry of a mesh in model space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box
    Box {
        /// Extent along X
        width: f32,
        /// Extent along Y
        height: f32,
        /// Extent along Z
        depth: f32,
    },
    /// Sphere
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Capped cylinder along Y
    Cylinder {
        /// Radius of both caps
        radius: f32,
        /// Extent along Y
        height: f32,
    },
    /// Single-sided rectangle in XY (picked from both sides)
    Plane {
        /// Extent along X
        width: f32,
        /// Extent along Y
        height: f32,
    },
}

impl Shape {
    /// Whether every dimension is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Box { width, height, depth } => utils::all_positive(&[width, height, depth]),
            Self::Sphere { radius } => utils::all_positive(&[radius]),
            Self::Cylinder { radius, height } => utils::all_positive(&[radius, height]),
            Self::Plane { width, height } => utils::all_positive(&[width, height]),
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::Cylinder { .. } => "cylinder",
            Self::Plane { .. } => "plane",
        }
    }

    /// Intersect a model-space ray with the shape
    ///
    /// The ray direction need not be normalized; the returned value is the
    /// ray parameter of the nearest hit in front of the origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        match *self {
            Self::Box { width, height, depth } => {
                Aabb::centered(Vec3::new(width, height, depth)).intersect_ray(ray)
            }
            Self::Sphere { radius } => BoundingSphere::new(Vec3::zeros(), radius).intersect_ray(ray),
            Self::Cylinder { radius, height } => intersect_cylinder(ray, radius, height),
            Self::Plane { width, height } => intersect_plane(ray, width, height),
        }
    }
}

fn intersect_plane(ray: &Ray, width: f32, height: f32) -> Option<f32> {
    if ray.direction.z.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = -ray.origin.z / ray.direction.z;
    if t < 0.0 {
        return None;
    }

    let point = ray.point_at(t);
    let inside = point.x.abs() <= width * 0.5 && point.y.abs() <= height * 0.5;
    inside.then_some(t)
}

fn intersect_cylinder(ray: &Ray, radius: f32, height: f32) -> Option<f32> {
    let half = height * 0.5;
    let (o, d) = (ray.origin, ray.direction);

    // Side: x² + z² = r², restricted to |y| <= h/2
    let side = smallest_non_negative_root(
        d.x * d.x + d.z * d.z,
        2.0 * (o.x * d.x + o.z * d.z),
        o.x * o.x + o.z * o.z - radius * radius,
    )
    .filter(|t| ray.point_at(*t).y.abs() <= half);

    // A ray starting inside the side wall can still leave through it further out
    let side = side.or_else(|| far_side_hit(ray, radius, half));

    let caps = if d.y.abs() < PARALLEL_EPSILON {
        None
    } else {
        [half, -half]
            .into_iter()
            .map(|cap_y| (cap_y - o.y) / d.y)
            .filter(|t| *t >= 0.0)
            .filter(|t| {
                let p = ray.point_at(*t);
                p.x * p.x + p.z * p.z <= radius * radius
            })
            .min_by(f32::total_cmp)
    };

    match (side, caps) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn far_side_hit(ray: &Ray, radius: f32, half: f32) -> Option<f32> {
    let (o, d) = (ray.origin, ray.direction);
    let a = d.x * d.x + d.z * d.z;
    if a < PARALLEL_EPSILON {
        return None;
    }
    let b = 2.0 * (o.x * d.x + o.z * d.z);
    let c = o.x * o.x + o.z * o.z - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let t = (-b + discriminant.sqrt()) / (2.0 * a);
    (t >= 0.0 && ray.point_at(t).y.abs() <= half).then_some(t)
}
