//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph, camera and
//! picking code. Everything is `f32` and right-handed, Y-up.

pub use nalgebra::{Matrix4, Rotation3, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Local transform of a scene node: position, Euler rotation and scale
///
/// Rotation is stored as Euler angles in radians applied in X, Y, Z order.
/// Animated attributes (fan blade spin) accumulate directly on these angles,
/// so they are left unbounded and only wrapped when compared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position relative to the parent node
    pub position: Vec3,

    /// Euler rotation in radians (X, Y, Z order)
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the Euler rotation (builder style)
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Rotation part of the transform as a rotation matrix
    pub fn rotation_matrix(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.rotation.x)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.rotation.y)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.rotation.z)
    }

    /// Convert to a local transformation matrix (T * R * S)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation_matrix().to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Scalar helpers
pub mod utils {
    use std::f32::consts::TAU;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Wrap an angle into `[0, 2π)`
    pub fn wrap_angle(angle: f32) -> f32 {
        angle.rem_euclid(TAU)
    }

    /// Whether every component is finite and strictly positive
    pub fn all_positive(values: &[f32]) -> bool {
        values.iter().all(|v| v.is_finite() && *v > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_matrix() {
        assert_relative_eq!(Transform::identity().to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_translation_then_rotation() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0));
        let point = transform
            .to_matrix()
            .transform_point(&Point3::new(0.0, 1.0, 0.0));

        // +Y rotated a quarter turn about X lands on +Z
        assert_relative_eq!(point, Point3::new(1.0, 2.0, 4.0), epsilon = 1e-5);
    }

    #[test]
    fn test_wrap_angle() {
        assert_relative_eq!(utils::wrap_angle(std::f32::consts::TAU + 0.5), 0.5, epsilon = 1e-5);
        assert_relative_eq!(utils::wrap_angle(-0.5), std::f32::consts::TAU - 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_all_positive() {
        assert!(utils::all_positive(&[1.0, 0.5, 3.0]));
        assert!(!utils::all_positive(&[1.0, 0.0, 3.0]));
        assert!(!utils::all_positive(&[1.0, f32::NAN]));
    }
}
