//! # Perspective Camera
//!
//! Viewpoint for the house scene. Matrix math is computed on demand and is
//! independent of any render backend.
//!
//! ## Coordinate System
//! Right-handed, Y-up. NDC spans `[-1, 1]` on both axes with +Y up, and the
//! depth range of the projection is `[-1, 1]` (near to far).

use nalgebra::Perspective3;

use crate::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Point3, Vec3};
use crate::geometry::Ray;

/// 3D perspective camera
///
/// Holds position, look-at target and projection parameters. Aspect ratio is
/// driven by the host container size through [`Camera::set_aspect_ratio`].
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking along -Z from `position`
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: position - Vec3::z(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect: sanitize_aspect(aspect),
            near,
            far,
        }
    }

    /// Build a camera from configuration and an initial aspect ratio
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let position = Vec3::from(config.position);
        let mut camera = Self::perspective(position, config.fov_degrees, aspect, config.near, config.far);
        camera.target = Vec3::from(config.target);
        camera
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Configure camera to look at a specific point with custom up vector
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Update camera aspect ratio for viewport changes
    ///
    /// Only logs when the change is significant (> 0.01) to keep resize
    /// storms out of the log.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        let aspect = sanitize_aspect(aspect);
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Perspective3::new(self.aspect, self.fov, self.near, self.far).to_homogeneous()
    }

    /// Combined `P × V` matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point to normalized device coordinates
    pub fn world_to_ndc(&self, point: Vec3) -> Vec3 {
        self.view_projection_matrix()
            .transform_point(&Point3::from(point))
            .coords
    }

    /// Convert normalized device coordinates to a world-space ray
    ///
    /// The ray starts at the camera position and passes through the point
    /// under `(ndc_x, ndc_y)`. Returns `None` if the view-projection matrix
    /// is singular (degenerate camera parameters).
    pub fn screen_to_world_ray(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inverse = self.view_projection_matrix().try_inverse()?;

        let near = inverse.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc_x, ndc_y, 1.0));
        let direction = far - near;

        if direction.norm_squared() <= f32::EPSILON {
            return None;
        }

        Some(Ray::new(self.position, direction))
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        log::warn!("Ignoring invalid aspect ratio {aspect}, using 1.0");
        1.0
    }
}
