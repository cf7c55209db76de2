use glam::{Mat4, Vec3};

use crate::engine::config::CameraConfig;
use crate::engine::graphics::primitives::EulerRotation;

/// Perspective camera (position + XYZ Euler rotation).
///
/// Contract:
/// - `aspect` only takes effect after `update_projection()`.
/// - Projection is right-handed, Vulkan depth (0..1), with Y flipped for Vulkan clip space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_radians: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub rotation: EulerRotation,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov_y_radians,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            rotation: EulerRotation::default(),
            projection: Mat4::IDENTITY,
        };
        cam.update_projection();
        cam
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut cam = Self::new(config.fov_y_degrees.to_radians(), aspect, config.near, config.far);
        cam.position = Vec3::from_array(config.position);
        cam.rotation.x = config.pitch;
        cam
    }

    /// Recompute the cached projection after changing fov/aspect/near/far.
    pub fn update_projection(&mut self) {
        self.projection = Self::perspective_rh_zo(self.fov_y_radians, self.aspect, self.near, self.far);
    }

    /// Right-handed, zero-to-one depth perspective with Vulkan's downward Y.
    pub fn perspective_rh_zo(fov_y_radians: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
        let mut proj = Mat4::perspective_rh(fov_y_radians, aspect, z_near, z_far);
        proj.y_axis.y = -proj.y_axis.y;
        proj
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Camera-to-world transform.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * self.rotation.to_mat4()
    }

    pub fn view(&self) -> Mat4 {
        self.world_matrix().inverse()
    }
}
