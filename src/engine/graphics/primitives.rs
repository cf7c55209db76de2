//! Small render-facing value types shared by the scene and the renderer.

use glam::Mat4;

use crate::engine::config::{StyleConfig, rgb_from_hex};

/// Euler angles applied in X, then Y, then Z order (matrix = Rx * Ry * Rz).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerRotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerRotation {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_x(self.x) * Mat4::from_rotation_y(self.y) * Mat4::from_rotation_z(self.z)
    }
}

/// Flat wireframe material. Nothing here is lit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireMaterial {
    pub color: [f32; 3],
    pub opacity: f32,
    pub transparent: bool,
}

impl WireMaterial {
    pub fn from_style(style: &StyleConfig) -> Self {
        Self {
            color: rgb_from_hex(style.line_color),
            opacity: style.opacity,
            transparent: style.opacity < 1.0,
        }
    }

    /// RGBA as handed to the fragment shader.
    pub fn rgba(&self) -> [f32; 4] {
        let a = if self.transparent { self.opacity } else { 1.0 };
        [self.color[0], self.color[1], self.color[2], a]
    }
}

/// Exponential-squared distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub density: f32,
}

impl Fog {
    pub fn from_style(style: &StyleConfig) -> Self {
        Self {
            color: rgb_from_hex(style.fog_color),
            density: style.fog_density,
        }
    }

    /// Blend weight towards the fog colour at a given view-space depth.
    ///
    /// Mirrors the fragment shader: `1 - exp(-(density * depth)^2)`, clamped to [0, 1].
    pub fn factor(&self, depth: f32) -> f32 {
        let d = self.density * depth;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn euler_order_is_x_then_y_then_z() {
        let r = EulerRotation::new(0.3, -0.7, 1.1);
        let expected = Mat4::from_rotation_x(0.3) * Mat4::from_rotation_y(-0.7) * Mat4::from_rotation_z(1.1);
        assert!(r.to_mat4().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn laying_the_plane_flat_maps_local_z_to_world_y() {
        let flat = EulerRotation::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        let up = flat.to_mat4().transform_vector3(Vec3::Z);
        assert!(up.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn fog_factor_grows_with_depth() {
        let fog = Fog::from_style(&StyleConfig::default());
        assert_eq!(fog.factor(0.0), 0.0);
        assert!(fog.factor(100.0) < fog.factor(500.0));
        assert!(fog.factor(1.0e6) <= 1.0);

        let d: f32 = 0.002 * 300.0;
        assert!((fog.factor(300.0) - (1.0 - (-d * d).exp())).abs() < 1e-6);
    }

    #[test]
    fn default_material_is_translucent_green() {
        let m = WireMaterial::from_style(&StyleConfig::default());
        assert!(m.transparent);
        assert_eq!(m.rgba()[3], 0.3);
        assert!(m.color[1] > m.color[0] && m.color[1] > m.color[2]);
    }
}
