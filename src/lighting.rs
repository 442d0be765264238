use glam::{Mat4, Vec4};

/// Point light with a homogeneous world-space position.
///
/// The world position is what the I/J/K/L/U/H controls edit; shaders only
/// ever see the view-space position derived once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub position_world: Vec4,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.4, 0.4, 0.4, 1.0),
            diffuse: Vec4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vec4::new(1.0, 1.0, 1.0, 1.0),
            position_world: Vec4::new(-5.0, 2.0, 2.0, 1.0),
        }
    }
}

impl Light {
    /// Transforms the world position into the space of `view`.
    ///
    /// Must be called with the frame's restored view matrix, never with the
    /// skybox's rotation-only basis.
    pub fn view_space_position(&self, view: Mat4) -> Vec4 {
        view * self.position_world
    }
}

/// Distance falloff coefficients, fixed at initialization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

/// Immutable surface material selected per draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
}

/// Matte green preset used by the lit scene and most techniques.
pub const MATERIAL_MATTE: Material = Material {
    ambient: Vec4::new(0.2, 0.4, 0.2, 1.0),
    diffuse: Vec4::new(0.5, 1.0, 0.5, 1.0),
    specular: Vec4::new(0.0, 0.1, 0.0, 1.0),
    shininess: 2.0,
};

/// Glossy blue preset used by the reflection and refraction techniques.
pub const MATERIAL_GLOSSY: Material = Material {
    ambient: Vec4::new(0.4, 0.4, 1.0, 1.0),
    diffuse: Vec4::new(0.8, 0.8, 1.0, 1.0),
    specular: Vec4::new(0.8, 0.8, 0.8, 1.0),
    shininess: 1.0,
};

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn identity_view_keeps_world_position() {
        let light = Light::default();
        assert_eq!(
            light.view_space_position(Mat4::IDENTITY),
            light.position_world
        );
    }

    #[test]
    fn view_translation_moves_the_light() {
        let light = Light::default();
        let view = Mat4::from_translation(Vec3::new(5.0, -2.0, -2.0));
        let transformed = light.view_space_position(view);
        assert!(transformed.abs_diff_eq(Vec4::new(0.0, 0.0, 0.0, 1.0), 1e-6));
    }

    #[test]
    fn homogeneous_w_stays_one_under_rigid_views() {
        let light = Light::default();
        let view = Mat4::look_at_rh(Vec3::new(-2.0, 1.0, 8.0), Vec3::new(-2.0, 1.0, 7.0), Vec3::Y);
        assert!((light.view_space_position(view).w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn presets_are_distinct() {
        assert_ne!(MATERIAL_MATTE, MATERIAL_GLOSSY);
        assert!(MATERIAL_GLOSSY.specular.x > MATERIAL_MATTE.specular.x);
    }
}
