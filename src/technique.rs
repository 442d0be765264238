use serde::{Deserialize, Serialize};

use crate::lighting::{Material, MATERIAL_GLOSSY, MATERIAL_MATTE};

/// Selectable shading technique, each bound to its own pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShadingTechnique {
    Gouraud,
    Phong,
    Refraction,
    Reflection,
    Toon,
}

impl Default for ShadingTechnique {
    fn default() -> Self {
        Self::Gouraud
    }
}

impl ShadingTechnique {
    pub const ALL: [Self; 5] = [
        Self::Gouraud,
        Self::Phong,
        Self::Refraction,
        Self::Reflection,
        Self::Toon,
    ];

    /// Maps the digit keys 1-5 onto techniques.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::Gouraud),
            2 => Some(Self::Phong),
            3 => Some(Self::Refraction),
            4 => Some(Self::Reflection),
            5 => Some(Self::Toon),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Gouraud => "gouraud",
            Self::Phong => "phong",
            Self::Refraction => "refraction",
            Self::Reflection => "reflection",
            Self::Toon => "toon",
        }
    }

    /// Whether the technique's draw binds the reflective surface texture.
    pub fn binds_surface_texture(self) -> bool {
        matches!(self, Self::Refraction | Self::Reflection)
    }

    /// Whether the technique's program takes an explicit model matrix for
    /// world-space view-vector computation.
    pub fn needs_model_matrix(self) -> bool {
        matches!(self, Self::Refraction | Self::Reflection)
    }

    /// Whether the technique's program receives attenuation coefficients.
    /// Gouraud and Phong do not; the mismatch mirrors the behavior this
    /// viewer reproduces and is called out in DESIGN.md.
    pub fn uses_attenuation(self) -> bool {
        matches!(self, Self::Refraction | Self::Reflection | Self::Toon)
    }

    /// Material preset applied to the technique's draw call.
    pub fn material(self) -> Material {
        if self.binds_surface_texture() {
            MATERIAL_GLOSSY
        } else {
            MATERIAL_MATTE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_in_order() {
        assert_eq!(ShadingTechnique::from_digit(1), Some(ShadingTechnique::Gouraud));
        assert_eq!(ShadingTechnique::from_digit(2), Some(ShadingTechnique::Phong));
        assert_eq!(
            ShadingTechnique::from_digit(3),
            Some(ShadingTechnique::Refraction)
        );
        assert_eq!(
            ShadingTechnique::from_digit(4),
            Some(ShadingTechnique::Reflection)
        );
        assert_eq!(ShadingTechnique::from_digit(5), Some(ShadingTechnique::Toon));
        assert_eq!(ShadingTechnique::from_digit(0), None);
        assert_eq!(ShadingTechnique::from_digit(6), None);
    }

    #[test]
    fn texture_driven_techniques_take_a_model_matrix() {
        for technique in ShadingTechnique::ALL {
            assert_eq!(
                technique.binds_surface_texture(),
                technique.needs_model_matrix()
            );
        }
    }

    #[test]
    fn gouraud_and_phong_skip_attenuation() {
        assert!(!ShadingTechnique::Gouraud.uses_attenuation());
        assert!(!ShadingTechnique::Phong.uses_attenuation());
        assert!(ShadingTechnique::Toon.uses_attenuation());
    }

    #[test]
    fn surface_techniques_use_the_glossy_preset() {
        assert_eq!(
            ShadingTechnique::Reflection.material(),
            crate::lighting::MATERIAL_GLOSSY
        );
        assert_eq!(
            ShadingTechnique::Toon.material(),
            crate::lighting::MATERIAL_MATTE
        );
    }
}
