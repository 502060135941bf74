//! Material system for rendering

use super::Color;

/// Lighting model used to shade a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingModel {
    /// Classic Blinn-Phong shading (room volumes, fixtures)
    Phong,
    /// Physically based metallic/roughness shading (bulbs)
    Standard,
}

/// Surface presentation of a mesh
///
/// Materials are the only attribute the engine mutates on rooms and bulbs:
/// highlight swaps `color`/`opacity`, the device bridge and the flicker pass
/// drive `color`, `emissive` and `emissive_intensity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Lighting model
    pub shading: ShadingModel,

    /// Base color
    pub color: Color,

    /// Emitted color
    pub emissive: Color,

    /// Emission multiplier (0.0 = no glow)
    pub emissive_intensity: f32,

    /// Alpha (0.0 = invisible, 1.0 = opaque); only honored when `transparent`
    pub opacity: f32,

    /// Whether the surface is alpha blended
    pub transparent: bool,

    /// Whether back faces are drawn
    pub double_sided: bool,
}

impl Material {
    /// Opaque Phong material with the given color
    pub fn phong(color: Color) -> Self {
        Self {
            shading: ShadingModel::Phong,
            color,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            opacity: 1.0,
            transparent: false,
            double_sided: false,
        }
    }

    /// Opaque physically based material with the given color
    pub fn standard(color: Color) -> Self {
        Self {
            shading: ShadingModel::Standard,
            ..Self::phong(color)
        }
    }

    /// Set emissive color and intensity
    pub fn with_emissive(mut self, emissive: Color, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity.max(0.0);
        self
    }

    /// Make the material alpha blended with the given opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = true;
        self
    }

    /// Draw both faces
    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    /// Whether the material currently emits light
    pub fn is_emissive(&self) -> bool {
        self.emissive_intensity > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let material = Material::standard(Color::from_hex(0xffff00))
            .with_emissive(Color::from_hex(0xffff00), 0.5)
            .with_opacity(1.5);

        assert_eq!(material.shading, ShadingModel::Standard);
        assert!(material.is_emissive());
        assert!(material.transparent);
        assert_eq!(material.opacity, 1.0);
    }

    #[test]
    fn test_negative_emission_is_clamped() {
        let material = Material::phong(Color::WHITE).with_emissive(Color::WHITE, -1.0);
        assert!(!material.is_emissive());
    }
}
