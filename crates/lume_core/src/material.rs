//! PBR material definition shared by the raster and ray-traced paths.

use lume_math::Vec3;
use serde::{Deserialize, Serialize};

/// Reflectance at normal incidence for dielectrics (~4%).
const DIELECTRIC_F0: f32 = 0.04;

/// A PBR material snapshot.
///
/// Values are plain parameters in linear space; texture lookup and asset
/// management happen upstream. The tracer copies one of these per loaded
/// model into its shared material table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Albedo / base color (RGB, 0-1)
    pub base_color: Vec3,

    /// Roughness factor (0=smooth, 1=rough)
    pub roughness: f32,

    /// Metallic factor (0=dielectric, 1=metal)
    pub metallic: f32,

    /// Index of refraction (1.0 = air, 1.5 = glass)
    pub ior: f32,

    /// Transmission factor (0 = opaque, 1 = fully transparent)
    pub transmission: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec3::new(0.5, 0.5, 0.5),
            roughness: 0.5,
            metallic: 0.0,
            ior: 1.5,
            transmission: 0.0,
        }
    }
}

impl Material {
    /// Create an opaque material with the given base color.
    pub fn new(base_color: Vec3) -> Self {
        Self {
            base_color,
            ..Default::default()
        }
    }

    /// A smooth glass-like material.
    pub fn glass(ior: f32, transmission: f32) -> Self {
        Self {
            base_color: Vec3::ONE,
            roughness: 0.0,
            metallic: 0.0,
            ior,
            transmission,
        }
    }

    /// Base color with a minimum brightness floor so degenerate
    /// (near-black) assets stay visible under direct light.
    pub fn base_color(&self) -> Vec3 {
        if self.base_color.length() < 0.1 {
            Vec3::splat(0.5)
        } else {
            self.base_color
        }
    }

    /// Fresnel reflectance at normal incidence. Metals take the base color
    /// as F0; dielectrics sit at ~0.04.
    pub fn f0(&self) -> Vec3 {
        Vec3::splat(DIELECTRIC_F0).lerp(self.base_color(), self.metallic.clamp(0.0, 1.0))
    }

    /// True when the material transmits light and refraction applies.
    pub fn is_transmissive(&self) -> bool {
        self.transmission > 0.0
    }

    /// Index of refraction clamped to physically-valid range. Upstream is
    /// supposed to validate, but the tracer must not divide by ior < 1.
    pub fn ior_clamped(&self) -> f32 {
        self.ior.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_opaque_dielectric() {
        let m = Material::default();
        assert_eq!(m.metallic, 0.0);
        assert!(!m.is_transmissive());
        assert_eq!(m.ior, 1.5);
    }

    #[test]
    fn test_f0_dielectric_vs_metal() {
        let dielectric = Material::new(Vec3::new(0.8, 0.2, 0.2));
        assert!((dielectric.f0().x - DIELECTRIC_F0).abs() < 1e-6);

        let metal = Material {
            metallic: 1.0,
            ..Material::new(Vec3::new(0.8, 0.2, 0.2))
        };
        assert_eq!(metal.f0(), Vec3::new(0.8, 0.2, 0.2));
    }

    #[test]
    fn test_base_color_floor() {
        let dark = Material::new(Vec3::splat(0.01));
        assert_eq!(dark.base_color(), Vec3::splat(0.5));

        let lit = Material::new(Vec3::new(0.2, 0.4, 0.6));
        assert_eq!(lit.base_color(), Vec3::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_ior_clamped() {
        let bad = Material {
            ior: 0.5,
            ..Default::default()
        };
        assert_eq!(bad.ior_clamped(), 1.0);
    }
}
