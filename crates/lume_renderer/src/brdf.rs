//! Cook-Torrance microfacet BRDF: Beckmann distribution, Cook-Torrance
//! geometry term, Schlick Fresnel.

use lume_core::Material;
use lume_math::Vec3;
use std::f32::consts::PI;

/// Beckmann normal distribution function.
/// `alpha` is the surface slope parameter (roughness squared).
fn d_beckmann(n_dot_h: f32, alpha: f32) -> f32 {
    let n_dot_h = n_dot_h.clamp(0.0, 1.0);
    let cos2 = n_dot_h * n_dot_h;
    if cos2 <= 0.0 {
        return 0.0;
    }
    let tan2 = (1.0 - cos2) / cos2;
    let a2 = alpha * alpha;
    let denom = PI * a2 * cos2 * cos2;
    if denom <= 0.0 {
        return 0.0;
    }
    (-tan2 / a2).exp() / denom
}

/// Cook-Torrance geometric attenuation (min form).
fn g_cook_torrance(n_dot_l: f32, n_dot_v: f32, n_dot_h: f32, v_dot_h: f32) -> f32 {
    if v_dot_h <= 0.0 {
        return 0.0;
    }
    let g1 = (2.0 * n_dot_h * n_dot_v) / v_dot_h;
    let g2 = (2.0 * n_dot_h * n_dot_l) / v_dot_h;
    g1.min(g2).min(1.0)
}

/// Schlick Fresnel with a colored F0.
fn fresnel_schlick_f0(cos_theta: f32, f0: Vec3) -> Vec3 {
    let c = cos_theta.clamp(0.0, 1.0);
    f0 + (Vec3::ONE - f0) * (1.0 - c).powi(5)
}

/// Diffuse and specular BRDF lobes, kept separate so callers can report
/// or weight them independently.
#[derive(Clone, Copy, Debug)]
pub struct BrdfEval {
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl BrdfEval {
    pub const ZERO: BrdfEval = BrdfEval {
        diffuse: Vec3::ZERO,
        specular: Vec3::ZERO,
    };

    pub fn total(&self) -> Vec3 {
        self.diffuse + self.specular
    }
}

/// Cook-Torrance BRDF value for the given geometry.
///
/// Inputs are world-space unit vectors. Returns the diffuse and specular
/// BRDF lobes; the caller applies N.L and the light radiance. Metals take
/// the base color as F0 and lose their diffuse lobe; the diffuse term is
/// scaled down by the average Fresnel for energy conservation.
pub fn cook_torrance(n: Vec3, v: Vec3, l: Vec3, material: &Material) -> BrdfEval {
    let h = (v + l).normalize_or_zero();

    let n_dot_l = n.dot(l).max(0.0);
    let n_dot_v = n.dot(v).max(0.0);
    if n_dot_l <= 0.0 || n_dot_v <= 0.0 {
        return BrdfEval::ZERO;
    }

    let n_dot_h = n.dot(h).max(0.0);
    let v_dot_h = v.dot(h).max(0.0);

    // Artist roughness maps to alpha = roughness^2, clamped away from zero.
    let r = material.roughness.max(0.001);
    let alpha = r * r;

    let metallic = material.metallic.clamp(0.0, 1.0);
    let base_color = material.base_color();
    let f0 = material.f0();

    let d = d_beckmann(n_dot_h, alpha);
    let g = g_cook_torrance(n_dot_l, n_dot_v, n_dot_h, v_dot_h);
    let f = fresnel_schlick_f0(v_dot_h, f0);

    let denom = (4.0 * n_dot_l * n_dot_v).max(1e-6);
    let specular = (d * g / denom) * f;

    let f_avg = (f.x + f.y + f.z) / 3.0;
    let kd = (1.0 - metallic) * (1.0 - f_avg);
    let diffuse = kd * base_color / PI;

    BrdfEval { diffuse, specular }
}
