//! Deterministic sampling: seeded RNG and the Beckmann microfacet sampler.
//!
//! Every RNG here is seeded explicitly. Render workers derive one stream per
//! pixel from the global seed via `splitmix64`, so output is reproducible
//! bit-for-bit regardless of worker count.

use lume_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

/// Roughness below which glossy sampling collapses to an ideal mirror.
const MIRROR_ROUGHNESS: f32 = 0.01;

/// 64-bit hash (SplitMix64), used to diffuse seeds into per-pixel streams.
#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// A deterministic RNG with an explicit seed.
///
/// Wraps [`StdRng`] so sampling quality comes from the `rand` crate while
/// the seed stays an explicit input, never process-global state.
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    /// Create a generator from a 64-bit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform sample in [0, 1).
    #[inline]
    pub fn uniform(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Stratified sample: the base of stratum `sample` out of `total`,
    /// displaced by `jitter` (itself in [0, 1)), clamped below 1.0.
    #[inline]
    pub fn stratified(&self, sample: u32, total: u32, jitter: f32) -> f32 {
        let base = (sample as f32 + jitter) / total as f32;
        base.min(0.999_999)
    }
}

/// Tangent and bitangent perpendicular to `normal`.
///
/// The helper axis is world-up unless the normal is nearly parallel to it,
/// in which case +X avoids a degenerate cross product.
fn orthonormal_basis(normal: Vec3) -> (Vec3, Vec3) {
    let up = if normal.y.abs() < 0.999 {
        Vec3::Y
    } else {
        Vec3::X
    };
    let tangent = normal.cross(up).normalize();
    let bitangent = normal.cross(tangent);
    (tangent, bitangent)
}

/// Map a tangent-space direction (z along the normal) into world space.
#[inline]
fn tangent_to_world(dir: Vec3, normal: Vec3, tangent: Vec3, bitangent: Vec3) -> Vec3 {
    dir.x * tangent + dir.y * bitangent + dir.z * normal
}

/// Solve the Beckmann distribution for a tangent-space half-vector given two
/// uniform samples.
fn beckmann_direction(alpha: f32, u1: f32, u2: f32) -> Vec3 {
    // tan^2(theta) = -alpha^2 * ln(u1)
    let tan2_theta = -alpha * alpha * u1.max(1e-6).ln();
    let cos_theta = 1.0 / (1.0 + tan2_theta).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    let phi = 2.0 * PI * u2;
    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Sample a microfacet normal from the Beckmann distribution, in world space.
///
/// Roughness is squared into the slope parameter and clamped away from zero
/// to avoid the singularity at perfectly-smooth surfaces.
pub fn sample_beckmann_normal(normal: Vec3, roughness: f32, rng: &mut SeededRng) -> Vec3 {
    let alpha = (roughness * roughness).max(0.001);

    let u1 = rng.uniform();
    let u2 = rng.uniform();
    let micro = beckmann_direction(alpha, u1, u2);

    let (tangent, bitangent) = orthonormal_basis(normal);
    tangent_to_world(micro, normal, tangent, bitangent).normalize()
}

/// Sample `count` Beckmann microfacet normals with stratified, jittered
/// (u1, u2) pairs for lower-variance multi-sample integration.
pub fn sample_beckmann_normals_stratified(
    normal: Vec3,
    roughness: f32,
    count: u32,
    rng: &mut SeededRng,
) -> Vec<Vec3> {
    let alpha = (roughness * roughness).max(0.001);
    let (tangent, bitangent) = orthonormal_basis(normal);

    let mut samples = Vec::with_capacity(count as usize);
    for i in 0..count {
        let jitter1 = rng.uniform();
        let jitter2 = rng.uniform();
        let u1 = rng.stratified(i, count, jitter1);
        let u2 = rng.stratified(i, count, jitter2);

        let micro = beckmann_direction(alpha, u1, u2);
        samples.push(tangent_to_world(micro, normal, tangent, bitangent).normalize());
    }
    samples
}

/// True when roughness is close enough to zero that sampling would only add
/// noise; the caller should use the ideal mirror direction instead.
#[inline]
pub fn is_perfect_mirror(roughness: f32) -> bool {
    roughness < MIRROR_ROUGHNESS
}

/// Mirror `incident` about `normal`.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}
