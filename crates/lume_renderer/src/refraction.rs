//! Snell's-law refraction and Fresnel reflectance.
//!
//! Total internal reflection is a normal branch here, not an error: `refract`
//! returns `None` and the caller falls back to pure reflection.

use lume_math::Vec3;

/// Result of classifying a ray/surface encounter as entering or exiting
/// the medium.
#[derive(Clone, Copy, Debug)]
pub struct MediaTransition {
    /// IOR of the medium the ray travels through before the surface
    pub ior_from: f32,
    /// IOR of the medium past the surface
    pub ior_to: f32,
    /// Surface normal oriented against the incident direction
    pub normal: Vec3,
}

/// Compute the refracted direction through a surface.
///
/// `incident` and `normal` must be normalized, with `normal` facing the
/// incident ray (use [`determine_media_transition`] first). Returns `None`
/// on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, ior_from: f32, ior_to: f32) -> Option<Vec3> {
    let eta = ior_from / ior_to;
    let cos_i = -normal.dot(incident);
    let sin_t2 = eta * eta * (1.0 - cos_i * cos_i);

    // Transmission angle has no real solution past the critical angle.
    if sin_t2 > 1.0 {
        return None;
    }

    let cos_t = (1.0 - sin_t2).sqrt();
    let refracted = eta * incident + (eta * cos_i - cos_t) * normal;
    Some(refracted.normalize())
}

/// Fresnel reflectance via Schlick's approximation.
///
/// `cos_theta` is the cosine of the angle between the incident ray and the
/// normal; it is clamped to [0, 1].
pub fn fresnel_schlick(cos_theta: f32, ior_from: f32, ior_to: f32) -> f32 {
    let r0 = (ior_from - ior_to) / (ior_from + ior_to);
    let r0 = r0 * r0;

    let one_minus_cos = 1.0 - cos_theta.clamp(0.0, 1.0);
    let one_minus_cos2 = one_minus_cos * one_minus_cos;
    let one_minus_cos5 = one_minus_cos2 * one_minus_cos2 * one_minus_cos;

    r0 + (1.0 - r0) * one_minus_cos5
}

/// Exact Fresnel reflectance: the mean of the s- and p-polarized
/// coefficients. `cos_t` is the cosine of the transmitted angle.
pub fn fresnel_exact(cos_i: f32, cos_t: f32, ior_from: f32, ior_to: f32) -> f32 {
    let rs = (ior_from * cos_i - ior_to * cos_t) / (ior_from * cos_i + ior_to * cos_t);
    let rp = (ior_from * cos_t - ior_to * cos_i) / (ior_from * cos_t + ior_to * cos_i);

    0.5 * (rs * rs + rp * rp)
}

/// Classify the encounter: a positive dot between incident direction and
/// normal means the ray hit the back face and is exiting the medium, so the
/// IOR pair swaps and the normal flips.
pub fn determine_media_transition(incident: Vec3, normal: Vec3, material_ior: f32) -> MediaTransition {
    if incident.dot(normal) > 0.0 {
        // Exiting: material -> air, flip the normal to face the ray.
        MediaTransition {
            ior_from: material_ior,
            ior_to: 1.0,
            normal: -normal,
        }
    } else {
        // Entering: air -> material.
        MediaTransition {
            ior_from: 1.0,
            ior_to: material_ior,
            normal,
        }
    }
}
