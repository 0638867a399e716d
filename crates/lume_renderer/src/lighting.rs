//! Direct-lighting integrator: per-light sampling, material response,
//! ambient term, and shadow testing.

use crate::brdf;
use crate::raytracer::Raytracer;
use lume_core::{Light, LightKind, LightList, Material};
use lume_math::{Ray, Vec3, Vec4};

/// Offset applied to shadow-ray origins to avoid self-shadowing.
const SHADOW_EPSILON: f32 = 1e-3;

/// Result of sampling one light for a surface point.
#[derive(Clone, Copy, Debug)]
pub struct LightSample {
    /// Direction from hit point to light (unit)
    pub direction: Vec3,
    /// Light color * intensity * attenuation
    pub color: Vec3,
    /// Distance to light (infinite for directional)
    pub distance: f32,
    /// Whether this light contributes at all
    pub valid: bool,
}

impl LightSample {
    fn invalid() -> Self {
        Self {
            direction: Vec3::ZERO,
            color: Vec3::ZERO,
            distance: f32::INFINITY,
            valid: false,
        }
    }
}

/// Material response to a single light.
#[derive(Clone, Copy, Debug)]
pub struct MaterialEval {
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Combined diffuse + specular
    pub color: Vec3,
}

/// Inverse-quadratic distance falloff for point and spot lights.
#[inline]
fn attenuation(distance: f32) -> f32 {
    1.0 / (1.0 + 0.1 * distance + 0.01 * distance * distance)
}

/// Sample a light for the surface point `hit_point` with normal `normal`.
///
/// Directional lights are infinitely far; spot lights attenuate to zero
/// outside their outer cone with a squared falloff between the cones.
/// The sample is invalid when the light is disabled or below the horizon.
pub fn sample_light(light: &Light, hit_point: Vec3, normal: Vec3) -> LightSample {
    if !light.enabled {
        return LightSample::invalid();
    }

    match light.kind {
        LightKind::Directional => {
            let direction = -light.direction.normalize();
            LightSample {
                direction,
                color: light.color * light.intensity,
                distance: f32::INFINITY,
                valid: direction.dot(normal) > 0.0,
            }
        }
        LightKind::Point => {
            let light_vec = light.position - hit_point;
            let distance = light_vec.length();
            if distance <= 1e-6 {
                return LightSample::invalid();
            }
            let direction = light_vec / distance;
            LightSample {
                direction,
                color: light.color * light.intensity * attenuation(distance),
                distance,
                valid: direction.dot(normal) > 0.0,
            }
        }
        LightKind::Spot => {
            let light_vec = light.position - hit_point;
            let distance = light_vec.length();
            if distance <= 1e-6 {
                return LightSample::invalid();
            }
            let direction = light_vec / distance;

            let cos_theta = (-direction).dot(light.direction.normalize());
            let inner = light.inner_cone_deg.to_radians().cos();
            let outer = light.outer_cone_deg.to_radians().cos();
            if cos_theta <= outer {
                return LightSample::invalid();
            }

            let mut atten = attenuation(distance);
            if cos_theta < inner {
                // Smooth falloff between inner and outer cone.
                let falloff = (cos_theta - outer) / (inner - outer);
                atten *= falloff * falloff;
            }

            LightSample {
                direction,
                color: light.color * light.intensity * atten,
                distance,
                valid: direction.dot(normal) > 0.0,
            }
        }
    }
}

/// Evaluate the material's response to incoming light.
///
/// Lambertian diffuse (metals have none) plus a Cook-Torrance specular lobe,
/// both scaled by the light color and the cosine term.
pub fn evaluate_material(
    material: &Material,
    normal: Vec3,
    view_dir: Vec3,
    light_dir: Vec3,
    light_color: Vec3,
) -> MaterialEval {
    let n_dot_l = normal.dot(light_dir).max(0.0);
    let radiance = light_color * n_dot_l;

    let eval = brdf::cook_torrance(normal, view_dir, light_dir, material);
    let diffuse = eval.diffuse * radiance;
    let specular = eval.specular * radiance;

    MaterialEval {
        diffuse,
        specular,
        color: diffuse + specular,
    }
}

/// Ambient contribution: metals reflect their F0, dielectrics their albedo,
/// scaled by the global ambient color and intensity. Kept subtle.
pub fn compute_ambient(material: &Material, global_ambient: Vec4) -> Vec3 {
    let base = material
        .base_color()
        .lerp(material.f0(), material.metallic.clamp(0.0, 1.0));
    let ambient_light = global_ambient.truncate() * global_ambient.w;
    base * ambient_light * 0.1
}

/// Occlusion test toward a light.
///
/// Casts an any-hit shadow ray from just off the surface, truncated at the
/// light distance so geometry beyond a finite light never casts a shadow.
pub fn is_in_shadow(scene: &Raytracer, hit_point: Vec3, light_dir: Vec3, light_distance: f32) -> bool {
    let shadow_ray = Ray::new(hit_point + light_dir * SHADOW_EPSILON, light_dir);
    scene.occluded(&shadow_ray, light_distance)
}

/// Full direct-lighting result for a surface point: ambient plus the sum of
/// every enabled, unshadowed light's material response.
pub fn compute_lighting(
    scene: &Raytracer,
    hit_point: Vec3,
    normal: Vec3,
    view_dir: Vec3,
    material: &Material,
    lights: &LightList,
) -> Vec3 {
    let mut color = compute_ambient(material, lights.global_ambient);

    for light in lights.iter() {
        let sample = sample_light(light, hit_point, normal);
        if !sample.valid {
            continue;
        }
        if is_in_shadow(scene, hit_point, sample.direction, sample.distance) {
            continue;
        }
        color += evaluate_material(material, normal, view_dir, sample.direction, sample.color).color;
    }

    color
}
