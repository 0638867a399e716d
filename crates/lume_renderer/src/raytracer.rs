//! Scene container and recursive shading, expressed as an explicit work list.

use crate::bvh::Bvh;
use crate::lighting;
use crate::refraction::{determine_media_transition, fresnel_schlick, refract};
use crate::sampling::{self, SeededRng};
use crate::triangle::{Triangle, EPSILON};
use lume_core::{LightList, Material, Mesh, MeshError};
use lume_math::{Interval, Mat4, Mat4Ext, Ray, Vec3};
use std::sync::atomic::{AtomicU64, Ordering};

/// Offset applied to secondary-ray origins to escape the surface.
const RAY_OFFSET: f32 = 1e-3;

/// Paths whose accumulated weight drops below this contribute nothing visible.
const MIN_WEIGHT: f32 = 1e-3;

/// A resolved intersection, with the triangle and its material looked up.
#[derive(Clone, Copy, Debug)]
pub struct HitRecord<'a> {
    pub t: f32,
    pub point: Vec3,
    /// Geometric normal, as stored on the triangle (not flipped toward the ray).
    pub normal: Vec3,
    pub triangle: &'a Triangle,
    pub material: &'a Material,
}

/// One pending shading task on the trace work list.
#[derive(Clone, Copy)]
struct TraceTask {
    ray: Ray,
    /// Remaining bounces. Zero means shade locally and stop.
    depth: u32,
    /// Throughput of this path, applied to everything it contributes.
    weight: Vec3,
}

/// CPU ray tracer over a triangle soup with a shared material table.
///
/// Triangles reference materials by index, so meshes sharing a material
/// do not duplicate it. All queries go through the BVH.
pub struct Raytracer {
    triangles: Vec<Triangle>,
    materials: Vec<Material>,
    bvh: Bvh,
    /// Color returned for rays that escape the scene.
    pub background: Vec3,
    /// Beckmann samples per glossy reflection bounce.
    pub reflection_samples: u32,
    closest_hit_queries: AtomicU64,
}

impl Default for Raytracer {
    fn default() -> Self {
        Self::new()
    }
}

impl Raytracer {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
            materials: Vec::new(),
            bvh: Bvh::build(&[]),
            background: Vec3::splat(0.05),
            reflection_samples: 8,
            closest_hit_queries: AtomicU64::new(0),
        }
    }

    /// Bake a mesh into the triangle list under `transform` and rebuild the BVH.
    ///
    /// The mesh is validated first; a mesh with out-of-range indices or a
    /// dangling partial triangle is rejected without touching the scene.
    pub fn load_model(
        &mut self,
        mesh: &Mesh,
        transform: Mat4,
        reflectivity: f32,
        material: &Material,
    ) -> Result<(), MeshError> {
        mesh.validate()?;

        let material_index = self.materials.len() as u32;
        self.materials.push(*material);

        for tri in mesh.indices.chunks_exact(3) {
            let v0 = transform.transform_point3(mesh.positions[tri[0] as usize]);
            let v1 = transform.transform_point3(mesh.positions[tri[1] as usize]);
            let v2 = transform.transform_point3(mesh.positions[tri[2] as usize]);
            self.triangles
                .push(Triangle::new(v0, v1, v2, reflectivity, material_index));
        }

        let world_bounds = transform.transform_aabb(&mesh.bounds);
        log::info!(
            "loaded model: {} triangles, world bounds x{:?} y{:?} z{:?}",
            mesh.triangle_count(),
            (world_bounds.x.min, world_bounds.x.max),
            (world_bounds.y.min, world_bounds.y.max),
            (world_bounds.z.min, world_bounds.z.max),
        );

        self.bvh = Bvh::build(&self.triangles);
        Ok(())
    }

    /// Remove all geometry and materials.
    pub fn clear(&mut self) {
        self.triangles.clear();
        self.materials.clear();
        self.bvh = Bvh::build(&[]);
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of closest-hit queries issued so far. Shadow rays are not counted.
    pub fn query_count(&self) -> u64 {
        self.closest_hit_queries.load(Ordering::Relaxed)
    }

    /// Nearest intersection along `ray` within `ray_t`.
    pub fn closest_hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.closest_hit_queries.fetch_add(1, Ordering::Relaxed);
        let hit = self.bvh.closest_hit(&self.triangles, ray, ray_t)?;
        let triangle = &self.triangles[hit.index as usize];
        Some(HitRecord {
            t: hit.t,
            point: ray.at(hit.t),
            normal: hit.normal,
            triangle,
            material: &self.materials[triangle.material as usize],
        })
    }

    /// Any-hit occlusion test, truncated at `max_distance`.
    pub fn occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        self.bvh
            .any_hit(&self.triangles, ray, Interval::new(EPSILON, max_distance))
    }

    /// Shade a single camera ray.
    ///
    /// Reflection and refraction spawn weighted follow-up tasks on an explicit
    /// work list instead of recursing, so arbitrary depths cannot overflow the
    /// stack. `max_depth` bounds the number of bounces; at depth zero only the
    /// local lighting is taken. The result is clamped to [0, 1].
    pub fn trace_ray(
        &self,
        ray: &Ray,
        lights: &LightList,
        max_depth: u32,
        rng: &mut SeededRng,
    ) -> Vec3 {
        let mut color = Vec3::ZERO;
        let mut tasks = vec![TraceTask {
            ray: *ray,
            depth: max_depth,
            weight: Vec3::ONE,
        }];

        while let Some(task) = tasks.pop() {
            if task.weight.max_element() < MIN_WEIGHT {
                continue;
            }

            let Some(hit) = self.closest_hit(&task.ray, Interval::new(EPSILON, f32::INFINITY))
            else {
                color += task.weight * self.background;
                continue;
            };

            // Geometric normal, flipped toward the viewer for shading.
            let shading_normal = if hit.normal.dot(task.ray.direction()) > 0.0 {
                -hit.normal
            } else {
                hit.normal
            };
            let view_dir = -task.ray.direction();
            let material = hit.material;

            let local = lighting::compute_lighting(
                self,
                hit.point,
                shading_normal,
                view_dir,
                material,
                lights,
            );

            if task.depth == 0 {
                color += task.weight * local;
                continue;
            }

            if material.is_transmissive() {
                self.shade_transmissive(&task, &hit, local, &mut tasks, &mut color);
                continue;
            }

            // Mirror weight: explicit per-triangle reflectivity, or implied by
            // a smooth metal.
            let kr = hit
                .triangle
                .reflectivity
                .max(material.metallic * (1.0 - material.roughness));
            if kr <= 0.0 {
                color += task.weight * local;
                continue;
            }

            color += task.weight * (1.0 - kr) * local;

            if sampling::is_perfect_mirror(material.roughness) {
                let dir = sampling::reflect(task.ray.direction(), shading_normal);
                tasks.push(TraceTask {
                    ray: Ray::new(hit.point + dir * RAY_OFFSET, dir),
                    depth: task.depth - 1,
                    weight: task.weight * kr,
                });
            } else {
                // Glossy: spread the mirror weight over stratified Beckmann
                // samples. Samples reflected below the horizon are dropped.
                let micro_normals = sampling::sample_beckmann_normals_stratified(
                    shading_normal,
                    material.roughness,
                    self.reflection_samples,
                    rng,
                );
                let per_sample = kr / self.reflection_samples.max(1) as f32;
                for m in micro_normals {
                    let dir = sampling::reflect(task.ray.direction(), m);
                    if dir.dot(shading_normal) <= 0.0 {
                        continue;
                    }
                    tasks.push(TraceTask {
                        ray: Ray::new(hit.point + dir * RAY_OFFSET, dir),
                        depth: task.depth - 1,
                        weight: task.weight * per_sample,
                    });
                }
            }
        }

        color.clamp(Vec3::ZERO, Vec3::ONE)
    }

    /// Split a transmissive hit into Fresnel-weighted reflection and
    /// refraction tasks. Total internal reflection folds the refraction
    /// weight into the reflected ray.
    fn shade_transmissive(
        &self,
        task: &TraceTask,
        hit: &HitRecord<'_>,
        local: Vec3,
        tasks: &mut Vec<TraceTask>,
        color: &mut Vec3,
    ) {
        let material = hit.material;
        let transition =
            determine_media_transition(task.ray.direction(), hit.normal, material.ior_clamped());

        let cos_i = (-task.ray.direction()).dot(transition.normal).clamp(0.0, 1.0);
        let kr = fresnel_schlick(cos_i, transition.ior_from, transition.ior_to);
        let transmission = material.transmission.clamp(0.0, 1.0);

        *color += task.weight * (1.0 - transmission) * local;

        let reflect_dir = sampling::reflect(task.ray.direction(), transition.normal);
        let reflect_weight = match refract(
            task.ray.direction(),
            transition.normal,
            transition.ior_from,
            transition.ior_to,
        ) {
            Some(refract_dir) => {
                tasks.push(TraceTask {
                    ray: Ray::new(hit.point + refract_dir * RAY_OFFSET, refract_dir),
                    depth: task.depth - 1,
                    weight: task.weight * transmission * (1.0 - kr),
                });
                task.weight * transmission * kr
            }
            // Total internal reflection: everything reflects.
            None => task.weight * transmission,
        };

        tasks.push(TraceTask {
            ray: Ray::new(hit.point + reflect_dir * RAY_OFFSET, reflect_dir),
            depth: task.depth - 1,
            weight: reflect_weight,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lume_core::Light;

    fn floor_scene(material: &Material, reflectivity: f32) -> Raytracer {
        let mut tracer = Raytracer::new();
        let quad = Mesh::quad(10.0);
        tracer
            .load_model(&quad, Mat4::IDENTITY, reflectivity, material)
            .unwrap();
        tracer
    }

    #[test]
    fn test_miss_returns_background() {
        let tracer = Raytracer::new();
        let mut rng = SeededRng::from_seed(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let color = tracer.trace_ray(&ray, &LightList::default(), 3, &mut rng);
        assert_eq!(color, tracer.background);
    }

    #[test]
    fn test_load_model_rejects_bad_indices() {
        let mut tracer = Raytracer::new();
        let mut mesh = Mesh::quad(1.0);
        mesh.indices[0] = 99;
        let err = tracer.load_model(&mesh, Mat4::IDENTITY, 0.0, &Material::default());
        assert!(err.is_err());
        assert_eq!(tracer.triangle_count(), 0);
    }

    #[test]
    fn test_closest_hit_on_floor() {
        let tracer = floor_scene(&Material::default(), 0.0);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y);
        let hit = tracer
            .closest_hit(&ray, Interval::new(EPSILON, f32::INFINITY))
            .unwrap();
        assert!((hit.t - 2.0).abs() < 1e-4);
        assert!((hit.point.y).abs() < 1e-4);
    }

    #[test]
    fn test_depth_zero_issues_single_query() {
        let tracer = floor_scene(&Material::default(), 0.9);
        let mut rng = SeededRng::from_seed(1);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y);

        let before = tracer.query_count();
        tracer.trace_ray(&ray, &LightList::default(), 0, &mut rng);
        assert_eq!(tracer.query_count() - before, 1);
    }

    #[test]
    fn test_shadowed_point_darker_than_lit() {
        let mut material = Material::default();
        material.roughness = 1.0;
        let mut tracer = floor_scene(&material, 0.0);
        // Small cube floating above the floor blocks the light over the origin.
        let cube = Mesh::cube(1.0);
        tracer
            .load_model(
                &cube,
                Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
                0.0,
                &material,
            )
            .unwrap();

        let mut lights = LightList::default();
        lights.add(Light::point(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE, 4.0));

        let mut rng = SeededRng::from_seed(1);
        let shadowed_ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Y);
        let lit_ray = Ray::new(Vec3::new(4.0, 0.5, 0.0), Vec3::NEG_Y);

        let shadowed = tracer.trace_ray(&shadowed_ray, &lights, 1, &mut rng);
        let lit = tracer.trace_ray(&lit_ray, &lights, 1, &mut rng);
        assert!(shadowed.length() < lit.length());
    }

    #[test]
    fn test_mirror_floor_sees_background() {
        // Fully reflective smooth floor with no lights: the reflected ray
        // escapes upward into the background.
        let mut material = Material::default();
        material.roughness = 0.0;
        let tracer = floor_scene(&material, 1.0);

        let mut rng = SeededRng::from_seed(1);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let lights = LightList {
            global_ambient: lume_math::Vec4::ZERO,
            ..Default::default()
        };
        let color = tracer.trace_ray(&ray, &lights, 2, &mut rng);
        assert!((color - tracer.background).length() < 1e-4);
    }

    #[test]
    fn test_trace_is_deterministic_for_same_seed() {
        let mut material = Material::default();
        material.roughness = 0.3;
        let tracer = floor_scene(&material, 0.5);
        let mut lights = LightList::default();
        lights.add(Light::point(Vec3::new(2.0, 5.0, 1.0), Vec3::ONE, 3.0));

        let ray = Ray::new(Vec3::new(0.5, 2.0, 0.3), Vec3::NEG_Y);
        let mut rng_a = SeededRng::from_seed(42);
        let mut rng_b = SeededRng::from_seed(42);
        let a = tracer.trace_ray(&ray, &lights, 3, &mut rng_a);
        let b = tracer.trace_ray(&ray, &lights, 3, &mut rng_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_output_clamped() {
        let mut tracer = floor_scene(&Material::new(Vec3::ONE), 0.0);
        tracer.background = Vec3::splat(10.0);
        let mut lights = LightList::default();
        lights.add(Light::point(Vec3::new(0.0, 1.0, 0.0), Vec3::ONE, 1000.0));

        let mut rng = SeededRng::from_seed(1);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y);
        let color = tracer.trace_ray(&ray, &lights, 1, &mut rng);
        assert!(color.max_element() <= 1.0);
        assert!(color.min_element() >= 0.0);
    }
}
