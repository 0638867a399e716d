//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.
//! The test is two-sided: back faces are not culled, so shadow and
//! refraction rays behave the same from either side of a surface.

use lume_math::{Aabb, Interval, Ray, Vec3};

/// Determinant threshold below which a ray counts as parallel to the plane.
pub const EPSILON: f32 = 1e-6;

/// A triangle with a precomputed unit face normal.
///
/// The material lives in the orchestrator's shared table; the triangle
/// carries only an index into it, plus a per-triangle reflectivity scalar.
#[derive(Clone, Debug)]
pub struct Triangle {
    /// Vertices in world space (the model transform is baked at load time)
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    /// Pre-computed face normal (unit length)
    pub normal: Vec3,
    /// 0 = matte, 1 = mirror
    pub reflectivity: f32,
    /// Index into the shared material table
    pub material: u32,
    /// Bounding box (padded so axis-aligned triangles stay hittable)
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three world-space vertices.
    /// Vertices may be in any winding; the normal follows (v1-v0) x (v2-v0).
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, reflectivity: f32, material: u32) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize_or_zero();

        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);
        let bbox = Aabb::from_points(min, max);

        Self {
            v0,
            v1,
            v2,
            normal,
            reflectivity: reflectivity.clamp(0.0, 1.0),
            material,
            bbox,
        }
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// Returns the hit distance and the face normal, or `None` when the ray
    /// is parallel to the plane, the barycentric coordinates fall outside the
    /// triangle, or t lies outside `ray_t`. A degenerate (zero-area) triangle
    /// never reports a hit.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<(f32, Vec3)> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let det = edge1.dot(h);

        // Ray parallel to triangle plane (or zero-area triangle)
        if det.abs() < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin() - self.v0;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        if t <= EPSILON || !ray_t.contains(t) {
            return None;
        }

        Some((t, self.normal))
    }

    /// Bounding box in world space.
    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Triangle centroid, used to pick BVH split positions.
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }
}
