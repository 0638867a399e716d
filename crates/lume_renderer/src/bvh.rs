//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Nodes live in a flat arena and reference children by index, so traversal
//! is iteration-friendly, cache-local, and destruction never recurses down a
//! deep tree of boxed children. The build is a median split on the longest
//! centroid axis; traversal is independent of the split policy.

use crate::triangle::Triangle;
use lume_math::{Aabb, Interval, Ray, Vec3};

/// Maximum triangles per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// Hard depth cutoff; splits stop here regardless of leaf size.
const MAX_DEPTH: u32 = 32;

/// A closest-hit traversal result.
#[derive(Clone, Copy, Debug)]
pub struct TriangleHit {
    /// Index of the triangle in the scene's triangle list
    pub index: u32,
    /// Distance along the ray
    pub t: f32,
    /// Face normal of the hit triangle
    pub normal: Vec3,
}

#[derive(Clone, Copy, Debug)]
enum NodeKind {
    /// Range into `tri_order`.
    Leaf { first: u32, count: u32 },
    /// Arena indices of the two children.
    Branch { left: u32, right: u32 },
}

#[derive(Clone, Copy, Debug)]
struct BvhNode {
    bbox: Aabb,
    kind: NodeKind,
}

/// Binary BVH over a triangle list.
///
/// The hierarchy stores triangle *indices*; the triangle list itself stays
/// owned by the orchestrator and is passed to every query. A BVH built over
/// zero triangles is valid and always misses.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    tri_order: Vec<u32>,
}

impl Bvh {
    /// Build a hierarchy over `triangles`.
    pub fn build(triangles: &[Triangle]) -> Self {
        let mut bvh = Bvh {
            nodes: Vec::new(),
            tri_order: (0..triangles.len() as u32).collect(),
        };
        if !triangles.is_empty() {
            let count = triangles.len();
            bvh.build_node(triangles, 0, count, 0);
            log::debug!(
                "BVH built: {} nodes over {} triangles",
                bvh.nodes.len(),
                count
            );
        }
        bvh
    }

    /// True when the hierarchy covers no triangles.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Recursively build the subtree for `tri_order[first..first + count]`.
    /// Returns the arena index of the created node.
    fn build_node(&mut self, triangles: &[Triangle], first: usize, count: usize, depth: u32) -> u32 {
        let slice = &self.tri_order[first..first + count];

        let mut bounds = triangles[slice[0] as usize].bounding_box();
        let mut centroid_min = triangles[slice[0] as usize].centroid();
        let mut centroid_max = centroid_min;
        for &ti in &slice[1..] {
            let tri = &triangles[ti as usize];
            bounds = Aabb::surrounding(&bounds, &tri.bounding_box());
            centroid_min = centroid_min.min(tri.centroid());
            centroid_max = centroid_max.max(tri.centroid());
        }

        let spread = centroid_max - centroid_min;
        let axis = if spread.x >= spread.y && spread.x >= spread.z {
            0
        } else if spread.y >= spread.z {
            1
        } else {
            2
        };

        // Leaf: small set, depth budget spent, or all centroids coincide
        // (a degenerate split would loop forever).
        if count <= LEAF_MAX_SIZE || depth >= MAX_DEPTH || spread[axis] <= f32::EPSILON {
            self.nodes.push(BvhNode {
                bbox: bounds,
                kind: NodeKind::Leaf {
                    first: first as u32,
                    count: count as u32,
                },
            });
            return (self.nodes.len() - 1) as u32;
        }

        // Median split: sort the index range by centroid on the chosen axis.
        self.tri_order[first..first + count].sort_unstable_by(|&a, &b| {
            let ca = triangles[a as usize].centroid()[axis];
            let cb = triangles[b as usize].centroid()[axis];
            ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = count / 2;

        // Reserve our slot before the children so the root stays at index 0.
        let node_index = self.nodes.len() as u32;
        self.nodes.push(BvhNode {
            bbox: bounds,
            kind: NodeKind::Leaf { first: 0, count: 0 },
        });

        let left = self.build_node(triangles, first, mid, depth + 1);
        let right = self.build_node(triangles, first + mid, count - mid, depth + 1);
        self.nodes[node_index as usize].kind = NodeKind::Branch { left, right };

        node_index
    }

    /// Find the closest triangle intersection within `ray_t`.
    ///
    /// Subtrees whose box lies beyond the best hit found so far are skipped;
    /// child visit order affects only performance, never the result.
    pub fn closest_hit(
        &self,
        triangles: &[Triangle],
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<TriangleHit> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut best: Option<TriangleHit> = None;
        self.closest_hit_node(0, triangles, ray, ray_t, &mut best);
        best
    }

    fn closest_hit_node(
        &self,
        node: u32,
        triangles: &[Triangle],
        ray: &Ray,
        ray_t: Interval,
        best: &mut Option<TriangleHit>,
    ) {
        let node = &self.nodes[node as usize];
        let t_max = best.as_ref().map_or(ray_t.max, |b| b.t);
        if !node.bbox.hit(ray, Interval::new(ray_t.min, t_max)) {
            return;
        }

        match node.kind {
            NodeKind::Leaf { first, count } => {
                for &ti in &self.tri_order[first as usize..(first + count) as usize] {
                    let limit = best.as_ref().map_or(ray_t.max, |b| b.t);
                    let tri = &triangles[ti as usize];
                    if let Some((t, normal)) = tri.intersect(ray, Interval::new(ray_t.min, limit)) {
                        if best.as_ref().map_or(true, |b| t < b.t) {
                            *best = Some(TriangleHit {
                                index: ti,
                                t,
                                normal,
                            });
                        }
                    }
                }
            }
            NodeKind::Branch { left, right } => {
                self.closest_hit_node(left, triangles, ray, ray_t, best);
                self.closest_hit_node(right, triangles, ray, ray_t, best);
            }
        }
    }

    /// True if *any* triangle intersects the ray within `ray_t`.
    ///
    /// Short-circuits on the first intersection found; used for shadow rays
    /// where only occlusion matters. The interval max bounds the search, so
    /// hits beyond a light's distance do not count as occlusion.
    pub fn any_hit(&self, triangles: &[Triangle], ray: &Ray, ray_t: Interval) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        self.any_hit_node(0, triangles, ray, ray_t)
    }

    fn any_hit_node(&self, node: u32, triangles: &[Triangle], ray: &Ray, ray_t: Interval) -> bool {
        let node = &self.nodes[node as usize];
        if !node.bbox.hit(ray, ray_t) {
            return false;
        }

        match node.kind {
            NodeKind::Leaf { first, count } => self.tri_order
                [first as usize..(first + count) as usize]
                .iter()
                .any(|&ti| triangles[ti as usize].intersect(ray, ray_t).is_some()),
            NodeKind::Branch { left, right } => {
                self.any_hit_node(left, triangles, ray, ray_t)
                    || self.any_hit_node(right, triangles, ray, ray_t)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ray_interval() -> Interval {
        Interval::new(1e-3, f32::INFINITY)
    }

    fn random_triangles(rng: &mut StdRng, count: usize) -> Vec<Triangle> {
        (0..count)
            .map(|i| {
                let base = Vec3::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                );
                let e1 = Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
                let e2 = Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
                Triangle::new(base, base + e1, base + e2, 0.0, i as u32)
            })
            .collect()
    }

    fn brute_force_closest(
        triangles: &[Triangle],
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<TriangleHit> {
        let mut best: Option<TriangleHit> = None;
        for (i, tri) in triangles.iter().enumerate() {
            if let Some((t, normal)) = tri.intersect(ray, ray_t) {
                if best.as_ref().map_or(true, |b| t < b.t) {
                    best = Some(TriangleHit {
                        index: i as u32,
                        t,
                        normal,
                    });
                }
            }
        }
        best
    }

    #[test]
    fn test_empty_bvh_always_misses() {
        let triangles: Vec<Triangle> = Vec::new();
        let bvh = Bvh::build(&triangles);
        assert!(bvh.is_empty());

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(bvh.closest_hit(&triangles, &ray, ray_interval()).is_none());
        assert!(!bvh.any_hit(&triangles, &ray, ray_interval()));
    }

    #[test]
    fn test_single_triangle() {
        let triangles = vec![Triangle::new(
            Vec3::new(-1.0, -1.0, -3.0),
            Vec3::new(1.0, -1.0, -3.0),
            Vec3::new(0.0, 1.0, -3.0),
            0.0,
            0,
        )];
        let bvh = Bvh::build(&triangles);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = bvh.closest_hit(&triangles, &ray, ray_interval()).unwrap();
        assert_eq!(hit.index, 0);
        assert!((hit.t - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_closest_hit_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let triangles = random_triangles(&mut rng, 200);
        let bvh = Bvh::build(&triangles);

        for _ in 0..200 {
            let origin = Vec3::new(
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
            );
            let dir = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if dir.length_squared() < 1e-6 {
                continue;
            }
            let ray = Ray::new(origin, dir);

            let expected = brute_force_closest(&triangles, &ray, ray_interval());
            let actual = bvh.closest_hit(&triangles, &ray, ray_interval());

            match (expected, actual) {
                (None, None) => {}
                (Some(e), Some(a)) => {
                    assert_eq!(e.index, a.index, "different triangle for {:?}", ray);
                    assert!((e.t - a.t).abs() < 1e-4);
                }
                (e, a) => panic!("hit/miss disagreement: expected {:?}, got {:?}", e, a),
            }
        }
    }

    #[test]
    fn test_any_hit_matches_brute_force_existence() {
        let mut rng = StdRng::seed_from_u64(11);
        let triangles = random_triangles(&mut rng, 100);
        let bvh = Bvh::build(&triangles);

        for _ in 0..200 {
            let origin = Vec3::new(
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
            );
            let dir = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if dir.length_squared() < 1e-6 {
                continue;
            }
            // Exercise both unbounded and truncated intervals.
            let max = if rng.gen_bool(0.5) { f32::INFINITY } else { 5.0 };
            let ray = Ray::new(origin, dir);
            let interval = Interval::new(1e-3, max);

            let expected = brute_force_closest(&triangles, &ray, interval).is_some();
            assert_eq!(bvh.any_hit(&triangles, &ray, interval), expected);
        }
    }

    #[test]
    fn test_any_hit_truncated_at_distance() {
        // One triangle at z = -5; an occlusion query limited to t < 2 must miss it.
        let triangles = vec![Triangle::new(
            Vec3::new(-1.0, -1.0, -5.0),
            Vec3::new(1.0, -1.0, -5.0),
            Vec3::new(0.0, 1.0, -5.0),
            0.0,
            0,
        )];
        let bvh = Bvh::build(&triangles);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(bvh.any_hit(&triangles, &ray, Interval::new(1e-3, f32::INFINITY)));
        assert!(!bvh.any_hit(&triangles, &ray, Interval::new(1e-3, 2.0)));
    }
}
