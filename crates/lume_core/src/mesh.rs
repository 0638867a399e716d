//! Mesh geometry representation.
//!
//! This module provides a renderer-agnostic mesh: vertex positions, optional
//! per-vertex normals, and triangle indices. It is populated by the asset
//! subsystem and consumed by the ray tracer, which bakes a world transform
//! into the positions at load time.

use lume_math::{Aabb, Vec3};
use thiserror::Error;

/// Errors produced by mesh validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    /// A triangle index refers past the end of the position array.
    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },

    /// The index list length is not a multiple of 3.
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional - the tracer uses face normals regardless)
    pub normals: Option<Vec<Vec3>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box in model space
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            indices,
            bounds,
        }
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check that every index refers to an existing vertex and that the
    /// index list describes whole triangles.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(self.indices.len()));
        }
        let vertex_count = self.positions.len();
        for &index in &self.indices {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfBounds {
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for pos in positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }

        Aabb::from_points(min, max)
    }

    /// A flat quad of the given side length in the XZ plane (y = 0),
    /// centered on the origin, facing +Y. Two triangles.
    pub fn quad(size: f32) -> Self {
        let h = size * 0.5;
        let positions = vec![
            Vec3::new(-h, 0.0, -h),
            Vec3::new(-h, 0.0, h),
            Vec3::new(h, 0.0, h),
            Vec3::new(h, 0.0, -h),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        Self::new(positions, indices, None)
    }

    /// An axis-aligned cube of the given side length centered on the origin.
    /// Twelve triangles with outward-facing winding.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let positions = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -Z
            4, 5, 6, 4, 6, 7, // +Z
            0, 4, 7, 0, 7, 3, // -X
            1, 6, 5, 1, 2, 6, // +X
            0, 1, 5, 0, 5, 4, // -Y
            3, 6, 2, 3, 7, 6, // +Y
        ];
        Self::new(positions, indices, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_bounds() {
        let mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(1.0, 2.0, 0.0),
                Vec3::new(0.0, 0.0, 3.0),
            ],
            vec![0, 1, 2],
            None,
        );

        assert_eq!(mesh.bounds.x.min, -1.0);
        assert_eq!(mesh.bounds.x.max, 1.0);
        assert_eq!(mesh.bounds.y.max, 2.0);
        assert_eq!(mesh.bounds.z.max, 3.0);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_validate_accepts_good_mesh() {
        assert_eq!(Mesh::quad(1.0).validate(), Ok(()));
        assert_eq!(Mesh::cube(1.0).validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 5], None);
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfBounds {
                index: 5,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn test_validate_rejects_partial_triangle() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1], None);
        assert_eq!(mesh.validate(), Err(MeshError::IncompleteTriangle(2)));
    }

    #[test]
    fn test_quad_lies_in_plane() {
        let mesh = Mesh::quad(4.0);
        for p in &mesh.positions {
            assert_eq!(p.y, 0.0);
        }
        assert_eq!(mesh.bounds.x.min, -2.0);
        assert_eq!(mesh.bounds.x.max, 2.0);
    }
}
