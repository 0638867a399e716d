//! Lume Core - renderer-agnostic scene-side types.
//!
//! This crate provides the data that crosses the in-process boundary into
//! the CPU ray tracer:
//!
//! - **Mesh**: vertex positions, optional normals, triangle indices
//! - **Material**: PBR parameters (base color, roughness, metallic, ior, transmission)
//! - **Lights**: point / directional / spot light sources and the light list
//!
//! # Example
//!
//! ```
//! use lume_core::{Light, LightList, Material, Mesh};
//! use lume_math::Vec3;
//!
//! let mesh = Mesh::quad(2.0);
//! assert_eq!(mesh.triangle_count(), 2);
//!
//! let mut lights = LightList::new();
//! lights.add(Light::point(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE, 1.0));
//! ```

pub mod light;
pub mod material;
pub mod mesh;

// Re-export commonly used types
pub use light::{Light, LightKind, LightList};
pub use material::Material;
pub use mesh::{Mesh, MeshError};
