//! CPU ray tracer: BVH-accelerated triangle intersection, physically-based
//! shading with reflection and refraction, and deterministic parallel
//! rendering.
//!
//! The typical flow is: build a [`Raytracer`], load meshes with
//! [`Raytracer::load_model`], describe a [`CameraDesc`] and a
//! [`LightList`](lume_core::LightList), then call [`render_image`].
//!
//! ```
//! use lume_core::{Light, LightList, Material, Mesh};
//! use lume_math::{Mat4, Vec3};
//! use lume_renderer::{render_image, CameraDesc, Raytracer, RenderConfig};
//! use std::sync::atomic::AtomicBool;
//!
//! let mut tracer = Raytracer::new();
//! tracer
//!     .load_model(&Mesh::quad(10.0), Mat4::IDENTITY, 0.2, &Material::default())
//!     .unwrap();
//!
//! let mut lights = LightList::default();
//! lights.add(Light::point(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE, 4.0));
//!
//! let config = RenderConfig { width: 64, height: 48, ..Default::default() };
//! let image = render_image(
//!     &tracer,
//!     &CameraDesc::default(),
//!     &lights,
//!     &config,
//!     &AtomicBool::new(false),
//! );
//! assert_eq!(image.pixels.len(), 64 * 48);
//! ```

pub mod brdf;
pub mod bvh;
pub mod camera;
pub mod lighting;
pub mod raytracer;
pub mod refraction;
pub mod renderer;
pub mod sampling;
pub mod triangle;

pub use bvh::{Bvh, TriangleHit};
pub use camera::{CameraDesc, ViewPlane};
pub use raytracer::{HitRecord, Raytracer};
pub use renderer::{render_image, ImageBuffer, RenderConfig};
pub use sampling::SeededRng;
pub use triangle::Triangle;
