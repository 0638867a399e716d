//! Parallel image rendering.
//!
//! Rows are distributed over the rayon pool. Every pixel derives its own RNG
//! stream from the render seed and its coordinates, so the output is
//! byte-identical regardless of thread count or row scheduling order.

use crate::camera::{CameraDesc, ViewPlane};
use crate::raytracer::Raytracer;
use crate::sampling::{splitmix64, SeededRng};
use lume_core::LightList;
use lume_math::Vec3;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Settings for one render invocation.
#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Maximum number of reflection/refraction bounces
    pub max_depth: u32,
    /// Seed for all stochastic sampling; same seed, same image
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            max_depth: 3,
            seed: 0,
        }
    }
}

/// Linear-space render target.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major, top-left origin
    pub pixels: Vec<Vec3>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Vec3::ZERO)
    }

    /// A buffer with every pixel preset to `color`.
    pub fn filled(width: u32, height: u32, color: Vec3) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Vec3) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to 8-bit RGBA with gamma 2.0 encoding.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            let encoded = p.clamp(Vec3::ZERO, Vec3::ONE).powf(0.5);
            out.push((encoded.x * 255.0) as u8);
            out.push((encoded.y * 255.0) as u8);
            out.push((encoded.z * 255.0) as u8);
            out.push(255);
        }
        out
    }
}

/// RNG stream seed for pixel (x, y): decorrelated from neighbors and from
/// the raw render seed.
#[inline]
fn pixel_seed(seed: u64, x: u32, y: u32) -> u64 {
    splitmix64(splitmix64(seed) ^ (((y as u64) << 32) | x as u64))
}

/// Render the scene into a fresh image buffer.
///
/// Rows run in parallel on the current rayon pool. The `cancel` flag is
/// checked before each row; once set, remaining rows are left at the
/// background color and the call returns promptly. The result is
/// deterministic for a given config and scene, independent of thread count.
pub fn render_image(
    tracer: &Raytracer,
    camera: &CameraDesc,
    lights: &LightList,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> ImageBuffer {
    let start = Instant::now();
    let plane = ViewPlane::new(camera, config.width, config.height);
    let mut image = ImageBuffer::filled(config.width, config.height, tracer.background);

    image
        .pixels
        .par_chunks_mut(config.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            let y = y as u32;
            for (x, pixel) in row.iter_mut().enumerate() {
                let x = x as u32;
                let mut rng = SeededRng::from_seed(pixel_seed(config.seed, x, y));
                let ray = plane.primary_ray(x, y);
                *pixel = tracer.trace_ray(&ray, lights, config.max_depth, &mut rng);
            }
        });

    if cancel.load(Ordering::Relaxed) {
        log::info!(
            "render cancelled after {:.2?} ({}x{})",
            start.elapsed(),
            config.width,
            config.height
        );
    } else {
        log::info!(
            "rendered {}x{} (depth {}) in {:.2?}",
            config.width,
            config.height,
            config.max_depth,
            start.elapsed()
        );
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use lume_core::{Light, Material, Mesh};
    use lume_math::Mat4;

    fn test_scene() -> (Raytracer, LightList) {
        let mut tracer = Raytracer::new();
        let material = Material {
            roughness: 0.4,
            ..Material::new(Vec3::new(0.7, 0.7, 0.7))
        };
        tracer
            .load_model(&Mesh::quad(10.0), Mat4::IDENTITY, 0.3, &material)
            .unwrap();
        tracer
            .load_model(
                &Mesh::cube(1.0),
                Mat4::from_translation(Vec3::new(1.5, 0.5, 0.0)),
                0.0,
                &Material::new(Vec3::new(0.8, 0.3, 0.2)),
            )
            .unwrap();

        let mut lights = LightList::default();
        lights.add(Light::point(Vec3::new(0.0, 6.0, 2.0), Vec3::ONE, 5.0));
        (tracer, lights)
    }

    fn overhead_camera() -> CameraDesc {
        CameraDesc {
            position: Vec3::new(0.0, 8.0, 0.0),
            forward: Vec3::NEG_Y,
            up: Vec3::NEG_Z,
            fov_y_deg: 60.0,
        }
    }

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 32,
            height: 24,
            max_depth: 2,
            seed: 7,
        }
    }

    #[test]
    fn test_empty_scene_renders_background() {
        let tracer = Raytracer::new();
        let image = render_image(
            &tracer,
            &CameraDesc::default(),
            &LightList::default(),
            &small_config(),
            &AtomicBool::new(false),
        );
        for p in &image.pixels {
            assert_eq!(*p, tracer.background);
        }
    }

    #[test]
    fn test_deterministic_across_thread_counts() {
        let (tracer, lights) = test_scene();
        let camera = overhead_camera();
        let config = small_config();

        let render_with = |threads: usize| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap()
                .install(|| {
                    render_image(&tracer, &camera, &lights, &config, &AtomicBool::new(false))
                })
        };

        let single = render_with(1);
        for threads in [2, 4] {
            let parallel = render_with(threads);
            assert_eq!(
                single.pixels, parallel.pixels,
                "image differs with {} threads",
                threads
            );
        }
    }

    #[test]
    fn test_same_seed_same_image() {
        let (tracer, lights) = test_scene();
        let camera = overhead_camera();
        let config = small_config();

        let a = render_image(&tracer, &camera, &lights, &config, &AtomicBool::new(false));
        let b = render_image(&tracer, &camera, &lights, &config, &AtomicBool::new(false));
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_cancel_before_start_leaves_background() {
        let (tracer, lights) = test_scene();
        let image = render_image(
            &tracer,
            &overhead_camera(),
            &lights,
            &small_config(),
            &AtomicBool::new(true),
        );
        assert!(image.pixels.iter().all(|p| *p == tracer.background));
    }

    #[test]
    fn test_lit_floor_brighter_than_background() {
        let (tracer, lights) = test_scene();
        let config = small_config();
        let image = render_image(
            &tracer,
            &overhead_camera(),
            &lights,
            &config,
            &AtomicBool::new(false),
        );

        // The camera looks straight down at the lit floor; the center pixel
        // must come out brighter than the miss color.
        let center = image.get(config.width / 2, config.height / 2);
        assert!(center.length() > tracer.background.length());
    }

    #[test]
    fn test_rgba8_conversion() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(0, 0, Vec3::ZERO);
        image.set(1, 0, Vec3::ONE);
        let bytes = image.to_rgba8();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[0..4], &[0, 0, 0, 255]);
        assert_eq!(&bytes[4..8], &[255, 255, 255, 255]);
    }
}
