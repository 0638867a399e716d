//! Pinhole camera and primary-ray generation.

use lume_math::{Ray, Vec3};

/// Camera description in world space.
#[derive(Clone, Copy, Debug)]
pub struct CameraDesc {
    pub position: Vec3,
    /// View direction; need not be normalized
    pub forward: Vec3,
    /// Approximate up vector; re-orthogonalized internally
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y_deg: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y_deg: 60.0,
        }
    }
}

/// Precomputed view-plane basis for a fixed image resolution.
///
/// The basis is built once per render; per-pixel ray generation is then two
/// multiply-adds and a normalize.
#[derive(Clone, Copy, Debug)]
pub struct ViewPlane {
    origin: Vec3,
    forward: Vec3,
    /// Right axis scaled by aspect * tan(fov/2)
    right: Vec3,
    /// Up axis scaled by tan(fov/2)
    up: Vec3,
    width: u32,
    height: u32,
}

impl ViewPlane {
    pub fn new(camera: &CameraDesc, width: u32, height: u32) -> Self {
        let forward = camera.forward.normalize();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward).normalize();

        let aspect = width as f32 / height.max(1) as f32;
        let half_height = (camera.fov_y_deg.to_radians() * 0.5).tan();
        let half_width = half_height * aspect;

        Self {
            origin: camera.position,
            forward,
            right: right * half_width,
            up: up * half_height,
            width,
            height,
        }
    }

    /// Primary ray through the center of pixel (x, y).
    ///
    /// Pixel (0, 0) is the top-left corner; v is flipped so image rows run
    /// top to bottom.
    pub fn primary_ray(&self, x: u32, y: u32) -> Ray {
        let u = (x as f32 + 0.5) / self.width as f32 * 2.0 - 1.0;
        let v = 1.0 - (y as f32 + 0.5) / self.height as f32 * 2.0;
        Ray::new(self.origin, self.forward + self.right * u + self.up * v)
    }
}
