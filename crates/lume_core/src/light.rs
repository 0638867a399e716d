//! Light sources consumed by the ray tracer.
//!
//! Color and intensity are separate so the editor can dim a light without
//! losing its chromaticity. Spot cone angles are stored in degrees, matching
//! the editor UI.

use lume_math::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// The kind of a light source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightKind {
    Point,
    Directional,
    Spot,
}

/// A single light source.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    /// World position (point and spot lights)
    pub position: Vec3,
    /// Forward axis, normalized (directional and spot lights)
    pub direction: Vec3,
    /// Spectral color (linear)
    pub color: Vec3,
    /// Scalar intensity
    pub intensity: f32,
    /// Disabled lights contribute nothing but stay in the list
    pub enabled: bool,
    /// Spot inner cone half-angle (degrees); full intensity inside
    pub inner_cone_deg: f32,
    /// Spot outer cone half-angle (degrees); no contribution outside
    pub outer_cone_deg: f32,
}

impl Light {
    /// A point light at `position`.
    pub fn point(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            direction: Vec3::new(0.0, -1.0, 0.0),
            color,
            intensity,
            enabled: true,
            inner_cone_deg: 15.0,
            outer_cone_deg: 25.0,
        }
    }

    /// A directional light shining along `direction`.
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            position: Vec3::ZERO,
            direction: direction.normalize(),
            color,
            intensity,
            enabled: true,
            inner_cone_deg: 15.0,
            outer_cone_deg: 25.0,
        }
    }

    /// A spot light at `position` shining along `direction`. Cone angles are
    /// half-angles in degrees; they are swapped if outer < inner.
    pub fn spot(
        position: Vec3,
        direction: Vec3,
        color: Vec3,
        intensity: f32,
        inner_cone_deg: f32,
        outer_cone_deg: f32,
    ) -> Self {
        let (inner, outer) = if outer_cone_deg < inner_cone_deg {
            (outer_cone_deg, inner_cone_deg)
        } else {
            (inner_cone_deg, outer_cone_deg)
        };
        Self {
            kind: LightKind::Spot,
            position,
            direction: direction.normalize(),
            color,
            intensity,
            enabled: true,
            inner_cone_deg: inner,
            outer_cone_deg: outer,
        }
    }
}

/// The light list handed to a render invocation, plus the global ambient
/// term (RGB in xyz, intensity in w).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LightList {
    pub lights: Vec<Light>,
    pub global_ambient: Vec4,
}

impl Default for LightList {
    fn default() -> Self {
        Self::new()
    }
}

impl LightList {
    pub fn new() -> Self {
        Self {
            lights: Vec::new(),
            global_ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
        }
    }

    pub fn add(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }
}
