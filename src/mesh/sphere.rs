use std::f32::consts::{PI, TAU};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::Vec3;
use super::color::ColorSpec;
use super::vertex::{vertex_data, Vertex};

/// Upper bound keeping `(smoothness + 1)²` comfortably inside `u32` indices
pub const MAX_SMOOTHNESS: u32 = 4096;

/// Parameters for the joint sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereParams {
    /// Latitude and longitude band count
    pub smoothness: u32,
    pub radius: f32,
    pub color: ColorSpec,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            smoothness: 30,
            radius: 1.0,
            color: ColorSpec::random(),
        }
    }
}

impl SphereParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smoothness < 1 {
            return Err(ConfigError::SphereSmoothness(self.smoothness));
        }
        if self.smoothness > MAX_SMOOTHNESS {
            return Err(ConfigError::SphereSmoothnessTooHigh { value: self.smoothness, max: MAX_SMOOTHNESS });
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::SphereRadius(self.radius));
        }
        self.color.validate()
    }
}

/// Indexed UV sphere
///
/// The grid keeps one vertex per (latitude, longitude) pair, so each pole is
/// repeated once per longitude and the seam column is duplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Get vertex buffer data as flat f32 array
    pub fn vertex_data(&self) -> Vec<f32> {
        vertex_data(&self.vertices)
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Builds UV spheres from validated parameters
#[derive(Debug, Clone)]
pub struct SphereGenerator {
    params: SphereParams,
}

impl SphereGenerator {
    /// Rejects invalid parameters before any buffer exists
    pub fn new(params: SphereParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> SphereMesh {
        let SphereParams { smoothness, radius, color } = self.params;
        let bands = smoothness as f32;
        let row = smoothness + 1;

        let mut vertices = Vec::with_capacity((row * row) as usize);
        for lat in 0..=smoothness {
            let theta = lat as f32 * PI / bands;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for lon in 0..=smoothness {
                let phi = lon as f32 * TAU / bands;
                let (sin_phi, cos_phi) = phi.sin_cos();

                let unit = Vec3::new(cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                vertices.push(Vertex::new(unit.scale(radius), color.sample(rng)));
            }
        }

        // Winding decides which faces the backend culls; keep it as is
        let mut indices = Vec::with_capacity((6 * smoothness * smoothness) as usize);
        for lat in 0..smoothness {
            for lon in 0..smoothness {
                let first = lat * row + lon;
                let second = first + row;
                indices.extend_from_slice(&[first, second, first + 1]);
                indices.extend_from_slice(&[second, second + 1, first + 1]);
            }
        }

        SphereMesh { vertices, indices }
    }
}
