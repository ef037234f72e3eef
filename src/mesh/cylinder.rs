use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::Vec3;
use super::color::ColorSpec;
use super::vertex::{vertex_data, Vertex};

/// Parameters for the trunk cylinder (unit ring radius)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderParams {
    /// Radial segments around the ring
    pub segments: u32,
    pub height: f32,
    pub color: ColorSpec,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            segments: 30,
            height: 5.0,
            color: ColorSpec::random(),
        }
    }
}

impl CylinderParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segments < 3 {
            return Err(ConfigError::CylinderSegments(self.segments));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ConfigError::CylinderHeight(self.height));
        }
        self.color.validate()
    }
}

/// Cylinder as three non-indexed parts
///
/// Every ring has `segments + 1` points: the last one revisits the start
/// angle so strips and fans close without an index buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CylinderMesh {
    /// Bottom/top pairs for a triangle strip
    pub side: Vec<Vertex>,
    /// Ring at `y = height` for a triangle fan
    pub top: Vec<Vertex>,
    /// Ring at `y = 0` for a triangle fan
    pub bottom: Vec<Vertex>,
}

impl CylinderMesh {
    pub fn side_data(&self) -> Vec<f32> {
        vertex_data(&self.side)
    }

    pub fn top_data(&self) -> Vec<f32> {
        vertex_data(&self.top)
    }

    pub fn bottom_data(&self) -> Vec<f32> {
        vertex_data(&self.bottom)
    }

    pub fn vertex_count(&self) -> usize {
        self.side.len() + self.top.len() + self.bottom.len()
    }
}

/// Builds cylinders from validated parameters
#[derive(Debug, Clone)]
pub struct CylinderGenerator {
    params: CylinderParams,
}

impl CylinderGenerator {
    /// Rejects invalid parameters before any buffer exists
    pub fn new(params: CylinderParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> CylinderMesh {
        let CylinderParams { segments, height, color } = self.params;
        let step = TAU / segments as f32;
        let ring = (segments + 1) as usize;

        let mut mesh = CylinderMesh {
            side: Vec::with_capacity(2 * ring),
            top: Vec::with_capacity(ring),
            bottom: Vec::with_capacity(ring),
        };

        for i in 0..=segments {
            let (sin_a, cos_a) = ((i % segments) as f32 * step).sin_cos();
            let low = Vec3::new(cos_a, 0.0, sin_a);
            let high = Vec3::new(cos_a, height, sin_a);

            // One color per angular step, shared by all four emitted points
            let rgba = color.sample(rng);

            mesh.bottom.push(Vertex::new(low, rgba));
            mesh.side.push(Vertex::new(low, rgba));
            mesh.side.push(Vertex::new(high, rgba));
            mesh.top.push(Vertex::new(high, rgba));
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(segments: u32, height: f32, color: ColorSpec) -> CylinderParams {
        CylinderParams { segments, height, color }
    }

    fn build(segments: u32, height: f32) -> CylinderMesh {
        let mut rng = StdRng::seed_from_u64(42);
        CylinderGenerator::new(params(segments, height, ColorSpec::random()))
            .unwrap()
            .generate(&mut rng)
    }

    #[test]
    fn test_part_sizes() {
        for segments in [3u32, 4, 8, 30, 64] {
            let mesh = build(segments, 5.0);
            let ring = (segments + 1) as usize;

            assert_eq!(mesh.side.len(), 2 * ring);
            assert_eq!(mesh.top.len(), ring);
            assert_eq!(mesh.bottom.len(), ring);
            assert_eq!(mesh.side_data().len(), 2 * ring * 7);
        }
    }

    #[test]
    fn test_rings_close_on_start_angle() {
        let segments = 7;
        let mesh = build(segments, 2.0);
        let last = segments as usize;

        for part in [&mesh.top, &mesh.bottom] {
            assert_eq!(part[0].position.x, part[last].position.x);
            assert_eq!(part[0].position.z, part[last].position.z);
        }
        assert_eq!(mesh.side[0].position, mesh.side[2 * last].position);
        assert_eq!(mesh.side[1].position, mesh.side[2 * last + 1].position);
    }

    #[test]
    fn test_heights_and_unit_ring() {
        let mesh = build(12, 3.5);

        assert!(mesh.bottom.iter().all(|v| v.position.y == 0.0));
        assert!(mesh.top.iter().all(|v| v.position.y == 3.5));
        for pair in mesh.side.chunks(2) {
            assert_eq!(pair[0].position.y, 0.0);
            assert_eq!(pair[1].position.y, 3.5);
            assert_eq!(pair[0].position.x, pair[1].position.x);
        }
        for v in &mesh.top {
            let r = (v.position.x * v.position.x + v.position.z * v.position.z).sqrt();
            assert!((r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_color_shared_within_a_step() {
        let mesh = build(6, 1.0);
        for i in 0..=6 {
            let c = mesh.bottom[i].color;
            assert_eq!(mesh.side[2 * i].color, c);
            assert_eq!(mesh.side[2 * i + 1].color, c);
            assert_eq!(mesh.top[i].color, c);
        }
    }

    #[test]
    fn test_fixed_color_generation_is_idempotent() {
        let generator = CylinderGenerator::new(params(16, 4.0, ColorSpec::fixed(0.2, 0.4, 0.6, 0.8))).unwrap();
        let a = generator.generate(&mut StdRng::seed_from_u64(10));
        let b = generator.generate(&mut StdRng::seed_from_u64(20));

        assert_eq!(a, b);
        assert!(a.side.iter().all(|v| v.color == [0.2, 0.4, 0.6, 0.8]));
    }

    #[test]
    fn test_rejects_invalid_params() {
        assert_eq!(
            CylinderGenerator::new(params(2, 1.0, ColorSpec::random())).unwrap_err(),
            ConfigError::CylinderSegments(2)
        );
        assert_eq!(
            CylinderGenerator::new(params(3, 0.0, ColorSpec::random())).unwrap_err(),
            ConfigError::CylinderHeight(0.0)
        );
        assert!(CylinderGenerator::new(params(3, f32::NAN, ColorSpec::random())).is_err());
        assert!(CylinderGenerator::new(params(3, 1.0, ColorSpec::fixed(2.0, 0.0, 0.0, 1.0))).is_err());
    }
}
