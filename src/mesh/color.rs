use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Per-primitive vertex color policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSpec {
    /// Re-sample r/g/b for every emitted vertex
    pub randomize: bool,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::random()
    }
}

impl ColorSpec {
    /// Every vertex gets exactly this color
    pub fn fixed(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { randomize: false, r, g, b, a }
    }

    /// Every vertex gets an independently sampled opaque color
    pub fn random() -> Self {
        Self { randomize: true, r: 0.0, g: 0.0, b: 0.0, a: 1.0 }
    }

    /// Fixed components must be finite and within [0, 1]. They are ignored
    /// when randomizing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.randomize {
            return Ok(());
        }
        for (channel, value) in [('r', self.r), ('g', self.g), ('b', self.b), ('a', self.a)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ColorComponent { channel, value });
            }
        }
        Ok(())
    }

    /// Color for the next emitted vertex. The rng is untouched for fixed
    /// colors, which keeps fixed-color meshes reproducible.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> [f32; 4] {
        if self.randomize {
            [random_channel(rng), random_channel(rng), random_channel(rng), 1.0]
        } else {
            [self.r, self.g, self.b, self.a]
        }
    }
}

/// One of `1/256, 2/256, ..., 255/256`; zero is never produced
fn random_channel<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(1..=255u32) as f32 / 256.0
}
