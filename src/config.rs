use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::fractal::FractalConfig;
use crate::math::{Mat4, Vec3};
use crate::mesh::{CylinderParams, SphereParams};

/// Where the whole tree sits and which axis it spins around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub position: Vec3,
    pub rotation_axis: Vec3,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -10.0, -50.0),
            rotation_axis: Vec3::UP,
        }
    }
}

impl Placement {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.position.is_finite() {
            return Err(ConfigError::Position);
        }
        if !self.rotation_axis.is_finite() || self.rotation_axis.length_squared() < f32::EPSILON {
            return Err(ConfigError::RotationAxis);
        }
        Ok(())
    }

    /// `translate(position) · rotate(angle, rotation_axis)`
    pub fn root_transform(&self, angle: f32) -> Mat4 {
        Mat4::identity()
            .translated(self.position)
            .rotated(angle, self.rotation_axis)
    }
}

/// Everything the user can adjust, parsed from YAML
///
/// ```yaml
/// sphere:
///   smoothness: 30
///   radius: 1.0
///   color: { randomize: true }
/// cylinder:
///   segments: 30
///   height: 5.0
/// fractal:
///   depth: 5
///   branch_count: 2
///   layout: mirrored
/// placement:
///   position: [0, -10, -50]
///   rotation_axis: [0, 1, 0]
/// seed: 42
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub sphere: SphereParams,
    pub cylinder: CylinderParams,
    pub fractal: FractalConfig,
    pub placement: Placement,
    /// Seed for randomized vertex colors; entropy when absent
    pub seed: Option<u64>,
}

impl SceneConfig {
    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sphere.validate()?;
        self.cylinder.validate()?;
        self.fractal.validate()?;
        self.placement.validate()
    }
}
