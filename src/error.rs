//! Error types shared by mesh generation, traversal and the render backend

use thiserror::Error;

use crate::render::MeshHandle;

/// Invalid tessellation, size, color or fractal parameters.
///
/// Always raised before any buffer is built or any draw instruction emitted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("sphere smoothness must be at least 1, got {0}")]
    SphereSmoothness(u32),
    #[error("sphere smoothness must not exceed {max}, got {value}")]
    SphereSmoothnessTooHigh { value: u32, max: u32 },
    #[error("sphere radius must be a positive number, got {0}")]
    SphereRadius(f32),
    #[error("cylinder needs at least 3 segments, got {0}")]
    CylinderSegments(u32),
    #[error("cylinder height must be a positive number, got {0}")]
    CylinderHeight(f32),
    #[error("color component `{channel}` must lie in [0, 1], got {value}")]
    ColorComponent { channel: char, value: f32 },
    #[error("fractal depth must not be negative, got {0}")]
    NegativeDepth(i32),
    #[error("fractal needs at least one branch per joint, got {0}")]
    BranchCount(i32),
    #[error("unknown branch layout `{0}` (expected `mirrored` or `fan`)")]
    UnknownLayout(String),
    #[error("placement position must be finite")]
    Position,
    #[error("rotation axis must be a finite, non-zero vector")]
    RotationAxis,
}

/// Failures of the rendering backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("rendering backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("shader compilation failed: {0}")]
    ShaderCompilation(String),
    #[error("program linking failed: {0}")]
    ProgramLink(String),
    #[error("failed to create {0}")]
    BufferCreation(&'static str),
    #[error("mesh {0:?} was never uploaded or has been released")]
    UnknownMesh(MeshHandle),
}

/// Top-level error for the scene and the web entry point
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("scene config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::SphereSmoothness(0).to_string(),
            "sphere smoothness must be at least 1, got 0"
        );
        assert_eq!(
            ConfigError::SphereSmoothnessTooHigh { value: 5000, max: 4096 }.to_string(),
            "sphere smoothness must not exceed 4096, got 5000"
        );
        assert_eq!(
            ConfigError::ColorComponent { channel: 'g', value: 1.5 }.to_string(),
            "color component `g` must lie in [0, 1], got 1.5"
        );
    }

    #[test]
    fn test_config_error_converts_transparently() {
        let err: Error = ConfigError::NegativeDepth(-1).into();
        assert!(matches!(err, Error::Config(ConfigError::NegativeDepth(-1))));
        assert_eq!(err.to_string(), "fractal depth must not be negative, got -1");
    }
}
