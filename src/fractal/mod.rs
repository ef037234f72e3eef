//! Fractal branching: configuration and the transform-hierarchy walk
//!
//! Each node draws a cylinder trunk and a sphere joint, then fans out into
//! `branch_count` rotated copies of its transform until the depth runs out.

mod traverser;

pub use traverser::{instruction_count, DrawInstruction, FractalTraverser, MeshKind};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How children are oriented around a joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchLayout {
    /// Two children rotated a quarter turn about mirrored axes `(-1,1,1)`
    /// and `(1,1,-1)`. Other branch counts use the fan formula.
    #[default]
    Mirrored,
    /// `b` children rotated `π/b` about axes sweeping from `(-1,1,1)`
    /// towards `(1,1,-1)`
    Fan,
}

impl FromStr for BranchLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mirrored" => Ok(Self::Mirrored),
            "fan" => Ok(Self::Fan),
            _ => Err(ConfigError::UnknownLayout(s.to_string())),
        }
    }
}

/// Recursion limits and branching style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalConfig {
    /// Levels below the root; 0 draws a single trunk and joint
    pub depth: i32,
    /// Children spawned per joint
    pub branch_count: i32,
    pub layout: BranchLayout,
    /// Shrink every level by 0.75 before moving up the trunk
    pub shrink: bool,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            depth: 5,
            branch_count: 2,
            layout: BranchLayout::Mirrored,
            shrink: false,
        }
    }
}

impl FractalConfig {
    pub fn new(depth: i32, branch_count: i32) -> Self {
        Self {
            depth,
            branch_count,
            ..Default::default()
        }
    }

    pub fn with_layout(mut self, layout: BranchLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_shrink(mut self, shrink: bool) -> Self {
        self.shrink = shrink;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth < 0 {
            return Err(ConfigError::NegativeDepth(self.depth));
        }
        if self.branch_count < 1 {
            return Err(ConfigError::BranchCount(self.branch_count));
        }
        Ok(())
    }
}
