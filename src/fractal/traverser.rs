use std::f32::consts::{FRAC_PI_2, PI};

use crate::error::ConfigError;
use crate::math::{Mat4, Vec3};
use super::{BranchLayout, FractalConfig};

/// Uniform scale applied per level when shrinking is enabled
pub const SHRINK_FACTOR: f32 = 0.75;

const MIRRORED_AXES: [Vec3; 2] = [Vec3::new(-1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, -1.0)];

/// Which cached mesh an instruction draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    /// Cylinder segment
    Trunk,
    /// Sphere at a branch point or leaf
    Joint,
}

/// One primitive instance for the backend to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawInstruction {
    pub mesh: MeshKind,
    pub transform: Mat4,
    /// Distance from the root node (0 = root trunk and joint)
    pub generation: u32,
}

/// Closed-form instruction count: `2 · (1 + b + b² + … + b^depth)`.
/// Saturates instead of overflowing for absurd configurations.
pub fn instruction_count(depth: u32, branch_count: u32) -> u64 {
    let b = branch_count as u64;
    let mut level = 1u64;
    let mut nodes = 1u64;
    for _ in 0..depth {
        level = level.saturating_mul(b);
        nodes = nodes.saturating_add(level);
    }
    nodes.saturating_mul(2)
}

/// A node waiting to be emitted
#[derive(Clone, Copy)]
struct Node {
    transform: Mat4,
    /// Levels still to grow below this node
    remaining: u32,
    generation: u32,
}

/// Walks the branching hierarchy and emits trunk/joint instructions.
///
/// Transforms are passed down by value, so every pending node owns its own
/// matrix and rotating one child can never leak into a sibling.
#[derive(Debug, Clone)]
pub struct FractalTraverser {
    depth: u32,
    branch_count: u32,
    layout: BranchLayout,
    shrink: bool,
    /// Distance from a trunk base to the joint above it
    spacing: f32,
}

impl FractalTraverser {
    /// Validates the configuration once, before any walk can start.
    ///
    /// `cylinder_height` and `sphere_radius` come from the meshes being
    /// instanced and set the node spacing `height + radius / 4`.
    pub fn new(config: &FractalConfig, cylinder_height: f32, sphere_radius: f32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            depth: config.depth as u32,
            branch_count: config.branch_count as u32,
            layout: config.layout,
            shrink: config.shrink,
            spacing: cylinder_height + sphere_radius / 4.0,
        })
    }

    /// Number of instructions one walk emits
    pub fn instruction_count(&self) -> u64 {
        instruction_count(self.depth, self.branch_count)
    }

    /// Rotation angle and axis for child `k` of a joint
    fn branch_rotation(&self, k: u32) -> (f32, Vec3) {
        match self.layout {
            BranchLayout::Mirrored if self.branch_count == 2 => (FRAC_PI_2, MIRRORED_AXES[k as usize]),
            _ => {
                let b = self.branch_count as f32;
                let t = 2.0 * k as f32 / b;
                (PI / b, Vec3::new(-1.0 + t, 1.0, 1.0 - t))
            }
        }
    }

    /// Walk from `root`, handing each instruction to `sink` in depth-first
    /// order: trunk, joint, then each child subtree in turn.
    ///
    /// Pending nodes live on an explicit stack, so depth is bounded by memory
    /// rather than by the call stack.
    pub fn walk<F>(&self, root: Mat4, sink: &mut F)
    where
        F: FnMut(DrawInstruction),
    {
        let mut pending = vec![Node { transform: root, remaining: self.depth, generation: 0 }];

        while let Some(node) = pending.pop() {
            let joint = self.emit(&node, sink);
            if node.remaining == 0 {
                continue;
            }

            // Reversed so child 0 is popped first
            for k in (0..self.branch_count).rev() {
                let (angle, axis) = self.branch_rotation(k);
                // `joint` is Copy: each child rotates its own matrix
                pending.push(Node {
                    transform: joint.rotated(angle, axis),
                    remaining: node.remaining - 1,
                    generation: node.generation + 1,
                });
            }
        }
    }

    /// Walk from `root` and collect every instruction
    pub fn collect(&self, root: Mat4) -> Vec<DrawInstruction> {
        let capacity = usize::try_from(self.instruction_count()).unwrap_or(usize::MAX).min(1 << 20);
        let mut out = Vec::with_capacity(capacity);
        self.walk(root, &mut |instruction| out.push(instruction));
        out
    }

    /// Emit one node's trunk and joint, returning the joint transform
    fn emit<F>(&self, node: &Node, sink: &mut F) -> Mat4
    where
        F: FnMut(DrawInstruction),
    {
        let Node { transform, generation, .. } = *node;
        sink(DrawInstruction { mesh: MeshKind::Trunk, transform, generation });

        let base = if self.shrink {
            transform.scaled(Vec3::splat(SHRINK_FACTOR))
        } else {
            transform
        };
        let joint = base.translated(Vec3::new(0.0, self.spacing, 0.0));

        sink(DrawInstruction { mesh: MeshKind::Joint, transform: joint, generation });
        joint
    }
}
