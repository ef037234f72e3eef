//! The owning context for configuration, cached meshes and the frame clock
//!
//! Setters replace a whole settings object at once. A candidate is validated
//! and every derived value built before anything is assigned, so a rejected
//! edit leaves the previous configuration and meshes exactly as they were.

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animation::FrameClock;
use crate::config::{Placement, SceneConfig};
use crate::error::ConfigError;
use crate::fractal::{DrawInstruction, FractalConfig, FractalTraverser};
use crate::math::Mat4;
use crate::mesh::{CylinderGenerator, CylinderMesh, CylinderParams, SphereGenerator, SphereMesh, SphereParams};

/// Walks above this many instructions per frame get a warning
const HEAVY_FRAME: u64 = 1 << 20;

/// Which meshes a setter rebuilt and the backend must re-upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Regenerated {
    pub sphere: bool,
    pub cylinder: bool,
}

impl Regenerated {
    pub const NONE: Regenerated = Regenerated { sphere: false, cylinder: false };

    pub fn any(&self) -> bool {
        self.sphere || self.cylinder
    }
}

pub struct Scene {
    config: SceneConfig,
    sphere: Rc<SphereMesh>,
    cylinder: Rc<CylinderMesh>,
    traverser: FractalTraverser,
    clock: FrameClock,
    rng: StdRng,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(|e| rejected("scene", e))?;

        let mut rng = seeded_rng(config.seed);
        let sphere = SphereGenerator::new(config.sphere)?.generate(&mut rng);
        let cylinder = CylinderGenerator::new(config.cylinder)?.generate(&mut rng);
        let traverser = FractalTraverser::new(&config.fractal, config.cylinder.height, config.sphere.radius)?;

        log::info!(
            "scene ready: sphere {} vertices, cylinder {} vertices, {} draw instructions per frame",
            sphere.vertex_count(),
            cylinder.vertex_count(),
            traverser.instruction_count()
        );

        Ok(Self {
            config,
            sphere: Rc::new(sphere),
            cylinder: Rc::new(cylinder),
            traverser,
            clock: FrameClock::new(),
            rng,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Shared handle to the current sphere mesh
    pub fn sphere(&self) -> Rc<SphereMesh> {
        Rc::clone(&self.sphere)
    }

    /// Shared handle to the current cylinder mesh
    pub fn cylinder(&self) -> Rc<CylinderMesh> {
        Rc::clone(&self.cylinder)
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    /// Replace the sphere settings; the mesh is rebuilt only if they changed
    pub fn set_sphere(&mut self, params: SphereParams) -> Result<Regenerated, ConfigError> {
        let generator = SphereGenerator::new(params).map_err(|e| rejected("sphere", e))?;
        let traverser = FractalTraverser::new(&self.config.fractal, self.config.cylinder.height, params.radius)?;

        let changed = params != self.config.sphere;
        if changed {
            let mesh = generator.generate(&mut self.rng);
            log::info!("regenerated sphere: {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count());
            self.sphere = Rc::new(mesh);
        }

        self.config.sphere = params;
        self.traverser = traverser;
        Ok(Regenerated { sphere: changed, cylinder: false })
    }

    /// Replace the cylinder settings; the mesh is rebuilt only if they changed
    pub fn set_cylinder(&mut self, params: CylinderParams) -> Result<Regenerated, ConfigError> {
        let generator = CylinderGenerator::new(params).map_err(|e| rejected("cylinder", e))?;
        let traverser = FractalTraverser::new(&self.config.fractal, params.height, self.config.sphere.radius)?;

        let changed = params != self.config.cylinder;
        if changed {
            let mesh = generator.generate(&mut self.rng);
            log::info!("regenerated cylinder: {} segments, {} vertices", params.segments, mesh.vertex_count());
            self.cylinder = Rc::new(mesh);
        }

        self.config.cylinder = params;
        self.traverser = traverser;
        Ok(Regenerated { sphere: false, cylinder: changed })
    }

    /// Replace the fractal settings; never touches the meshes
    pub fn set_fractal(&mut self, fractal: FractalConfig) -> Result<(), ConfigError> {
        let traverser = FractalTraverser::new(&fractal, self.config.cylinder.height, self.config.sphere.radius)
            .map_err(|e| rejected("fractal", e))?;

        let count = traverser.instruction_count();
        if count > HEAVY_FRAME {
            log::warn!("fractal depth {} x {} branches emits {} instructions per frame", fractal.depth, fractal.branch_count, count);
        } else {
            log::debug!("fractal set to depth {} x {} branches ({} instructions)", fractal.depth, fractal.branch_count, count);
        }

        self.config.fractal = fractal;
        self.traverser = traverser;
        Ok(())
    }

    /// Replace position and spin axis
    pub fn set_placement(&mut self, placement: Placement) -> Result<(), ConfigError> {
        placement.validate().map_err(|e| rejected("placement", e))?;
        log::debug!("placement set to {:?} spinning about {:?}", placement.position, placement.rotation_axis);
        self.config.placement = placement;
        Ok(())
    }

    /// Replace everything at once, regenerating only what changed
    pub fn set_config(&mut self, config: SceneConfig) -> Result<Regenerated, ConfigError> {
        config.validate().map_err(|e| rejected("scene", e))?;
        let sphere_gen = SphereGenerator::new(config.sphere)?;
        let cylinder_gen = CylinderGenerator::new(config.cylinder)?;
        let traverser = FractalTraverser::new(&config.fractal, config.cylinder.height, config.sphere.radius)?;

        if config.seed != self.config.seed {
            self.rng = seeded_rng(config.seed);
        }

        let regenerated = Regenerated {
            sphere: config.sphere != self.config.sphere,
            cylinder: config.cylinder != self.config.cylinder,
        };
        if regenerated.sphere {
            self.sphere = Rc::new(sphere_gen.generate(&mut self.rng));
        }
        if regenerated.cylinder {
            self.cylinder = Rc::new(cylinder_gen.generate(&mut self.rng));
        }
        if regenerated.any() {
            log::info!("scene config replaced, regenerated {:?}", regenerated);
        }

        self.config = config;
        self.traverser = traverser;
        Ok(regenerated)
    }

    pub fn instruction_count(&self) -> u64 {
        self.traverser.instruction_count()
    }

    /// Root of the hierarchy at the clock's current angle
    pub fn root_transform(&self) -> Mat4 {
        self.config.placement.root_transform(self.clock.angle())
    }

    /// Instructions for the current angle without advancing the clock
    pub fn instructions(&self) -> Vec<DrawInstruction> {
        self.traverser.collect(self.root_transform())
    }

    /// Stream the current frame's instructions into `sink`
    pub fn walk<F>(&self, sink: &mut F)
    where
        F: FnMut(DrawInstruction),
    {
        self.traverser.walk(self.root_transform(), sink);
    }

    /// Emit this frame's instructions, then advance the clock by `dt`
    pub fn frame(&mut self, dt: f32) -> Vec<DrawInstruction> {
        let instructions = self.instructions();
        self.clock.advance(dt);
        instructions
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn rejected(what: &str, err: ConfigError) -> ConfigError {
    log::warn!("rejected {} settings, keeping previous: {}", what, err);
    err
}
