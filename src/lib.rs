use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod animation;
pub mod config;
pub mod error;
pub mod fractal;
pub mod math;
pub mod mesh;
pub mod render;
pub mod scene;

pub use config::{Placement, SceneConfig};
pub use error::{ConfigError, Error, RenderError};
pub use fractal::{BranchLayout, DrawInstruction, FractalConfig, FractalTraverser, MeshKind};
pub use scene::{Regenerated, Scene};

use math::Vec3;
use mesh::{ColorSpec, CylinderParams, SphereParams};
use render::{MeshSet, Projection, RenderPipeline};

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Spinning fractal tree exposed to JavaScript
#[wasm_bindgen]
pub struct FractalTree {
    scene: Scene,
    pipeline: RenderPipeline,
    meshes: MeshSet,
    projection: Projection,
}

#[wasm_bindgen]
impl FractalTree {
    /// Create a tree with default settings on `canvas`
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<FractalTree, JsValue> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or_else(|| RenderError::BackendUnavailable("webgl2 context not supported".to_string()))
            .map_err(to_js)?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| to_js(RenderError::BackendUnavailable("context is not WebGL2".to_string())))?;

        let mut pipeline = RenderPipeline::new(gl, width, height).map_err(to_js)?;
        let scene = Scene::new(SceneConfig::default()).map_err(to_js)?;
        let meshes = MeshSet::upload(&mut pipeline, &scene.sphere(), &scene.cylinder()).map_err(to_js)?;

        Ok(Self {
            scene,
            pipeline,
            meshes,
            projection: Projection::with_viewport(width, height),
        })
    }

    /// Replace the whole configuration from a YAML document
    #[wasm_bindgen]
    pub fn load_config(&mut self, yaml: &str) -> Result<(), JsValue> {
        let config = SceneConfig::from_yaml(yaml).map_err(|e| {
            log::warn!("rejected scene config: {}", e);
            to_js(e)
        })?;
        let regenerated = self.scene.set_config(config).map_err(to_js)?;
        self.sync_meshes(regenerated)
    }

    /// Current configuration as YAML
    #[wasm_bindgen]
    pub fn config_yaml(&self) -> Result<String, JsValue> {
        self.scene.config().to_yaml().map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_sphere(
        &mut self,
        smoothness: u32,
        radius: f32,
        r: f32,
        g: f32,
        b: f32,
        randomize: bool,
    ) -> Result<(), JsValue> {
        let params = SphereParams {
            smoothness,
            radius,
            color: ColorSpec { randomize, r, g, b, a: 1.0 },
        };
        let regenerated = self.scene.set_sphere(params).map_err(to_js)?;
        self.sync_meshes(regenerated)
    }

    #[wasm_bindgen]
    pub fn set_cylinder(
        &mut self,
        segments: u32,
        height: f32,
        r: f32,
        g: f32,
        b: f32,
        randomize: bool,
    ) -> Result<(), JsValue> {
        let params = CylinderParams {
            segments,
            height,
            color: ColorSpec { randomize, r, g, b, a: 1.0 },
        };
        let regenerated = self.scene.set_cylinder(params).map_err(to_js)?;
        self.sync_meshes(regenerated)
    }

    /// Depth and branches per joint; keeps layout and shrink
    #[wasm_bindgen]
    pub fn set_fractal(&mut self, depth: i32, branches: i32) -> Result<(), JsValue> {
        let fractal = FractalConfig {
            depth,
            branch_count: branches,
            ..self.scene.config().fractal
        };
        self.scene.set_fractal(fractal).map_err(to_js)
    }

    /// `mirrored` or `fan`
    #[wasm_bindgen]
    pub fn set_layout(&mut self, name: &str) -> Result<(), JsValue> {
        let layout: BranchLayout = name.parse().map_err(|e| {
            log::warn!("rejected fractal settings, keeping previous: {}", e);
            to_js(e)
        })?;
        let fractal = self.scene.config().fractal.with_layout(layout);
        self.scene.set_fractal(fractal).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_shrink(&mut self, shrink: bool) -> Result<(), JsValue> {
        let fractal = self.scene.config().fractal.with_shrink(shrink);
        self.scene.set_fractal(fractal).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_position(&mut self, x: f32, y: f32, z: f32) -> Result<(), JsValue> {
        let placement = Placement {
            position: Vec3::new(x, y, z),
            ..self.scene.config().placement
        };
        self.scene.set_placement(placement).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_rotation_axis(&mut self, x: f32, y: f32, z: f32) -> Result<(), JsValue> {
        let placement = Placement {
            rotation_axis: Vec3::new(x, y, z),
            ..self.scene.config().placement
        };
        self.scene.set_placement(placement).map_err(to_js)
    }

    /// Draw the current frame, then advance the clock by `dt`
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) -> Result<(), JsValue> {
        let instructions = self.scene.frame(dt);
        self.meshes
            .draw_frame(&mut self.pipeline, &self.projection, &instructions)
            .map_err(to_js)
    }

    /// Render from a `requestAnimationFrame` timestamp in milliseconds
    #[wasm_bindgen]
    pub fn render_at(&mut self, timestamp_ms: f64) -> Result<(), JsValue> {
        let dt = self.scene.clock_mut().tick(timestamp_ms);
        self.render(dt)
    }

    /// Number of draw instructions emitted per frame
    #[wasm_bindgen]
    pub fn instruction_count(&self) -> f64 {
        self.scene.instruction_count() as f64
    }

    /// Resize the canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) {
        self.pipeline.resize(width, height);
        self.projection = Projection::with_viewport(width, height);
    }
}

impl FractalTree {
    /// Push regenerated meshes to the GPU
    fn sync_meshes(&mut self, regenerated: Regenerated) -> Result<(), JsValue> {
        if regenerated.sphere {
            self.meshes
                .replace_sphere(&mut self.pipeline, &self.scene.sphere())
                .map_err(to_js)?;
        }
        if regenerated.cylinder {
            self.meshes
                .replace_cylinder(&mut self.pipeline, &self.scene.cylinder())
                .map_err(to_js)?;
        }
        Ok(())
    }
}

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}
