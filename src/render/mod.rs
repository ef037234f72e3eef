//! Rendering contract and its WebGL2 implementation
//!
//! The traversal only produces [`DrawInstruction`]s. Anything that can upload
//! interleaved position/color buffers and draw them with a model matrix can
//! consume them through [`RenderBackend`].

pub mod webgl;
pub mod shaders;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod recording;

pub use webgl::WebGLContext;
pub use pipeline::RenderPipeline;

use crate::error::RenderError;
use crate::fractal::{DrawInstruction, MeshKind};
use crate::math::Mat4;
use crate::mesh::{CylinderMesh, SphereMesh};

/// Opaque reference to an uploaded mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub(crate) u32);

/// Primitive topology for a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Indexed triangle list
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// What the traversal needs from a graphics API
pub trait RenderBackend {
    /// Upload interleaved `position(3) + color(4)` vertices, optionally indexed
    fn upload_mesh(&mut self, vertices: &[f32], indices: Option<&[u32]>) -> Result<MeshHandle, RenderError>;

    /// Free a mesh; unknown handles are ignored
    fn release_mesh(&mut self, handle: MeshHandle);

    /// Clear the target and bind the projection for this frame
    fn begin_frame(&mut self, projection: &Mat4);

    /// Draw one instance of `handle` with the given model-view matrix
    fn draw(&mut self, handle: MeshHandle, transform: &Mat4, mode: DrawMode) -> Result<(), RenderError>;
}

/// Perspective parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: 45.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn with_viewport(width: i32, height: i32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Backend handles for the sphere and the three cylinder parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshSet {
    pub sphere: MeshHandle,
    pub cylinder_side: MeshHandle,
    pub cylinder_top: MeshHandle,
    pub cylinder_bottom: MeshHandle,
}

impl MeshSet {
    /// Upload both primitives
    pub fn upload<B: RenderBackend + ?Sized>(
        backend: &mut B,
        sphere: &SphereMesh,
        cylinder: &CylinderMesh,
    ) -> Result<Self, RenderError> {
        let sphere = backend.upload_mesh(&sphere.vertex_data(), Some(sphere.index_data()))?;
        let cylinder_side = backend.upload_mesh(&cylinder.side_data(), None)?;
        let cylinder_top = backend.upload_mesh(&cylinder.top_data(), None)?;
        let cylinder_bottom = backend.upload_mesh(&cylinder.bottom_data(), None)?;

        Ok(Self { sphere, cylinder_side, cylinder_top, cylinder_bottom })
    }

    /// Replace the sphere, releasing the old buffers only once the new
    /// upload succeeded
    pub fn replace_sphere<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        sphere: &SphereMesh,
    ) -> Result<(), RenderError> {
        let handle = backend.upload_mesh(&sphere.vertex_data(), Some(sphere.index_data()))?;
        backend.release_mesh(std::mem::replace(&mut self.sphere, handle));
        Ok(())
    }

    /// Replace all three cylinder parts
    pub fn replace_cylinder<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        cylinder: &CylinderMesh,
    ) -> Result<(), RenderError> {
        let side = backend.upload_mesh(&cylinder.side_data(), None)?;
        let top = match backend.upload_mesh(&cylinder.top_data(), None) {
            Ok(handle) => handle,
            Err(e) => {
                backend.release_mesh(side);
                return Err(e);
            }
        };
        let bottom = match backend.upload_mesh(&cylinder.bottom_data(), None) {
            Ok(handle) => handle,
            Err(e) => {
                backend.release_mesh(side);
                backend.release_mesh(top);
                return Err(e);
            }
        };

        backend.release_mesh(std::mem::replace(&mut self.cylinder_side, side));
        backend.release_mesh(std::mem::replace(&mut self.cylinder_top, top));
        backend.release_mesh(std::mem::replace(&mut self.cylinder_bottom, bottom));
        Ok(())
    }

    pub fn release<B: RenderBackend + ?Sized>(self, backend: &mut B) {
        backend.release_mesh(self.sphere);
        backend.release_mesh(self.cylinder_side);
        backend.release_mesh(self.cylinder_top);
        backend.release_mesh(self.cylinder_bottom);
    }

    /// A joint is one indexed draw; a trunk is side strip plus both caps
    pub fn draw<B: RenderBackend + ?Sized>(
        &self,
        backend: &mut B,
        instruction: &DrawInstruction,
    ) -> Result<(), RenderError> {
        let transform = &instruction.transform;
        match instruction.mesh {
            MeshKind::Joint => backend.draw(self.sphere, transform, DrawMode::Triangles),
            MeshKind::Trunk => {
                backend.draw(self.cylinder_side, transform, DrawMode::TriangleStrip)?;
                backend.draw(self.cylinder_top, transform, DrawMode::TriangleFan)?;
                backend.draw(self.cylinder_bottom, transform, DrawMode::TriangleFan)
            }
        }
    }

    /// Begin a frame and replay every instruction
    pub fn draw_frame<B: RenderBackend + ?Sized>(
        &self,
        backend: &mut B,
        projection: &Projection,
        instructions: &[DrawInstruction],
    ) -> Result<(), RenderError> {
        backend.begin_frame(&projection.matrix());
        instructions.iter().try_for_each(|instruction| self.draw(backend, instruction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::recording::{Call, RecordingBackend};
    use crate::fractal::{FractalConfig, FractalTraverser};
    use crate::mesh::{ColorSpec, CylinderGenerator, CylinderParams, SphereGenerator, SphereParams};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn meshes() -> (SphereMesh, CylinderMesh) {
        let mut rng = StdRng::seed_from_u64(5);
        let sphere = SphereGenerator::new(SphereParams {
            smoothness: 4,
            radius: 1.0,
            color: ColorSpec::fixed(1.0, 1.0, 1.0, 1.0),
        })
        .unwrap()
        .generate(&mut rng);
        let cylinder = CylinderGenerator::new(CylinderParams {
            segments: 5,
            height: 2.0,
            color: ColorSpec::random(),
        })
        .unwrap()
        .generate(&mut rng);
        (sphere, cylinder)
    }

    #[test]
    fn test_upload_shapes() {
        let (sphere, cylinder) = meshes();
        let mut backend = RecordingBackend::default();
        let set = MeshSet::upload(&mut backend, &sphere, &cylinder).unwrap();

        let sphere_upload = backend.mesh(set.sphere).unwrap();
        assert_eq!(sphere_upload.vertices.len(), 25 * 7);
        assert_eq!(sphere_upload.indices.as_ref().map(Vec::len), Some(96));

        let side = backend.mesh(set.cylinder_side).unwrap();
        assert_eq!(side.vertices.len(), 12 * 7);
        assert!(side.indices.is_none());
        assert_eq!(backend.mesh(set.cylinder_top).unwrap().vertices.len(), 6 * 7);
    }

    #[test]
    fn test_trunk_draws_strip_and_two_fans() {
        let (sphere, cylinder) = meshes();
        let mut backend = RecordingBackend::default();
        let set = MeshSet::upload(&mut backend, &sphere, &cylinder).unwrap();

        let traverser = FractalTraverser::new(&FractalConfig::new(0, 2), 2.0, 1.0).unwrap();
        let instructions = traverser.collect(Mat4::identity());
        backend.calls.clear();
        set.draw_frame(&mut backend, &Projection::default(), &instructions).unwrap();

        let modes: Vec<_> = backend
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw { handle, mode, .. } => Some((*handle, *mode)),
                _ => None,
            })
            .collect();
        assert_eq!(
            modes,
            vec![
                (set.cylinder_side, DrawMode::TriangleStrip),
                (set.cylinder_top, DrawMode::TriangleFan),
                (set.cylinder_bottom, DrawMode::TriangleFan),
                (set.sphere, DrawMode::Triangles),
            ]
        );
        assert!(matches!(backend.calls[0], Call::BeginFrame(_)));
        assert_eq!(backend.calls.len(), 5);
    }

    #[test]
    fn test_replace_releases_old_handles() {
        let (sphere, cylinder) = meshes();
        let mut backend = RecordingBackend::default();
        let mut set = MeshSet::upload(&mut backend, &sphere, &cylinder).unwrap();
        let old = set;

        set.replace_sphere(&mut backend, &sphere).unwrap();
        set.replace_cylinder(&mut backend, &cylinder).unwrap();

        assert_ne!(set.sphere, old.sphere);
        assert!(backend.mesh(old.sphere).is_none());
        assert!(backend.mesh(old.cylinder_side).is_none());
        assert!(backend.mesh(set.cylinder_bottom).is_some());
        assert_eq!(backend.live_meshes(), 4);
    }

    #[test]
    fn test_failed_replace_keeps_previous_meshes() {
        let (sphere, cylinder) = meshes();
        let mut backend = RecordingBackend::default();
        let mut set = MeshSet::upload(&mut backend, &sphere, &cylinder).unwrap();
        let old = set;

        // Side part uploads, top part fails
        backend.fail_after = Some(5);
        assert!(set.replace_cylinder(&mut backend, &cylinder).is_err());

        assert_eq!(set, old);
        assert_eq!(backend.live_meshes(), 4);
        assert!(backend.mesh(old.cylinder_side).is_some());
    }

    #[test]
    fn test_draw_unknown_mesh_fails() {
        let (sphere, cylinder) = meshes();
        let mut backend = RecordingBackend::default();
        let set = MeshSet::upload(&mut backend, &sphere, &cylinder).unwrap();
        set.release(&mut backend);

        let instruction = DrawInstruction {
            mesh: MeshKind::Joint,
            transform: Mat4::identity(),
            generation: 0,
        };
        assert_eq!(
            set.draw(&mut backend, &instruction),
            Err(RenderError::UnknownMesh(set.sphere))
        );
    }

    #[test]
    fn test_projection_aspect() {
        let p = Projection::with_viewport(800, 400);
        assert_eq!(p.aspect, 2.0);
        assert!((p.fov_y - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
        assert_eq!(Projection::with_viewport(10, 0).aspect, 10.0);
    }
}
