use web_sys::{WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlUniformLocation, WebGlVertexArrayObject};

use crate::error::RenderError;
use crate::math::Mat4;
use crate::mesh::vertex::VERTEX_STRIDE_BYTES;
use super::shaders::*;
use super::webgl::WebGLContext;
use super::{DrawMode, MeshHandle, RenderBackend};

/// Cached uniform locations for the color shader
struct ColorUniforms {
    model_view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
}

/// One uploaded mesh
struct GpuMesh {
    vao: WebGlVertexArrayObject,
    vertex_buffer: WebGlBuffer,
    index_buffer: Option<WebGlBuffer>,
    /// Index count when indexed, vertex count otherwise
    count: i32,
}

/// WebGL2 implementation of [`RenderBackend`]
pub struct RenderPipeline {
    ctx: WebGLContext,
    program: WebGlProgram,
    uniforms: ColorUniforms,

    // Slot per handle; released slots are reused
    meshes: Vec<Option<GpuMesh>>,

    width: i32,
    height: i32,
}

impl RenderPipeline {
    pub fn new(gl: WebGl2RenderingContext, width: i32, height: i32) -> Result<Self, RenderError> {
        let ctx = WebGLContext::new(gl);

        let program = ctx.create_program(COLOR_VERTEX_SHADER, COLOR_FRAGMENT_SHADER)?;
        let uniforms = ColorUniforms {
            model_view: ctx.get_uniform_location(&program, "u_model_view"),
            projection: ctx.get_uniform_location(&program, "u_projection"),
        };

        Ok(Self {
            ctx,
            program,
            uniforms,
            meshes: Vec::new(),
            width,
            height,
        })
    }

    /// Resize the render target
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    fn free_slot(&mut self) -> usize {
        match self.meshes.iter().position(Option::is_none) {
            Some(slot) => slot,
            None => {
                self.meshes.push(None);
                self.meshes.len() - 1
            }
        }
    }

    fn delete(&self, mesh: GpuMesh) {
        let gl = &self.ctx.gl;
        gl.delete_vertex_array(Some(&mesh.vao));
        gl.delete_buffer(Some(&mesh.vertex_buffer));
        if let Some(ref indices) = mesh.index_buffer {
            gl.delete_buffer(Some(indices));
        }
    }
}

impl RenderBackend for RenderPipeline {
    fn upload_mesh(&mut self, vertices: &[f32], indices: Option<&[u32]>) -> Result<MeshHandle, RenderError> {
        let vao = self.ctx.create_vao()?;
        let gl = &self.ctx.gl;
        gl.bind_vertex_array(Some(&vao));

        let vertex_buffer = match self.ctx.create_buffer_f32(vertices, WebGl2RenderingContext::STATIC_DRAW) {
            Ok(buffer) => buffer,
            Err(e) => {
                gl.bind_vertex_array(None);
                gl.delete_vertex_array(Some(&vao));
                return Err(e);
            }
        };

        // Layout: position(3) + color(4) = 7 floats
        gl.enable_vertex_attrib_array(POSITION_LOCATION);
        gl.vertex_attrib_pointer_with_i32(POSITION_LOCATION, 3, WebGl2RenderingContext::FLOAT, false, VERTEX_STRIDE_BYTES, 0);
        gl.enable_vertex_attrib_array(COLOR_LOCATION);
        gl.vertex_attrib_pointer_with_i32(COLOR_LOCATION, 4, WebGl2RenderingContext::FLOAT, false, VERTEX_STRIDE_BYTES, 12);

        let index_buffer = match indices {
            Some(data) => match self.ctx.create_index_buffer(data, WebGl2RenderingContext::STATIC_DRAW) {
                Ok(buffer) => Some(buffer),
                Err(e) => {
                    gl.bind_vertex_array(None);
                    gl.delete_vertex_array(Some(&vao));
                    gl.delete_buffer(Some(&vertex_buffer));
                    return Err(e);
                }
            },
            None => None,
        };

        gl.bind_vertex_array(None);
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);

        let count = match indices {
            Some(data) => data.len(),
            None => vertices.len() / crate::mesh::VERTEX_STRIDE,
        } as i32;

        let slot = self.free_slot();
        self.meshes[slot] = Some(GpuMesh { vao, vertex_buffer, index_buffer, count });
        Ok(MeshHandle(slot as u32))
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        if let Some(mesh) = self.meshes.get_mut(handle.0 as usize).and_then(Option::take) {
            self.delete(mesh);
        }
    }

    fn begin_frame(&mut self, projection: &Mat4) {
        self.ctx.viewport(0, 0, self.width, self.height);
        self.ctx.clear(0.0, 0.0, 0.0, 1.0);
        self.ctx.enable_depth_test();

        self.ctx.gl.use_program(Some(&self.program));
        self.ctx.uniform_matrix4fv(self.uniforms.projection.as_ref(), projection.as_slice());
    }

    fn draw(&mut self, handle: MeshHandle, transform: &Mat4, mode: DrawMode) -> Result<(), RenderError> {
        let mesh = self
            .meshes
            .get(handle.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(RenderError::UnknownMesh(handle))?;
        let gl = &self.ctx.gl;

        self.ctx.uniform_matrix4fv(self.uniforms.model_view.as_ref(), transform.as_slice());
        gl.bind_vertex_array(Some(&mesh.vao));

        match (mode, mesh.index_buffer.is_some()) {
            (DrawMode::Triangles, true) => gl.draw_elements_with_i32(
                WebGl2RenderingContext::TRIANGLES,
                mesh.count,
                WebGl2RenderingContext::UNSIGNED_INT,
                0,
            ),
            (DrawMode::Triangles, false) => gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, mesh.count),
            (DrawMode::TriangleStrip, _) => gl.draw_arrays(WebGl2RenderingContext::TRIANGLE_STRIP, 0, mesh.count),
            (DrawMode::TriangleFan, _) => gl.draw_arrays(WebGl2RenderingContext::TRIANGLE_FAN, 0, mesh.count),
        }

        gl.bind_vertex_array(None);
        Ok(())
    }
}
