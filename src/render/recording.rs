//! In-memory backend that records every call, for tests

use std::collections::HashMap;

use crate::error::RenderError;
use crate::math::Mat4;
use super::{DrawMode, MeshHandle, RenderBackend};

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedMesh {
    pub vertices: Vec<f32>,
    pub indices: Option<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload(MeshHandle),
    Release(MeshHandle),
    BeginFrame(Mat4),
    Draw { handle: MeshHandle, transform: Mat4, mode: DrawMode },
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    meshes: HashMap<MeshHandle, UploadedMesh>,
    next_id: u32,
    pub calls: Vec<Call>,
    /// Fail every upload after this many have succeeded
    pub fail_after: Option<usize>,
    uploads: usize,
}

impl RecordingBackend {
    pub fn mesh(&self, handle: MeshHandle) -> Option<&UploadedMesh> {
        self.meshes.get(&handle)
    }

    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }
}

impl RenderBackend for RecordingBackend {
    fn upload_mesh(&mut self, vertices: &[f32], indices: Option<&[u32]>) -> Result<MeshHandle, RenderError> {
        if self.fail_after.is_some_and(|limit| self.uploads >= limit) {
            return Err(RenderError::BufferCreation("vertex buffer"));
        }
        self.uploads += 1;

        let handle = MeshHandle(self.next_id);
        self.next_id += 1;
        self.meshes.insert(
            handle,
            UploadedMesh {
                vertices: vertices.to_vec(),
                indices: indices.map(<[u32]>::to_vec),
            },
        );
        self.calls.push(Call::Upload(handle));
        Ok(handle)
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        self.meshes.remove(&handle);
        self.calls.push(Call::Release(handle));
    }

    fn begin_frame(&mut self, projection: &Mat4) {
        self.calls.push(Call::BeginFrame(*projection));
    }

    fn draw(&mut self, handle: MeshHandle, transform: &Mat4, mode: DrawMode) -> Result<(), RenderError> {
        if !self.meshes.contains_key(&handle) {
            return Err(RenderError::UnknownMesh(handle));
        }
        self.calls.push(Call::Draw { handle, transform: *transform, mode });
        Ok(())
    }
}
