//! `wgpu`-backed mesh backend.
//!
//! Uploads happen immediately in [`MeshBackend::create_mesh`]. Draw requests
//! are queued and replayed into a render pass with
//! [`WgpuMeshBackend::encode_draw`], so the caller stays in charge of pipeline
//! and bind group selection.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::backend::{MeshBackend, MeshData, MeshError, MeshHandle};

/// A mesh resident on the GPU.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
    index_count: u32,
}

/// A draw request waiting to be encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingDraw {
    pub handle: MeshHandle,
    /// `None` for an indexed draw of the whole mesh.
    pub vertex_count: Option<u32>,
}

/// A [`MeshBackend`] that owns `wgpu` buffers.
pub struct WgpuMeshBackend {
    device: wgpu::Device,
    meshes: HashMap<MeshHandle, GpuMesh>,
    pending: Vec<PendingDraw>,
    next_id: u64,
}

impl WgpuMeshBackend {
    pub fn new(device: wgpu::Device) -> Self {
        Self {
            device,
            meshes: HashMap::new(),
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Draws queued since the last [`take_pending`](Self::take_pending).
    pub fn pending(&self) -> &[PendingDraw] {
        &self.pending
    }

    /// Take the queued draws, leaving the queue empty.
    pub fn take_pending(&mut self) -> Vec<PendingDraw> {
        std::mem::take(&mut self.pending)
    }

    /// Bind a queued draw's buffers and issue it.
    pub fn encode_draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        draw: &PendingDraw,
    ) -> Result<(), MeshError> {
        let mesh = self
            .meshes
            .get(&draw.handle)
            .ok_or(MeshError::UnknownHandle(draw.handle))?;
        // Empty buffers cannot be sliced.
        if mesh.vertex_count == 0 || draw.vertex_count == Some(0) {
            return Ok(());
        }

        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        match (draw.vertex_count, &mesh.index_buffer) {
            (None, Some(index_buffer)) => {
                pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
            (None, None) => pass.draw(0..mesh.vertex_count, 0..1),
            (Some(count), _) => pass.draw(0..count, 0..1),
        }
        Ok(())
    }

    /// Total GPU bytes held by live meshes.
    pub fn total_gpu_bytes(&self) -> u64 {
        self.meshes
            .values()
            .map(|m| m.vertex_buffer.size() + m.index_buffer.as_ref().map_or(0, |b| b.size()))
            .sum()
    }

    pub fn live_count(&self) -> usize {
        self.meshes.len()
    }
}

impl MeshBackend for WgpuMeshBackend {
    fn create_mesh(&mut self, label: &str, data: MeshData<'_>) -> Result<MeshHandle, MeshError> {
        data.validate()?;

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-vertices")),
                contents: data.vertices,
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = data.indices.map(|indices| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label}-indices")),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                })
        });

        let handle = MeshHandle::from_raw(self.next_id);
        self.next_id += 1;

        tracing::debug!(
            %handle,
            label,
            vertices = data.vertex_count(),
            indices = data.index_count(),
            "uploaded mesh"
        );

        self.meshes.insert(
            handle,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                vertex_count: data.vertex_count(),
                index_count: data.index_count(),
            },
        );
        Ok(handle)
    }

    fn render(&mut self, handle: MeshHandle) -> Result<(), MeshError> {
        if !self.meshes.contains_key(&handle) {
            return Err(MeshError::UnknownHandle(handle));
        }
        self.pending.push(PendingDraw {
            handle,
            vertex_count: None,
        });
        Ok(())
    }

    fn render_unindexed(&mut self, handle: MeshHandle, vertex_count: u32) -> Result<(), MeshError> {
        let mesh = self
            .meshes
            .get(&handle)
            .ok_or(MeshError::UnknownHandle(handle))?;
        if vertex_count > mesh.vertex_count {
            return Err(MeshError::DrawOutOfRange {
                requested: vertex_count,
                available: mesh.vertex_count,
            });
        }
        self.pending.push(PendingDraw {
            handle,
            vertex_count: Some(vertex_count),
        });
        Ok(())
    }

    fn delete(&mut self, handle: MeshHandle) -> Result<(), MeshError> {
        let mesh = self
            .meshes
            .remove(&handle)
            .ok_or(MeshError::UnknownHandle(handle))?;
        mesh.vertex_buffer.destroy();
        if let Some(index_buffer) = mesh.index_buffer {
            index_buffer.destroy();
        }
        self.pending.retain(|draw| draw.handle != handle);
        Ok(())
    }
}
