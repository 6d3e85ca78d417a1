//! In-memory mesh backend for tests and windowless runs.
//!
//! Keeps a copy of every uploaded array and a log of draw calls so callers can
//! inspect exactly what would have reached the GPU.

use std::collections::HashMap;

use crate::backend::{MeshBackend, MeshData, MeshError, MeshHandle};

/// A mesh held by [`HeadlessBackend`].
#[derive(Clone, Debug)]
pub struct StoredMesh {
    pub label: String,
    pub vertices: Vec<u8>,
    pub vertex_stride: u32,
    pub vertex_count: u32,
    pub indices: Option<Vec<u32>>,
}

impl StoredMesh {
    /// Reinterpret the stored vertex bytes as `V`.
    ///
    /// Returns `None` if `V` does not match the stored stride.
    pub fn vertices_as<V: bytemuck::Pod>(&self) -> Option<Vec<V>> {
        if std::mem::size_of::<V>() != self.vertex_stride as usize {
            return None;
        }
        Some(
            self.vertices
                .chunks_exact(self.vertex_stride as usize)
                .map(bytemuck::pod_read_unaligned)
                .collect(),
        )
    }
}

/// One recorded draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawRecord {
    Indexed { handle: MeshHandle, index_count: u32 },
    Unindexed { handle: MeshHandle, vertex_count: u32 },
}

/// A [`MeshBackend`] that never touches a GPU.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    meshes: HashMap<MeshHandle, StoredMesh>,
    draws: Vec<DrawRecord>,
    next_id: u64,
    created: u64,
    deleted: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored mesh for a live handle.
    pub fn mesh(&self, handle: MeshHandle) -> Option<&StoredMesh> {
        self.meshes.get(&handle)
    }

    /// Number of meshes created and not yet deleted.
    pub fn live_count(&self) -> usize {
        self.meshes.len()
    }

    /// Total number of meshes ever created.
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Total number of meshes deleted.
    pub fn deleted_count(&self) -> u64 {
        self.deleted
    }

    /// Draw calls recorded since the last [`clear_draws`](Self::clear_draws).
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn clear_draws(&mut self) {
        self.draws.clear();
    }
}

impl MeshBackend for HeadlessBackend {
    fn create_mesh(&mut self, label: &str, data: MeshData<'_>) -> Result<MeshHandle, MeshError> {
        data.validate()?;

        let handle = MeshHandle::from_raw(self.next_id);
        self.next_id += 1;
        self.created += 1;

        tracing::debug!(
            %handle,
            label,
            vertices = data.vertex_count(),
            indices = data.index_count(),
            "headless mesh created"
        );

        self.meshes.insert(
            handle,
            StoredMesh {
                label: label.to_string(),
                vertices: data.vertices.to_vec(),
                vertex_stride: data.vertex_stride,
                vertex_count: data.vertex_count(),
                indices: data.indices.map(<[u32]>::to_vec),
            },
        );
        Ok(handle)
    }

    fn render(&mut self, handle: MeshHandle) -> Result<(), MeshError> {
        let mesh = self
            .meshes
            .get(&handle)
            .ok_or(MeshError::UnknownHandle(handle))?;
        self.draws.push(DrawRecord::Indexed {
            handle,
            index_count: mesh.indices.as_ref().map_or(0, |i| i.len() as u32),
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
        self.draws.push(DrawRecord::Unindexed {
            handle,
            vertex_count,
        });
        Ok(())
    }

    fn delete(&mut self, handle: MeshHandle) -> Result<(), MeshError> {
        self.meshes
            .remove(&handle)
            .ok_or(MeshError::UnknownHandle(handle))?;
        self.deleted += 1;
        Ok(())
    }
}
