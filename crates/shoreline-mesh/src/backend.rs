//! The contract between mesh generation and whatever owns the graphics context.

use std::fmt;

use bytemuck::Pod;

/// Opaque reference to a mesh living in a [`MeshBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(u64);

impl MeshHandle {
    /// Wrap a backend-assigned id.
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The backend-assigned id.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MeshHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// Errors reported by a mesh backend.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MeshError {
    /// The handle was never created or has already been deleted.
    #[error("unknown mesh handle {0}")]
    UnknownHandle(MeshHandle),

    /// An index refers past the end of the vertex array.
    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: u32 },

    /// A draw asked for more vertices than the mesh holds.
    #[error("draw of {requested} vertices exceeds the {available} stored")]
    DrawOutOfRange { requested: u32, available: u32 },

    /// The vertex byte length is not a whole number of vertices.
    #[error("{len} vertex bytes is not a multiple of the {stride}-byte stride")]
    StrideMismatch { len: usize, stride: u32 },
}

/// Raw, borrowed mesh arrays handed to [`MeshBackend::create_mesh`].
#[derive(Clone, Copy, Debug)]
pub struct MeshData<'a> {
    /// Interleaved vertex bytes.
    pub vertices: &'a [u8],
    /// Size of one vertex in bytes.
    pub vertex_stride: u32,
    /// Triangle list indices, or `None` for a non-indexed mesh.
    pub indices: Option<&'a [u32]>,
}

impl<'a> MeshData<'a> {
    /// An indexed triangle list.
    pub fn indexed<V: Pod>(vertices: &'a [V], indices: &'a [u32]) -> Self {
        Self {
            vertices: bytemuck::cast_slice(vertices),
            vertex_stride: std::mem::size_of::<V>() as u32,
            indices: Some(indices),
        }
    }

    /// A non-indexed triangle list, drawn three vertices at a time.
    pub fn unindexed<V: Pod>(vertices: &'a [V]) -> Self {
        Self {
            vertices: bytemuck::cast_slice(vertices),
            vertex_stride: std::mem::size_of::<V>() as u32,
            indices: None,
        }
    }

    /// Number of whole vertices in [`vertices`](Self::vertices).
    pub fn vertex_count(&self) -> u32 {
        if self.vertex_stride == 0 {
            return 0;
        }
        (self.vertices.len() / self.vertex_stride as usize) as u32
    }

    /// Number of indices, zero for non-indexed meshes.
    pub fn index_count(&self) -> u32 {
        self.indices.map_or(0, |i| i.len() as u32)
    }

    /// Check that the arrays describe a drawable mesh.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.vertex_stride == 0 || self.vertices.len() % self.vertex_stride as usize != 0 {
            return Err(MeshError::StrideMismatch {
                len: self.vertices.len(),
                stride: self.vertex_stride,
            });
        }
        let vertex_count = self.vertex_count();
        if let Some(indices) = self.indices
            && let Some(&index) = indices.iter().find(|&&i| i >= vertex_count)
        {
            return Err(MeshError::IndexOutOfBounds {
                index,
                vertex_count,
            });
        }
        Ok(())
    }
}

/// Creates, draws, and releases meshes on the graphics-context thread.
///
/// Implementations are not required to be `Send`; only the thread that owns
/// the context ever calls them.
pub trait MeshBackend {
    /// Upload a mesh and return its handle.
    fn create_mesh(&mut self, label: &str, data: MeshData<'_>) -> Result<MeshHandle, MeshError>;

    /// Draw an indexed mesh in full.
    fn render(&mut self, handle: MeshHandle) -> Result<(), MeshError>;

    /// Draw the first `vertex_count` vertices of a mesh as a triangle list.
    fn render_unindexed(&mut self, handle: MeshHandle, vertex_count: u32)
    -> Result<(), MeshError>;

    /// Release a mesh. The handle is invalid afterwards.
    fn delete(&mut self, handle: MeshHandle) -> Result<(), MeshError>;
}
