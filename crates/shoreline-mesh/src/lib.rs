//! Mesh backend contract and GPU vertex formats shared by the terrain and water surfaces.
//!
//! Generation code produces plain vertex/index arrays off the graphics thread;
//! a [`MeshBackend`] turns them into opaque [`MeshHandle`]s on the thread that
//! owns the graphics context.

pub mod backend;
pub mod gpu;
pub mod headless;
pub mod vertex_format;

pub use backend::{MeshBackend, MeshData, MeshError, MeshHandle};
pub use gpu::{PendingDraw, WgpuMeshBackend};
pub use headless::{DrawRecord, HeadlessBackend, StoredMesh};
pub use vertex_format::{
    TERRAIN_VERTEX_ATTRIBUTES, TERRAIN_VERTEX_LAYOUT, TerrainVertex, WATER_VERTEX_ATTRIBUTES,
    WATER_VERTEX_LAYOUT, WaterVertex,
};
