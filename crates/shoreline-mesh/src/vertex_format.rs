//! GPU vertex formats for the land and water surfaces and their `wgpu` layouts.
//!
//! ## Terrain (36 bytes)
//!
//! | Location | Offset | Format    | Field    |
//! |----------|--------|-----------|----------|
//! | 0        | 0      | Float32x3 | position |
//! | 1        | 12     | Float32x3 | normal   |
//! | 2        | 24     | Float32x3 | color    |
//!
//! Terrain normals are flat per triangle and carried by the triangle's first
//! vertex, so terrain pipelines must interpolate the normal with
//! `@interpolate(flat)`, whose sampling takes the first vertex.
//!
//! ## Water (12 bytes)
//!
//! | Location | Offset | Format    | Field    |
//! |----------|--------|-----------|----------|
//! | 0        | 0      | Float32x2 | position (x, z) |
//! | 1        | 8      | Sint8x2   | offset to first triangle mate |
//! | 2        | 10     | Sint8x2   | offset to second triangle mate |

use std::mem;

use bytemuck::{Pod, Zeroable};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// A land vertex: position, one of its quad's two flat normals, and ramp color.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

static_assertions::assert_eq_size!(TerrainVertex, [u8; 36]);

/// A water vertex.
///
/// The water surface has no CPU-side normals. Each vertex instead records the
/// grid offsets to the other two corners of its triangle so the vertex stage
/// can displace all three consistently and rebuild the face normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct WaterVertex {
    /// Grid position on the XZ plane. Y is the water level, supplied as a uniform.
    pub position: [f32; 2],
    /// Offset (dx, dz) to the first triangle mate.
    pub partner1: [i8; 2],
    /// Offset (dx, dz) to the second triangle mate.
    pub partner2: [i8; 2],
}

static_assertions::assert_eq_size!(WaterVertex, [u8; 12]);

impl WaterVertex {
    /// Grid position as exact floats. Water corners always sit on integer grid points.
    pub fn new(x: u32, z: u32, partner1: [i8; 2], partner2: [i8; 2]) -> Self {
        Self {
            position: [x as f32, z as f32],
            partner1,
            partner2,
        }
    }
}

pub const TERRAIN_VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 24,
        shader_location: 2,
    },
];

pub const TERRAIN_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<TerrainVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &TERRAIN_VERTEX_ATTRIBUTES,
};

pub const WATER_VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Sint8x2,
        offset: 8,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Sint8x2,
        offset: 10,
        shader_location: 2,
    },
];

pub const WATER_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<WaterVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &WATER_VERTEX_ATTRIBUTES,
};

const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[2].offset + 12 == TERRAIN_VERTEX_LAYOUT.array_stride);
const _: () = assert!(WATER_VERTEX_ATTRIBUTES[2].offset + 2 == WATER_VERTEX_LAYOUT.array_stride);
