// src/core/renderer/quad.rs
use bytemuck::{Pod, Zeroable};

/// Interleaved position + texcoord, matching attribute locations 0 and 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

pub const POSITION_LOCATION: u32 = 0;
pub const TEX_COORD_LOCATION: u32 = 1;

pub const STRIDE: usize = std::mem::size_of::<Vertex>();
pub const TEX_COORD_OFFSET: usize = std::mem::offset_of!(Vertex, tex_coord);

/// Centered quad in clip space, drawn as a triangle fan.
/// Texcoord (0, 0) is the top-left texel; image rows are uploaded top row first.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex { position: [-0.5, 0.5], tex_coord: [0.0, 0.0] },  // top-left
    Vertex { position: [0.5, 0.5], tex_coord: [1.0, 0.0] },   // top-right
    Vertex { position: [0.5, -0.5], tex_coord: [1.0, 1.0] },  // bottom-right
    Vertex { position: [-0.5, -0.5], tex_coord: [0.0, 1.0] }, // bottom-left
];

pub fn quad_bytes() -> &'static [u8] {
    bytemuck::cast_slice(&QUAD_VERTICES)
}
