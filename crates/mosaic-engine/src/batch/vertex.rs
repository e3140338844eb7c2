use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;

/// One batched vertex.
///
/// Layout (24 bytes):
///
///  offset  0  x, y       f32 × 2   screen-space position (logical px)
///  offset  8  u, v       f32 × 2   texture coordinate in [0, 1]
///  offset 16  color      u32       packed straight-alpha RGBA (see `paint::pack_rgba`)
///  offset 20  tex_index  f32       slot (0..8) of the texture this vertex samples
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
    pub color: u32,
    pub tex_index: f32,
}

impl Vertex {
    #[inline]
    pub fn new(pos: Vec2, uv: [f32; 2], fill: Fill) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            u: uv[0],
            v: uv[1],
            color: fill.color,
            tex_index: fill.tex_index,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Per-primitive vertex attributes that do not vary across the shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fill {
    /// Packed RGBA.
    pub color: u32,
    /// Texture slot, stored as `f32` because that is how the shader reads it.
    pub tex_index: f32,
}

impl Fill {
    #[inline]
    pub fn new(color: u32, slot: u8) -> Self {
        Self { color, tex_index: slot as f32 }
    }
}
