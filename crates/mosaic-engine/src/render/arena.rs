use std::ops::Range;

use crate::batch::Vertex;

const VERTEX_SIZE: u64 = std::mem::size_of::<Vertex>() as u64;
const INDEX_SIZE: u64 = std::mem::size_of::<u32>() as u64;

/// Where an uploaded draw landed in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ArenaSpan {
    /// Added to every index by `draw_indexed`.
    pub base_vertex: i32,
    pub indices: Range<u32>,
}

/// Per-frame vertex and index storage.
///
/// Every draw of a frame appends at the cursors instead of overwriting from
/// offset zero: queued writes all land before the frame's command buffer
/// runs, so reusing a region would corrupt earlier passes. When a draw does
/// not fit, both buffers are replaced by larger ones and the cursors restart;
/// passes already recorded keep the old buffers alive.
pub(super) struct FrameArena {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    vertex_capacity: u64,
    index_capacity: u64,
    vertex_cursor: u64,
    index_cursor: u64,
}

impl FrameArena {
    pub(super) fn new(device: &wgpu::Device, vertices: u64, indices: u64) -> Self {
        let vertex_capacity = vertices.max(1);
        let index_capacity = indices.max(1);
        Self {
            vbo: create_buffer(device, "mosaic arena vbo", vertex_capacity * VERTEX_SIZE, wgpu::BufferUsages::VERTEX),
            ibo: create_buffer(device, "mosaic arena ibo", index_capacity * INDEX_SIZE, wgpu::BufferUsages::INDEX),
            vertex_capacity,
            index_capacity,
            vertex_cursor: 0,
            index_cursor: 0,
        }
    }

    /// Rewinds the cursors. Call once per frame, before the first upload.
    pub(super) fn reset(&mut self) {
        self.vertex_cursor = 0;
        self.index_cursor = 0;
    }

    pub(super) fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vbo
    }

    pub(super) fn index_buffer(&self) -> &wgpu::Buffer {
        &self.ibo
    }

    pub(super) fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> ArenaSpan {
        let (nv, ni) = (vertices.len() as u64, indices.len() as u64);

        if self.vertex_cursor + nv > self.vertex_capacity {
            self.vertex_capacity = grown_capacity(self.vertex_capacity, nv);
            self.vbo = create_buffer(device, "mosaic arena vbo", self.vertex_capacity * VERTEX_SIZE, wgpu::BufferUsages::VERTEX);
            self.vertex_cursor = 0;
            log::debug!("vertex arena grown to {} vertices", self.vertex_capacity);
        }
        if self.index_cursor + ni > self.index_capacity {
            self.index_capacity = grown_capacity(self.index_capacity, ni);
            self.ibo = create_buffer(device, "mosaic arena ibo", self.index_capacity * INDEX_SIZE, wgpu::BufferUsages::INDEX);
            self.index_cursor = 0;
            log::debug!("index arena grown to {} indices", self.index_capacity);
        }

        queue.write_buffer(&self.vbo, self.vertex_cursor * VERTEX_SIZE, bytemuck::cast_slice(vertices));
        queue.write_buffer(&self.ibo, self.index_cursor * INDEX_SIZE, bytemuck::cast_slice(indices));

        let span = ArenaSpan {
            base_vertex: self.vertex_cursor as i32,
            indices: self.index_cursor as u32..(self.index_cursor + ni) as u32,
        };
        self.vertex_cursor += nv;
        self.index_cursor += ni;
        span
    }
}

fn create_buffer(device: &wgpu::Device, label: &str, size: u64, usage: wgpu::BufferUsages) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Capacity after growing `current` so one upload of `needed` elements fits
/// an empty buffer: at least double, rounded up to a power of two.
fn grown_capacity(current: u64, needed: u64) -> u64 {
    needed.max(current.saturating_mul(2)).next_power_of_two()
}
