use crate::coords::ScissorRect;

use super::geometry::Geometry;
use super::slots::TextureSlots;

/// Everything a [`Batcher`](super::Batcher) mutates between flushes.
#[derive(Debug, Default)]
pub(super) struct BatchState {
    pub geometry: Geometry,
    pub slots: TextureSlots,

    /// Saved scissors; the top is the one `pop_scissor` restores.
    pub scissor_stack: Vec<ScissorRect>,
    /// Clip of the batch being built, already intersected with every ancestor.
    pub current_scissor: ScissorRect,

    /// Draw calls issued since the last reset (geometry flushes + text draws).
    pub draw_calls: u32,
    pub frame_active: bool,
}

impl BatchState {
    pub fn new() -> Self {
        Self {
            slots: TextureSlots::new(),
            ..Self::default()
        }
    }

    /// Drops pending geometry and per-frame state, keeping allocations.
    pub fn reset_frame(&mut self, root: ScissorRect) {
        self.geometry.clear();
        self.slots.clear();
        self.scissor_stack.clear();
        self.current_scissor = root;
        self.draw_calls = 0;
        self.frame_active = true;
    }

    pub fn metrics(&self) -> BatchMetrics {
        BatchMetrics {
            pending_vertices: self.geometry.vertices().len(),
            pending_indices: self.geometry.indices().len(),
            pending_textures: self.slots.len(),
            draw_calls: self.draw_calls,
            scissor_depth: self.scissor_stack.len(),
        }
    }
}

/// Snapshot of batcher counters, e.g. for a profiling overlay.
///
/// `pending_*` describe only the batch not yet flushed; `draw_calls`
/// accumulates over the frame until reset.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BatchMetrics {
    pub pending_vertices: usize,
    pub pending_indices: usize,
    pub pending_textures: usize,
    pub draw_calls: u32,
    pub scissor_depth: usize,
}
