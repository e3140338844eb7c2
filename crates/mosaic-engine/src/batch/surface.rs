use crate::backend::TextureId;
use crate::coords::{Rect, ScissorRect, UvRect, Vec2};
use crate::paint::Color;
use crate::text::FontId;

use super::state::BatchMetrics;

/// Immediate-mode 2D drawing with automatic batching.
///
/// Submissions are drawn in call order. Between `begin_frame` and `end_frame`
/// the implementor decides when to flush; callers only see the result through
/// [`BatchSurface::metrics`].
///
/// Submitting outside a frame starts one implicitly.
pub trait BatchSurface {
    // ── lifecycle ────────────────────────────────────────────────────────

    /// Starts a frame: clears pending geometry, the scissor stack and the
    /// draw-call counter, and resets the clip to the full framebuffer.
    ///
    /// Initializes lazily; fails only if that initialization fails.
    fn begin_frame(&mut self) -> anyhow::Result<()>;

    /// Flushes whatever is pending and closes the frame.
    fn end_frame(&mut self);

    fn is_frame_active(&self) -> bool;

    // ── clipping ─────────────────────────────────────────────────────────

    /// Narrows the clip to `rect ∩ current`. Never widens it.
    fn push_scissor(&mut self, rect: ScissorRect);

    /// Restores the clip saved by the matching `push_scissor`. No-op when the
    /// stack is empty.
    fn pop_scissor(&mut self);

    fn current_scissor(&self) -> ScissorRect;

    fn scissor_depth(&self) -> usize;

    // ── geometry ─────────────────────────────────────────────────────────

    /// Axis-aligned quad. `uv` defaults to the full texture;
    /// `TextureId::NONE` draws a flat color.
    fn submit_quad(&mut self, rect: Rect, color: Color, uv: Option<UvRect>, texture: TextureId);

    /// Segment `from → to` as a quad `thickness` wide. Segments shorter than
    /// a thousandth of a pixel are dropped.
    fn submit_line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color, texture: TextureId);

    /// Filled circle; `segments` defaults to the configured resolution and
    /// fewer than three segments draw nothing.
    fn submit_circle(&mut self, center: Vec2, radius: f32, color: Color, segments: Option<u32>);

    /// Rounded rectangle with one radius for all corners, clamped to half the
    /// shorter side. A radius under 0.1 px draws a plain quad.
    fn submit_rounded_rect(
        &mut self,
        rect: Rect,
        corner_radius: f32,
        color: Color,
        corner_segments: Option<u32>,
    );

    // ── text ─────────────────────────────────────────────────────────────

    /// One line of text with its top-left at `origin`, clipped to the current
    /// scissor. Always costs one draw call of its own.
    fn submit_text(&mut self, text: &str, origin: Vec2, size: f32, color: Color, font: FontId);

    /// Text wrapped to `rect`'s width and clipped to `rect ∩ current` for this
    /// call only.
    fn submit_text_rect(&mut self, text: &str, rect: Rect, size: f32, color: Color, font: FontId);

    // ── flush & metrics ──────────────────────────────────────────────────

    /// Sends the pending batch to the backend now. Does nothing if empty.
    fn flush(&mut self);

    fn metrics(&self) -> BatchMetrics;

    fn reset_draw_calls(&mut self);

    // ── provided ─────────────────────────────────────────────────────────

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.submit_quad(rect, color, None, TextureId::NONE);
    }

    /// Untinted textured quad.
    fn draw_image(&mut self, rect: Rect, texture: TextureId) {
        self.submit_quad(rect, Color::WHITE, None, texture);
    }

    fn pending_vertex_count(&self) -> usize {
        self.metrics().pending_vertices
    }

    fn pending_index_count(&self) -> usize {
        self.metrics().pending_indices
    }

    fn draw_call_count(&self) -> u32 {
        self.metrics().draw_calls
    }
}
