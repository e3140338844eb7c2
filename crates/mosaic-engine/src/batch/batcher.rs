use anyhow::{Context, Result};

use crate::backend::{Backend, DrawCall, TextRun, TextureId};
use crate::coords::{Rect, ScissorRect, UvRect, Vec2};
use crate::paint::Color;
use crate::text::FontId;

use super::config::BatchConfig;
use super::phase::Phase;
use super::state::{BatchMetrics, BatchState};
use super::surface::BatchSurface;
use super::tessellate::{circle, line, quad, rounded_rect};
use super::vertex::Fill;

const FALLBACK_PIXEL: [u8; 4] = [255, 255, 255, 255];

/// Why a batch was handed to the backend. Only used for tracing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum FlushReason {
    Explicit,
    TextureSlots,
    Scissor,
    Text,
    EndFrame,
}

/// Batching renderer bound to one backend.
///
/// Owns every piece of batch state; independent batchers (e.g. one per
/// off-screen target) never share anything.
pub struct Batcher<B: Backend> {
    backend: B,
    config: BatchConfig,
    state: BatchState,
    /// 1×1 white texture standing in for `TextureId::NONE`. `Some` once initialized.
    fallback: Option<TextureId>,
    phase: Phase,
}

impl<B: Backend> Batcher<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, BatchConfig::default())
    }

    pub fn with_config(backend: B, config: BatchConfig) -> Self {
        Self {
            backend,
            config,
            state: BatchState::new(),
            fallback: None,
            phase: Phase::Accumulating,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_initialized(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn fallback_texture(&self) -> Option<TextureId> {
        self.fallback
    }

    /// Allocates the fallback texture and reserves buffer capacity.
    /// Idempotent.
    ///
    /// Failing to allocate the fallback texture is fatal: every untextured
    /// primitive samples it.
    pub fn initialize(&mut self) -> Result<()> {
        if self.fallback.is_some() {
            return Ok(());
        }

        let id = self
            .backend
            .create_texture(1, 1, &FALLBACK_PIXEL)
            .context("failed to allocate the fallback white texture")?;

        self.state
            .geometry
            .reserve(self.config.vertex_capacity, self.config.index_capacity);
        self.fallback = Some(id);

        log::debug!(
            "batcher initialized: fallback={id}, capacity={}v/{}i",
            self.config.vertex_capacity,
            self.config.index_capacity
        );
        Ok(())
    }

    /// Releases the fallback texture and frees the batch buffers.
    ///
    /// Pending geometry is discarded. Safe to call repeatedly; a later
    /// `initialize` or `begin_frame` starts over.
    pub fn shutdown(&mut self) {
        let Some(id) = self.fallback.take() else {
            return;
        };
        self.backend.destroy_texture(id);

        self.state.geometry.release();
        self.state.slots.clear();
        self.state.scissor_stack = Vec::new();
        self.state.frame_active = false;
        self.phase = Phase::Accumulating;

        log::debug!("batcher shut down: released {id}");
    }

    // ── internals ────────────────────────────────────────────────────────

    fn transition(&mut self, next: Phase) {
        match self.phase.enter(next) {
            Ok(phase) => self.phase = phase,
            Err(e) => {
                debug_assert!(false, "{e}");
                log::error!("{e}");
                self.phase = next;
            }
        }
    }

    /// Starts a frame if none is active. `false` means the submission must
    /// be dropped.
    fn ensure_frame(&mut self) -> bool {
        if self.state.frame_active {
            return true;
        }
        log::debug!("submission outside begin_frame/end_frame; starting a frame implicitly");
        match self.begin_frame() {
            Ok(()) => true,
            Err(e) => {
                log::error!("dropping submission: {e:#}");
                false
            }
        }
    }

    /// Slot for `texture` in the open batch, flushing first if all slots are
    /// taken by other textures.
    fn acquire_slot(&mut self, texture: TextureId) -> Option<u8> {
        let id = if texture.is_none() { self.fallback? } else { texture };

        if self.state.slots.would_overflow(id) {
            self.flush_for(FlushReason::TextureSlots);
        }
        let slot = self.state.slots.acquire(id);
        debug_assert!(slot.is_some(), "slot map full right after a flush");
        slot
    }

    /// Frame + slot resolution shared by every geometry submission.
    fn prepare(&mut self, color: Color, texture: TextureId) -> Option<Fill> {
        if !self.ensure_frame() {
            return None;
        }
        let slot = self.acquire_slot(texture)?;
        Some(Fill::new(color.packed(), slot))
    }

    fn flush_for(&mut self, reason: FlushReason) -> bool {
        self.transition(Phase::Flushing);
        let drew = self.drain(reason);
        self.transition(Phase::Accumulating);
        drew
    }

    /// Hands the open batch to the backend. Must be called in `Flushing`.
    fn drain(&mut self, reason: FlushReason) -> bool {
        debug_assert_eq!(self.phase, Phase::Flushing);
        if self.state.geometry.is_empty() {
            return false;
        }

        let call = DrawCall {
            vertices: self.state.geometry.vertices(),
            indices: self.state.geometry.indices(),
            textures: self.state.slots.as_slice(),
            scissor: self.state.current_scissor,
        };
        log::trace!(
            "flush ({reason:?}): {} vertices, {} triangles, {} textures, scissor={:?}",
            call.vertices.len(),
            call.triangle_count(),
            call.textures.len(),
            call.scissor
        );
        self.backend.draw(&call);

        self.state.draw_calls += 1;
        self.state.geometry.clear();
        self.state.slots.clear();
        true
    }

    /// Flush, draw natively, resume batching.
    fn draw_text_run(&mut self, run: TextRun<'_>) {
        self.transition(Phase::Flushing);
        self.drain(FlushReason::Text);
        self.transition(Phase::NativePassthrough);

        self.backend.draw_text(&run);
        self.state.draw_calls += 1;

        self.transition(Phase::Accumulating);
    }

    /// Installs `next` as the current clip, flushing pending geometry built
    /// under a different one.
    fn set_scissor(&mut self, next: ScissorRect) {
        if next != self.state.current_scissor && !self.state.geometry.is_empty() {
            self.flush_for(FlushReason::Scissor);
        }
        self.state.current_scissor = next;
    }
}

impl<B: Backend> BatchSurface for Batcher<B> {
    fn begin_frame(&mut self) -> Result<()> {
        self.initialize().context("begin_frame: batcher initialization failed")?;

        if self.state.frame_active && !self.state.geometry.is_empty() {
            log::debug!(
                "begin_frame discarded {} pending vertices of an unfinished frame",
                self.state.geometry.vertices().len()
            );
        }

        let root = ScissorRect::full(self.backend.framebuffer_size());
        self.state.reset_frame(root);
        self.phase = Phase::Accumulating;
        Ok(())
    }

    fn end_frame(&mut self) {
        if !self.state.frame_active {
            return;
        }
        self.flush_for(FlushReason::EndFrame);

        if !self.state.scissor_stack.is_empty() {
            log::warn!(
                "frame ended with {} unbalanced push_scissor call(s)",
                self.state.scissor_stack.len()
            );
        }
        self.state.frame_active = false;
    }

    fn is_frame_active(&self) -> bool {
        self.state.frame_active
    }

    fn push_scissor(&mut self, rect: ScissorRect) {
        if !self.ensure_frame() {
            return;
        }
        let current = self.state.current_scissor;
        self.set_scissor(current.intersect(rect));
        self.state.scissor_stack.push(current);
    }

    fn pop_scissor(&mut self) {
        if let Some(prev) = self.state.scissor_stack.pop() {
            self.set_scissor(prev);
        }
    }

    fn current_scissor(&self) -> ScissorRect {
        self.state.current_scissor
    }

    fn scissor_depth(&self) -> usize {
        self.state.scissor_stack.len()
    }

    fn submit_quad(&mut self, rect: Rect, color: Color, uv: Option<UvRect>, texture: TextureId) {
        if !rect.is_finite() {
            return;
        }
        let Some(fill) = self.prepare(color, texture) else {
            return;
        };
        quad::rect(&mut self.state.geometry, rect, uv.unwrap_or(UvRect::FULL), fill);
    }

    fn submit_line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color, texture: TextureId) {
        if line::is_degenerate(from, to) || !thickness.is_finite() {
            return;
        }
        let Some(fill) = self.prepare(color, texture) else {
            return;
        };
        line::line(&mut self.state.geometry, from, to, thickness, fill);
    }

    fn submit_circle(&mut self, center: Vec2, radius: f32, color: Color, segments: Option<u32>) {
        let segments = segments.unwrap_or(self.config.circle_segments);
        if circle::is_degenerate(center, radius, segments) {
            return;
        }
        let Some(fill) = self.prepare(color, TextureId::NONE) else {
            return;
        };
        circle::circle(&mut self.state.geometry, center, radius, segments, fill);
    }

    fn submit_rounded_rect(
        &mut self,
        rect: Rect,
        corner_radius: f32,
        color: Color,
        corner_segments: Option<u32>,
    ) {
        if !rect.is_finite() {
            return;
        }
        let radius = rounded_rect::clamp_radius(rect, corner_radius);
        if radius < rounded_rect::MIN_CORNER_RADIUS {
            self.submit_quad(rect, color, None, TextureId::NONE);
            return;
        }

        let segments = corner_segments.unwrap_or(self.config.corner_segments).max(1);
        let Some(fill) = self.prepare(color, TextureId::NONE) else {
            return;
        };
        rounded_rect::rounded_rect(&mut self.state.geometry, rect, radius, segments, fill);
    }

    fn submit_text(&mut self, text: &str, origin: Vec2, size: f32, color: Color, font: FontId) {
        if !self.ensure_frame() {
            return;
        }
        let clip = self.state.current_scissor;
        self.draw_text_run(TextRun { text, origin, size, color, font, max_width: None, clip });
    }

    fn submit_text_rect(&mut self, text: &str, rect: Rect, size: f32, color: Color, font: FontId) {
        if !self.ensure_frame() {
            return;
        }
        let rect = rect.normalized();
        let clip = self.state.current_scissor.intersect(rect.to_scissor());
        self.draw_text_run(TextRun {
            text,
            origin: rect.origin,
            size,
            color,
            font,
            max_width: Some(rect.size.x),
            clip,
        });
    }

    fn flush(&mut self) {
        self.flush_for(FlushReason::Explicit);
    }

    fn metrics(&self) -> BatchMetrics {
        self.state.metrics()
    }

    fn reset_draw_calls(&mut self) {
        self.state.draw_calls = 0;
    }
}

impl<B: Backend> Drop for Batcher<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Recorded, RecordingBackend};
    use crate::coords::Viewport;

    const VIEW: Viewport = Viewport::new(200.0, 100.0);

    fn batcher() -> Batcher<RecordingBackend> {
        Batcher::new(RecordingBackend::new(VIEW))
    }

    fn started() -> Batcher<RecordingBackend> {
        let mut b = batcher();
        b.begin_frame().unwrap();
        b
    }

    fn tex(n: u64) -> TextureId {
        TextureId(1000 + n)
    }

    fn font() -> FontId {
        FontId(0)
    }

    // ── lifecycle ────────────────────────────────────────────────────────

    #[test]
    fn initialize_is_idempotent() {
        let mut b = batcher();
        b.initialize().unwrap();
        let first = b.fallback_texture();
        b.initialize().unwrap();
        assert_eq!(b.fallback_texture(), first);
        assert_eq!(b.backend().live_textures().len(), 1);
    }

    #[test]
    fn begin_frame_initializes_lazily() {
        let mut b = batcher();
        assert!(!b.is_initialized());
        b.begin_frame().unwrap();
        assert!(b.is_initialized());
        assert!(b.is_frame_active());
        assert_eq!(b.current_scissor(), ScissorRect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn fallback_failure_is_fatal() {
        let mut b = Batcher::new(RecordingBackend::failing(VIEW));
        assert!(b.initialize().is_err());

        let err = b.begin_frame().unwrap_err();
        assert!(format!("{err:#}").contains("fallback"));
        assert!(!b.is_frame_active());
    }

    #[test]
    fn initialization_recovers_once_allocation_succeeds() {
        let mut b = Batcher::new(RecordingBackend::failing(VIEW));
        b.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED);
        assert!(!b.is_initialized());

        b.backend_mut().set_fail_textures(false);
        b.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED);
        assert!(b.is_initialized());
        b.end_frame();

        let calls = b.backend_mut().take_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], Recorded::Draw(d) if d.indices.len() == 6));
        assert!(b.backend().calls().is_empty());
    }

    #[test]
    fn submissions_are_dropped_when_auto_init_fails() {
        let mut b = Batcher::new(RecordingBackend::failing(VIEW));
        b.submit_quad(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED, None, TextureId::NONE);
        b.submit_text("x", Vec2::zero(), 12.0, Color::WHITE, font());
        assert_eq!(b.pending_vertex_count(), 0);
        assert!(b.backend().calls().is_empty());
    }

    #[test]
    fn submission_outside_frame_auto_begins() {
        let mut b = batcher();
        b.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED);
        assert!(b.is_frame_active());
        assert_eq!(b.pending_vertex_count(), 4);
    }

    #[test]
    fn begin_frame_resets_state() {
        let mut b = started();
        b.push_scissor(ScissorRect::new(0.0, 0.0, 10.0, 10.0));
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
        b.flush();
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);

        b.begin_frame().unwrap();
        assert_eq!(b.metrics(), BatchMetrics::default());
        assert_eq!(b.current_scissor(), ScissorRect::full(VIEW));
    }

    #[test]
    fn begin_frame_picks_up_resized_framebuffer() {
        let mut b = started();
        b.end_frame();
        b.backend_mut().set_viewport(Viewport::new(640.0, 480.0));
        b.begin_frame().unwrap();
        assert_eq!(b.current_scissor(), ScissorRect::new(0.0, 0.0, 640.0, 480.0));
    }

    #[test]
    fn shutdown_releases_fallback_once() {
        let mut b = started();
        let fallback = b.fallback_texture().unwrap();
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);

        b.shutdown();
        b.shutdown();
        assert_eq!(b.backend().destroyed_textures(), &[fallback]);
        assert!(b.backend().live_textures().is_empty());
        assert!(!b.is_frame_active());
        assert_eq!(b.pending_vertex_count(), 0);

        b.begin_frame().unwrap();
        assert!(b.is_initialized());
        assert_ne!(b.fallback_texture(), Some(fallback));
    }

    #[test]
    fn end_frame_outside_frame_is_noop() {
        let mut b = batcher();
        b.end_frame();
        assert!(b.backend().calls().is_empty());
    }

    // ── scenarios ────────────────────────────────────────────────────────

    #[test]
    fn two_untextured_quads_share_one_draw() {
        let mut b = started();
        b.submit_quad(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED, None, TextureId::NONE);
        b.submit_quad(Rect::new(20.0, 0.0, 10.0, 10.0), Color::BLUE, None, TextureId::NONE);
        b.end_frame();

        assert_eq!(b.draw_call_count(), 1);
        let draws: Vec<_> = b.backend().draws().collect();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].vertices.len(), 8);
        assert_eq!(draws[0].indices.len(), 12);
        assert_eq!(draws[0].textures, vec![b.fallback_texture().unwrap()]);
        assert_eq!(draws[0].indices[6..], [4, 5, 6, 4, 6, 7]);
        assert_eq!(draws[0].vertices[0].color, Color::RED.packed());
        assert_eq!(draws[0].vertices[4].color, Color::BLUE.packed());
    }

    #[test]
    fn shrinking_clip_flushes_pending_geometry() {
        let mut b = started();
        b.push_scissor(ScissorRect::new(0.0, 0.0, 50.0, 50.0));
        b.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED);
        assert_eq!(b.draw_call_count(), 0);

        b.push_scissor(ScissorRect::new(10.0, 10.0, 5.0, 5.0));
        assert_eq!(b.draw_call_count(), 1);
        assert_eq!(b.pending_vertex_count(), 0);

        b.fill_rect(Rect::new(10.0, 10.0, 5.0, 5.0), Color::GREEN);
        b.pop_scissor();
        b.pop_scissor();
        b.end_frame();

        let scissors: Vec<_> = b.backend().draws().map(|d| d.scissor).collect();
        assert_eq!(
            scissors,
            vec![ScissorRect::new(0.0, 0.0, 50.0, 50.0), ScissorRect::new(10.0, 10.0, 5.0, 5.0)]
        );
    }

    // ── scissor stack ────────────────────────────────────────────────────

    #[test]
    fn push_pop_restores_previous_scissor() {
        let rects = [
            ScissorRect::new(10.0, 10.0, 100.0, 50.0),
            ScissorRect::new(-20.0, 0.0, 60.0, 500.0),
            ScissorRect::new(300.0, 300.0, 5.0, 5.0),
            ScissorRect::new(15.0, 12.0, 1.0, 1.0),
        ];
        let mut b = started();
        let mut seen = vec![b.current_scissor()];
        for r in rects {
            b.push_scissor(r);
            seen.push(b.current_scissor());
        }
        assert_eq!(b.scissor_depth(), rects.len());

        for expected in seen.iter().rev().skip(1) {
            b.pop_scissor();
            assert_eq!(b.current_scissor(), *expected);
        }
        assert_eq!(b.scissor_depth(), 0);
    }

    #[test]
    fn any_push_sequence_unwinds_to_each_saved_scissor() {
        // Contained, partially overlapping, disjoint, off-screen and
        // zero-area rectangles.
        const POOL: [ScissorRect; 8] = [
            ScissorRect::new(10.0, 10.0, 100.0, 50.0),
            ScissorRect::new(20.0, 15.0, 10.0, 10.0),
            ScissorRect::new(90.0, 40.0, 80.0, 80.0),
            ScissorRect::new(-30.0, -30.0, 60.0, 60.0),
            ScissorRect::new(150.0, 0.0, 40.0, 20.0),
            ScissorRect::new(300.0, 300.0, 5.0, 5.0),
            ScissorRect::new(0.0, 0.0, 200.0, 100.0),
            ScissorRect::new(50.0, 50.0, 0.0, 10.0),
        ];

        // Small LCG so the sequences are varied but reproducible.
        let mut seed = 0x2545_f491_u32;
        let mut next = |bound: usize| {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (seed >> 16) as usize % bound
        };

        let mut b = started();
        for round in 0..64 {
            let root = b.current_scissor();
            let depth = 1 + next(8);
            let mut seen = vec![root];
            for _ in 0..depth {
                let r = POOL[next(POOL.len())];
                let parent = b.current_scissor();
                b.push_scissor(r);
                assert_eq!(b.current_scissor(), parent.intersect(r), "round {round}");
                if next(2) == 0 {
                    b.fill_rect(Rect::new(0.0, 0.0, 50.0, 50.0), Color::RED);
                }
                seen.push(b.current_scissor());
            }
            assert_eq!(b.scissor_depth(), depth);

            for expected in seen.iter().rev().skip(1) {
                b.pop_scissor();
                assert_eq!(b.current_scissor(), *expected, "round {round}");
            }
            assert_eq!(b.scissor_depth(), 0);
            assert_eq!(b.current_scissor(), root);
        }
    }

    #[test]
    fn pushed_scissor_never_exceeds_parent() {
        let mut b = started();
        b.push_scissor(ScissorRect::new(10.0, 10.0, 20.0, 20.0));
        b.push_scissor(ScissorRect::new(0.0, 0.0, 1000.0, 1000.0));
        assert_eq!(b.current_scissor(), ScissorRect::new(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn pop_on_empty_stack_is_noop() {
        let mut b = started();
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
        b.pop_scissor();
        assert_eq!(b.current_scissor(), ScissorRect::full(VIEW));
        assert_eq!(b.pending_vertex_count(), 4);
        assert_eq!(b.draw_call_count(), 0);
    }

    #[test]
    fn unchanged_scissor_does_not_flush() {
        let mut b = started();
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
        b.push_scissor(ScissorRect::full(VIEW));
        b.fill_rect(Rect::new(5.0, 0.0, 5.0, 5.0), Color::RED);
        b.pop_scissor();
        assert_eq!(b.draw_call_count(), 0);
        assert_eq!(b.pending_vertex_count(), 8);
    }

    #[test]
    fn scissor_change_on_empty_batch_does_not_flush() {
        let mut b = started();
        b.push_scissor(ScissorRect::new(0.0, 0.0, 5.0, 5.0));
        b.pop_scissor();
        assert_eq!(b.draw_call_count(), 0);
        assert!(b.backend().calls().is_empty());
    }

    #[test]
    fn zero_area_scissor_is_still_forwarded() {
        let mut b = started();
        b.push_scissor(ScissorRect::new(500.0, 500.0, 10.0, 10.0));
        assert!(!b.current_scissor().is_valid());
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
        b.flush();

        assert_eq!(b.draw_call_count(), 1);
        let draw = b.backend().draws().next().unwrap();
        assert!(!draw.scissor.is_valid());
    }

    // ── geometry ─────────────────────────────────────────────────────────

    #[test]
    fn quad_adds_four_vertices_six_indices() {
        let mut b = started();
        for i in 0..5 {
            let before = b.metrics();
            b.submit_quad(Rect::new(i as f32, 0.0, 0.0, 3.0), Color::WHITE, None, TextureId::NONE);
            let after = b.metrics();
            assert_eq!(after.pending_vertices - before.pending_vertices, 4);
            assert_eq!(after.pending_indices - before.pending_indices, 6);
        }
    }

    #[test]
    fn quad_uses_requested_uv() {
        let mut b = started();
        let uv = UvRect::new(0.25, 0.5, 0.75, 1.0);
        b.submit_quad(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE, Some(uv), tex(1));
        b.flush();
        let draw = b.backend().draws().next().unwrap();
        assert_eq!([draw.vertices[0].u, draw.vertices[0].v], [0.25, 0.5]);
        assert_eq!([draw.vertices[2].u, draw.vertices[2].v], [0.75, 1.0]);
        assert_eq!(draw.textures, vec![tex(1)]);
    }

    #[test]
    fn circle_adds_fan() {
        let mut b = started();
        for s in [3, 8, 32, 100] {
            let before = b.metrics();
            b.submit_circle(Vec2::new(50.0, 50.0), 10.0, Color::GREEN, Some(s));
            let after = b.metrics();
            assert_eq!(after.pending_vertices - before.pending_vertices, s as usize + 1);
            assert_eq!(after.pending_indices - before.pending_indices, 3 * s as usize);
        }
    }

    #[test]
    fn circle_defaults_to_configured_segments() {
        let config = BatchConfig { circle_segments: 12, ..BatchConfig::default() };
        let mut b = Batcher::with_config(RecordingBackend::new(VIEW), config);
        b.submit_circle(Vec2::new(50.0, 50.0), 10.0, Color::GREEN, None);
        assert_eq!(b.pending_vertex_count(), 13);
        assert_eq!(b.pending_index_count(), 36);
    }

    #[test]
    fn line_adds_one_quad() {
        let mut b = started();
        b.submit_line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), 2.0, Color::WHITE, TextureId::NONE);
        assert_eq!(b.pending_vertex_count(), 4);
        assert_eq!(b.pending_index_count(), 6);
    }

    #[test]
    fn rounded_rect_counts() {
        let mut b = started();
        b.submit_rounded_rect(Rect::new(0.0, 0.0, 100.0, 40.0), 8.0, Color::BLUE, Some(4));
        assert_eq!(b.pending_vertex_count(), 20 + 4 * (4 + 2));
        assert_eq!(b.pending_index_count(), 30 + 12 * 4);
    }

    #[test]
    fn rounded_rect_zero_segments_treated_as_one() {
        let mut b = started();
        b.submit_rounded_rect(Rect::new(0.0, 0.0, 100.0, 40.0), 8.0, Color::BLUE, Some(0));
        assert_eq!(b.pending_vertex_count(), 20 + 4 * 3);
        assert_eq!(b.pending_index_count(), 30 + 12);
    }

    // ── degenerate input ─────────────────────────────────────────────────

    #[test]
    fn degenerate_inputs_leave_batch_unchanged() {
        let mut b = started();
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
        let before = b.metrics();

        b.submit_line(Vec2::new(3.0, 3.0), Vec2::new(3.0, 3.0005), 4.0, Color::RED, TextureId::NONE);
        b.submit_line(Vec2::new(0.0, 0.0), Vec2::new(f32::NAN, 1.0), 4.0, Color::RED, TextureId::NONE);
        b.submit_circle(Vec2::new(10.0, 10.0), 5.0, Color::RED, Some(2));
        b.submit_circle(Vec2::new(10.0, 10.0), 0.0, Color::RED, None);
        b.submit_circle(Vec2::new(10.0, 10.0), -3.0, Color::RED, None);
        b.submit_quad(Rect::new(f32::INFINITY, 0.0, 1.0, 1.0), Color::RED, None, TextureId::NONE);

        assert_eq!(b.metrics(), before);
    }

    #[test]
    fn tiny_corner_radius_matches_plain_quad() {
        let rect = Rect::new(10.0, 10.0, 30.0, 20.0);

        let mut rounded = started();
        rounded.submit_rounded_rect(rect, 0.05, Color::RED, None);
        rounded.flush();

        let mut plain = started();
        plain.submit_quad(rect, Color::RED, None, TextureId::NONE);
        plain.flush();

        let r = rounded.backend().draws().next().unwrap();
        let p = plain.backend().draws().next().unwrap();
        assert_eq!(r.vertices, p.vertices);
        assert_eq!(r.indices, p.indices);
    }

    // ── texture slots ────────────────────────────────────────────────────

    #[test]
    fn ninth_texture_forces_flush() {
        let mut b = started();
        for i in 0..8 {
            b.submit_quad(Rect::new(i as f32 * 10.0, 0.0, 8.0, 8.0), Color::WHITE, None, tex(i));
        }
        assert_eq!(b.metrics().pending_textures, 8);
        assert_eq!(b.pending_vertex_count(), 32);
        assert_eq!(b.draw_call_count(), 0);

        b.submit_quad(Rect::new(0.0, 20.0, 8.0, 8.0), Color::WHITE, None, tex(8));
        assert_eq!(b.draw_call_count(), 1);
        assert_eq!(b.pending_vertex_count(), 4);
        assert_eq!(b.metrics().pending_textures, 1);

        let draw = b.backend().draws().next().unwrap();
        assert_eq!(draw.textures, (0..8).map(tex).collect::<Vec<_>>());
    }

    #[test]
    fn reused_texture_keeps_its_slot() {
        let mut b = started();
        for i in 0..8 {
            b.submit_quad(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE, None, tex(i));
        }
        b.submit_quad(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE, None, tex(3));
        assert_eq!(b.draw_call_count(), 0);
        b.flush();

        let draw = b.backend().draws().next().unwrap();
        assert_eq!(draw.vertices[32].tex_index, 3.0);
    }

    #[test]
    fn untextured_geometry_uses_fallback_slot() {
        let mut b = started();
        b.submit_quad(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE, None, tex(7));
        b.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::RED);
        b.flush();

        let draw = b.backend().draws().next().unwrap();
        assert_eq!(draw.textures, vec![tex(7), b.fallback_texture().unwrap()]);
        assert_eq!(draw.vertices[0].tex_index, 0.0);
        assert_eq!(draw.vertices[4].tex_index, 1.0);
    }

    // ── draw-call accounting ─────────────────────────────────────────────

    #[test]
    fn empty_flush_is_free() {
        let mut b = started();
        b.flush();
        b.flush();
        assert_eq!(b.draw_call_count(), 0);
        assert!(b.backend().calls().is_empty());
        assert_eq!(b.phase(), Phase::Accumulating);
    }

    #[test]
    fn non_empty_flush_counts_once() {
        let mut b = started();
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
        b.flush();
        b.flush();
        assert_eq!(b.draw_call_count(), 1);
        assert_eq!(b.pending_vertex_count(), 0);
    }

    #[test]
    fn text_always_counts_one() {
        let mut b = started();
        b.submit_text("hello", Vec2::new(1.0, 2.0), 14.0, Color::WHITE, font());
        assert_eq!(b.draw_call_count(), 1);

        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
        b.submit_text("world", Vec2::new(1.0, 20.0), 14.0, Color::WHITE, font());
        assert_eq!(b.draw_call_count(), 3);
        assert_eq!(b.phase(), Phase::Accumulating);
    }

    #[test]
    fn text_preserves_paint_order() {
        let mut b = started();
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
        b.submit_text("label", Vec2::new(0.0, 0.0), 12.0, Color::BLACK, font());
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::GREEN);
        b.end_frame();

        let kinds: Vec<_> = b
            .backend()
            .calls()
            .iter()
            .map(|c| matches!(c, Recorded::Text(_)))
            .collect();
        assert_eq!(kinds, vec![false, true, false]);
    }

    #[test]
    fn text_rect_clips_only_that_call() {
        let mut b = started();
        b.push_scissor(ScissorRect::new(0.0, 0.0, 100.0, 50.0));
        b.submit_text_rect("wrapped", Rect::new(80.0, 40.0, 60.0, 30.0), 12.0, Color::WHITE, font());
        assert_eq!(b.current_scissor(), ScissorRect::new(0.0, 0.0, 100.0, 50.0));

        let text = b.backend().texts().next().unwrap();
        assert_eq!(text.clip, ScissorRect::new(80.0, 40.0, 20.0, 10.0));
        assert_eq!(text.max_width, Some(60.0));
        assert_eq!(text.origin, Vec2::new(80.0, 40.0));
    }

    #[test]
    fn plain_text_uses_current_scissor() {
        let mut b = started();
        b.push_scissor(ScissorRect::new(5.0, 5.0, 10.0, 10.0));
        b.submit_text("t", Vec2::new(5.0, 5.0), 12.0, Color::WHITE, font());
        let text = b.backend().texts().next().unwrap();
        assert_eq!(text.clip, ScissorRect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(text.max_width, None);
    }

    #[test]
    fn reset_draw_calls_clears_counter_only() {
        let mut b = started();
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
        b.flush();
        b.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
        b.reset_draw_calls();
        assert_eq!(b.draw_call_count(), 0);
        assert_eq!(b.pending_vertex_count(), 4);
    }

    #[test]
    fn usable_through_trait_object() {
        let mut b = started();
        let surface: &mut dyn BatchSurface = &mut b;
        surface.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::RED);
        surface.end_frame();
        assert_eq!(surface.draw_call_count(), 1);
    }
}
