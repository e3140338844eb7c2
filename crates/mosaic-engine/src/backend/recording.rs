use anyhow::bail;

use crate::batch::Vertex;
use crate::coords::{ScissorRect, Vec2, Viewport};
use crate::paint::Color;
use crate::text::FontId;

use super::{validate_rgba, Backend, DrawCall, TextRun, TextureId};

/// Owned copy of a [`DrawCall`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub textures: Vec<TextureId>,
    pub scissor: ScissorRect,
}

/// Owned copy of a [`TextRun`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedText {
    pub text: String,
    pub origin: Vec2,
    pub size: f32,
    pub color: Color,
    pub font: FontId,
    pub max_width: Option<f32>,
    pub clip: ScissorRect,
}

/// A backend call in submission order.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Draw(RecordedDraw),
    Text(RecordedText),
}

/// Headless backend that records everything it is asked to do.
///
/// Drives the batcher without a GPU: useful for tests, for tooling that wants
/// the raw triangle stream, and as a reference for what a real backend sees.
#[derive(Debug)]
pub struct RecordingBackend {
    viewport: Viewport,
    next_texture: u64,
    live: Vec<TextureId>,
    destroyed: Vec<TextureId>,
    fail_textures: bool,
    calls: Vec<Recorded>,
}

impl RecordingBackend {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            next_texture: 1,
            live: Vec::new(),
            destroyed: Vec::new(),
            fail_textures: false,
            calls: Vec::new(),
        }
    }

    /// A backend whose texture allocations always fail.
    pub fn failing(viewport: Viewport) -> Self {
        Self { fail_textures: true, ..Self::new(viewport) }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_fail_textures(&mut self, fail: bool) {
        self.fail_textures = fail;
    }

    /// Every recorded call, oldest first.
    pub fn calls(&self) -> &[Recorded] {
        &self.calls
    }

    pub fn draws(&self) -> impl Iterator<Item = &RecordedDraw> {
        self.calls.iter().filter_map(|c| match c {
            Recorded::Draw(d) => Some(d),
            Recorded::Text(_) => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &RecordedText> {
        self.calls.iter().filter_map(|c| match c {
            Recorded::Text(t) => Some(t),
            Recorded::Draw(_) => None,
        })
    }

    /// Drains the recorded calls.
    pub fn take_calls(&mut self) -> Vec<Recorded> {
        std::mem::take(&mut self.calls)
    }

    pub fn live_textures(&self) -> &[TextureId] {
        &self.live
    }

    pub fn destroyed_textures(&self) -> &[TextureId] {
        &self.destroyed
    }
}

impl Backend for RecordingBackend {
    fn framebuffer_size(&self) -> Viewport {
        self.viewport
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<TextureId> {
        validate_rgba(width, height, rgba)?;
        if self.fail_textures {
            bail!("texture allocation refused ({width}x{height})");
        }
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.live.push(id);
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if let Some(pos) = self.live.iter().position(|&t| t == id) {
            self.live.swap_remove(pos);
            self.destroyed.push(id);
        }
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        self.calls.push(Recorded::Draw(RecordedDraw {
            vertices: call.vertices.to_vec(),
            indices: call.indices.to_vec(),
            textures: call.textures.to_vec(),
            scissor: call.scissor,
        }));
    }

    fn draw_text(&mut self, run: &TextRun<'_>) {
        self.calls.push(Recorded::Text(RecordedText {
            text: run.text.to_owned(),
            origin: run.origin,
            size: run.size,
            color: run.color,
            font: run.font,
            max_width: run.max_width,
            clip: run.clip,
        }));
    }
}
