//! Downstream seam: what the batcher needs from a GPU / text backend.
//!
//! A backend owns textures, executes one indexed-triangle draw per
//! [`Backend::draw`] and one native text draw per [`Backend::draw_text`].
//! The batcher never talks to a graphics API directly.

mod recording;

use std::fmt;

use crate::batch::Vertex;
use crate::coords::{ScissorRect, Vec2, Viewport};
use crate::paint::Color;
use crate::text::FontId;

pub use recording::{Recorded, RecordedDraw, RecordedText, RecordingBackend};

/// Backend-issued texture handle.
///
/// [`TextureId::NONE`] means "untextured"; the batcher swaps it for its
/// fallback white texture before anything reaches the backend.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureId(pub u64);

impl TextureId {
    pub const NONE: Self = Self(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tex#{}", self.0)
    }
}

/// One flushed batch.
///
/// `textures[i]` is bound to slot `i`; vertices select it through
/// `tex_index`. Indices are relative to `vertices`.
#[derive(Debug, Copy, Clone)]
pub struct DrawCall<'a> {
    pub vertices: &'a [Vertex],
    pub indices: &'a [u32],
    pub textures: &'a [TextureId],
    /// Clip for the whole call. A zero-area scissor means nothing is visible.
    pub scissor: ScissorRect,
}

impl DrawCall<'_> {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// One native text draw.
#[derive(Debug, Copy, Clone)]
pub struct TextRun<'a> {
    pub text: &'a str,
    /// Top-left of the text block in logical pixels.
    pub origin: Vec2,
    /// Font size in logical pixels.
    pub size: f32,
    pub color: Color,
    pub font: FontId,
    /// Wrapping width. `None` = single unwrapped run.
    pub max_width: Option<f32>,
    pub clip: ScissorRect,
}

/// GPU (and text) executor driven by [`Batcher`](crate::batch::Batcher).
pub trait Backend {
    /// Current framebuffer size; the root scissor of every frame.
    fn framebuffer_size(&self) -> Viewport;

    /// Uploads an RGBA8 (straight alpha) image. `rgba.len()` must equal
    /// `width * height * 4`.
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<TextureId>;

    /// Releases a texture. Unknown ids are ignored.
    fn destroy_texture(&mut self, id: TextureId);

    /// Executes exactly one indexed draw.
    fn draw(&mut self, call: &DrawCall<'_>);

    /// Executes exactly one native text draw.
    fn draw_text(&mut self, run: &TextRun<'_>);
}

/// Checks that an RGBA upload is well-formed.
pub(crate) fn validate_rgba(width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<()> {
    anyhow::ensure!(width > 0 && height > 0, "texture has zero size ({width}x{height})");
    let expected = width as usize * height as usize * 4;
    anyhow::ensure!(
        rgba.len() == expected,
        "texture data is {} bytes, expected {expected} for {width}x{height} RGBA8",
        rgba.len()
    );
    Ok(())
}
