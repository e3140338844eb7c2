use std::collections::HashMap;

use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::backend::TextRun;
use crate::batch::tessellate::quad;
use crate::batch::{Fill, Geometry};
use crate::coords::{Rect, UvRect};

use super::textures::{upload_rgba, write_region};

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

/// Slot the atlas is bound to for a text draw.
pub(super) const ATLAS_SLOT: u8 = 0;

// ── shelf packer ───────────────────────────────────────────────────────────

/// Row-based rectangle packer: glyphs fill a shelf left to right, and a glyph
/// that does not fit horizontally opens a new shelf below the tallest glyph
/// of the current one.
#[derive(Debug)]
pub(super) struct ShelfPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    pub(super) fn new(size: u32) -> Self {
        Self {
            size,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
        }
    }

    /// Top-left of a free `w × h` region, or `None` once the atlas is full.
    pub(super) fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full || w + 2 * GLYPH_PADDING > self.size {
            return None;
        }

        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + h + GLYPH_PADDING > self.size {
            self.full = true;
            return None;
        }

        let pos = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(pos)
    }

    pub(super) fn is_full(&self) -> bool {
        self.full
    }
}

// ── glyph atlas ────────────────────────────────────────────────────────────

/// Glyph cache for native text draws.
///
/// Maintains a 2048 × 2048 RGBA atlas (white, coverage in alpha) so glyph
/// quads go through the same pipeline as batched geometry. Glyphs are
/// rasterized on first use via fontdue and cached for the atlas' lifetime,
/// keyed by `GlyphRasterConfig` (font, glyph index and pixel size).
pub(super) struct GlyphAtlas {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    packer: ShelfPacker,
    cache: HashMap<GlyphRasterConfig, UvRect>,
    layout: Layout<()>,
}

impl GlyphAtlas {
    pub(super) fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let blank = vec![0u8; (ATLAS_SIZE * ATLAS_SIZE * 4) as usize];
        let texture = upload_rgba(
            device,
            queue,
            "mosaic glyph atlas",
            wgpu::TextureFormat::Rgba8Unorm,
            ATLAS_SIZE,
            ATLAS_SIZE,
            &blank,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            packer: ShelfPacker::new(ATLAS_SIZE),
            cache: HashMap::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }

    pub(super) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Lays out `run` and appends one quad per visible glyph to `geom`,
    /// sampling [`ATLAS_SLOT`]. Returns the number of glyph quads.
    pub(super) fn append_run(
        &mut self,
        queue: &wgpu::Queue,
        font: &fontdue::Font,
        run: &TextRun<'_>,
        geom: &mut Geometry,
    ) -> usize {
        self.layout.reset(&LayoutSettings {
            x: run.origin.x,
            y: run.origin.y,
            max_width: run.max_width,
            ..LayoutSettings::default()
        });
        self.layout.append(&[font], &TextStyle::new(run.text, run.size, 0));

        // Snapshot positions so the borrow on `self.layout` ends before
        // `self.cached_uv` needs `&mut self`.
        let glyphs: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
            .layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x, g.y, g.width, g.height))
            .collect();

        let fill = Fill::new(run.color.packed(), ATLAS_SLOT);
        let mut emitted = 0;
        for (key, x, y, w, h) in glyphs {
            let Some(uv) = self.cached_uv(queue, font, key) else {
                continue;
            };
            quad::rect(geom, Rect::new(x, y, w as f32, h as f32), uv, fill);
            emitted += 1;
        }
        emitted
    }

    fn cached_uv(
        &mut self,
        queue: &wgpu::Queue,
        font: &fontdue::Font,
        key: GlyphRasterConfig,
    ) -> Option<UvRect> {
        if let Some(uv) = self.cache.get(&key) {
            return Some(*uv);
        }

        let (metrics, coverage) = font.rasterize_config(key);
        let (w, h) = (metrics.width as u32, metrics.height as u32);
        if w == 0 || h == 0 {
            return None;
        }

        let was_full = self.packer.is_full();
        let Some((gx, gy)) = self.packer.place(w, h) else {
            if !was_full {
                log::warn!(
                    "glyph atlas is full ({ATLAS_SIZE}×{ATLAS_SIZE}); some glyphs will not be rendered"
                );
            }
            return None;
        };

        let rgba = coverage_to_rgba(&coverage);
        write_region(queue, &self.texture, gx, gy, w, h, &rgba);

        let uv = UvRect::from_pixels(gx, gy, w, h, ATLAS_SIZE, ATLAS_SIZE);
        self.cache.insert(key, uv);
        Some(uv)
    }
}

/// Expands an 8-bit coverage mask to white RGBA with coverage in alpha.
fn coverage_to_rgba(coverage: &[u8]) -> Vec<u8> {
    coverage.iter().flat_map(|&a| [255, 255, 255, a]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── packer ───────────────────────────────────────────────────────────

    #[test]
    fn packer_fills_a_shelf_left_to_right() {
        let mut p = ShelfPacker::new(64);
        assert_eq!(p.place(10, 8), Some((1, 1)));
        assert_eq!(p.place(10, 12), Some((12, 1)));
        assert_eq!(p.place(5, 5), Some((23, 1)));
    }

    #[test]
    fn packer_opens_new_shelf_below_tallest_glyph() {
        let mut p = ShelfPacker::new(32);
        assert_eq!(p.place(20, 4), Some((1, 1)));
        assert_eq!(p.place(5, 9), Some((22, 1)));
        // 28 + 10 + 1 > 32: next shelf starts at 1 + 9 + 1.
        assert_eq!(p.place(10, 3), Some((1, 11)));
    }

    #[test]
    fn packer_reports_full_and_stays_full() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(14, 14), Some((1, 1)));
        assert_eq!(p.place(14, 1), None);
        assert!(p.is_full());
        assert_eq!(p.place(1, 1), None);
    }

    #[test]
    fn packer_rejects_glyph_wider_than_atlas() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(15, 1), None);
        assert!(!p.is_full());
        assert_eq!(p.place(4, 4), Some((1, 1)));
    }

    // ── coverage ─────────────────────────────────────────────────────────

    #[test]
    fn coverage_becomes_white_alpha() {
        assert_eq!(coverage_to_rgba(&[0, 128]), vec![255, 255, 255, 0, 255, 255, 255, 128]);
    }
}
