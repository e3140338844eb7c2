use std::f32::consts::TAU;

use anyhow::Result;
use mosaic_engine::backend::{Backend, TextureId};
use mosaic_engine::batch::{BatchMetrics, BatchSurface, Batcher};
use mosaic_engine::coords::{Rect, ScissorRect, UvRect, Vec2, Viewport};
use mosaic_engine::core::{App, AppControl, FrameCtx};
use mosaic_engine::device::GpuInit;
use mosaic_engine::logging::{init_logging, LoggingConfig};
use mosaic_engine::paint::Color;
use mosaic_engine::render::WgpuBackend;
use mosaic_engine::text::FontId;
use mosaic_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

const BACKGROUND: Color = Color::rgb(22, 24, 30);
const PANEL: Color = Color::rgb(36, 40, 50);
const ACCENT: Color = Color::rgb(94, 160, 255);
const TEXT: Color = Color::rgb(225, 228, 235);
const MUTED: Color = Color::rgb(130, 136, 150);

/// One swatch texture more than a draw call can bind, so the swatch row
/// always splits into two batches.
const SWATCH_COUNT: usize = 9;

const CHECKER_SIZE: u32 = 64;

const LOREM: &str = "Text is never batched: each run flushes the geometry queued before it \
                     and costs exactly one draw call of its own. This paragraph wraps to its \
                     rectangle and is clipped to it.";

#[derive(Default)]
struct Showcase {
    font: Option<FontId>,
    checker: TextureId,
    swatches: Vec<TextureId>,
    last_frame: BatchMetrics,
}

impl App for Showcase {
    fn on_start(&mut self, batch: &mut Batcher<WgpuBackend>) -> Result<()> {
        let backend = batch.backend_mut();

        match load_font() {
            Some(bytes) => self.font = Some(backend.load_font(&bytes)?),
            None => log::warn!("no system font found; text will not be drawn"),
        }

        self.checker = backend.create_texture(CHECKER_SIZE, CHECKER_SIZE, &checkerboard(CHECKER_SIZE, 8))?;
        for i in 0..SWATCH_COUNT {
            let hue = i as f32 / SWATCH_COUNT as f32;
            let c = hue_to_color(hue);
            self.swatches.push(backend.create_texture(1, 1, &[c.r, c.g, c.b, 255])?);
        }

        log::info!("studio ready: {} textures", backend.texture_count());
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn clear_color(&self) -> Color {
        BACKGROUND
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let t = ctx.elapsed.as_secs_f32();
        let view = ctx.window.viewport();
        let scale = ctx.window.scale_factor();
        let last = self.last_frame;

        {
            let surface: &mut dyn BatchSurface = &mut *ctx.batch;
            self.shapes_panel(surface, t);
            self.texture_panel(surface);
            self.clipped_panel(surface, view, t);
        }
        self.overlay(ctx.batch, view, scale, last);

        self.last_frame = ctx.batch.metrics();
        if ctx.frame_index % 600 == 0 {
            log::info!(
                "frame {}: {} draw calls",
                ctx.frame_index,
                self.last_frame.draw_calls
            );
        }
        AppControl::Continue
    }
}

impl Showcase {
    fn label(&self, surface: &mut dyn BatchSurface, text: &str, at: Vec2, size: f32, color: Color) {
        if let Some(font) = self.font {
            surface.submit_text(text, at, size, color, font);
        }
    }

    /// Untextured primitives; all of these share one batch.
    fn shapes_panel(&self, surface: &mut dyn BatchSurface, t: f32) {
        let panel = Rect::new(20.0, 20.0, 380.0, 300.0);
        surface.submit_rounded_rect(panel, 12.0, PANEL, None);

        for i in 0..12 {
            let x = panel.origin.x + 20.0 + i as f32 * 28.0;
            surface.submit_line(
                Vec2::new(x, panel.origin.y + 60.0),
                Vec2::new(x + 20.0, panel.origin.y + 130.0),
                1.0 + i as f32 * 0.25,
                MUTED,
                TextureId::NONE,
            );
        }

        let center = Vec2::new(panel.origin.x + 110.0, panel.origin.y + 210.0);
        surface.submit_circle(center, 48.0, ACCENT.with_alpha(90), Some(48));
        for i in 0..6 {
            let angle = t * 0.8 + i as f32 * TAU / 6.0;
            let p = center + Vec2::from_angle(angle) * 64.0;
            surface.submit_circle(p, 9.0, hue_to_color(i as f32 / 6.0), None);
        }

        for (i, radius) in [2.0, 8.0, 20.0].into_iter().enumerate() {
            let r = Rect::new(panel.origin.x + 220.0, panel.origin.y + 150.0 + i as f32 * 48.0, 140.0, 38.0);
            surface.submit_rounded_rect(r, radius, ACCENT.with_alpha(160 + 40 * i as u8), Some(6));
        }

        self.label(surface, "Shapes", Vec2::new(panel.origin.x + 16.0, panel.origin.y + 14.0), 20.0, TEXT);
    }

    /// Nine distinct textures: the ninth forces a flush.
    fn texture_panel(&self, surface: &mut dyn BatchSurface) {
        let panel = Rect::new(420.0, 20.0, 380.0, 300.0);
        surface.submit_rounded_rect(panel, 12.0, PANEL, None);

        let tile = Rect::new(panel.origin.x + 20.0, panel.origin.y + 56.0, 160.0, 160.0);
        surface.submit_quad(tile, Color::WHITE, Some(UvRect::FULL), self.checker);
        // Top-left quarter only, magnified.
        let quarter = UvRect::from_pixels(0, 0, CHECKER_SIZE / 2, CHECKER_SIZE / 2, CHECKER_SIZE, CHECKER_SIZE);
        surface.submit_quad(
            Rect::new(tile.origin.x + 180.0, tile.origin.y, 160.0, 160.0),
            Color::rgb(255, 200, 120),
            Some(quarter),
            self.checker,
        );

        for (i, &swatch) in self.swatches.iter().enumerate() {
            let x = panel.origin.x + 20.0 + i as f32 * 38.0;
            surface.draw_image(Rect::new(x, panel.origin.y + 236.0, 30.0, 30.0), swatch);
        }

        self.label(surface, "Textures", Vec2::new(panel.origin.x + 16.0, panel.origin.y + 14.0), 20.0, TEXT);
    }

    /// Nested scissors around scrolling content.
    fn clipped_panel(&self, surface: &mut dyn BatchSurface, view: Viewport, t: f32) {
        let panel = Rect::new(20.0, 340.0, (view.width - 40.0).max(0.0), 200.0);
        surface.submit_rounded_rect(panel, 12.0, PANEL, None);
        self.label(surface, "Clipping", Vec2::new(panel.origin.x + 16.0, panel.origin.y + 14.0), 20.0, TEXT);

        let inner = panel.inset(16.0);
        let inner = Rect::new(inner.origin.x, inner.origin.y + 30.0, inner.size.x, inner.size.y - 30.0);
        surface.push_scissor(inner.to_scissor());

        let scroll = (t * 40.0) % 240.0;
        for i in 0..8 {
            let r = Rect::new(inner.origin.x + i as f32 * 120.0 - scroll, inner.origin.y + 10.0, 100.0, 60.0);
            surface.submit_rounded_rect(r, 8.0, hue_to_color(i as f32 / 8.0).with_alpha(200), None);
        }

        // Inner clip only shrinks the region; content outside `inner` stays hidden.
        let window = ScissorRect::new(inner.origin.x + 40.0, inner.origin.y + 80.0, 260.0, 60.0);
        surface.push_scissor(window);
        surface.fill_rect(Rect::new(0.0, 0.0, view.width, view.height), ACCENT.with_alpha(40));
        if let Some(font) = self.font {
            surface.submit_text_rect(
                LOREM,
                Rect::new(window.x + 6.0, window.y + 4.0, 248.0, 120.0),
                14.0,
                TEXT,
                font,
            );
        }
        surface.pop_scissor();
        surface.pop_scissor();
    }

    /// Previous frame's counters, bottom-right. Text goes last so nothing is
    /// pending afterwards and this frame's count is final.
    fn overlay(&self, batch: &mut Batcher<WgpuBackend>, view: Viewport, scale: f32, last: BatchMetrics) {
        let Some(font) = self.font else {
            return;
        };
        let text = format!("{} draw calls  @{scale:.2}x", last.draw_calls);
        let size = batch.backend().fonts().measure_text(&text, font, 14.0, None);
        let at = Vec2::new(view.width - size.x - 24.0, view.height - size.y - 20.0);

        batch.submit_rounded_rect(
            Rect::new(at.x - 10.0, at.y - 6.0, size.x + 20.0, size.y + 12.0),
            6.0,
            Color::BLACK.with_alpha(160),
            None,
        );
        batch.submit_text(&text, at, 14.0, TEXT, font);
    }
}

fn checkerboard(size: u32, cell: u32) -> Vec<u8> {
    (0..size * size)
        .flat_map(|i| {
            let (x, y) = (i % size, i / size);
            let v = if (x / cell + y / cell) % 2 == 0 { 235 } else { 70 };
            [v, v, v, 255]
        })
        .collect()
}

fn hue_to_color(hue: f32) -> Color {
    let h = hue.fract() * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let to_u8 = |v: f32| (v * 255.0).round() as u8;
    Color::rgb(to_u8(r), to_u8(g), to_u8(b))
}

fn load_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Mosaic Studio".to_string(),
        initial_size: LogicalSize::new(820.0, 560.0),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), Showcase::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── checker texture ──────────────────────────────────────────────────

    #[test]
    fn checkerboard_alternates_cells() {
        let px = checkerboard(CHECKER_SIZE, 8);
        assert_eq!(px.len(), (CHECKER_SIZE * CHECKER_SIZE * 4) as usize);
        let at = |x: u32, y: u32| px[((y * CHECKER_SIZE + x) * 4) as usize];
        assert_eq!(at(0, 0), 235);
        assert_eq!(at(8, 0), 70);
        assert_eq!(at(8, 8), 235);
        assert_eq!(at(63, 63), 235);
    }

    #[test]
    fn quarter_tile_uv_stays_in_unit_range() {
        let quarter = UvRect::from_pixels(0, 0, CHECKER_SIZE / 2, CHECKER_SIZE / 2, CHECKER_SIZE, CHECKER_SIZE);
        assert_eq!(quarter, UvRect::new(0.0, 0.0, 0.5, 0.5));
        for c in quarter.min.into_iter().chain(quarter.max) {
            assert!((0.0..=1.0).contains(&c));
        }
    }
}
