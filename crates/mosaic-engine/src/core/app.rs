use anyhow::Result;
use winit::event::WindowEvent;

use crate::batch::Batcher;
use crate::paint::Color;
use crate::render::WgpuBackend;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// Called once the window and GPU exist, before the first frame.
    /// Load fonts and create textures here.
    fn on_start(&mut self, batch: &mut Batcher<WgpuBackend>) -> Result<()> {
        let _ = batch;
        Ok(())
    }

    /// Called for window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Background of every frame.
    fn clear_color(&self) -> Color {
        Color::BLACK
    }

    /// Called once per rendered frame, between `begin_frame` and `end_frame`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
