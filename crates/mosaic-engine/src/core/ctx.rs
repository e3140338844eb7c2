use std::time::Duration;

use winit::window::Window;

use crate::batch::Batcher;
use crate::coords::Viewport;
use crate::render::WgpuBackend;

/// The window being drawn.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Logical window size.
    pub fn viewport(&self) -> Viewport {
        let (w, h) = logical_size(self.window);
        Viewport::new(w, h)
    }

    pub fn scale_factor(&self) -> f32 {
        self.window.scale_factor() as f32
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// `batch` is already inside `begin_frame`; the runtime ends the frame after
/// the callback returns.
pub struct FrameCtx<'a> {
    pub window: WindowCtx<'a>,
    pub batch: &'a mut Batcher<WgpuBackend>,
    /// Time since the app started.
    pub elapsed: Duration,
    /// Zero-based index of this frame.
    pub frame_index: u64,
}

pub(crate) fn logical_size(window: &Window) -> (f32, f32) {
    let logical: winit::dpi::LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
    (logical.width as f32, logical.height as f32)
}
