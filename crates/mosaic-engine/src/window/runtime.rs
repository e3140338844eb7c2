use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::batch::{BatchConfig, BatchSurface, Batcher};
use crate::coords::Viewport;
use crate::core::{logical_size, App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::render::WgpuBackend;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub batch: BatchConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "mosaic".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            batch: BatchConfig::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until it exits or the window closes.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState { config, gpu_init, app, session: None, exit_requested: false };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Everything that lives as long as the window.
struct Session {
    batcher: Batcher<WgpuBackend>,
    entry: WindowEntry,
    started: Instant,
    frame_index: u64,
}

struct AppState<A: App + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    session: Option<Session>,
    exit_requested: bool,
}

impl<A: App + 'static> AppState<A> {
    fn start_session(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let backend = entry.with(|fields| {
            let (w, h) = logical_size(fields.window);
            let size = fields.gpu.size();
            WgpuBackend::new(
                fields.gpu.device(),
                fields.gpu.queue(),
                fields.gpu.surface_format(),
                Viewport::new(w, h),
                fields.window.scale_factor() as f32,
                (size.width, size.height),
            )
        });

        let mut batcher = Batcher::with_config(backend, self.config.batch.clone());
        batcher.initialize()?;
        self.app.on_start(&mut batcher).context("App::on_start failed")?;

        entry.with_window(|w| w.request_redraw());
        self.session = Some(Session { batcher, entry, started: Instant::now(), frame_index: 0 });
        Ok(())
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    /// Renders one frame. Returns `Exit` when the app or a fatal surface
    /// error asks for it.
    fn redraw(&mut self) -> AppControl {
        let Some(session) = self.session.as_mut() else {
            return AppControl::Continue;
        };
        let Session { batcher, entry, started, frame_index } = session;

        let scale = entry.with_window(|w| w.scale_factor() as f32);
        let size = entry.borrow_gpu().size();
        if size.width == 0 || size.height == 0 {
            return AppControl::Continue;
        }

        let frame = match entry.borrow_gpu().acquire() {
            Ok(frame) => frame,
            Err(err) => {
                log::debug!("surface acquire failed: {err}");
                return match entry.with_gpu_mut(|gpu| gpu.handle_surface_error(err)) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        let viewport = entry.with_window(|w| {
            let (lw, lh) = logical_size(w);
            Viewport::new(lw, lh)
        });
        batcher.backend_mut().set_viewport(viewport, scale, (size.width, size.height));
        batcher.backend_mut().begin(frame.view(), self.app.clear_color());

        if let Err(e) = batcher.begin_frame() {
            log::error!("{e:#}");
            return AppControl::Exit;
        }

        let control = entry.with_window(|window| {
            let mut ctx = FrameCtx {
                window: WindowCtx { window },
                batch: &mut *batcher,
                elapsed: started.elapsed(),
                frame_index: *frame_index,
            };
            self.app.on_frame(&mut ctx)
        });

        batcher.end_frame();
        let commands = batcher.backend_mut().finish();
        *frame_index += 1;

        entry.with(|fields| {
            fields.window.pre_present_notify();
            fields.gpu.present(frame, commands);
        });

        control
    }
}

impl<A: App + 'static> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        if let Err(e) = self.start_session(event_loop) {
            log::error!("failed to start: {e:#}");
            self.request_exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(session) = &self.session {
            session.entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                // Drops the batcher (releasing its textures) before the window.
                self.session = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(session) = self.session.as_mut() {
                    session.entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    session.entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(session) = self.session.as_mut() {
                    let new_size = session.entry.with_window(|w| w.inner_size());
                    session.entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    session.entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                if self.redraw() == AppControl::Exit {
                    self.request_exit(event_loop);
                }
            }

            _ => {}
        }
    }
}
