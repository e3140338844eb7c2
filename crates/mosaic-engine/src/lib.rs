//! Mosaic engine crate.
//!
//! An immediate-mode 2D batching renderer. Callers submit quads, lines,
//! circles, rounded rectangles and text in paint order through
//! [`batch::BatchSurface`]; a [`batch::Batcher`] packs them into as few
//! indexed draw calls as the texture-slot and scissor limits allow and hands
//! each one to a [`backend::Backend`].
//!
//! Two backends ship with the crate: [`render::WgpuBackend`] for real
//! windows (hosted by [`window::Runtime`]) and
//! [`backend::RecordingBackend`] for headless use.

pub mod backend;
pub mod batch;
pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod text;
pub mod window;
