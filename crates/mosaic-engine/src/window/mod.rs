//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window, wires them to the GPU layer and
//! drives one [`Batcher`](crate::batch::Batcher) frame per redraw.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
