//! GPU device + surface management.
//!
//! Creates the wgpu Device/Queue, configures the window surface and hands out
//! one surface texture per frame. Drawing itself lives in
//! [`render`](crate::render).

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
