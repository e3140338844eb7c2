//! wgpu rendering backend.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - The vertex shader converts to NDC using a viewport uniform.
//! - Vertex colors are sRGB; blending happens in linear space.

mod arena;
mod common;
mod pipeline;
mod text;
mod textures;
mod wgpu_backend;

pub use wgpu_backend::WgpuBackend;
