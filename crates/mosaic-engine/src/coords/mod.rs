//! Coordinate and geometry types shared by the batcher and its backends.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Backends convert to NDC in shaders using the framebuffer viewport.

mod rect;
mod scissor;
mod uv;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use scissor::ScissorRect;
pub use uv::UvRect;
pub use vec2::Vec2;
pub use viewport::Viewport;
