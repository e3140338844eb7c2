//! Font loading and measurement.
//!
//! Glyph rasterization for drawing lives with the GPU backend; this module
//! only owns the parsed fonts and answers layout questions.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem};
