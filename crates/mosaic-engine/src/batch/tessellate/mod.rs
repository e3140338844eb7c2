//! Shape tessellators.
//!
//! Each function appends triangles to a [`Geometry`](super::Geometry) and
//! knows nothing about slots, scissors or flushing. Callers resolve the
//! [`Fill`](super::Fill) first and pass inputs that already passed the
//! degenerate-shape checks exposed here.

pub mod circle;
pub mod line;
pub mod quad;
pub mod rounded_rect;
