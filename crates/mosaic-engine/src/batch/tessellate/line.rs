use crate::batch::geometry::Geometry;
use crate::batch::vertex::Fill;
use crate::coords::{UvRect, Vec2};

use super::quad;

/// Segments shorter than this produce no geometry.
pub const MIN_LINE_LENGTH: f32 = 1e-3;

#[inline]
pub fn is_degenerate(from: Vec2, to: Vec2) -> bool {
    !(from.is_finite() && to.is_finite()) || (to - from).length() < MIN_LINE_LENGTH
}

/// Appends a thick segment as a quad whose long axis runs `from → to`.
///
/// Returns `false` (and appends nothing) for degenerate segments.
pub fn line(geom: &mut Geometry, from: Vec2, to: Vec2, thickness: f32, fill: Fill) -> bool {
    if is_degenerate(from, to) {
        return false;
    }

    let d = to - from;
    let offset = d.perp() * (thickness * 0.5 / d.length());

    quad::corners(
        geom,
        [from + offset, to + offset, to - offset, from - offset],
        UvRect::FULL,
        fill,
    );
    true
}
