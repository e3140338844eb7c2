use std::f32::consts::TAU;

use crate::batch::geometry::Geometry;
use crate::batch::vertex::Fill;
use crate::coords::Vec2;

/// Fewest segments that still enclose an area.
pub const MIN_SEGMENTS: u32 = 3;

#[inline]
pub fn is_degenerate(center: Vec2, radius: f32, segments: u32) -> bool {
    segments < MIN_SEGMENTS || !center.is_finite() || !radius.is_finite() || radius <= 0.0
}

/// Appends a filled circle as a closed triangle fan.
///
/// Writes `segments + 1` vertices (center first, then the rim starting at
/// angle 0) and `segments` triangles `(center, i, i + 1)`; the last triangle
/// closes on the first rim vertex instead of duplicating it.
///
/// Returns `false` (and appends nothing) for degenerate input.
pub fn circle(geom: &mut Geometry, center: Vec2, radius: f32, segments: u32, fill: Fill) -> bool {
    if is_degenerate(center, radius, segments) {
        return false;
    }

    let step = TAU / segments as f32;
    let c = geom.push_vertex(center, [0.5, 0.5], fill);
    for i in 0..segments {
        let dir = Vec2::from_angle(i as f32 * step);
        geom.push_vertex(center + dir * radius, [0.5 + 0.5 * dir.x, 0.5 + 0.5 * dir.y], fill);
    }

    for i in 0..segments {
        let a = c + 1 + i;
        let b = c + 1 + (i + 1) % segments;
        geom.push_triangle(c, a, b);
    }
    true
}

/// Appends an open fan covering the arc `start .. start + sweep`.
///
/// Writes `segments + 2` vertices (center plus both arc end points) and
/// `segments` triangles. `uv_of` maps a position to its texture coordinate so
/// the fan can share UV space with surrounding geometry.
pub fn arc_fan(
    geom: &mut Geometry,
    center: Vec2,
    radius: f32,
    start: f32,
    sweep: f32,
    segments: u32,
    uv_of: impl Fn(Vec2) -> [f32; 2],
    fill: Fill,
) {
    let segments = segments.max(1);
    let step = sweep / segments as f32;

    let c = geom.push_vertex(center, uv_of(center), fill);
    for i in 0..=segments {
        let p = center + Vec2::from_angle(start + i as f32 * step) * radius;
        geom.push_vertex(p, uv_of(p), fill);
    }
    for i in 0..segments {
        geom.push_triangle(c, c + 1 + i, c + 2 + i);
    }
}
