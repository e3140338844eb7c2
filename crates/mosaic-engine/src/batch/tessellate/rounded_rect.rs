use std::f32::consts::{FRAC_PI_2, PI};

use crate::batch::geometry::Geometry;
use crate::batch::vertex::Fill;
use crate::coords::{Rect, UvRect, Vec2};

use super::{circle, quad};

/// Corner radii below this are drawn as a plain quad.
pub const MIN_CORNER_RADIUS: f32 = 0.1;

/// Clamps `radius` into `[0, min(w, h) / 2]` for the normalized `rect`.
#[inline]
pub fn clamp_radius(rect: Rect, radius: f32) -> f32 {
    let r = rect.normalized();
    let max = 0.5 * r.size.x.min(r.size.y);
    if radius.is_nan() {
        return 0.0;
    }
    radius.clamp(0.0, max.max(0.0))
}

/// Appends a rounded rectangle: one inner rectangle, four edge strips and four
/// quarter-circle corner fans.
///
/// `radius` must already be clamped (see [`clamp_radius`]) and at least
/// [`MIN_CORNER_RADIUS`]. Emits `20 + 4 * (segments + 2)` vertices and
/// `30 + 12 * segments` indices. UVs map the bounding box onto (0,0)–(1,1).
pub fn rounded_rect(geom: &mut Geometry, rect: Rect, radius: f32, segments: u32, fill: Fill) {
    let r = rect.normalized();
    debug_assert!(radius >= MIN_CORNER_RADIUS && radius <= 0.5 * r.size.x.min(r.size.y) + 1e-4);

    let segments = segments.max(1);
    let (x, y, w, h) = (r.origin.x, r.origin.y, r.size.x, r.size.y);
    let uv_of = |p: Vec2| [(p.x - x) / w, (p.y - y) / h];
    let uv_rect = |q: Rect| {
        let (a, b) = (uv_of(q.min()), uv_of(q.max()));
        UvRect::new(a[0], a[1], b[0], b[1])
    };

    let body = [
        r.inset(radius),
        Rect::new(x + radius, y, w - 2.0 * radius, radius),
        Rect::new(x + radius, y + h - radius, w - 2.0 * radius, radius),
        Rect::new(x, y + radius, radius, h - 2.0 * radius),
        Rect::new(x + w - radius, y + radius, radius, h - 2.0 * radius),
    ];
    for part in body {
        quad::rect(geom, part, uv_rect(part), fill);
    }

    // Each arc starts on the side facing away from its corner and sweeps a
    // quarter turn clockwise (+Y down) towards the adjacent side.
    let corners = [
        (Vec2::new(x + radius, y + radius), PI),
        (Vec2::new(x + w - radius, y + radius), PI + FRAC_PI_2),
        (Vec2::new(x + w - radius, y + h - radius), 0.0),
        (Vec2::new(x + radius, y + h - radius), FRAC_PI_2),
    ];
    for (center, start) in corners {
        circle::arc_fan(geom, center, radius, start, FRAC_PI_2, segments, uv_of, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill() -> Fill { Fill::new(0xffff_ffff, 0) }

    #[test]
    fn clamp_radius_limits_to_half_min_side() {
        let rect = Rect::new(0.0, 0.0, 40.0, 10.0);
        assert_eq!(clamp_radius(rect, 3.0), 3.0);
        assert_eq!(clamp_radius(rect, 50.0), 5.0);
        assert_eq!(clamp_radius(rect, -2.0), 0.0);
        assert_eq!(clamp_radius(rect, f32::NAN), 0.0);
    }

    #[test]
    fn counts_follow_corner_segments() {
        for s in [1u32, 4, 8] {
            let mut g = Geometry::new();
            rounded_rect(&mut g, Rect::new(0.0, 0.0, 100.0, 50.0), 10.0, s, fill());
            assert_eq!(g.vertices().len(), (20 + 4 * (s + 2)) as usize);
            assert_eq!(g.indices().len(), (30 + 12 * s) as usize);
        }
    }

    #[test]
    fn geometry_stays_inside_bounds() {
        let rect = Rect::new(10.0, 20.0, 60.0, 30.0);
        let mut g = Geometry::new();
        rounded_rect(&mut g, rect, 8.0, 8, fill());
        for v in g.vertices() {
            assert!(v.x >= 10.0 - 1e-4 && v.x <= 70.0 + 1e-4, "x = {}", v.x);
            assert!(v.y >= 20.0 - 1e-4 && v.y <= 50.0 + 1e-4, "y = {}", v.y);
            assert!((0.0..=1.0 + 1e-5).contains(&v.u) && (0.0..=1.0 + 1e-5).contains(&v.v));
        }
    }

    #[test]
    fn corner_arcs_touch_the_edges() {
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        let mut g = Geometry::new();
        rounded_rect(&mut g, rect, 10.0, 2, fill());
        // Top-left fan starts right after the 20 body vertices: center, then
        // the arc from the left edge (angle π) to the top edge (3π/2).
        let v = g.vertices();
        assert_eq!(v[20].pos(), Vec2::new(10.0, 10.0));
        assert!(v[21].x.abs() < 1e-4 && (v[21].y - 10.0).abs() < 1e-4);
        assert!((v[23].x - 10.0).abs() < 1e-4 && v[23].y.abs() < 1e-4);
    }

    #[test]
    fn triangle_area_matches_rounded_rect_area() {
        let (w, h, rad) = (80.0f32, 40.0f32, 12.0f32);
        let mut g = Geometry::new();
        rounded_rect(&mut g, Rect::new(0.0, 0.0, w, h), rad, 64, fill());

        let v = g.vertices();
        let area: f32 = g
            .indices()
            .chunks_exact(3)
            .map(|t| {
                let (a, b, c) = (v[t[0] as usize].pos(), v[t[1] as usize].pos(), v[t[2] as usize].pos());
                0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs()
            })
            .sum();

        let expected = w * h - (4.0 - PI) * rad * rad;
        assert!((area - expected).abs() / expected < 1e-3, "area {area} vs {expected}");
    }
}
