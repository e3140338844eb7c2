use crate::batch::geometry::Geometry;
use crate::batch::vertex::Fill;
use crate::coords::{Rect, UvRect, Vec2};

/// Two triangles over corners ordered top-left, top-right, bottom-right, bottom-left.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Appends an arbitrary quad. `corners` follow the order of [`QUAD_INDICES`];
/// `uv.min` lands on the first corner and `uv.max` on the third.
pub fn corners(geom: &mut Geometry, corners: [Vec2; 4], uv: UvRect, fill: Fill) {
    let uvs = [
        [uv.min[0], uv.min[1]],
        [uv.max[0], uv.min[1]],
        [uv.max[0], uv.max[1]],
        [uv.min[0], uv.max[1]],
    ];

    let base = geom.base();
    for (pos, uv) in corners.into_iter().zip(uvs) {
        geom.push_vertex(pos, uv, fill);
    }
    for tri in QUAD_INDICES.chunks_exact(3) {
        geom.push_triangle(base + tri[0], base + tri[1], base + tri[2]);
    }
}

/// Appends an axis-aligned rectangle (4 vertices, 6 indices).
pub fn rect(geom: &mut Geometry, rect: Rect, uv: UvRect, fill: Fill) {
    let r = rect.normalized();
    let (min, max) = (r.min(), r.max());
    corners(
        geom,
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
        uv,
        fill,
    );
}
