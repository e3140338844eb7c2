use super::Viewport;

/// Screen-space clip rectangle (top-left origin, logical pixels).
///
/// A scissor with zero or negative extent is *invalid*: nothing drawn under it
/// is visible. [`ScissorRect::intersect`] never fails; disjoint inputs produce
/// an invalid zero-area result instead.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScissorRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScissorRect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Covers the whole framebuffer.
    #[inline]
    pub fn full(viewport: Viewport) -> Self {
        Self::new(0.0, 0.0, viewport.width.max(0.0), viewport.height.max(0.0))
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    /// Overlap of `self` and `other`.
    ///
    /// Disjoint or touching rectangles yield a zero-area rectangle anchored at
    /// the would-be overlap origin.
    pub fn intersect(self, other: ScissorRect) -> ScissorRect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        ScissorRect::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: f32, y: f32, w: f32, h: f32) -> ScissorRect { ScissorRect::new(x, y, w, h) }

    const SAMPLES: [ScissorRect; 6] = [
        ScissorRect::new(0.0, 0.0, 100.0, 100.0),
        ScissorRect::new(10.0, 10.0, 5.0, 5.0),
        ScissorRect::new(50.0, -20.0, 80.0, 40.0),
        ScissorRect::new(200.0, 200.0, 10.0, 10.0),
        ScissorRect::new(-5.0, 30.0, 10.0, 0.0),
        ScissorRect::new(99.0, 99.0, 2.0, 2.0),
    ];

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        assert_eq!(s(0.0, 0.0, 10.0, 10.0).intersect(s(5.0, 5.0, 10.0, 10.0)), s(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn intersect_contained_returns_inner() {
        let inner = s(10.0, 10.0, 20.0, 20.0);
        assert_eq!(s(0.0, 0.0, 100.0, 100.0).intersect(inner), inner);
    }

    #[test]
    fn intersect_is_commutative() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert_eq!(a.intersect(b), b.intersect(a), "{a:?} ∩ {b:?}");
            }
        }
    }

    #[test]
    fn intersect_is_idempotent() {
        for a in SAMPLES {
            for b in SAMPLES {
                let once = a.intersect(b);
                assert_eq!(once.intersect(b), once);
            }
            if a.is_valid() {
                assert_eq!(a.intersect(a), a);
            }
        }
    }

    #[test]
    fn intersect_disjoint_is_invalid() {
        let i = s(0.0, 0.0, 5.0, 5.0).intersect(s(20.0, 20.0, 5.0, 5.0));
        assert!(!i.is_valid());
        assert_eq!(i.width * i.height, 0.0);
    }

    #[test]
    fn intersect_touching_edge_is_invalid() {
        assert!(!s(0.0, 0.0, 10.0, 10.0).intersect(s(10.0, 0.0, 10.0, 10.0)).is_valid());
    }

    // ── validity ──────────────────────────────────────────────────────────

    #[test]
    fn is_valid_requires_positive_extent() {
        assert!(s(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!s(0.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!s(0.0, 0.0, 1.0, -1.0).is_valid());
    }

    #[test]
    fn full_covers_viewport() {
        assert_eq!(ScissorRect::full(Viewport::new(800.0, 600.0)), s(0.0, 0.0, 800.0, 600.0));
    }
}
