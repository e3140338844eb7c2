/// Texture-coordinate sub-rectangle, normalized to [0, 1].
///
/// Used to address a region of an atlas. `min` maps to the top-left corner of
/// the destination quad and `max` to the bottom-right.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UvRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl UvRect {
    /// The whole texture.
    pub const FULL: Self = Self { min: [0.0, 0.0], max: [1.0, 1.0] };

    #[inline]
    pub const fn new(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self { min: [u0, v0], max: [u1, v1] }
    }

    /// Builds the UV rect of a `w × h` pixel region at `(x, y)` inside an
    /// `atlas_w × atlas_h` texture.
    pub fn from_pixels(x: u32, y: u32, w: u32, h: u32, atlas_w: u32, atlas_h: u32) -> Self {
        let aw = atlas_w.max(1) as f32;
        let ah = atlas_h.max(1) as f32;
        Self::new(
            x as f32 / aw,
            y as f32 / ah,
            (x + w) as f32 / aw,
            (y + h) as f32 / ah,
        )
    }
}

impl Default for UvRect {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pixels_maps_region_into_unit_square() {
        let uv = UvRect::from_pixels(16, 0, 16, 32, 64, 64);
        assert_eq!(uv, UvRect::new(0.25, 0.0, 0.5, 0.5));
    }

    #[test]
    fn default_is_full_texture() {
        assert_eq!(UvRect::default(), UvRect::new(0.0, 0.0, 1.0, 1.0));
    }
}
