use super::Vec2;

/// Axis-aligned rectangle (top-left origin).
///
/// Used as the destination of a blit: `origin` is the screen-space top-left
/// corner and `size` the on-screen draw size.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

/// Integer pixel span `[x0, x1) × [y0, y1)` clipped to a raster.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PixelSpan {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    /// Flips negative extents so `size` is non-negative.
    pub fn normalized(self) -> Self {
        let (x, w) = if self.size.x < 0.0 {
            (self.origin.x + self.size.x, -self.size.x)
        } else {
            (self.origin.x, self.size.x)
        };
        let (y, h) = if self.size.y < 0.0 {
            (self.origin.y + self.size.y, -self.size.y)
        } else {
            (self.origin.y, self.size.y)
        };
        Rect::new(x, y, w, h)
    }

    /// Half-open containment: `[min, max)`.
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        let max = r.max();
        p.x >= r.origin.x && p.y >= r.origin.y && p.x < max.x && p.y < max.y
    }

    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();
        let (amax, bmax) = (a.max(), b.max());

        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = amax.x.min(bmax.x);
        let y1 = amax.y.min(bmax.y);

        let r = Rect::new(x0, y0, x1 - x0, y1 - y0);
        if r.is_empty() { None } else { Some(r) }
    }

    /// Pixels whose centers fall inside the rectangle, clipped to a
    /// `width × height` raster. `None` when nothing is covered.
    pub fn pixel_span(self, width: u32, height: u32) -> Option<PixelSpan> {
        let r = self.normalized();
        if r.is_empty() || !r.is_finite() {
            return None;
        }
        let max = r.max();

        // Pixel i covers [i, i+1); its center i + 0.5 is inside when
        // origin <= i + 0.5 < max.
        let x0 = (r.origin.x - 0.5).ceil().max(0.0);
        let y0 = (r.origin.y - 0.5).ceil().max(0.0);
        let x1 = (max.x - 0.5).ceil().min(width as f64);
        let y1 = (max.y - 0.5).ceil().min(height as f64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelSpan { x0: x0 as u32, y0: y0 as u32, x1: x1 as u32, y1: y1 as u32 })
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f64, y: f64, w: f64, h: f64) -> Rect { Rect::new(x, y, w, h) }

    // ── normalized / contains ─────────────────────────────────────────────

    #[test]
    fn normalized_flips_negative_extents() {
        let n = r(10.0, 10.0, -4.0, -3.0).normalized();
        assert_eq!(n, r(6.0, 7.0, 4.0, 3.0));
    }

    #[test]
    fn contains_is_half_open() {
        let rect = r(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(9.999, 5.0)));
        assert!(!rect.contains(Vec2::new(10.0, 10.0)));
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlap() {
        let i = r(0.0, 0.0, 10.0, 10.0).intersect(r(5.0, 5.0, 10.0, 10.0));
        assert_eq!(i, Some(r(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn intersect_shared_edge_is_none() {
        assert!(r(0.0, 0.0, 10.0, 10.0).intersect(r(10.0, 0.0, 5.0, 5.0)).is_none());
    }

    // ── pixel_span ────────────────────────────────────────────────────────

    #[test]
    fn span_of_aligned_rect() {
        let s = r(2.0, 3.0, 4.0, 2.0).pixel_span(100, 100).unwrap();
        assert_eq!(s, PixelSpan { x0: 2, y0: 3, x1: 6, y1: 5 });
    }

    #[test]
    fn span_is_clipped_to_raster() {
        let s = r(-5.0, -5.0, 10.0, 10.0).pixel_span(3, 4).unwrap();
        assert_eq!(s, PixelSpan { x0: 0, y0: 0, x1: 3, y1: 4 });
    }

    #[test]
    fn span_offscreen_is_none() {
        assert!(r(-50.0, 0.0, 10.0, 10.0).pixel_span(100, 100).is_none());
        assert!(r(200.0, 0.0, 10.0, 10.0).pixel_span(100, 100).is_none());
    }

    #[test]
    fn sub_pixel_rect_without_covered_center_is_none() {
        assert!(r(0.6, 0.6, 0.3, 0.3).pixel_span(10, 10).is_none());
    }

    #[test]
    fn non_finite_rect_is_none() {
        assert!(r(f64::NAN, 0.0, 5.0, 5.0).pixel_span(10, 10).is_none());
        assert!(r(0.0, 0.0, f64::INFINITY, 5.0).pixel_span(10, 10).is_none());
    }
}
