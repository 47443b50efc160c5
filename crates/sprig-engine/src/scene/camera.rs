use crate::coords::{Rect, Vec2};

/// View state for the world-to-screen transform.
///
/// `position` is the world point shown at the center of the viewport.
///
/// Invariant: `zoom > 0`. The transform divides by `zoom`; callers must not
/// construct or mutate a camera into a non-positive zoom. Only `zoom_by`,
/// which sits at the input boundary, rejects bad factors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub viewport_size: Vec2,
    pub zoom: f64,
}

impl Camera {
    #[inline]
    pub const fn new(position: Vec2, viewport_size: Vec2, zoom: f64) -> Self {
        Self { position, viewport_size, zoom }
    }

    /// Camera showing world `[0, viewport)` at zoom 1.
    pub fn centered(viewport_size: Vec2) -> Self {
        Self::new(viewport_size / 2.0, viewport_size, 1.0)
    }

    /// World-space point drawn at the screen's top-left corner.
    #[inline]
    pub fn top_left(&self) -> Vec2 {
        debug_assert!(self.zoom > 0.0, "camera zoom must be positive, got {}", self.zoom);
        self.position - (self.viewport_size / 2.0) / self.zoom
    }

    #[inline]
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        (p - self.top_left()) * self.zoom
    }

    #[inline]
    pub fn screen_to_world(&self, s: Vec2) -> Vec2 {
        s / self.zoom + self.top_left()
    }

    /// On-screen size of an object with world size `s`.
    #[inline]
    pub fn screen_size(&self, s: Vec2) -> Vec2 {
        s * self.zoom
    }

    /// Screen rectangle covered by a world-space box at `position` of `size`.
    pub fn screen_rect(&self, position: Vec2, size: Vec2) -> Rect {
        Rect::from_origin_size(self.world_to_screen(position), self.screen_size(size))
    }

    /// Drag-to-pan: moves the view so content follows a screen-space drag.
    pub fn pan_by_screen(&mut self, delta: Vec2) {
        self.position = self.position - delta / self.zoom;
    }

    /// Zooms around the viewport center. Non-positive or non-finite factors
    /// are ignored.
    pub fn zoom_by(&mut self, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            log::warn!("ignoring zoom factor {factor}");
            return;
        }
        self.zoom *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cam(zoom: f64) -> Camera {
        Camera::new(Vec2::new(450.0, 300.0), Vec2::new(900.0, 600.0), zoom)
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn centered_camera_is_identity() {
        let c = cam(1.0);
        assert_eq!(c, Camera::centered(Vec2::new(900.0, 600.0)));
        assert_eq!(c.world_to_screen(Vec2::new(0.0, 0.0)), Vec2::new(0.0, 0.0));
        assert_eq!(c.world_to_screen(Vec2::new(125.0, 25.0)), Vec2::new(125.0, 25.0));
    }

    #[test]
    fn zoom_two_scales_about_center() {
        let c = cam(2.0);
        assert_eq!(c.top_left(), Vec2::new(225.0, 150.0));
        assert_eq!(c.world_to_screen(Vec2::new(0.0, 0.0)), Vec2::new(-450.0, -300.0));
        assert_eq!(c.world_to_screen(c.position), Vec2::new(450.0, 300.0));
        assert_eq!(c.screen_size(Vec2::new(10.0, 4.0)), Vec2::new(20.0, 8.0));
    }

    #[test]
    fn camera_position_maps_to_viewport_center() {
        let c = Camera::new(Vec2::new(-12.5, 80.0), Vec2::new(640.0, 480.0), 3.5);
        assert!(close(c.world_to_screen(c.position), Vec2::new(320.0, 240.0)));
    }

    #[test]
    fn screen_to_world_inverts_transform() {
        let c = Camera::new(Vec2::new(10.0, -4.0), Vec2::new(300.0, 200.0), 1.75);
        let p = Vec2::new(33.0, 71.0);
        assert!(close(c.screen_to_world(c.world_to_screen(p)), p));
    }

    #[test]
    fn pan_follows_drag() {
        let mut c = cam(2.0);
        let p = Vec2::new(100.0, 100.0);
        let before = c.world_to_screen(p);
        c.pan_by_screen(Vec2::new(30.0, -10.0));
        assert!(close(c.world_to_screen(p), before + Vec2::new(30.0, -10.0)));
    }

    #[test]
    fn zoom_keeps_center_fixed() {
        let mut c = cam(1.0);
        c.zoom_by(4.0);
        assert_eq!(c.zoom, 4.0);
        assert!(close(c.world_to_screen(c.position), Vec2::new(450.0, 300.0)));
    }

    #[test]
    fn invalid_zoom_factor_is_ignored() {
        let mut c = cam(1.5);
        c.zoom_by(0.0);
        c.zoom_by(-2.0);
        c.zoom_by(f64::NAN);
        assert_eq!(c.zoom, 1.5);
    }
}
