use std::cell::Cell;

use glam::{Vec2, vec2};

use crate::graphics::Transform;
use crate::system::{Angle, Rect};

/// A 2D camera: the region of the world mapped onto a render target
///
/// `viewport` is the normalized sub-rectangle of the target the view draws
/// into, in [0,1] coordinates; it is resolved against the target size at
/// draw time, so resizing the target after `set_view` rescales correctly.
/// The world-to-clip transform is cached & rebuilt lazily whenever any
/// field changes
#[derive(Debug, Clone)]
pub struct View {
    center: Vec2,
    size: Vec2,
    rotation: Angle,
    viewport: Rect,
    transform: Cell<Option<Transform>>,
    inverse: Cell<Option<Transform>>,
}

impl Default for View {
    fn default() -> Self {
        Self::new(vec2(500.0, 500.0), vec2(1000.0, 1000.0))
    }
}

impl View {
    /// Creates a view looking at `center`, showing a `size`-sized region
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            rotation: Angle::ZERO,
            viewport: Rect::new(Vec2::ZERO, Vec2::ONE),
            transform: Cell::new(None),
            inverse: Cell::new(None),
        }
    }

    /// Creates a view showing exactly the given world rectangle
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.center(), rect.size)
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn rotation(&self) -> Angle {
        self.rotation
    }

    /// The normalized viewport rectangle, in [0,1] relative to the target
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
        self.invalidate();
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
        self.invalidate();
    }

    pub fn set_rotation(&mut self, rotation: Angle) {
        self.rotation = rotation;
        self.invalidate();
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        // viewport doesn't feed the transform, but keep the rule simple:
        // any setter invalidates
        self.invalidate();
    }

    /// Moves the view center by an offset
    pub fn scroll(&mut self, offset: Vec2) {
        self.set_center(self.center + offset);
    }

    pub fn rotate(&mut self, angle: Angle) {
        self.set_rotation(self.rotation + angle);
    }

    /// Scales the visible region: factor > 1 zooms out
    pub fn zoom(&mut self, factor: f32) {
        self.set_size(self.size * factor);
    }

    fn invalidate(&mut self) {
        self.transform.set(None);
        self.inverse.set(None);
    }

    /// World-to-clip transform for the current view state
    pub fn transform(&self) -> Transform {
        if let Some(cached) = self.transform.get() {
            return cached;
        }

        let (sine, cosine) = self.rotation.as_radians().sin_cos();
        let tx = -self.center.x * cosine - self.center.y * sine + self.center.x;
        let ty = self.center.x * sine - self.center.y * cosine + self.center.y;

        // projection onto [-1,1] clip space, y flipped so world y grows down
        let a = 2.0 / self.size.x;
        let b = -2.0 / self.size.y;
        let c = -a * self.center.x;
        let d = -b * self.center.y;

        let transform = Transform::new(
            a * cosine,
            a * sine,
            a * tx + c,
            -b * sine,
            b * cosine,
            b * ty + d,
            0.0,
            0.0,
            1.0,
        );
        self.transform.set(Some(transform));
        transform
    }

    /// Clip-to-world transform, cached like [`View::transform`]
    pub fn inverse_transform(&self) -> Transform {
        if let Some(cached) = self.inverse.get() {
            return cached;
        }
        let inverse = self.transform().inverse();
        self.inverse.set(Some(inverse));
        inverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn center_maps_to_clip_origin() {
        let view = View::new(vec2(10.0, 10.0), vec2(20.0, 20.0));
        assert!(approx(view.transform().transform_point(vec2(10.0, 10.0)), Vec2::ZERO));
    }

    #[test]
    fn corners_map_to_clip_corners() {
        let view = View::new(vec2(50.0, 50.0), vec2(100.0, 100.0));
        let t = view.transform();
        // top-left world corner lands at (-1, 1): y is flipped into clip space
        assert!(approx(t.transform_point(vec2(0.0, 0.0)), vec2(-1.0, 1.0)));
        assert!(approx(t.transform_point(vec2(100.0, 100.0)), vec2(1.0, -1.0)));
    }

    #[test]
    fn inverse_round_trips() {
        let mut view = View::new(vec2(30.0, -20.0), vec2(64.0, 48.0));
        view.set_rotation(Angle::degrees(33.0));
        let t = view.transform();
        let inv = view.inverse_transform();
        for p in [vec2(30.0, -20.0), vec2(0.0, 0.0), vec2(15.5, -3.25)] {
            assert!(approx(inv.transform_point(t.transform_point(p)), p));
        }
    }

    #[test]
    fn cache_invalidates_on_change() {
        let mut view = View::new(vec2(0.0, 0.0), vec2(2.0, 2.0));
        let before = view.transform();
        view.set_center(vec2(1.0, 0.0));
        let after = view.transform();
        assert_ne!(before, after);
        assert!(approx(after.transform_point(vec2(1.0, 0.0)), Vec2::ZERO));
    }

    #[test]
    fn from_rect_matches_center_size() {
        let view = View::from_rect(Rect::new(vec2(10.0, 20.0), vec2(100.0, 50.0)));
        assert_eq!(view.center(), vec2(60.0, 45.0));
        assert_eq!(view.size(), vec2(100.0, 50.0));
    }

    #[test]
    fn zoom_scales_visible_region() {
        let mut view = View::new(Vec2::ZERO, vec2(100.0, 100.0));
        view.zoom(2.0);
        assert_eq!(view.size(), vec2(200.0, 200.0));
    }
}
