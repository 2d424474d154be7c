use std::cell::Cell;

use glam::Vec2;

use crate::graphics::Transform;
use crate::system::Angle;

/// Position/rotation/scale/origin component embedded by every concrete
/// drawable
///
/// The combined transform applies, in order: -origin translation, scale,
/// rotation, position translation. It's cached & rebuilt lazily on change
#[derive(Debug, Clone)]
pub struct Transformable {
    position: Vec2,
    rotation: Angle,
    scale: Vec2,
    origin: Vec2,
    transform: Cell<Option<Transform>>,
}

impl Default for Transformable {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: Angle::ZERO,
            scale: Vec2::ONE,
            origin: Vec2::ZERO,
            transform: Cell::new(None),
        }
    }
}

impl Transformable {
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> Angle {
        self.rotation
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// The local point that `position` pins down & rotation/scale pivot on
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.transform.set(None);
    }

    pub fn set_rotation(&mut self, rotation: Angle) {
        self.rotation = rotation;
        self.transform.set(None);
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.transform.set(None);
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
        self.transform.set(None);
    }

    pub fn move_by(&mut self, offset: Vec2) {
        self.set_position(self.position + offset);
    }

    pub fn rotate(&mut self, angle: Angle) {
        self.set_rotation(self.rotation + angle);
    }

    pub fn scale_by(&mut self, factor: Vec2) {
        self.set_scale(self.scale * factor);
    }

    /// The combined local-to-world transform
    pub fn transform(&self) -> Transform {
        if let Some(cached) = self.transform.get() {
            return cached;
        }
        let (sine, cosine) = (-self.rotation.as_radians()).sin_cos();
        let sxc = self.scale.x * cosine;
        let syc = self.scale.y * cosine;
        let sxs = self.scale.x * sine;
        let sys = self.scale.y * sine;
        let tx = -self.origin.x * sxc - self.origin.y * sys + self.position.x;
        let ty = self.origin.x * sxs - self.origin.y * syc + self.position.y;

        let transform = Transform::new(sxc, sys, tx, -sxs, syc, ty, 0.0, 0.0, 1.0);
        self.transform.set(Some(transform));
        transform
    }

    pub fn inverse_transform(&self) -> Transform {
        self.transform().inverse()
    }
}

/// Forwards the [`Transformable`] API from a drawable that embeds one in a
/// field named `transformable`
macro_rules! delegate_transformable {
    ($type:ty) => {
        impl $type {
            pub fn transformable(&self) -> &$crate::graphics::Transformable {
                &self.transformable
            }

            pub fn transformable_mut(&mut self) -> &mut $crate::graphics::Transformable {
                &mut self.transformable
            }

            pub fn position(&self) -> glam::Vec2 {
                self.transformable.position()
            }

            pub fn set_position(&mut self, position: glam::Vec2) {
                self.transformable.set_position(position);
            }

            pub fn rotation(&self) -> $crate::system::Angle {
                self.transformable.rotation()
            }

            pub fn set_rotation(&mut self, rotation: $crate::system::Angle) {
                self.transformable.set_rotation(rotation);
            }

            pub fn scale(&self) -> glam::Vec2 {
                self.transformable.scale()
            }

            pub fn set_scale(&mut self, scale: glam::Vec2) {
                self.transformable.set_scale(scale);
            }

            pub fn origin(&self) -> glam::Vec2 {
                self.transformable.origin()
            }

            pub fn set_origin(&mut self, origin: glam::Vec2) {
                self.transformable.set_origin(origin);
            }

            pub fn move_by(&mut self, offset: glam::Vec2) {
                self.transformable.move_by(offset);
            }

            pub fn rotate(&mut self, angle: $crate::system::Angle) {
                self.transformable.rotate(angle);
            }
        }
    };
}

pub(crate) use delegate_transformable;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn identity_by_default() {
        assert_eq!(Transformable::default().transform(), Transform::IDENTITY);
    }

    #[test]
    fn position_translates() {
        let mut t = Transformable::default();
        t.set_position(vec2(10.0, -5.0));
        assert!(approx(t.transform().transform_point(Vec2::ZERO), vec2(10.0, -5.0)));
    }

    #[test]
    fn origin_pivots_rotation() {
        let mut t = Transformable::default();
        t.set_origin(vec2(1.0, 1.0));
        t.set_position(vec2(1.0, 1.0));
        t.set_rotation(Angle::degrees(90.0));
        // the origin itself stays pinned at `position`
        assert!(approx(t.transform().transform_point(vec2(1.0, 1.0)), vec2(1.0, 1.0)));
        // a point right of the origin swings down (y grows downward)
        assert!(approx(t.transform().transform_point(vec2(2.0, 1.0)), vec2(1.0, 2.0)));
    }

    #[test]
    fn scale_applies_before_position() {
        let mut t = Transformable::default();
        t.set_scale(vec2(2.0, 3.0));
        t.set_position(vec2(1.0, 1.0));
        assert!(approx(t.transform().transform_point(vec2(1.0, 1.0)), vec2(3.0, 4.0)));
    }

    #[test]
    fn inverse_round_trips() {
        let mut t = Transformable::default();
        t.set_position(vec2(4.0, 7.0));
        t.set_rotation(Angle::degrees(30.0));
        t.set_scale(vec2(2.0, 0.5));
        let p = vec2(3.0, -2.0);
        let mapped = t.transform().transform_point(p);
        assert!(approx(t.inverse_transform().transform_point(mapped), p));
    }
}
