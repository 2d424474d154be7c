use glam::{Mat4, Vec2, vec2};

use crate::system::{Angle, Rect};

/// A 2D affine transform
///
/// Semantically a 3x3 homogeneous matrix, stored as 16 floats in column-major
/// 4x4 layout so it can be uploaded to the GPU as-is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: [f32; 16],
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);

    /// Builds a transform from the nine components of a 3x3 matrix
    ///
    /// Row-major argument order: `a_rc` is row `r`, column `c`
    #[rustfmt::skip]
    pub const fn new(
        a00: f32, a01: f32, a02: f32,
        a10: f32, a11: f32, a12: f32,
        a20: f32, a21: f32, a22: f32,
    ) -> Self {
        Self {
            m: [
                a00, a10, 0.0, a20,
                a01, a11, 0.0, a21,
                0.0, 0.0, 1.0, 0.0,
                a02, a12, 0.0, a22,
            ],
        }
    }

    /// The raw 4x4 column-major floats, suitable for uniform upload
    pub fn matrix(&self) -> &[f32; 16] {
        &self.m
    }

    pub(crate) fn to_mat4(self) -> Mat4 {
        Mat4::from_cols_array(&self.m)
    }

    /// Right-multiplies `other` into `self` & returns `self` for chaining
    ///
    /// Matrix multiplication: not commutative
    pub fn combine(&mut self, other: &Transform) -> &mut Self {
        let a = &self.m;
        let b = &other.m;

        *self = Transform::new(
            a[0] * b[0] + a[4] * b[1] + a[12] * b[3],
            a[0] * b[4] + a[4] * b[5] + a[12] * b[7],
            a[0] * b[12] + a[4] * b[13] + a[12] * b[15],
            a[1] * b[0] + a[5] * b[1] + a[13] * b[3],
            a[1] * b[4] + a[5] * b[5] + a[13] * b[7],
            a[1] * b[12] + a[5] * b[13] + a[13] * b[15],
            a[3] * b[0] + a[7] * b[1] + a[15] * b[3],
            a[3] * b[4] + a[7] * b[5] + a[15] * b[7],
            a[3] * b[12] + a[7] * b[13] + a[15] * b[15],
        );
        self
    }

    /// Returns the inverse, or identity if the matrix is degenerate
    pub fn inverse(&self) -> Transform {
        let a = &self.m;

        let det = a[0] * (a[15] * a[5] - a[7] * a[13])
            - a[1] * (a[15] * a[4] - a[7] * a[12])
            + a[3] * (a[13] * a[4] - a[5] * a[12]);

        if det == 0.0 {
            return Transform::IDENTITY;
        }

        Transform::new(
            (a[15] * a[5] - a[7] * a[13]) / det,
            -(a[15] * a[4] - a[7] * a[12]) / det,
            (a[13] * a[4] - a[5] * a[12]) / det,
            -(a[15] * a[1] - a[3] * a[13]) / det,
            (a[15] * a[0] - a[3] * a[12]) / det,
            -(a[13] * a[0] - a[1] * a[12]) / det,
            (a[7] * a[1] - a[3] * a[5]) / det,
            -(a[7] * a[0] - a[3] * a[4]) / det,
            (a[5] * a[0] - a[1] * a[4]) / det,
        )
    }

    /// Applies the transform to a point
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        let a = &self.m;
        vec2(
            a[0] * point.x + a[4] * point.y + a[12],
            a[1] * point.x + a[5] * point.y + a[13],
        )
    }

    /// Applies the transform to a rectangle, returning the axis-aligned
    /// bounding box of the four transformed corners (not a rotated rect)
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        let corners = rect.corners().map(|c| self.transform_point(c));
        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            min = min.min(*c);
            max = max.max(*c);
        }
        Rect::new(min, max - min)
    }

    pub fn translate(&mut self, offset: Vec2) -> &mut Self {
        self.combine(&Transform::new(
            1.0, 0.0, offset.x, 0.0, 1.0, offset.y, 0.0, 0.0, 1.0,
        ))
    }

    pub fn rotate(&mut self, angle: Angle) -> &mut Self {
        let (sin, cos) = angle.as_radians().sin_cos();
        self.combine(&Transform::new(
            cos, -sin, 0.0, sin, cos, 0.0, 0.0, 0.0, 1.0,
        ))
    }

    /// Rotation about an arbitrary center
    ///
    /// The matrix is the closed form of `T(center) * R(angle) * T(-center)`,
    /// pre-combined for numerical consistency
    pub fn rotate_around(&mut self, angle: Angle, center: Vec2) -> &mut Self {
        let (sin, cos) = angle.as_radians().sin_cos();
        self.combine(&Transform::new(
            cos,
            -sin,
            center.x * (1.0 - cos) + center.y * sin,
            sin,
            cos,
            center.y * (1.0 - cos) - center.x * sin,
            0.0,
            0.0,
            1.0,
        ))
    }

    pub fn scale(&mut self, factors: Vec2) -> &mut Self {
        self.combine(&Transform::new(
            factors.x, 0.0, 0.0, 0.0, factors.y, 0.0, 0.0, 0.0, 1.0,
        ))
    }

    /// Scaling about an arbitrary center, pre-combined into one matrix
    pub fn scale_around(&mut self, factors: Vec2, center: Vec2) -> &mut Self {
        self.combine(&Transform::new(
            factors.x,
            0.0,
            center.x * (1.0 - factors.x),
            0.0,
            factors.y,
            center.y * (1.0 - factors.y),
            0.0,
            0.0,
            1.0,
        ))
    }
}

impl std::ops::Mul for Transform {
    type Output = Transform;
    fn mul(self, rhs: Transform) -> Transform {
        let mut out = self;
        out.combine(&rhs);
        out
    }
}

impl std::ops::Mul<Vec2> for Transform {
    type Output = Vec2;
    fn mul(self, rhs: Vec2) -> Vec2 {
        self.transform_point(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    fn approx_transform(a: &Transform, b: &Transform) -> bool {
        a.matrix()
            .iter()
            .zip(b.matrix())
            .all(|(x, y)| (x - y).abs() < 1e-3)
    }

    fn sample() -> [Transform; 3] {
        let mut a = Transform::IDENTITY;
        a.translate(vec2(3.0, -2.0)).rotate(Angle::degrees(30.0));
        let mut b = Transform::IDENTITY;
        b.scale(vec2(2.0, 0.5)).translate(vec2(-1.0, 4.0));
        let mut c = Transform::IDENTITY;
        c.rotate_around(Angle::degrees(-75.0), vec2(5.0, 5.0));
        [a, b, c]
    }

    #[test]
    fn identity_is_multiplicative_identity() {
        let [t, ..] = sample();
        let left = Transform::IDENTITY * t;
        let right = t * Transform::IDENTITY;
        assert!(approx_transform(&left, &t));
        assert!(approx_transform(&right, &t));
        assert_eq!(
            Transform::IDENTITY.transform_point(vec2(7.0, -3.0)),
            vec2(7.0, -3.0)
        );
    }

    #[test]
    fn combine_is_associative() {
        let [a, b, c] = sample();
        let left = (a * b) * c;
        let right = a * (b * c);
        assert!(approx_transform(&left, &right));
    }

    #[test]
    fn combine_is_not_commutative() {
        let [a, b, _] = sample();
        assert!(!approx_transform(&(a * b), &(b * a)));
    }

    #[test]
    fn inverse_round_trips_points() {
        for t in sample() {
            let inv = t.inverse();
            for p in [vec2(0.0, 0.0), vec2(10.0, 20.0), vec2(-4.5, 3.25)] {
                assert!(approx(inv.transform_point(t.transform_point(p)), p));
            }
        }
    }

    #[test]
    fn degenerate_inverse_is_identity() {
        let mut t = Transform::IDENTITY;
        t.scale(vec2(0.0, 1.0));
        assert_eq!(t.inverse(), Transform::IDENTITY);
    }

    #[test]
    fn rotate_around_matches_translate_rotate_translate() {
        let center = vec2(4.0, -7.0);
        let angle = Angle::degrees(53.0);

        let mut closed = Transform::IDENTITY;
        closed.rotate_around(angle, center);

        let mut composed = Transform::IDENTITY;
        composed
            .translate(center)
            .rotate(angle)
            .translate(-center);

        assert!(approx_transform(&closed, &composed));
    }

    #[test]
    fn transform_rect_returns_aabb() {
        let mut t = Transform::IDENTITY;
        t.rotate(Angle::degrees(90.0));
        let r = t.transform_rect(Rect::new(vec2(0.0, 0.0), vec2(2.0, 1.0)));
        // a 90 degree rotation maps (w, h) onto (-h, w)
        assert!(approx(r.position, vec2(-1.0, 0.0)));
        assert!(approx(r.size, vec2(1.0, 2.0)));
    }

    #[test]
    fn translation_moves_points() {
        let mut t = Transform::IDENTITY;
        t.translate(vec2(5.0, -3.0));
        assert!(approx(t.transform_point(vec2(1.0, 1.0)), vec2(6.0, -2.0)));
    }
}
