use glam::{Vec2, vec2};

/// Axis-aligned rectangle defined by position (top-left corner) & size
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub position: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Create a new rectangle from position (top-left) & size
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Returns the top-left corner (min coords)
    pub fn min(&self) -> Vec2 {
        self.position
    }

    /// Returns the bottom-right corner (max coords)
    pub fn max(&self) -> Vec2 {
        self.position + self.size
    }

    /// Returns the center point of the rectangle
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Move the rectangle by the given delta vector
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Returns true if the point is inside of the rectangle
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.position).all() && point.cmple(self.position + self.size).all()
    }

    /// Returns the overlapping region of two rectangles, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        (min.cmplt(max).all()).then(|| Rect::new(min, max - min))
    }

    /// Returns the smallest rectangle covering this one & the given point
    pub fn union_point(&self, point: Vec2) -> Rect {
        let min = self.min().min(point);
        let max = self.max().max(point);
        Rect::new(min, max - min)
    }

    /// Returns the four corners in this order: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        let tl = self.position;
        let tr = vec2(tl.x + self.size.x, tl.y);
        let br = vec2(tl.x + self.size.x, tl.y + self.size.y);
        let bl = vec2(tl.x, tl.y + self.size.y);
        [tl, tr, br, bl]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_and_corners() {
        let r = Rect::new(vec2(10.0, 20.0), vec2(30.0, 40.0));
        assert!(r.contains(vec2(10.0, 20.0)));
        assert!(r.contains(vec2(40.0, 60.0)));
        assert!(!r.contains(vec2(9.9, 20.0)));
        assert_eq!(r.center(), vec2(25.0, 40.0));
        assert_eq!(
            r.corners(),
            [
                vec2(10.0, 20.0),
                vec2(40.0, 20.0),
                vec2(40.0, 60.0),
                vec2(10.0, 60.0)
            ]
        );
    }

    #[test]
    fn intersection() {
        let a = Rect::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
        let b = Rect::new(vec2(5.0, 5.0), vec2(10.0, 10.0));
        let i = a.intersection(&b).unwrap();
        assert_eq!(i, Rect::new(vec2(5.0, 5.0), vec2(5.0, 5.0)));
        let c = Rect::new(vec2(20.0, 20.0), vec2(1.0, 1.0));
        assert!(a.intersection(&c).is_none());
    }

    #[test]
    fn union_point_extends_bounds() {
        let r = Rect::new(vec2(0.0, 0.0), vec2(2.0, 2.0));
        assert_eq!(r.union_point(vec2(1.0, 1.0)), r);
        assert_eq!(
            r.union_point(vec2(-1.0, 4.0)),
            Rect::new(vec2(-1.0, 0.0), vec2(3.0, 4.0))
        );
    }
}
