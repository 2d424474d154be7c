//! The closed-shape drawables: rectangle, circle & convex polygon
//!
//! All three share one geometry core: the interior is a triangle fan around
//! the centroid of the local bounds & the outline is a triangle strip ring
//! extruded along averaged edge normals. Geometry is rebuilt lazily when a
//! point, size or style setter marks it dirty.

use std::cell::{Cell, RefCell};
use std::f32::consts::TAU;

use glam::{Vec2, vec2};

use crate::graphics::transformable::delegate_transformable;
use crate::graphics::{
    Color, Drawable, PrimitiveType, RenderStates, RenderTarget, Texture, Transformable, Vertex,
};
use crate::system::Rect;

#[derive(Debug, Clone)]
struct ShapeStyle {
    fill_color: Color,
    outline_color: Color,
    outline_thickness: f32,
    texture: Option<Texture>,
    texture_rect: Option<Rect>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill_color: Color::WHITE,
            outline_color: Color::WHITE,
            outline_thickness: 0.0,
            texture: None,
            texture_rect: None,
        }
    }
}

#[derive(Debug, Default)]
struct ShapeGeometry {
    fill: Vec<Vertex>,
    outline: Vec<Vertex>,
    /// Local bounds including the outline
    bounds: Rect,
}

fn edge_normal(p1: Vec2, p2: Vec2) -> Vec2 {
    let edge = p2 - p1;
    let length = edge.length();
    if length == 0.0 {
        Vec2::ZERO
    } else {
        vec2(edge.y, -edge.x) / length
    }
}

/// Rebuilds fill & outline vertices from the shape's boundary points
fn rebuild(points: &[Vec2], style: &ShapeStyle) -> ShapeGeometry {
    if points.len() < 3 {
        return ShapeGeometry::default();
    }

    let mut min = points[0];
    let mut max = points[0];
    for p in &points[1..] {
        min = min.min(*p);
        max = max.max(*p);
    }
    let inside = Rect::new(min, max - min);
    let center = inside.center();

    let texture_rect = style.texture.as_ref().map(|texture| {
        let (w, h) = texture.size();
        style
            .texture_rect
            .unwrap_or(Rect::new(Vec2::ZERO, vec2(w as f32, h as f32)))
    });
    let tex_coords = |position: Vec2| match texture_rect {
        Some(rect) => {
            let ratio = (position - inside.position)
                / vec2(inside.size.x.max(1e-6), inside.size.y.max(1e-6));
            rect.position + ratio * rect.size
        }
        None => Vec2::ZERO,
    };

    // fan: centroid, every boundary point, then the first point again
    let mut fill = Vec::with_capacity(points.len() + 2);
    fill.push(Vertex::new(center, style.fill_color, tex_coords(center)));
    for p in points {
        fill.push(Vertex::new(*p, style.fill_color, tex_coords(*p)));
    }
    fill.push(fill[1]);

    let mut outline = Vec::new();
    let mut bounds = inside;
    if style.outline_thickness != 0.0 {
        outline.reserve(points.len() * 2 + 2);
        let count = points.len();
        for i in 0..count {
            let p0 = points[(i + count - 1) % count];
            let p1 = points[i];
            let p2 = points[(i + 1) % count];

            let mut n1 = edge_normal(p0, p1);
            let mut n2 = edge_normal(p1, p2);
            // normals must point away from the interior
            if n1.dot(center - p1) > 0.0 {
                n1 = -n1;
            }
            if n2.dot(center - p1) > 0.0 {
                n2 = -n2;
            }
            // miter along the averaged normal; the factor hits zero when
            // adjacent edges reverse direction, so clamp it
            let factor = (1.0 + n1.dot(n2)).max(1e-4);
            let normal = (n1 + n2) / factor;

            let outer = p1 + normal * style.outline_thickness;
            outline.push(Vertex::colored(p1, style.outline_color));
            outline.push(Vertex::colored(outer, style.outline_color));
            bounds = bounds.union_point(outer);
        }
        // close the ring
        outline.push(outline[0]);
        outline.push(outline[1]);
    }

    ShapeGeometry {
        fill,
        outline,
        bounds,
    }
}

fn draw_shape(
    geometry: &ShapeGeometry,
    style: &ShapeStyle,
    transformable: &Transformable,
    target: &mut dyn RenderTarget,
    mut states: RenderStates,
) {
    states.transform.combine(&transformable.transform());

    let mut fill_states = states;
    fill_states.texture = style.texture.as_ref();
    target.draw_vertices(&geometry.fill, PrimitiveType::TriangleFan, fill_states);

    if !geometry.outline.is_empty() {
        states.texture = None;
        target.draw_vertices(&geometry.outline, PrimitiveType::TriangleStrip, states);
    }
}

/// Generates the shared style accessors & `Drawable` impl for a shape type
/// with `transformable`/`style`/`geometry`/`dirty` fields & a `points()`
/// method
macro_rules! impl_shape {
    ($type:ty) => {
        impl $type {
            pub fn fill_color(&self) -> Color {
                self.style.fill_color
            }

            pub fn set_fill_color(&mut self, color: Color) {
                self.style.fill_color = color;
                self.dirty.set(true);
            }

            pub fn outline_color(&self) -> Color {
                self.style.outline_color
            }

            pub fn set_outline_color(&mut self, color: Color) {
                self.style.outline_color = color;
                self.dirty.set(true);
            }

            pub fn outline_thickness(&self) -> f32 {
                self.style.outline_thickness
            }

            /// Outline width in local units; negative extrudes inward, zero
            /// disables the outline
            pub fn set_outline_thickness(&mut self, thickness: f32) {
                self.style.outline_thickness = thickness;
                self.dirty.set(true);
            }

            pub fn texture(&self) -> Option<&Texture> {
                self.style.texture.as_ref()
            }

            pub fn set_texture(&mut self, texture: Option<&Texture>) {
                self.style.texture = texture.cloned();
                self.dirty.set(true);
            }

            /// Sub-rectangle of the texture mapped onto the shape, in texels;
            /// defaults to the whole texture
            pub fn set_texture_rect(&mut self, rect: Rect) {
                self.style.texture_rect = Some(rect);
                self.dirty.set(true);
            }

            /// Bounding box in local coordinates, outline included
            pub fn local_bounds(&self) -> Rect {
                self.refresh();
                self.geometry.borrow().bounds
            }

            /// Bounding box in world coordinates
            pub fn global_bounds(&self) -> Rect {
                self.transformable.transform().transform_rect(self.local_bounds())
            }

            fn refresh(&self) {
                if self.dirty.replace(false) {
                    *self.geometry.borrow_mut() = rebuild(&self.points(), &self.style);
                }
            }
        }

        impl Drawable for $type {
            fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates) {
                self.refresh();
                draw_shape(
                    &self.geometry.borrow(),
                    &self.style,
                    &self.transformable,
                    target,
                    states,
                );
            }
        }

        delegate_transformable!($type);
    };
}

/// An axis-aligned rectangle (before its transform is applied)
#[derive(Debug, Default)]
pub struct RectangleShape {
    transformable: Transformable,
    style: ShapeStyle,
    size: Vec2,
    geometry: RefCell<ShapeGeometry>,
    dirty: Cell<bool>,
}

impl RectangleShape {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            dirty: Cell::new(true),
            ..Default::default()
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
        self.dirty.set(true);
    }

    fn points(&self) -> Vec<Vec2> {
        vec![
            Vec2::ZERO,
            vec2(self.size.x, 0.0),
            self.size,
            vec2(0.0, self.size.y),
        ]
    }
}

impl_shape!(RectangleShape);

/// A circle approximated by a regular polygon
#[derive(Debug)]
pub struct CircleShape {
    transformable: Transformable,
    style: ShapeStyle,
    radius: f32,
    point_count: usize,
    geometry: RefCell<ShapeGeometry>,
    dirty: Cell<bool>,
}

impl CircleShape {
    pub fn new(radius: f32) -> Self {
        Self::with_point_count(radius, 30)
    }

    pub fn with_point_count(radius: f32, point_count: usize) -> Self {
        Self {
            transformable: Transformable::default(),
            style: ShapeStyle::default(),
            radius,
            point_count: point_count.max(3),
            geometry: RefCell::new(ShapeGeometry::default()),
            dirty: Cell::new(true),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.dirty.set(true);
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn set_point_count(&mut self, point_count: usize) {
        self.point_count = point_count.max(3);
        self.dirty.set(true);
    }

    fn points(&self) -> Vec<Vec2> {
        let r = self.radius;
        (0..self.point_count)
            .map(|i| {
                let angle = i as f32 / self.point_count as f32 * TAU;
                vec2(r + r * angle.sin(), r - r * angle.cos())
            })
            .collect()
    }
}

impl_shape!(CircleShape);

/// An arbitrary convex polygon; concave point sets render incorrectly but
/// don't fail
#[derive(Debug, Default)]
pub struct ConvexShape {
    transformable: Transformable,
    style: ShapeStyle,
    points: Vec<Vec2>,
    geometry: RefCell<ShapeGeometry>,
    dirty: Cell<bool>,
}

impl ConvexShape {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self {
            points,
            dirty: Cell::new(true),
            ..Default::default()
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn point(&self, index: usize) -> Vec2 {
        self.points[index]
    }

    pub fn set_point(&mut self, index: usize, point: Vec2) {
        self.points[index] = point;
        self.dirty.set(true);
    }

    pub fn set_points(&mut self, points: Vec<Vec2>) {
        self.points = points;
        self.dirty.set(true);
    }

    fn points(&self) -> Vec<Vec2> {
        self.points.clone()
    }
}

impl_shape!(ConvexShape);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_points_wind_clockwise() {
        let shape = RectangleShape::new(vec2(4.0, 2.0));
        assert_eq!(
            shape.points(),
            vec![vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(4.0, 2.0), vec2(0.0, 2.0)]
        );
        assert_eq!(shape.local_bounds(), Rect::new(Vec2::ZERO, vec2(4.0, 2.0)));
    }

    #[test]
    fn fill_fan_closes_on_first_point() {
        let shape = RectangleShape::new(vec2(2.0, 2.0));
        shape.refresh();
        let geometry = shape.geometry.borrow();
        // centroid + 4 corners + closing repeat
        assert_eq!(geometry.fill.len(), 6);
        assert_eq!(geometry.fill[0].position, vec2(1.0, 1.0));
        assert_eq!(geometry.fill[1].position, geometry.fill[5].position);
    }

    #[test]
    fn outline_grows_local_bounds() {
        let mut shape = RectangleShape::new(vec2(10.0, 10.0));
        shape.set_outline_thickness(2.0);
        let bounds = shape.local_bounds();
        assert_eq!(bounds.position, vec2(-2.0, -2.0));
        assert_eq!(bounds.size, vec2(14.0, 14.0));
    }

    #[test]
    fn zero_thickness_emits_no_outline() {
        let shape = CircleShape::new(5.0);
        shape.refresh();
        assert!(shape.geometry.borrow().outline.is_empty());
    }

    #[test]
    fn outline_ring_closes() {
        let mut shape = ConvexShape::new(vec![
            vec2(0.0, 0.0),
            vec2(4.0, 0.0),
            vec2(2.0, 3.0),
        ]);
        shape.set_outline_thickness(1.0);
        shape.refresh();
        let geometry = shape.geometry.borrow();
        assert_eq!(geometry.outline.len(), 3 * 2 + 2);
        let n = geometry.outline.len();
        assert_eq!(geometry.outline[n - 2].position, geometry.outline[0].position);
        assert_eq!(geometry.outline[n - 1].position, geometry.outline[1].position);
    }

    #[test]
    fn reversed_edge_corner_stays_finite() {
        // the second point is a spike: its two edges run in opposite
        // directions, which drives the miter factor to zero
        let mut shape = ConvexShape::new(vec![
            vec2(0.0, 0.0),
            vec2(10.0, 0.0),
            vec2(6.0, 0.0),
            vec2(3.0, 6.0),
        ]);
        shape.set_outline_thickness(1.0);
        shape.refresh();
        let geometry = shape.geometry.borrow();
        assert!(!geometry.outline.is_empty());
        for vertex in &geometry.outline {
            assert!(vertex.position.is_finite());
        }
        assert!(geometry.bounds.position.is_finite());
        assert!(geometry.bounds.size.is_finite());
    }

    #[test]
    fn circle_bounds_span_the_diameter() {
        let circle = CircleShape::with_point_count(10.0, 64);
        let bounds = circle.local_bounds();
        assert!((bounds.size.x - 20.0).abs() < 0.2);
        assert!((bounds.size.y - 20.0).abs() < 0.1);
        assert!(bounds.position.x.abs() < 0.2);
    }

    #[test]
    fn degenerate_convex_shape_draws_nothing() {
        let shape = ConvexShape::new(vec![vec2(0.0, 0.0), vec2(1.0, 1.0)]);
        shape.refresh();
        assert!(shape.geometry.borrow().fill.is_empty());
    }

    #[test]
    fn global_bounds_follow_the_transform() {
        let mut shape = RectangleShape::new(vec2(2.0, 2.0));
        shape.set_position(vec2(10.0, 20.0));
        let bounds = shape.global_bounds();
        assert_eq!(bounds.position, vec2(10.0, 20.0));
        assert_eq!(bounds.size, vec2(2.0, 2.0));
    }
}
