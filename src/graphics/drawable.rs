use crate::graphics::{PrimitiveType, RenderStates, RenderTarget, Vertex};
use crate::system::Rect;

/// Something a render target can draw
///
/// The one intentional use of dynamic dispatch in the drawing pipeline: a
/// drawable decomposes itself into vertex-level draw calls on the target
pub trait Drawable {
    fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates);
}

/// A growable array of vertices with a primitive topology
///
/// The lowest-level drawable; shapes & sprites reduce to this
#[derive(Debug, Default, Clone)]
pub struct VertexArray {
    vertices: Vec<Vertex>,
    primitive: PrimitiveType,
}

impl VertexArray {
    pub fn new(primitive: PrimitiveType) -> Self {
        Self {
            vertices: Vec::new(),
            primitive,
        }
    }

    pub fn with_capacity(primitive: PrimitiveType, capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            primitive,
        }
    }

    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    pub fn set_primitive(&mut self, primitive: PrimitiveType) {
        self.primitive = primitive;
    }

    pub fn push(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    /// Axis-aligned bounding box of all vertices, in local coordinates
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.vertices.first() else {
            return Rect::default();
        };
        let mut min = first.position;
        let mut max = first.position;
        for v in &self.vertices[1..] {
            min = min.min(v.position);
            max = max.max(v.position);
        }
        Rect::new(min, max - min)
    }
}

impl Drawable for VertexArray {
    fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates) {
        target.draw_vertices(&self.vertices, self.primitive, states);
    }
}

impl std::ops::Index<usize> for VertexArray {
    type Output = Vertex;
    fn index(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<usize> for VertexArray {
    fn index_mut(&mut self, index: usize) -> &mut Vertex {
        &mut self.vertices[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::Color;
    use glam::vec2;

    #[test]
    fn bounds_cover_all_vertices() {
        let mut array = VertexArray::new(PrimitiveType::Triangles);
        array.push(Vertex::colored(vec2(10.0, 5.0), Color::WHITE));
        array.push(Vertex::colored(vec2(-2.0, 8.0), Color::WHITE));
        array.push(Vertex::colored(vec2(4.0, -1.0), Color::WHITE));
        let b = array.bounds();
        assert_eq!(b.position, vec2(-2.0, -1.0));
        assert_eq!(b.size, vec2(12.0, 9.0));
    }

    #[test]
    fn empty_array_has_zero_bounds() {
        let array = VertexArray::new(PrimitiveType::TriangleFan);
        assert_eq!(array.bounds(), Rect::default());
        assert!(array.is_empty());
    }
}
