use glam::{Vec2, vec2};

use crate::graphics::transformable::delegate_transformable;
use crate::graphics::{
    Color, Drawable, PrimitiveType, RenderStates, RenderTarget, Texture, Transformable, Vertex,
};
use crate::system::Rect;

/// A textured quad
///
/// Owns a cheap handle to its texture, so the texture can be dropped by the
/// caller while sprites referencing it live on
#[derive(Debug, Clone)]
pub struct Sprite {
    transformable: Transformable,
    texture: Texture,
    texture_rect: Rect,
    color: Color,
}

impl Sprite {
    /// A sprite showing the whole texture
    pub fn new(texture: &Texture) -> Self {
        let (w, h) = texture.size();
        Self::with_rect(texture, Rect::new(Vec2::ZERO, vec2(w as f32, h as f32)))
    }

    /// A sprite showing a sub-rectangle of the texture, in texels
    pub fn with_rect(texture: &Texture, texture_rect: Rect) -> Self {
        Self {
            transformable: Transformable::default(),
            texture: texture.clone(),
            texture_rect,
            color: Color::WHITE,
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Swaps the texture; the texture rect is kept unless `reset_rect`
    pub fn set_texture(&mut self, texture: &Texture, reset_rect: bool) {
        self.texture = texture.clone();
        if reset_rect {
            let (w, h) = self.texture.size();
            self.texture_rect = Rect::new(Vec2::ZERO, vec2(w as f32, h as f32));
        }
    }

    pub fn texture_rect(&self) -> Rect {
        self.texture_rect
    }

    pub fn set_texture_rect(&mut self, rect: Rect) {
        self.texture_rect = rect;
    }

    /// Color multiplied with the texture's texels
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Bounding box in local coordinates; matches the texture rect size
    pub fn local_bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.texture_rect.size.abs())
    }

    /// Bounding box in world coordinates
    pub fn global_bounds(&self) -> Rect {
        self.transformable.transform().transform_rect(self.local_bounds())
    }
}

delegate_transformable!(Sprite);

impl Drawable for Sprite {
    fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates) {
        let mut states = states;
        states.transform.combine(&self.transformable.transform());
        states.texture = Some(&self.texture);

        let size = self.texture_rect.size.abs();
        let t = self.texture_rect;
        // strip order: top-left, top-right, bottom-left, bottom-right
        let vertices = [
            Vertex::new(Vec2::ZERO, self.color, t.position),
            Vertex::new(vec2(size.x, 0.0), self.color, vec2(t.max().x, t.position.y)),
            Vertex::new(vec2(0.0, size.y), self.color, vec2(t.position.x, t.max().y)),
            Vertex::new(size, self.color, t.max()),
        ];
        target.draw_vertices(&vertices, PrimitiveType::TriangleStrip, states);
    }
}
