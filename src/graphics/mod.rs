//! 2D rendering: the vertex/transform/color data model, drawables & the
//! GPU-backed render targets

mod blend;
mod color;
pub(crate) mod context;
mod drawable;
mod pipeline;
mod primitive;
mod render_texture;
mod render_window;
mod shader;
mod shape;
mod sprite;
mod states;
mod stencil;
pub(crate) mod target;
mod texture;
mod transform;
mod transformable;
mod vertex;
mod view;

pub use blend::{BlendEquation, BlendFactor, BlendMode};
pub use color::Color;
pub use context::GpuContext;
pub use drawable::{Drawable, VertexArray};
pub use render_texture::RenderTexture;
pub use render_window::RenderWindow;
pub use shader::Shader;
pub use shape::{CircleShape, ConvexShape, RectangleShape};
pub use sprite::Sprite;
pub use states::{CoordinateType, RenderStates};
pub use stencil::{StencilComparison, StencilMode, StencilUpdate};
pub use target::{Canvas, RenderTarget};
pub use texture::Texture;
pub use transform::Transform;
pub use transformable::Transformable;
pub use vertex::Vertex;
pub use view::View;

pub use primitive::PrimitiveType;
