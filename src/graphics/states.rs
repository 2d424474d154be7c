use crate::graphics::{BlendMode, Shader, StencilMode, Texture, Transform};

/// Interpretation of vertex texture coordinates
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateType {
    /// Coordinates in texels, `[0, texture_size]`
    #[default]
    Pixels,
    /// Coordinates normalized to `[0, 1]`
    Normalized,
}

/// The complete state needed to rasterize a batch of vertices
///
/// Texture & shader are borrowed, never owned: they only need to outlive the
/// draw call itself (the queued command keeps the underlying GPU resources
/// alive internally). Default states use standard alpha blending, no stencil
/// & the identity transform
#[derive(Debug, Default, Clone, Copy)]
pub struct RenderStates<'a> {
    pub blend_mode: BlendMode,
    pub stencil_mode: StencilMode,
    pub transform: Transform,
    pub coordinate_type: CoordinateType,
    pub texture: Option<&'a Texture>,
    pub shader: Option<&'a Shader>,
}

impl<'a> RenderStates<'a> {
    /// States with a custom transform & defaults for everything else
    pub fn with_transform(transform: Transform) -> Self {
        Self {
            transform,
            ..Default::default()
        }
    }

    /// States with a custom blend mode & defaults for everything else
    pub fn with_blend_mode(blend_mode: BlendMode) -> Self {
        Self {
            blend_mode,
            ..Default::default()
        }
    }

    /// States with a texture & defaults for everything else
    pub fn with_texture(texture: &'a Texture) -> Self {
        Self {
            texture: Some(texture),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_states_match_documented_defaults() {
        let states = RenderStates::default();
        assert_eq!(states.blend_mode, BlendMode::ALPHA);
        assert_eq!(states.stencil_mode, StencilMode::default());
        assert_eq!(states.transform, Transform::IDENTITY);
        assert_eq!(states.coordinate_type, CoordinateType::Pixels);
        assert!(states.texture.is_none());
        assert!(states.shader.is_none());
    }
}
