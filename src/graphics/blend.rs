/// Multiplier applied to source or destination colors during blending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// How the factored source & destination values are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendEquation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// A complete blending configuration: separate factor/equation triples for
/// the color & alpha channels
///
/// Equality is pure value comparison; the mode is also the pipeline cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendMode {
    pub color_src_factor: BlendFactor,
    pub color_dst_factor: BlendFactor,
    pub color_equation: BlendEquation,
    pub alpha_src_factor: BlendFactor,
    pub alpha_dst_factor: BlendFactor,
    pub alpha_equation: BlendEquation,
}

impl BlendMode {
    /// Standard "over" alpha compositing
    ///
    /// The alpha channel uses `One/OneMinusSrcAlpha` rather than re-blending
    /// with `SrcAlpha`; this asymmetry is what keeps nested render-to-texture
    /// with transparent targets correct
    pub const ALPHA: BlendMode = BlendMode {
        color_src_factor: BlendFactor::SrcAlpha,
        color_dst_factor: BlendFactor::OneMinusSrcAlpha,
        color_equation: BlendEquation::Add,
        alpha_src_factor: BlendFactor::One,
        alpha_dst_factor: BlendFactor::OneMinusSrcAlpha,
        alpha_equation: BlendEquation::Add,
    };

    /// Additive blending
    pub const ADD: BlendMode = BlendMode {
        color_src_factor: BlendFactor::SrcAlpha,
        color_dst_factor: BlendFactor::One,
        color_equation: BlendEquation::Add,
        alpha_src_factor: BlendFactor::One,
        alpha_dst_factor: BlendFactor::One,
        alpha_equation: BlendEquation::Add,
    };

    /// Multiplicative blending
    pub const MULTIPLY: BlendMode = BlendMode::uniform(
        BlendFactor::DstColor,
        BlendFactor::Zero,
        BlendEquation::Add,
    );

    /// No blending: source overwrites destination
    pub const NONE: BlendMode =
        BlendMode::uniform(BlendFactor::One, BlendFactor::Zero, BlendEquation::Add);

    /// Builds a mode using the same factors & equation for color & alpha
    pub const fn uniform(src: BlendFactor, dst: BlendFactor, equation: BlendEquation) -> Self {
        Self {
            color_src_factor: src,
            color_dst_factor: dst,
            color_equation: equation,
            alpha_src_factor: src,
            alpha_dst_factor: dst,
            alpha_equation: equation,
        }
    }

    pub(crate) fn to_wgpu(self) -> wgpu::BlendState {
        wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: factor(self.color_src_factor),
                dst_factor: factor(self.color_dst_factor),
                operation: equation(self.color_equation),
            },
            alpha: wgpu::BlendComponent {
                src_factor: factor(self.alpha_src_factor),
                dst_factor: factor(self.alpha_dst_factor),
                operation: equation(self.alpha_equation),
            },
        }
    }
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::ALPHA
    }
}

fn factor(f: BlendFactor) -> wgpu::BlendFactor {
    match f {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcColor => wgpu::BlendFactor::Src,
        BlendFactor::OneMinusSrcColor => wgpu::BlendFactor::OneMinusSrc,
        BlendFactor::DstColor => wgpu::BlendFactor::Dst,
        BlendFactor::OneMinusDstColor => wgpu::BlendFactor::OneMinusDst,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
        BlendFactor::DstAlpha => wgpu::BlendFactor::DstAlpha,
        BlendFactor::OneMinusDstAlpha => wgpu::BlendFactor::OneMinusDstAlpha,
    }
}

fn equation(e: BlendEquation) -> wgpu::BlendOperation {
    match e {
        BlendEquation::Add => wgpu::BlendOperation::Add,
        BlendEquation::Subtract => wgpu::BlendOperation::Subtract,
        BlendEquation::ReverseSubtract => wgpu::BlendOperation::ReverseSubtract,
        BlendEquation::Min => wgpu::BlendOperation::Min,
        BlendEquation::Max => wgpu::BlendOperation::Max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_over_compositing() {
        let m = BlendMode::default();
        assert_eq!(m.color_src_factor, BlendFactor::SrcAlpha);
        assert_eq!(m.color_dst_factor, BlendFactor::OneMinusSrcAlpha);
        assert_eq!(m.color_equation, BlendEquation::Add);
        assert_eq!(m.alpha_src_factor, BlendFactor::One);
        assert_eq!(m.alpha_dst_factor, BlendFactor::OneMinusSrcAlpha);
        assert_eq!(m.alpha_equation, BlendEquation::Add);
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(BlendMode::ALPHA, BlendMode::default());
        assert_ne!(BlendMode::ALPHA, BlendMode::ADD);
        let copy = BlendMode::ADD;
        assert_eq!(copy, BlendMode::ADD);
    }
}
