/// Comparison applied between the reference value & the stencil buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilComparison {
    Never,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    Always,
}

/// How the stencil buffer is updated when the test passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilUpdate {
    Keep,
    Zero,
    Replace,
    Increment,
    Decrement,
    Invert,
}

/// Stencil test configuration carried by [`RenderStates`](crate::graphics::RenderStates)
///
/// `stencil_only` disables color writes so a draw affects nothing but the
/// stencil buffer (mask construction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilMode {
    pub comparison: StencilComparison,
    pub update: StencilUpdate,
    pub reference: u32,
    pub mask: u32,
    pub stencil_only: bool,
}

impl Default for StencilMode {
    fn default() -> Self {
        Self {
            comparison: StencilComparison::Always,
            update: StencilUpdate::Keep,
            reference: 0,
            mask: !0,
            stencil_only: false,
        }
    }
}

impl StencilMode {
    pub(crate) fn to_wgpu(self) -> wgpu::StencilState {
        let face = wgpu::StencilFaceState {
            compare: comparison(self.comparison),
            fail_op: wgpu::StencilOperation::Keep,
            depth_fail_op: wgpu::StencilOperation::Keep,
            pass_op: update(self.update),
        };
        wgpu::StencilState {
            front: face,
            back: face,
            read_mask: self.mask,
            write_mask: self.mask,
        }
    }
}

fn comparison(c: StencilComparison) -> wgpu::CompareFunction {
    match c {
        StencilComparison::Never => wgpu::CompareFunction::Never,
        StencilComparison::Less => wgpu::CompareFunction::Less,
        StencilComparison::LessEqual => wgpu::CompareFunction::LessEqual,
        StencilComparison::Greater => wgpu::CompareFunction::Greater,
        StencilComparison::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
        StencilComparison::Equal => wgpu::CompareFunction::Equal,
        StencilComparison::NotEqual => wgpu::CompareFunction::NotEqual,
        StencilComparison::Always => wgpu::CompareFunction::Always,
    }
}

fn update(u: StencilUpdate) -> wgpu::StencilOperation {
    match u {
        StencilUpdate::Keep => wgpu::StencilOperation::Keep,
        StencilUpdate::Zero => wgpu::StencilOperation::Zero,
        StencilUpdate::Replace => wgpu::StencilOperation::Replace,
        StencilUpdate::Increment => wgpu::StencilOperation::IncrementClamp,
        StencilUpdate::Decrement => wgpu::StencilOperation::DecrementClamp,
        StencilUpdate::Invert => wgpu::StencilOperation::Invert,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_passes_everything_and_keeps() {
        let m = StencilMode::default();
        assert_eq!(m.comparison, StencilComparison::Always);
        assert_eq!(m.update, StencilUpdate::Keep);
        assert_eq!(m.reference, 0);
        assert_eq!(m.mask, !0);
        assert!(!m.stencil_only);
    }
}
