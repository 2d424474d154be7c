use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use wgpu::ShaderModule;

use crate::graphics::context::GpuContext;
use crate::system::{Error, Result};

static NEXT_SHADER_ID: AtomicU64 = AtomicU64::new(0);

/// A user-provided WGSL shader usable via
/// [`RenderStates::shader`](crate::graphics::RenderStates)
///
/// The module must expose `vs_main`/`fs_main` entry points with the same
/// vertex inputs & bind groups as the built-in shader: texture + sampler at
/// group 0, the view transform uniform at group 1
#[derive(Debug, Clone)]
pub struct Shader {
    inner: Arc<ShaderInner>,
}

#[derive(Debug)]
struct ShaderInner {
    module: ShaderModule,
    id: u64,
    _context: GpuContext,
}

impl Shader {
    /// Compiles a shader from WGSL source
    pub fn from_wgsl(source: &str) -> Result<Shader> {
        let context = GpuContext::acquire()?;
        let device = context.device();

        // catch validation errors instead of letting the device panic later
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: None,
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(Error::ShaderCompilation(err.to_string()));
        }

        Ok(Shader {
            inner: Arc::new(ShaderInner {
                module,
                id: NEXT_SHADER_ID.fetch_add(1, Ordering::Relaxed),
                _context: context,
            }),
        })
    }

    pub(crate) fn module(&self) -> &ShaderModule {
        &self.inner.module
    }

    /// Stable identity used as part of the pipeline cache key
    pub(crate) fn id(&self) -> u64 {
        self.inner.id
    }
}
