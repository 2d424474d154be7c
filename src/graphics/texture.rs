use std::path::Path;
use std::sync::Arc;

use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindingResource, Extent3d, Origin3d,
    TexelCopyBufferLayout, TexelCopyTextureInfo, TextureAspect, TextureDescriptor,
    TextureDimension, TextureFormat, TextureUsages, TextureView,
};

use crate::graphics::context::GpuContext;
use crate::system::{Error, Result};

/// A GPU texture that can be referenced by
/// [`RenderStates`](crate::graphics::RenderStates)
///
/// Internally shared: a draw call only borrows the texture, the queued
/// command holds onto the GPU resources until the frame is submitted.
/// Creating a texture acquires the process-wide graphics context, so it
/// works before any window exists
#[derive(Debug, Clone)]
pub struct Texture {
    inner: Arc<TextureInner>,
}

#[derive(Debug)]
struct TextureInner {
    bind_group: BindGroup,
    texture: Option<wgpu::Texture>,
    size: (u32, u32),
    _context: GpuContext,
}

impl Texture {
    /// Creates a texture from tightly packed 8-bit RGBA pixels
    pub fn from_pixels(width: u32, height: u32, pixels: &[u8]) -> Result<Texture> {
        let context = GpuContext::acquire()?;
        Self::from_pixels_with(context, width, height, pixels)
    }

    /// Creates a texture from encoded image bytes (PNG)
    pub fn from_memory(data: &[u8]) -> Result<Texture> {
        let img = image::load_from_memory(data)
            .map_err(|e| Error::InvalidImage(e.to_string()))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        Self::from_pixels(w, h, &img)
    }

    /// Loads a texture from an image file on disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Texture> {
        let img = image::open(path.as_ref())
            .map_err(|e| Error::InvalidImage(e.to_string()))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        Self::from_pixels(w, h, &img)
    }

    pub(crate) fn from_pixels_with(
        context: GpuContext,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Texture> {
        if pixels.len() != (width * height * 4) as usize {
            return Err(Error::InvalidImage(format!(
                "expected {} bytes for {width}x{height} RGBA, got {}",
                width * height * 4,
                pixels.len()
            )));
        }

        let device = context.device();
        let texture = device.create_texture(&TextureDescriptor {
            label: None,
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        write_pixels(&context, &texture, width, height, pixels);

        let view = texture.create_view(&Default::default());
        let bind_group = create_bind_group(&context, &view);

        Ok(Texture {
            inner: Arc::new(TextureInner {
                bind_group,
                texture: Some(texture),
                size: (width, height),
                _context: context,
            }),
        })
    }

    /// Wraps an existing texture view (used by render-to-texture targets)
    pub(crate) fn from_view(
        context: GpuContext,
        view: &TextureView,
        size: (u32, u32),
    ) -> Texture {
        let bind_group = create_bind_group(&context, view);
        Texture {
            inner: Arc::new(TextureInner {
                bind_group,
                texture: None,
                size,
                _context: context,
            }),
        }
    }

    /// Size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.inner.size
    }

    /// Replaces the pixel content; dimensions must match the texture
    ///
    /// Textures backing a render target can't be updated this way; the call
    /// is a logged no-op for those
    pub fn update(&mut self, pixels: &[u8]) {
        let (w, h) = self.inner.size;
        if pixels.len() != (w * h * 4) as usize {
            log::warn!("texture update skipped: {} bytes for {w}x{h}", pixels.len());
            return;
        }
        match &self.inner.texture {
            Some(texture) => write_pixels(&self.inner._context, texture, w, h, pixels),
            None => log::warn!("texture update skipped: render target texture"),
        }
    }

    pub(crate) fn bind_group(&self) -> &BindGroup {
        &self.inner.bind_group
    }
}

fn write_pixels(context: &GpuContext, texture: &wgpu::Texture, w: u32, h: u32, pixels: &[u8]) {
    context.queue().write_texture(
        TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: Origin3d::ZERO,
            aspect: TextureAspect::All,
        },
        pixels,
        TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * w),
            rows_per_image: Some(h),
        },
        Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
    );
}

fn create_bind_group(context: &GpuContext, view: &TextureView) -> BindGroup {
    let device = context.device();
    let sampler = device.create_sampler(&Default::default());
    device.create_bind_group(&BindGroupDescriptor {
        label: None,
        layout: &context.shared.texture_layout,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(view),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::Sampler(&sampler),
            },
        ],
    })
}
