use wgpu::{
    Extent3d, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
};

use crate::graphics::context::GpuContext;
use crate::graphics::pipeline::STENCIL_FORMAT;
use crate::graphics::target::{Canvas, FrameResources, RenderTarget, flush, read_texture_pixels};
use crate::graphics::Texture;
use crate::system::{Error, Result};

const FORMAT: TextureFormat = TextureFormat::Rgba8UnormSrgb;

/// An offscreen render target whose contents can be sampled as a texture
///
/// Works headless: creating one acquires the shared graphics context, no
/// window required. Draw through the [`RenderTarget`] methods, then call
/// [`display`](RenderTexture::display) to execute the queued commands; the
/// texture returned by [`texture`](RenderTexture::texture) holds the result
/// of the last `display`
pub struct RenderTexture {
    context: GpuContext,
    canvas: Canvas,
    frame: FrameResources,
    render_texture: wgpu::Texture,
    color_view: TextureView,
    stencil_view: TextureView,
    sample_texture: wgpu::Texture,
    texture: Texture,
    size: (u32, u32),
}

impl RenderTexture {
    pub fn new(width: u32, height: u32) -> Result<RenderTexture> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImage(format!(
                "render texture size {width}x{height} must be non-zero"
            )));
        }
        let context = GpuContext::acquire()?;
        let device = context.device();
        let extent = Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        // draws land on the render texture; display copies it to a second
        // texture used for sampling, so drawing a render texture's own
        // output is never a usage conflict
        let render_texture = device.create_texture(&TextureDescriptor {
            label: Some("Offscreen Render Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: FORMAT,
            usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let sample_texture = device.create_texture(&TextureDescriptor {
            label: Some("Offscreen Sample Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: FORMAT,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let stencil = device.create_texture(&TextureDescriptor {
            label: Some("Offscreen Stencil Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: STENCIL_FORMAT,
            usage: TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let color_view = render_texture.create_view(&Default::default());
        let stencil_view = stencil.create_view(&Default::default());
        let sample_view = sample_texture.create_view(&Default::default());
        let texture = Texture::from_view(context.clone(), &sample_view, (width, height));
        let frame = FrameResources::new(&context.shared);

        Ok(RenderTexture {
            context,
            canvas: Canvas::new((width, height)),
            frame,
            render_texture,
            color_view,
            stencil_view,
            sample_texture,
            texture,
            size: (width, height),
        })
    }

    /// Executes all queued draw commands & updates the sampling texture
    pub fn display(&mut self) {
        let ctx = &self.context.shared;
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Offscreen Encoder"),
            });
        flush(
            ctx,
            &mut self.frame,
            &mut self.canvas,
            &mut encoder,
            &self.color_view,
            &self.stencil_view,
            FORMAT,
            self.size,
        );
        encoder.copy_texture_to_texture(
            self.render_texture.as_image_copy(),
            self.sample_texture.as_image_copy(),
            Extent3d {
                width: self.size.0,
                height: self.size.1,
                depth_or_array_layers: 1,
            },
        );
        ctx.queue.submit(Some(encoder.finish()));
    }

    /// The texture holding the result of the last [`display`](Self::display)
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Reads the rendered pixels back as tightly packed 8-bit RGBA rows,
    /// top-left first
    ///
    /// Blocks until the GPU finishes. Reflects the last
    /// [`display`](Self::display), not commands still queued
    pub fn read_pixels(&self) -> Vec<u8> {
        read_texture_pixels(&self.context.shared, &self.render_texture, self.size)
    }
}

impl RenderTarget for RenderTexture {
    fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl std::fmt::Debug for RenderTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTexture")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
