use std::time::Duration;

use wgpu::{
    Extent3d, PresentMode, SurfaceConfiguration, TextureDescriptor, TextureDimension,
    TextureFormat, TextureUsages, TextureView,
};

use crate::graphics::context::GpuContext;
use crate::graphics::pipeline::STENCIL_FORMAT;
use crate::graphics::target::{Canvas, FrameResources, RenderTarget, flush, read_texture_pixels};
use crate::system::{Error, Result};
use crate::window::{Event, Window, WindowConfig};

/// A window that is also a render target
///
/// Pairs a [`Window`] with a swapchain surface. Drawing goes through the
/// [`RenderTarget`] methods; [`display`](RenderWindow::display) executes the
/// queued commands, snapshots the frame for [`capture`](RenderWindow::capture)
/// & presents. Window & event methods are forwarded
pub struct RenderWindow {
    window: Window,
    context: GpuContext,
    surface: wgpu::Surface<'static>,
    config: SurfaceConfiguration,
    canvas: Canvas,
    frame: FrameResources,
    stencil_view: TextureView,
    capture_texture: wgpu::Texture,
}

impl RenderWindow {
    pub fn new(config: WindowConfig) -> Result<RenderWindow> {
        let window = Window::new(config)?;
        let context = GpuContext::acquire()?;

        let handle = window
            .surface_handle()
            .ok_or_else(|| Error::SurfaceCreation("no native window handle".into()))?;
        let surface = context
            .shared
            .instance
            .create_surface(wgpu::SurfaceTarget::Window(handle))
            .map_err(|e| Error::SurfaceCreation(e.to_string()))?;

        let caps = surface.get_capabilities(&context.shared.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(Error::SurfaceUnsupported)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(Error::SurfaceUnsupported)?;

        let (width, height) = window.size();
        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(context.device(), &surface_config);

        let stencil_view = create_stencil(&context, &surface_config);
        let capture_texture = create_capture(&context, &surface_config);
        let canvas = Canvas::new((surface_config.width, surface_config.height));
        let frame = FrameResources::new(&context.shared);

        Ok(RenderWindow {
            window,
            context,
            surface,
            config: surface_config,
            canvas,
            frame,
            stencil_view,
            capture_texture,
        })
    }

    /// Executes the queued draw commands, snapshots the result & presents
    ///
    /// A frame whose surface can't be acquired is dropped with a log entry;
    /// the surface is reconfigured so the next frame can recover
    pub fn display(&mut self) {
        let frame_texture = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring; frame dropped");
                self.reconfigure(self.window.size());
                self.drop_frame();
                return;
            }
            Err(e) => {
                log::warn!("frame dropped: {e}");
                self.drop_frame();
                return;
            }
        };

        let color_view = frame_texture.texture.create_view(&Default::default());
        let ctx = &self.context.shared;
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Window Encoder"),
            });
        flush(
            ctx,
            &mut self.frame,
            &mut self.canvas,
            &mut encoder,
            &color_view,
            &self.stencil_view,
            self.config.format,
            (self.config.width, self.config.height),
        );
        encoder.copy_texture_to_texture(
            frame_texture.texture.as_image_copy(),
            self.capture_texture.as_image_copy(),
            Extent3d {
                width: self.config.width,
                height: self.config.height,
                depth_or_array_layers: 1,
            },
        );
        ctx.queue.submit(Some(encoder.finish()));
        frame_texture.present();
    }

    /// Reads back the last displayed frame as tightly packed 8-bit RGBA
    /// rows, top-left first; blocks until the GPU finishes
    pub fn capture(&self) -> Vec<u8> {
        let mut pixels = read_texture_pixels(
            &self.context.shared,
            &self.capture_texture,
            (self.config.width, self.config.height),
        );
        if matches!(
            self.config.format,
            TextureFormat::Bgra8Unorm | TextureFormat::Bgra8UnormSrgb
        ) {
            for pixel in pixels.chunks_exact_mut(4) {
                pixel.swap(0, 2);
            }
        }
        pixels
    }

    /// Switches the present mode between vsync & immediate
    pub fn set_vertical_sync_enabled(&mut self, enabled: bool) {
        self.config.present_mode = if enabled {
            PresentMode::AutoVsync
        } else {
            PresentMode::AutoNoVsync
        };
        self.surface.configure(self.context.device(), &self.config);
    }

    /// Pops the next pending event; resizes reconfigure the surface before
    /// they are returned
    pub fn poll_event(&mut self) -> Option<Event> {
        let event = self.window.poll_event();
        self.handle(event)
    }

    /// Blocking variant of [`poll_event`](Self::poll_event)
    pub fn wait_event(&mut self, timeout: Option<Duration>) -> Option<Event> {
        let event = self.window.wait_event(timeout);
        self.handle(event)
    }

    fn handle(&mut self, event: Option<Event>) -> Option<Event> {
        if let Some(Event::Resized { width, height }) = event {
            self.reconfigure((width, height));
        }
        event
    }

    fn reconfigure(&mut self, size: (u32, u32)) {
        self.config.width = size.0.max(1);
        self.config.height = size.1.max(1);
        self.surface.configure(self.context.device(), &self.config);
        self.stencil_view = create_stencil(&self.context, &self.config);
        self.capture_texture = create_capture(&self.context, &self.config);
        self.canvas.resize((self.config.width, self.config.height));
    }

    fn drop_frame(&mut self) {
        self.canvas.discard_frame();
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn close(&mut self) {
        self.window.close();
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }
}

impl RenderTarget for RenderWindow {
    fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

fn create_stencil(context: &GpuContext, config: &SurfaceConfiguration) -> TextureView {
    let texture = context.device().create_texture(&TextureDescriptor {
        label: Some("Window Stencil Texture"),
        size: Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: STENCIL_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

fn create_capture(context: &GpuContext, config: &SurfaceConfiguration) -> wgpu::Texture {
    context.device().create_texture(&TextureDescriptor {
        label: Some("Window Capture Texture"),
        size: Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: config.format,
        usage: TextureUsages::COPY_DST | TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}
