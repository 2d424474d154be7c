use std::sync::Arc;
use std::sync::mpsc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, vec2};
use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    Buffer, BufferDescriptor, BufferUsages, CommandEncoder, Extent3d, IndexFormat, LoadOp,
    Operations, RenderPassColorAttachment, RenderPassDepthStencilAttachment, RenderPassDescriptor,
    StoreOp, TextureFormat, TextureView,
};

use crate::graphics::context::SharedGpu;
use crate::graphics::pipeline::PipelineKey;
use crate::graphics::primitive::triangulate;
use crate::graphics::vertex::GpuVertex;
use crate::graphics::{
    BlendMode, Color, CoordinateType, Drawable, PrimitiveType, RenderStates, Shader, StencilMode,
    Texture, Transform, Vertex, View,
};
use crate::system::Rect;

/// Uniform buffer slot stride; dynamic offsets must be 256-byte aligned
const CAMERA_SLOT: u64 = 256;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

/// One queued draw, fully resolved against the render states & the view
/// active at the time of the call
pub(crate) struct DrawCommand {
    vertices: Vec<GpuVertex>,
    indices: Vec<u16>,
    blend: BlendMode,
    stencil: StencilMode,
    view_transform: Transform,
    viewport: Rect,
    texture: Option<Texture>,
    shader: Option<Shader>,
}

/// Per-target drawing state shared by windows & offscreen targets
///
/// Draw calls append commands here; they are replayed into a single render
/// pass when the owning target displays. Opaque outside the crate; it only
/// appears in [`RenderTarget`]'s plumbing methods
pub struct Canvas {
    view: View,
    default_view: View,
    view_is_default: bool,
    clear_color: Option<Color>,
    clear_stencil: bool,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new(size: (u32, u32)) -> Self {
        let default_view = View::from_rect(Rect::new(
            Vec2::ZERO,
            vec2(size.0 as f32, size.1 as f32),
        ));
        Self {
            view: default_view.clone(),
            default_view,
            view_is_default: true,
            clear_color: None,
            clear_stencil: false,
            commands: Vec::new(),
        }
    }

    /// Called when the owning target changes size; the default view follows
    /// the new size, and the active view does too unless the user installed
    /// their own
    pub fn resize(&mut self, size: (u32, u32)) {
        self.default_view = View::from_rect(Rect::new(
            Vec2::ZERO,
            vec2(size.0 as f32, size.1 as f32),
        ));
        if self.view_is_default {
            self.view = self.default_view.clone();
        }
    }

    /// Throws away everything queued for the current frame
    pub(crate) fn discard_frame(&mut self) {
        self.commands.clear();
        self.clear_color = None;
        self.clear_stencil = false;
    }
}

/// Common drawing interface of [`RenderWindow`](crate::graphics::RenderWindow)
/// & [`RenderTexture`](crate::graphics::RenderTexture)
///
/// Draw calls are queued, not executed: geometry is transformed & decomposed
/// into indexed triangles immediately, then replayed in one render pass when
/// the target displays. All provided methods are final in spirit; targets
/// only supply their canvas & pixel size
pub trait RenderTarget {
    #[doc(hidden)]
    fn canvas(&self) -> &Canvas;
    #[doc(hidden)]
    fn canvas_mut(&mut self) -> &mut Canvas;

    /// Size of the drawable area in pixels
    fn size(&self) -> (u32, u32);

    /// Discards everything drawn so far & fills the target with a color
    ///
    /// Also resets the stencil buffer to zero
    fn clear(&mut self, color: Color) {
        let canvas = self.canvas_mut();
        canvas.commands.clear();
        canvas.clear_color = Some(color);
        canvas.clear_stencil = true;
    }

    /// Queues a batch of vertices for drawing
    ///
    /// The topology is decomposed into indexed triangles on the CPU &
    /// `states.transform` is applied to positions up front, so the texture,
    /// shader & vertex slices only need to live for this call
    fn draw_vertices(&mut self, vertices: &[Vertex], primitive: PrimitiveType, states: RenderStates) {
        if vertices.is_empty() {
            return;
        }
        let vertices = if vertices.len() > u16::MAX as usize {
            log::warn!(
                "draw of {} vertices exceeds the 16-bit index range, truncating",
                vertices.len()
            );
            &vertices[..u16::MAX as usize]
        } else {
            vertices
        };

        let mut indices = Vec::new();
        triangulate(primitive, vertices.len(), &mut indices);
        if indices.is_empty() {
            return;
        }

        // tex coords are stored normalized; convert from texels if needed
        let texel_scale = match (states.coordinate_type, states.texture) {
            (CoordinateType::Pixels, Some(texture)) => {
                let (w, h) = texture.size();
                vec2(1.0 / w.max(1) as f32, 1.0 / h.max(1) as f32)
            }
            _ => Vec2::ONE,
        };

        let gpu_vertices = vertices
            .iter()
            .map(|v| GpuVertex {
                position: states.transform.transform_point(v.position).into(),
                color: v.color.to_linear(),
                tex_coords: (v.tex_coords * texel_scale).into(),
            })
            .collect();

        let viewport = self.viewport(&self.canvas().view);
        let canvas = self.canvas_mut();
        canvas.commands.push(DrawCommand {
            vertices: gpu_vertices,
            indices,
            blend: states.blend_mode,
            stencil: states.stencil_mode,
            view_transform: canvas.view.transform(),
            viewport,
            texture: states.texture.cloned(),
            shader: states.shader.cloned(),
        });
    }

    /// Draws a drawable with default render states
    fn draw(&mut self, drawable: &dyn Drawable)
    where
        Self: Sized,
    {
        drawable.draw(self, RenderStates::default());
    }

    /// Draws a drawable with explicit render states
    fn draw_with_states(&mut self, drawable: &dyn Drawable, states: RenderStates)
    where
        Self: Sized,
    {
        drawable.draw(self, states);
    }

    /// Installs a new active view; affects draws issued after this call
    fn set_view(&mut self, view: View) {
        let canvas = self.canvas_mut();
        canvas.view = view;
        canvas.view_is_default = false;
    }

    /// The view currently used for drawing
    fn view(&self) -> &View {
        &self.canvas().view
    }

    /// The view matching the target's full size 1:1, as installed at creation
    fn default_view(&self) -> &View {
        &self.canvas().default_view
    }

    /// A view's viewport resolved against the current target size, in pixels
    fn viewport(&self, view: &View) -> Rect {
        let (w, h) = self.size();
        let vp = view.viewport();
        Rect::new(
            vec2(vp.position.x * w as f32, vp.position.y * h as f32),
            vec2(vp.size.x * w as f32, vp.size.y * h as f32),
        )
    }

    /// Converts a point from target pixels to world coordinates, using the
    /// current view
    fn map_pixel_to_coords(&self, pixel: Vec2) -> Vec2 {
        self.map_pixel_to_coords_with(pixel, &self.canvas().view)
    }

    /// Converts a point from target pixels to world coordinates under an
    /// arbitrary view
    fn map_pixel_to_coords_with(&self, pixel: Vec2, view: &View) -> Vec2 {
        let vp = self.viewport(view);
        let normalized = vec2(
            -1.0 + 2.0 * (pixel.x - vp.position.x) / vp.size.x,
            1.0 - 2.0 * (pixel.y - vp.position.y) / vp.size.y,
        );
        view.inverse_transform().transform_point(normalized)
    }

    /// Converts a point from world coordinates to target pixels, using the
    /// current view
    fn map_coords_to_pixel(&self, point: Vec2) -> Vec2 {
        self.map_coords_to_pixel_with(point, &self.canvas().view)
    }

    /// Converts a point from world coordinates to target pixels under an
    /// arbitrary view
    fn map_coords_to_pixel_with(&self, point: Vec2, view: &View) -> Vec2 {
        let vp = self.viewport(view);
        let normalized = view.transform().transform_point(point);
        vec2(
            (normalized.x + 1.0) / 2.0 * vp.size.x + vp.position.x,
            (-normalized.y + 1.0) / 2.0 * vp.size.y + vp.position.y,
        )
    }
}

/// GPU resources reused across frames by a render target
///
/// Holds the shared camera uniform buffer; one 256-byte slot per queued
/// command, grown as needed
pub(crate) struct FrameResources {
    camera_buffer: Buffer,
    camera_bind_group: wgpu::BindGroup,
    capacity: usize,
}

impl FrameResources {
    pub fn new(ctx: &SharedGpu) -> Self {
        let (camera_buffer, camera_bind_group) = create_camera_resources(ctx, 16);
        Self {
            camera_buffer,
            camera_bind_group,
            capacity: 16,
        }
    }

    fn ensure_capacity(&mut self, ctx: &SharedGpu, count: usize) {
        if count <= self.capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        let (buffer, bind_group) = create_camera_resources(ctx, capacity);
        self.camera_buffer = buffer;
        self.camera_bind_group = bind_group;
        self.capacity = capacity;
    }
}

fn create_camera_resources(ctx: &SharedGpu, slots: usize) -> (Buffer, wgpu::BindGroup) {
    let buffer = ctx.device.create_buffer(&BufferDescriptor {
        label: Some("Camera Uniform Buffer"),
        size: slots as u64 * CAMERA_SLOT,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Camera Bind Group"),
        layout: &ctx.camera_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(64),
            }),
        }],
    });
    (buffer, bind_group)
}

/// Replays the queued commands of a canvas into one render pass
///
/// Buffers & pipelines for every command are created up front; the pass
/// itself only binds & draws
pub(crate) fn flush(
    ctx: &SharedGpu,
    frame: &mut FrameResources,
    canvas: &mut Canvas,
    encoder: &mut CommandEncoder,
    color_view: &TextureView,
    stencil_view: &TextureView,
    format: TextureFormat,
    target_size: (u32, u32),
) {
    let mut commands = std::mem::take(&mut canvas.commands);
    let clear_color = canvas.clear_color.take();
    let clear_stencil = std::mem::take(&mut canvas.clear_stencil);

    frame.ensure_capacity(ctx, commands.len());
    for (i, cmd) in commands.iter().enumerate() {
        let uniform = CameraUniform {
            view_proj: cmd.view_transform.to_mat4().to_cols_array_2d(),
        };
        ctx.queue.write_buffer(
            &frame.camera_buffer,
            i as u64 * CAMERA_SLOT,
            bytemuck::bytes_of(&uniform),
        );
    }

    let buffers: Vec<(Buffer, Buffer, u32)> = commands
        .iter_mut()
        .map(|cmd| {
            let vertex_buffer = ctx.device.create_buffer_init(&BufferInitDescriptor {
                label: None,
                contents: bytemuck::cast_slice(&cmd.vertices),
                usage: BufferUsages::VERTEX,
            });
            let index_count = cmd.indices.len() as u32;
            // index data must be 4-byte aligned
            if cmd.indices.len() % 2 == 1 {
                cmd.indices.push(0);
            }
            let index_buffer = ctx.device.create_buffer_init(&BufferInitDescriptor {
                label: None,
                contents: bytemuck::cast_slice(&cmd.indices),
                usage: BufferUsages::INDEX,
            });
            (vertex_buffer, index_buffer, index_count)
        })
        .collect();

    let pipelines: Vec<Arc<wgpu::RenderPipeline>> = {
        let mut cache = ctx.pipelines.lock().unwrap_or_else(|p| p.into_inner());
        commands
            .iter()
            .map(|cmd| {
                cache.get_or_create(
                    &ctx.device,
                    &ctx.texture_layout,
                    &ctx.camera_layout,
                    PipelineKey {
                        blend: cmd.blend,
                        stencil: cmd.stencil,
                        shader: cmd.shader.as_ref().map(Shader::id),
                        format,
                    },
                    cmd.shader.as_ref(),
                )
            })
            .collect()
    };

    let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
        label: Some("Frame Pass"),
        color_attachments: &[Some(RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: Operations {
                load: match clear_color {
                    Some(color) => LoadOp::Clear(color.to_wgpu()),
                    None => LoadOp::Load,
                },
                store: StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
            view: stencil_view,
            depth_ops: None,
            stencil_ops: Some(Operations {
                load: if clear_stencil {
                    LoadOp::Clear(0)
                } else {
                    LoadOp::Load
                },
                store: StoreOp::Store,
            }),
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    let (tw, th) = (target_size.0 as f32, target_size.1 as f32);
    for (i, cmd) in commands.iter().enumerate() {
        let x = cmd.viewport.position.x.clamp(0.0, tw);
        let y = cmd.viewport.position.y.clamp(0.0, th);
        let w = cmd.viewport.size.x.min(tw - x);
        let h = cmd.viewport.size.y.min(th - y);
        if w <= 0.0 || h <= 0.0 {
            continue;
        }
        pass.set_viewport(x, y, w, h, 0.0, 1.0);
        pass.set_pipeline(&pipelines[i]);
        pass.set_stencil_reference(cmd.stencil.reference);
        let texture_bind = match &cmd.texture {
            Some(texture) => texture.bind_group(),
            None => &ctx.default_texture,
        };
        pass.set_bind_group(0, texture_bind, &[]);
        pass.set_bind_group(1, &frame.camera_bind_group, &[i as u32 * CAMERA_SLOT as u32]);
        pass.set_vertex_buffer(0, buffers[i].0.slice(..));
        pass.set_index_buffer(buffers[i].1.slice(..), IndexFormat::Uint16);
        pass.draw_indexed(0..buffers[i].2, 0, 0..1);
    }
}

/// Blocking copy of a texture's pixels back to the CPU, as tightly packed
/// RGBA rows
///
/// The texture must carry `COPY_SRC` usage. Returns an empty vector if the
/// readback fails
pub(crate) fn read_texture_pixels(
    ctx: &SharedGpu,
    texture: &wgpu::Texture,
    size: (u32, u32),
) -> Vec<u8> {
    let (w, h) = size;
    let bytes_per_row = (4 * w).div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
        * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let buffer = ctx.device.create_buffer(&BufferDescriptor {
        label: Some("Readback Buffer"),
        size: bytes_per_row as u64 * h as u64,
        usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Readback Encoder"),
        });
    encoder.copy_texture_to_buffer(
        texture.as_image_copy(),
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(h),
            },
        },
        Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue.submit(Some(encoder.finish()));

    let slice = buffer.slice(..);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    let _ = ctx.device.poll(wgpu::PollType::Wait);
    if !matches!(rx.recv(), Ok(Ok(()))) {
        log::warn!("pixel readback failed");
        return Vec::new();
    }

    let data = slice.get_mapped_range();
    let mut pixels = Vec::with_capacity((4 * w * h) as usize);
    for row in 0..h {
        let start = (row * bytes_per_row) as usize;
        pixels.extend_from_slice(&data[start..start + (4 * w) as usize]);
    }
    drop(data);
    buffer.unmap();
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    // a target with no GPU behind it; queueing & coordinate mapping are CPU-only
    struct FakeTarget {
        canvas: Canvas,
        size: (u32, u32),
    }

    impl FakeTarget {
        fn new(w: u32, h: u32) -> Self {
            Self {
                canvas: Canvas::new((w, h)),
                size: (w, h),
            }
        }
    }

    impl RenderTarget for FakeTarget {
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

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn default_view_matches_target_size() {
        let target = FakeTarget::new(640, 480);
        assert_eq!(target.default_view().center(), vec2(320.0, 240.0));
        assert_eq!(target.default_view().size(), vec2(640.0, 480.0));
    }

    #[test]
    fn pixel_coords_round_trip() {
        let mut target = FakeTarget::new(800, 600);
        let mut view = View::new(vec2(100.0, 50.0), vec2(400.0, 300.0));
        view.set_rotation(crate::system::Angle::degrees(25.0));
        target.set_view(view);

        for pixel in [vec2(0.0, 0.0), vec2(400.0, 300.0), vec2(799.0, 599.0)] {
            let world = target.map_pixel_to_coords(pixel);
            assert!(approx(target.map_coords_to_pixel(world), pixel));
        }
    }

    #[test]
    fn center_of_view_maps_to_viewport_center() {
        let target = FakeTarget::new(200, 100);
        let world = target.view().center();
        assert!(approx(target.map_coords_to_pixel(world), vec2(100.0, 50.0)));
    }

    #[test]
    fn clear_discards_queued_commands() {
        let mut target = FakeTarget::new(64, 64);
        let vertices = [
            Vertex::colored(vec2(0.0, 0.0), Color::RED),
            Vertex::colored(vec2(1.0, 0.0), Color::RED),
            Vertex::colored(vec2(0.0, 1.0), Color::RED),
        ];
        target.draw_vertices(&vertices, PrimitiveType::Triangles, RenderStates::default());
        assert_eq!(target.canvas().commands.len(), 1);
        target.clear(Color::BLUE);
        assert!(target.canvas().commands.is_empty());
        assert_eq!(target.canvas().clear_color, Some(Color::BLUE));
    }

    #[test]
    fn draw_vertices_decomposes_topology() {
        let mut target = FakeTarget::new(64, 64);
        let quad = [
            Vertex::colored(vec2(0.0, 0.0), Color::WHITE),
            Vertex::colored(vec2(1.0, 0.0), Color::WHITE),
            Vertex::colored(vec2(0.0, 1.0), Color::WHITE),
            Vertex::colored(vec2(1.0, 1.0), Color::WHITE),
        ];
        target.draw_vertices(&quad, PrimitiveType::Quads, RenderStates::default());
        let cmd = &target.canvas().commands[0];
        assert_eq!(cmd.indices, vec![0, 1, 2, 1, 2, 3]);
    }

    #[test]
    fn incomplete_primitives_queue_nothing() {
        let mut target = FakeTarget::new(64, 64);
        let two = [
            Vertex::colored(vec2(0.0, 0.0), Color::WHITE),
            Vertex::colored(vec2(1.0, 0.0), Color::WHITE),
        ];
        target.draw_vertices(&two, PrimitiveType::Triangles, RenderStates::default());
        assert!(target.canvas().commands.is_empty());
    }

    #[test]
    fn states_transform_applies_at_queue_time() {
        let mut target = FakeTarget::new(64, 64);
        let vertices = [
            Vertex::colored(vec2(1.0, 0.0), Color::WHITE),
            Vertex::colored(vec2(2.0, 0.0), Color::WHITE),
            Vertex::colored(vec2(1.0, 1.0), Color::WHITE),
        ];
        let mut transform = Transform::IDENTITY;
        transform.translate(vec2(10.0, 20.0));
        target.draw_vertices(
            &vertices,
            PrimitiveType::Triangles,
            RenderStates::with_transform(transform),
        );
        let cmd = &target.canvas().commands[0];
        assert_eq!(cmd.vertices[0].position, [11.0, 20.0]);
    }

    #[test]
    fn resize_tracks_default_view_only_when_untouched() {
        let mut target = FakeTarget::new(100, 100);
        target.size = (200, 100);
        target.canvas_mut().resize((200, 100));
        assert_eq!(target.view().size(), vec2(200.0, 100.0));

        target.set_view(View::new(vec2(5.0, 5.0), vec2(10.0, 10.0)));
        target.size = (400, 400);
        target.canvas_mut().resize((400, 400));
        assert_eq!(target.view().size(), vec2(10.0, 10.0));
        assert_eq!(target.default_view().size(), vec2(400.0, 400.0));
    }
}
