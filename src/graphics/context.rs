use std::sync::Mutex;

use wgpu::{
    Adapter, BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry,
    BindingType, BufferSize, Device, Instance, Queue, SamplerBindingType, ShaderStages,
    TextureSampleType, TextureViewDimension,
};

use crate::graphics::pipeline::PipelineCache;
use crate::system::lifecycle::SharedLifecycle;
use crate::system::{Error, Result};

use std::sync::Arc;

static GPU: SharedLifecycle<SharedGpu> = SharedLifecycle::new();

/// Process-wide counted handle to the GPU backend
///
/// The underlying `wgpu` instance/adapter/device is created exactly once when
/// the first handle is acquired & torn down when the last one is released, so
/// GPU resources (textures, shaders, render targets) can be constructed in
/// any order, before any window exists. Acquire/release is safe from multiple
/// threads
pub struct GpuContext {
    pub(crate) shared: Arc<SharedGpu>,
}

pub(crate) struct SharedGpu {
    pub instance: Instance,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
    pub texture_layout: BindGroupLayout,
    pub camera_layout: BindGroupLayout,
    pub default_texture: BindGroup,
    pub pipelines: Mutex<PipelineCache>,
}

impl GpuContext {
    /// Acquires a handle, initializing the GPU backend if this is the first
    /// live handle in the process
    pub fn acquire() -> Result<GpuContext> {
        Ok(GpuContext {
            shared: GPU.acquire(init_gpu)?,
        })
    }

    pub(crate) fn device(&self) -> &Device {
        &self.shared.device
    }

    pub(crate) fn queue(&self) -> &Queue {
        &self.shared.queue
    }

    /// (inits, teardowns) of the underlying GPU backend, for instrumentation
    pub fn lifecycle_counters() -> (u64, u64) {
        GPU.counters()
    }

    /// Number of live handles
    pub fn live_handles() -> usize {
        GPU.live()
    }
}

impl std::fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GpuContext")
    }
}

impl Clone for GpuContext {
    fn clone(&self) -> Self {
        // count > 0 while self is alive, so the init closure never runs
        let shared = GPU
            .acquire(|| Err(Error::AdapterNotFound))
            .unwrap_or_else(|_| self.shared.clone());
        GpuContext { shared }
    }
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        GPU.release();
    }
}

fn init_gpu() -> Result<SharedGpu> {
    let instance = Instance::default();
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        force_fallback_adapter: false,
        compatible_surface: None,
    }))
    .map_err(|_| Error::AdapterNotFound)?;

    let (device, queue) =
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
            .map_err(|e| Error::DeviceRequest(e.to_string()))?;

    log::debug!("graphics backend up: {}", adapter.get_info().name);

    let texture_layout = create_texture_layout(&device);
    let camera_layout = create_camera_layout(&device);
    let default_texture = create_default_texture(&device, &queue, &texture_layout);

    Ok(SharedGpu {
        instance,
        adapter,
        device,
        queue,
        texture_layout,
        camera_layout,
        default_texture,
        pipelines: Mutex::new(PipelineCache::default()),
    })
}

/// Bind group layout for texture sampling
///
/// - Binding 0: 2D texture (fragment shader)
/// - Binding 1: Sampler (fragment shader)
fn create_texture_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("Texture Bind Group Layout"),
        entries: &[
            BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 1,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Bind group layout for the per-draw view transform
///
/// Dynamic offset so each queued draw command can reference its own slot of
/// one shared uniform buffer
fn create_camera_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("Camera Bind Group Layout"),
        entries: &[BindGroupLayoutEntry {
            binding: 0,
            visibility: ShaderStages::VERTEX,
            ty: BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: BufferSize::new(64),
            },
            count: None,
        }],
    })
}

/// 1x1 white fallback texture, bound whenever a draw has no texture
fn create_default_texture(device: &Device, queue: &Queue, layout: &BindGroupLayout) -> BindGroup {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Default Texture"),
        size: wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &[255u8, 255, 255, 255],
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4),
            rows_per_image: Some(1),
        },
        wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
    );

    let view = texture.create_view(&Default::default());
    let sampler = device.create_sampler(&Default::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Default Texture Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}
