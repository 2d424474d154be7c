use std::collections::HashMap;
use std::sync::Arc;

use wgpu::{
    BindGroupLayout, ColorTargetState, ColorWrites, DepthStencilState, Device, FragmentState,
    PipelineLayoutDescriptor, RenderPipeline, RenderPipelineDescriptor, ShaderModule,
    TextureFormat, VertexState, include_wgsl,
};

use crate::graphics::stencil::StencilMode;
use crate::graphics::vertex::GpuVertex;
use crate::graphics::{BlendMode, Shader};

/// Stencil buffer format attached to every render target
pub(crate) const STENCIL_FORMAT: TextureFormat = TextureFormat::Stencil8;

/// Everything that selects a distinct GPU pipeline for a draw command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PipelineKey {
    pub blend: BlendMode,
    pub stencil: StencilMode,
    pub shader: Option<u64>,
    pub format: TextureFormat,
}

/// Cache of render pipelines keyed by blend/stencil/shader/target format
///
/// The default shader module is compiled once on first use; user shaders
/// carry their own module & a unique id for the key
#[derive(Default)]
pub(crate) struct PipelineCache {
    default_shader: Option<ShaderModule>,
    pipelines: HashMap<PipelineKey, Arc<RenderPipeline>>,
}

impl PipelineCache {
    pub fn get_or_create(
        &mut self,
        device: &Device,
        texture_layout: &BindGroupLayout,
        camera_layout: &BindGroupLayout,
        key: PipelineKey,
        shader: Option<&Shader>,
    ) -> Arc<RenderPipeline> {
        if let Some(pipeline) = self.pipelines.get(&key) {
            return pipeline.clone();
        }

        let module = match shader {
            Some(shader) => shader.module(),
            None => &*self
                .default_shader
                .get_or_insert_with(|| device.create_shader_module(include_wgsl!("shader.wgsl"))),
        };

        let pipeline = Arc::new(create_pipeline(
            device,
            texture_layout,
            camera_layout,
            module,
            &key,
        ));
        self.pipelines.insert(key, pipeline.clone());
        pipeline
    }
}

/// Creates a 2D pipeline for one blend/stencil/format combination
///
/// All pipelines share the same layout: texture at group 0, camera (dynamic
/// offset) at group 1, with the [`GpuVertex`] buffer layout
fn create_pipeline(
    device: &Device,
    texture_layout: &BindGroupLayout,
    camera_layout: &BindGroupLayout,
    module: &ShaderModule,
    key: &PipelineKey,
) -> RenderPipeline {
    let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some("Primitive Pipeline Layout"),
        bind_group_layouts: &[texture_layout, camera_layout],
        push_constant_ranges: &[],
    });

    let write_mask = if key.stencil.stencil_only {
        ColorWrites::empty()
    } else {
        ColorWrites::ALL
    };

    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("Primitive Pipeline"),
        layout: Some(&layout),
        vertex: VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[GpuVertex::desc()],
            compilation_options: Default::default(),
        },
        primitive: Default::default(),
        depth_stencil: Some(DepthStencilState {
            format: STENCIL_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: key.stencil.to_wgpu(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        fragment: Some(FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState {
                format: key.format,
                blend: Some(key.blend.to_wgpu()),
                write_mask,
            })],
            compilation_options: Default::default(),
        }),
        multiview: None,
        cache: None,
    })
}
