mod mesh;
mod offscreen;
mod shaders;

pub use mesh::{extract_primitive, topology_for, GpuMeshes, GpuPrimitive, PrimitiveData, Vertex};
pub use offscreen::{render_to_image, rgba_rows_to_rgb};
pub use shaders::ShaderSources;

use anyhow::{bail, Result};
use glam::Mat4;
use std::collections::HashMap;

use crate::core::GpuContext;
use crate::loaders::GltfScene;
use crate::scene::visit_scene;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-draw matrices, bound with a dynamic offset.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    pub model_view_projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl DrawUniforms {
    pub fn new(model: &Mat4, view: &Mat4, projection: &Mat4) -> Self {
        let model_view = *view * *model;
        Self {
            model_view_projection: (*projection * model_view).to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
            normal_matrix: model_view.inverse().transpose().to_cols_array_2d(),
        }
    }
}

/// Draws the default scene of a glTF document with wgpu.
///
/// One pipeline per primitive topology; every draw's matrices live in a
/// single uniform buffer addressed with dynamic offsets.
pub struct SceneRenderer {
    pipelines: HashMap<wgpu::PrimitiveTopology, wgpu::RenderPipeline>,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    uniform_capacity: usize,
    meshes: GpuMeshes,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl SceneRenderer {
    pub async fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        shaders: &ShaderSources,
        scene: &GltfScene,
        size: (u32, u32),
    ) -> Result<Self> {
        let vertex_module = create_checked_module(device, "Vertex Shader", &shaders.vertex).await?;
        let fragment_module =
            create_checked_module(device, "Fragment Shader", &shaders.fragment).await?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<DrawUniforms>() as u64,
                    ),
                },
                count: None,
            }],
            label: Some("draw_bind_group_layout"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let topologies = [
            wgpu::PrimitiveTopology::PointList,
            wgpu::PrimitiveTopology::LineList,
            wgpu::PrimitiveTopology::LineStrip,
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::PrimitiveTopology::TriangleStrip,
        ];
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipelines = topologies
            .into_iter()
            .map(|topology| {
                let pipeline = create_pipeline(
                    device,
                    &pipeline_layout,
                    &vertex_module,
                    &fragment_module,
                    color_format,
                    topology,
                );
                (topology, pipeline)
            })
            .collect();
        if let Some(error) = device.pop_error_scope().await {
            bail!("Shaders do not match the scene vertex and uniform layout: {error}");
        }

        let uniform_stride = wgpu::util::align_to(
            std::mem::size_of::<DrawUniforms>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let uniform_capacity = 64;
        let (uniform_buffer, uniform_bind_group) =
            create_uniforms(device, &bind_group_layout, uniform_stride, uniform_capacity);

        let meshes = GpuMeshes::upload(device, &scene.document, &scene.buffers);
        let depth_view = create_depth_view(device, size);

        Ok(Self {
            pipelines,
            bind_group_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            uniform_capacity,
            meshes,
            depth_view,
            depth_size: size,
        })
    }

    /// Recreates the depth buffer for a new target size.
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        if size != self.depth_size && size.0 > 0 && size.1 > 0 {
            self.depth_view = create_depth_view(device, size);
            self.depth_size = size;
        }
    }

    /// Clears `target` and draws every mesh of the default scene into it.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        scene: &GltfScene,
        view: &Mat4,
        projection: &Mat4,
    ) {
        let mut draws: Vec<(usize, DrawUniforms)> = Vec::new();
        visit_scene(&scene.document, |node, world| {
            if let Some(mesh) = node.mesh() {
                draws.push((mesh.index(), DrawUniforms::new(world, view, projection)));
            }
        });

        self.reserve_uniforms(gpu.device(), draws.len());
        let mut staging = vec![0u8; draws.len() * self.uniform_stride as usize];
        for (i, (_, uniforms)) in draws.iter().enumerate() {
            let offset = i * self.uniform_stride as usize;
            staging[offset..offset + std::mem::size_of::<DrawUniforms>()]
                .copy_from_slice(bytemuck::bytes_of(uniforms));
        }
        if !staging.is_empty() {
            gpu.queue().write_buffer(&self.uniform_buffer, 0, &staging);
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        for (i, (mesh_index, _)) in draws.iter().enumerate() {
            let offset = (i as u64 * self.uniform_stride) as u32;
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
            for primitive in self.meshes.primitives(*mesh_index) {
                if let Some(pipeline) = self.pipelines.get(&primitive.topology) {
                    render_pass.set_pipeline(pipeline);
                    primitive.draw(&mut render_pass);
                }
            }
        }
    }

    fn reserve_uniforms(&mut self, device: &wgpu::Device, draw_count: usize) {
        if draw_count <= self.uniform_capacity {
            return;
        }
        let capacity = draw_count.next_power_of_two();
        log::debug!("growing draw uniform buffer to {capacity} entries");
        let (buffer, bind_group) =
            create_uniforms(device, &self.bind_group_layout, self.uniform_stride, capacity);
        self.uniform_buffer = buffer;
        self.uniform_bind_group = bind_group;
        self.uniform_capacity = capacity;
    }
}

async fn create_checked_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(error) = device.pop_error_scope().await {
        bail!("{label} failed to compile: {error}");
    }
    Ok(module)
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    vertex_module: &wgpu::ShaderModule,
    fragment_module: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("Scene Pipeline {topology:?}")),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: vertex_module,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment_module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

fn create_uniforms(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Uniform Buffer"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
            }),
        }],
        label: Some("draw_bind_group"),
    });
    (buffer, bind_group)
}

fn create_depth_view(device: &wgpu::Device, size: (u32, u32)) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: size.0.max(1),
            height: size.1.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
