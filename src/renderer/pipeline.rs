use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use super::primitives::{MeshData, Vertex, SPHERE_SLICES, SPHERE_STACKS};
use super::uniforms::{DrawUniforms, FrameUniforms};
use crate::scene::draw::Shape;
use crate::scene::frame::Frame;
use crate::scene::quad_mesh::QuadMesh;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Upper bound on draw items per frame; the scene emits 15.
pub const MAX_DRAWS: usize = 64;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("{label} Vertex Buffer").as_str()),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("{label} Index Buffer").as_str()),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

/// Lit mesh rendering with a depth buffer. Geometry is uploaded once; each
/// frame only rewrites the uniform buffers.
pub struct ScenePipeline {
    solid_pipeline: wgpu::RenderPipeline,
    wire_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    ground: GpuMesh,
    sphere: GpuMesh,
    cube: GpuMesh,
    wire_sphere: GpuMesh,
    _depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl ScenePipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        ground: &QuadMesh,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../shaders/scene.wgsl").into()),
        });

        let frame_size = std::mem::size_of::<FrameUniforms>() as u64;
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: frame_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let draw_size = std::mem::size_of::<DrawUniforms>() as u64;
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let draw_stride = draw_size.div_ceil(alignment) * alignment;
        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniform Buffer"),
            size: draw_stride * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Frame Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(frame_size),
                    },
                    count: None,
                }],
            });

        let draw_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(draw_size),
                    },
                    count: None,
                }],
            });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Bind Group"),
            layout: &draw_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: NonZeroU64::new(draw_size),
                }),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &draw_bind_group_layout],
            push_constant_ranges: &[],
        });

        let solid_pipeline = create_render_pipeline(
            device,
            &layout,
            &shader,
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            "Solid Pipeline",
        );
        let wire_pipeline = create_render_pipeline(
            device,
            &layout,
            &shader,
            surface_format,
            wgpu::PrimitiveTopology::LineList,
            "Wireframe Pipeline",
        );

        let (depth_texture, depth_view) = create_depth_texture(device, width, height);

        Self {
            solid_pipeline,
            wire_pipeline,
            frame_buffer,
            frame_bind_group,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            ground: GpuMesh::upload(device, "Ground", &MeshData::from_quad_mesh(ground)),
            sphere: GpuMesh::upload(
                device,
                "Sphere",
                &MeshData::solid_sphere(SPHERE_SLICES, SPHERE_STACKS),
            ),
            cube: GpuMesh::upload(device, "Cube", &MeshData::solid_cube()),
            wire_sphere: GpuMesh::upload(
                device,
                "Wire Sphere",
                &MeshData::wire_sphere(SPHERE_SLICES, SPHERE_STACKS),
            ),
            _depth_texture: depth_texture,
            depth_view,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);
        self._depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Clears colour and depth on `target`, then draws the frame's items in order.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        frame: &Frame,
    ) {
        let draws = if frame.draws.len() > MAX_DRAWS {
            log::warn!(
                "Dropping {} draw items over the limit of {}",
                frame.draws.len() - MAX_DRAWS,
                MAX_DRAWS
            );
            &frame.draws[..MAX_DRAWS]
        } else {
            &frame.draws[..]
        };

        let frame_uniforms = FrameUniforms::from_frame(frame);
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[frame_uniforms]));

        if !draws.is_empty() {
            let stride = self.draw_stride as usize;
            let mut bytes = vec![0u8; stride * draws.len()];
            for (chunk, item) in bytes.chunks_exact_mut(stride).zip(draws) {
                let uniforms = DrawUniforms::from(item);
                let raw = bytemuck::bytes_of(&uniforms);
                chunk[..raw.len()].copy_from_slice(raw);
            }
            queue.write_buffer(&self.draw_buffer, 0, &bytes);
        }

        let [r, g, b, a] = frame.clear_color.to_array().map(f64::from);
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });
        pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for (i, item) in draws.iter().enumerate() {
            let (mesh, pipeline, index_count) = match item.shape {
                Shape::GroundQuads { face_count } => (
                    &self.ground,
                    &self.solid_pipeline,
                    (face_count * 6).min(self.ground.index_count),
                ),
                Shape::SolidSphere => (&self.sphere, &self.solid_pipeline, self.sphere.index_count),
                Shape::SolidCube => (&self.cube, &self.solid_pipeline, self.cube.index_count),
                Shape::WireSphere => (
                    &self.wire_sphere,
                    &self.wire_pipeline,
                    self.wire_sphere.index_count,
                ),
            };

            let offset = (i as u64 * self.draw_stride) as u32;
            pass.set_pipeline(pipeline);
            pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..index_count, 0, 0..1);
        }
    }
}

fn create_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::LAYOUT],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}
