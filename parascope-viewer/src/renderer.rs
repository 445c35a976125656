//! wgpu renderer: surface, pipelines, uniforms, and frame rendering

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::interpreter::{Primitive, PrimitiveKind};
use crate::scene::{LightRig, Scene};
use bytemuck::{Pod, Zeroable};
use nalgebra::Vector3;
use parascope_core::{Error, Result};
use std::sync::Arc;
use winit::window::Window;

/// Vertex data for shaded surfaces and markers
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl MeshVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Vertex data for flat-colored lines
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Camera uniform data
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_pos: [f32; 3],
    pub _padding: f32,
}

/// Lighting uniform: rgb + intensity per term, directions toward the lights
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct LightingUniform {
    pub ambient: [f32; 4],
    pub key: [f32; 4],
    pub fill: [f32; 4],
}

impl LightingUniform {
    fn from_rig(rig: &LightRig) -> Self {
        let dir = |position: [f32; 3]| {
            let v = Vector3::new(position[0], position[1], position[2]);
            let n = v.norm();
            if n > f32::EPSILON {
                v / n
            } else {
                Vector3::new(0.0, 1.0, 0.0)
            }
        };
        let key_dir = dir(rig.key.position);
        let fill_dir = dir(rig.fill.position);
        Self {
            ambient: [
                rig.ambient_color[0],
                rig.ambient_color[1],
                rig.ambient_color[2],
                rig.ambient_intensity,
            ],
            key: [key_dir.x, key_dir.y, key_dir.z, rig.key.intensity],
            fill: [fill_dir.x, fill_dir.y, fill_dir.z, rig.fill.intensity],
        }
    }
}

/// GPU residency of one primitive
#[derive(Debug)]
pub struct GpuPrimitive {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub vertex_count: u32,
    pub index_count: u32,
    pub kind: PrimitiveKind,
}

impl GpuPrimitive {
    /// Explicitly release the underlying buffers
    pub fn destroy(self) {
        self.vertex_buffer.destroy();
        if let Some(index_buffer) = &self.index_buffer {
            index_buffer.destroy();
        }
    }
}

/// The viewer's renderer: owns the render surface, depth buffer, pipelines,
/// and uniform buffers. Resizing reconfigures surface and depth buffer
/// together so no frame observes them inconsistently.
pub struct ViewerRenderer {
    pub gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    mesh_pipeline: wgpu::RenderPipeline,
    line_list_pipeline: wgpu::RenderPipeline,
    line_strip_pipeline: wgpu::RenderPipeline,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ViewerRenderer {
    /// Create a renderer targeting the given window
    pub async fn new(window: Arc<Window>, lights: &LightRig) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| Error::Gpu(format!("failed to create surface: {:?}", e)))?;

        let gpu = GpuContext::new(&instance, Some(&surface)).await?;

        let surface_caps = surface.get_capabilities(&gpu.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &surface_config);

        let depth_view = Self::create_depth_view(&gpu.device, &surface_config);

        let camera_uniform = CameraUniform {
            view_proj: nalgebra::Matrix4::identity().into(),
            view_pos: [0.0, 0.0, 0.0],
            _padding: 0.0,
        };
        let camera_buffer = gpu.create_buffer_init(
            "camera buffer",
            &[camera_uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let lighting_uniform = LightingUniform::from_rig(lights);
        let lighting_buffer = gpu.create_buffer_init(
            "lighting buffer",
            &[lighting_uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let bind_group_layout =
            gpu.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                    ],
                    label: Some("viewer_bind_group_layout"),
                });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
            label: Some("viewer_bind_group"),
        });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("viewer pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let mesh_shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("mesh shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
            });
        let line_shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("line shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/line.wgsl").into()),
            });

        let mesh_pipeline = Self::create_pipeline(
            &gpu.device,
            &pipeline_layout,
            &mesh_shader,
            MeshVertex::desc(),
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            "mesh",
        );
        let line_list_pipeline = Self::create_pipeline(
            &gpu.device,
            &pipeline_layout,
            &line_shader,
            LineVertex::desc(),
            surface_format,
            wgpu::PrimitiveTopology::LineList,
            "line list",
        );
        let line_strip_pipeline = Self::create_pipeline(
            &gpu.device,
            &pipeline_layout,
            &line_shader,
            LineVertex::desc(),
            surface_format,
            wgpu::PrimitiveTopology::LineStrip,
            "line strip",
        );

        Ok(Self {
            gpu,
            surface,
            surface_config,
            depth_view,
            mesh_pipeline,
            line_list_pipeline,
            line_strip_pipeline,
            camera_uniform,
            camera_buffer,
            lighting_buffer,
            bind_group,
        })
    }

    fn create_depth_view(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        vertex_layout: wgpu::VertexBufferLayout,
        surface_format: wgpu::TextureFormat,
        topology: wgpu::PrimitiveTopology,
        label: &str,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} pipeline", label)),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[vertex_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Surfaces are double-sided
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
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
        })
    }

    /// Current aspect ratio of the render surface
    pub fn aspect_ratio(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height.max(1) as f32
    }

    /// Resize the render surface and depth buffer together
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.gpu.device, &self.surface_config);
        self.depth_view = Self::create_depth_view(&self.gpu.device, &self.surface_config);
    }

    /// Push the camera's matrices to the GPU
    pub fn update_camera(&mut self, camera: &Camera) {
        let view_proj = camera.projection_matrix() * camera.view_matrix();
        self.camera_uniform.view_proj = view_proj.into();
        self.camera_uniform.view_pos = [camera.position.x, camera.position.y, camera.position.z];
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&self.camera_uniform),
        );
    }

    /// Push new lighting values to the GPU
    pub fn update_lighting(&mut self, rig: &LightRig) {
        let uniform = LightingUniform::from_rig(rig);
        self.gpu
            .queue
            .write_buffer(&self.lighting_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Upload one primitive's buffers
    pub fn upload(&self, primitive: &Primitive) -> GpuPrimitive {
        let vertex_buffer = match primitive.kind {
            PrimitiveKind::Surface | PrimitiveKind::Marker => {
                let vertices: Vec<MeshVertex> = primitive
                    .positions
                    .iter()
                    .enumerate()
                    .map(|(i, position)| MeshVertex {
                        position: *position,
                        normal: primitive.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
                        color: primitive.color,
                    })
                    .collect();
                self.gpu
                    .create_buffer_init("primitive vertices", &vertices, wgpu::BufferUsages::VERTEX)
            }
            PrimitiveKind::Wireframe | PrimitiveKind::Line => {
                let vertices: Vec<LineVertex> = primitive
                    .positions
                    .iter()
                    .map(|position| LineVertex {
                        position: *position,
                        color: primitive.color,
                    })
                    .collect();
                self.gpu
                    .create_buffer_init("primitive vertices", &vertices, wgpu::BufferUsages::VERTEX)
            }
        };

        let index_buffer = if primitive.indices.is_empty() {
            None
        } else {
            Some(self.gpu.create_buffer_init(
                "primitive indices",
                &primitive.indices,
                wgpu::BufferUsages::INDEX,
            ))
        };

        GpuPrimitive {
            vertex_buffer,
            index_buffer,
            vertex_count: primitive.positions.len() as u32,
            index_count: primitive.indices.len() as u32,
            kind: primitive.kind,
        }
    }

    /// Ensure every scene primitive is GPU-resident
    pub fn prepare(&self, scene: &mut Scene) {
        for helper in scene.helpers_mut() {
            if helper.gpu.is_none() {
                helper.gpu = Some(self.upload(&helper.cpu));
            }
        }
        for item in scene.group.iter_mut() {
            if item.gpu.is_none() {
                item.gpu = Some(self.upload(&item.cpu));
            }
        }
    }

    fn draw<'pass>(pass: &mut wgpu::RenderPass<'pass>, gpu: &'pass GpuPrimitive) {
        pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        if let Some(index_buffer) = &gpu.index_buffer {
            pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..gpu.index_count, 0, 0..1);
        } else {
            pass.draw(0..gpu.vertex_count, 0..1);
        }
    }

    /// Render one frame of the scene
    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            // A lost or outdated surface recovers after reconfiguring
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface
                    .configure(&self.gpu.device, &self.surface_config);
                self.surface
                    .get_current_texture()
                    .map_err(|e| Error::Gpu(format!("failed to get surface texture: {:?}", e)))?
            }
            Err(e) => {
                return Err(Error::Gpu(format!(
                    "failed to get surface texture: {:?}",
                    e
                )))
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("viewer render encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("viewer render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: scene.background[0],
                            g: scene.background[1],
                            b: scene.background[2],
                            a: scene.background[3],
                        }),
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
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.bind_group, &[]);

            // Helper lines first, then generated lines, then translucent
            // surfaces last so blending sees everything behind them.
            pass.set_pipeline(&self.line_list_pipeline);
            for helper in scene.helpers() {
                if let Some(gpu) = &helper.gpu {
                    Self::draw(&mut pass, gpu);
                }
            }
            for item in scene.group.iter() {
                if let Some(gpu) = &item.gpu {
                    if gpu.kind == PrimitiveKind::Wireframe {
                        Self::draw(&mut pass, gpu);
                    }
                }
            }

            pass.set_pipeline(&self.line_strip_pipeline);
            for item in scene.group.iter() {
                if let Some(gpu) = &item.gpu {
                    if gpu.kind == PrimitiveKind::Line {
                        Self::draw(&mut pass, gpu);
                    }
                }
            }

            pass.set_pipeline(&self.mesh_pipeline);
            for item in scene.group.iter() {
                if let Some(gpu) = &item.gpu {
                    if matches!(gpu.kind, PrimitiveKind::Surface | PrimitiveKind::Marker) {
                        Self::draw(&mut pass, gpu);
                    }
                }
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
