use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::constants::render::{MAX_POINT_SIZE, MIN_POINT_SIZE};
use crate::error::{SmokeError, SmokeResult};
use crate::particles::{BlendMode, RenderHandle, SmokeConfig, SmokeInstance, SmokeTexture};

/// Per-frame shader constants
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SmokeUniforms {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    /// rgb + global opacity
    pub color: [f32; 4],
    /// width, height, min point size, max point size
    pub viewport: [f32; 4],
}

impl SmokeUniforms {
    pub fn new(projection: Mat4, model_view: Mat4, color: [f32; 3], opacity: f32, viewport: (u32, u32)) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
            color: [color[0], color[1], color[2], opacity],
            viewport: [
                viewport.0.max(1) as f32,
                viewport.1.max(1) as f32,
                MIN_POINT_SIZE,
                MAX_POINT_SIZE,
            ],
        }
    }

    /// Uniforms for a smoke system's colour and opacity
    pub fn from_config(config: &SmokeConfig, projection: Mat4, model_view: Mat4, viewport: (u32, u32)) -> Self {
        Self::new(
            projection,
            model_view,
            config.color_rgb(),
            config.particle_opacity,
            viewport,
        )
    }
}

impl Default for SmokeUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, [1.0; 3], 1.0, (1, 1))
    }
}

/// Colour blend state for a blend mode
pub fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    match mode {
        BlendMode::Normal => wgpu::BlendState::ALPHA_BLENDING,
        BlendMode::Additive => wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        },
    }
}

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32];

const SMOKE_SHADER: &str = include_str!("shaders/smoke.wgsl");

/// Vertices per sprite quad
const QUAD_VERTICES: u32 = 6;

/// GPU resources for drawing one smoke system
pub struct SmokeRenderer {
    render_pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    capacity: u32,
    instance_count: u32,
    destroyed: bool,
}

impl SmokeRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
        capacity: usize,
        sprite: &SmokeTexture,
        blend: BlendMode,
    ) -> SmokeResult<Self> {
        let image = sprite.image()?;
        let (width, height) = image.dimensions();
        let capacity = capacity as u32;

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Smoke Instance Buffer"),
            size: (SmokeInstance::SIZE * capacity.max(1) as usize) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Smoke Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SmokeUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let texture_size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Smoke Sprite Texture"),
            size: texture_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            texture_size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Smoke Sprite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("smoke_bind_group_layout"),
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
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("smoke_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Smoke Shader"),
            source: wgpu::ShaderSource::Wgsl(SMOKE_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Smoke Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Smoke Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: SmokeInstance::SIZE as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INSTANCE_ATTRIBUTES,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(blend_state(blend)),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Depth-tested against the scene but never written
            depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: false,
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
        });

        log::debug!(
            "[SmokeRenderer::new] {} instances, {}x{} sprite, {:?} blending",
            capacity,
            width,
            height,
            blend
        );

        Ok(Self {
            render_pipeline,
            instance_buffer,
            uniform_buffer,
            texture,
            bind_group,
            capacity,
            instance_count: 0,
            destroyed: false,
        })
    }

    /// Upload instance data when the handle reports a change.
    ///
    /// Returns whether anything was written.
    pub fn upload(&mut self, queue: &wgpu::Queue, handle: &RenderHandle<'_>) -> SmokeResult<bool> {
        self.ensure_alive()?;
        if !handle.is_dirty() {
            return Ok(false);
        }

        let count = handle.instance_count().min(self.capacity);
        let bytes = &handle.as_bytes()[..count as usize * SmokeInstance::SIZE];
        if !bytes.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytes);
        }
        self.instance_count = count;
        Ok(true)
    }

    pub fn set_uniforms(&self, queue: &wgpu::Queue, uniforms: &SmokeUniforms) -> SmokeResult<()> {
        self.ensure_alive()?;
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
        Ok(())
    }

    /// Record the draw into an open render pass
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.destroyed || self.instance_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        render_pass.draw(0..QUAD_VERTICES, 0..self.instance_count);
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Free GPU memory. Later calls are no-ops.
    pub fn destroy(&mut self) {
        if self.destroyed {
            log::warn!("[SmokeRenderer::destroy] already destroyed");
            return;
        }

        self.instance_buffer.destroy();
        self.uniform_buffer.destroy();
        self.texture.destroy();
        self.instance_count = 0;
        self.destroyed = true;
    }

    fn ensure_alive(&self) -> SmokeResult<()> {
        if self.destroyed {
            Err(SmokeError::Disposed {
                resource: "smoke renderer",
            })
        } else {
            Ok(())
        }
    }
}
