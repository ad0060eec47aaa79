use wgpu::util::DeviceExt;

use crate::cloud::PointCloud;
use crate::paint::Color;
use crate::render::{DepthTarget, RenderCtx, RenderTarget};
use crate::scene::Transforms;
use crate::sprite::{Shape, StrokeStyle};

use super::common::{
    point_layout, size_layout, QuadVertex, SpriteUniform, QUAD_INDICES, QUAD_VERTICES,
    SHADER_SOURCE,
};

/// Draws a [`PointCloud`] as depth-tested, antialiased point sprites.
///
/// Every point is one instance of a unit quad. Two instance streams feed it:
/// the static per-point attributes, uploaded once, and the marker sizes,
/// rewritten whenever the zoom changes.
///
/// The marker shape and stroke style are fixed for the renderer's lifetime.
pub struct SpriteRenderer {
    shape: Shape,
    stroke: StrokeStyle,
    transforms: Transforms,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    point_vbo: Option<wgpu::Buffer>,
    size_vbo: Option<wgpu::Buffer>,
    point_count: u32,
    size_scratch: Vec<f32>,

    depth: Option<DepthTarget>,
}

impl SpriteRenderer {
    pub fn new(shape: Shape, stroke: StrokeStyle) -> Self {
        Self {
            shape,
            stroke,
            transforms: Transforms::default(),
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            uniform_ubo: None,
            quad_vbo: None,
            quad_ibo: None,
            point_vbo: None,
            size_vbo: None,
            point_count: 0,
            size_scratch: Vec::new(),
            depth: None,
        }
    }

    /// Uploads every per-point stream of `cloud`, sizes scaled by `size_scale`.
    ///
    /// Replaces whatever cloud was uploaded before.
    pub fn upload_cloud(&mut self, ctx: &RenderCtx<'_>, cloud: &PointCloud, size_scale: f32) {
        let Ok(count) = u32::try_from(cloud.len()) else {
            log::error!("point cloud of {} points exceeds the instance limit", cloud.len());
            return;
        };

        self.point_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cumulus point attribute vbo"),
            contents: bytemuck::cast_slice(cloud.attributes()),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        cloud.scaled_sizes_into(size_scale, &mut self.size_scratch);
        self.size_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cumulus point size vbo"),
            contents: bytemuck::cast_slice(&self.size_scratch),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        }));

        self.point_count = count;
        log::info!(
            "uploaded {count} points ({} KiB)",
            (std::mem::size_of_val(cloud.attributes()) + std::mem::size_of_val(cloud.base_sizes()))
                / 1024
        );
    }

    /// Rewrites the size stream only. `cloud` must be the uploaded cloud.
    pub fn update_sizes(&mut self, ctx: &RenderCtx<'_>, cloud: &PointCloud, size_scale: f32) {
        if self.size_vbo.is_none() || cloud.len() != self.point_count as usize {
            self.upload_cloud(ctx, cloud, size_scale);
            return;
        }
        let Some(size_vbo) = self.size_vbo.as_ref() else { return };

        cloud.scaled_sizes_into(size_scale, &mut self.size_scratch);
        ctx.queue.write_buffer(size_vbo, 0, bytemuck::cast_slice(&self.size_scratch));
        log::trace!("rewrote {} sizes at scale {size_scale}", self.point_count);
    }

    pub fn set_transforms(&mut self, transforms: &Transforms) {
        self.transforms = *transforms;
    }

    /// Clears color to `background` and depth to 1, then draws every uploaded point.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        background: Color,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.ensure_depth(ctx);
        self.write_uniform(ctx);

        let Some(depth) = self.depth.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cumulus sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(background.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if self.point_count == 0 {
            return;
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };
        let Some(point_vbo) = self.point_vbo.as_ref() else { return };
        let Some(size_vbo) = self.size_vbo.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, point_vbo.slice(..));
        rpass.set_vertex_buffer(2, size_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..self.point_count);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cumulus point sprite shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("cumulus sprite bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: SpriteUniform::min_binding_size(),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("cumulus sprite pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let constants = [("SHAPE", f64::from(self.shape.pipeline_id()))];
        let compilation_options = wgpu::PipelineCompilationOptions {
            constants: &constants,
            ..Default::default()
        };

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cumulus sprite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: compilation_options.clone(),
                buffers: &[QuadVertex::layout(), point_layout(), size_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options,
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTarget::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "sprite pipeline built: shape {} for {:?}",
            self.shape,
            ctx.surface_format
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.uniform_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.uniform_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let uniform_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cumulus sprite ubo"),
            size: std::mem::size_of::<SpriteUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cumulus sprite bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        self.uniform_ubo = Some(uniform_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cumulus sprite quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cumulus sprite quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_depth(&mut self, ctx: &RenderCtx<'_>) {
        if self.depth.as_ref().is_some_and(|d| !d.is_stale(ctx.viewport)) {
            return;
        }
        self.depth = Some(DepthTarget::new(ctx.device, ctx.viewport));
    }

    fn write_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        let uniform = SpriteUniform::new(&self.transforms, ctx.viewport, self.stroke);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));
    }
}
