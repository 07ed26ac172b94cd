//! wgpu binding for the particle network: two instanced point-sprite draws
//! (field, warp) and a line-list draw for connections, all additive, into a
//! transparent surface.

mod buffers;
pub mod camera;
mod pipelines;
mod stats;

use buffers::DynamicBuffer;
use glam::Mat4;
use pipelines::{create_pipelines, DrawUniforms, Pipelines, UniformSlot};
pub use stats::FrameStats;
use std::rc::Rc;
use warp_core::constants::{
    FIELD_POINT_SCALE, FIELD_WARP_SIZE_GAIN, MAX_POINT_SIZE_PX, WARP_POINT_SCALE,
    WARP_WARP_SIZE_GAIN,
};
use warp_core::{LineVertex, PointInstance, RenderBackend, RenderError, SceneFrame, Viewport};

pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");

/// Instance, adapter, device and queue. Acquired once (async) and shared by
/// every surface created afterwards.
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    pub async fn new() -> Result<Self, RenderError> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::ContextCreation("no suitable GPU adapter".into()))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("warp_device"),
                    required_features: wgpu::Features::empty(),
                    // Default limits so older WebGPU implementations accept the request
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| RenderError::ContextCreation(format!("request_device: {:?}", e)))?;
        log::info!("[render] adapter: {:?}", adapter.get_info().name);
        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}

/// A configured surface plus everything needed to draw a [`SceneFrame`].
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    ctx: Rc<GpuContext>,
    config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    field_uniforms: UniformSlot,
    warp_uniforms: UniformSlot,
    line_uniforms: UniformSlot,
    field_instances: DynamicBuffer,
    warp_instances: DynamicBuffer,
    line_vertices: DynamicBuffer,
    lines_revision: Option<u64>,
    viewport: Viewport,
}

impl GpuRenderer {
    pub fn new(
        ctx: Rc<GpuContext>,
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        viewport: Viewport,
    ) -> Result<Self, RenderError> {
        let surface = ctx
            .instance
            .create_surface(target)
            .map_err(|e| RenderError::ContextCreation(format!("create_surface: {}", e)))?;
        let caps = surface.get_capabilities(&ctx.adapter);
        // Linear formats pass palette values through unchanged
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| {
                RenderError::ContextCreation("surface incompatible with adapter".into())
            })?;
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let (width, height) = viewport.physical_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctx.device, &config);

        let device = &ctx.device;
        let pipelines = create_pipelines(device, format);
        let field_uniforms = UniformSlot::new(device, &pipelines.bgl, "field_uniforms");
        let warp_uniforms = UniformSlot::new(device, &pipelines.bgl, "warp_uniforms");
        let line_uniforms = UniformSlot::new(device, &pipelines.bgl, "line_uniforms");
        let point_bytes = std::mem::size_of::<PointInstance>() as u64;
        let field_instances = DynamicBuffer::new(device, "field_instances", 128 * point_bytes);
        let warp_instances = DynamicBuffer::new(device, "warp_instances", 256 * point_bytes);
        let line_vertices = DynamicBuffer::new(
            device,
            "line_vertices",
            1024 * std::mem::size_of::<LineVertex>() as u64,
        );
        log::info!("[render] surface {}x{} {:?}", width, height, format);

        Ok(Self {
            surface,
            ctx,
            config,
            pipelines,
            field_uniforms,
            warp_uniforms,
            line_uniforms,
            field_instances,
            warp_instances,
            line_vertices,
            lines_revision: None,
            viewport,
        })
    }

    #[inline]
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn upload(&mut self, scene: &SceneFrame<'_>) {
        let (device, queue) = (&self.ctx.device, &self.ctx.queue);
        self.field_instances.write(device, queue, scene.field);
        self.warp_instances.write(device, queue, scene.warp);
        if self.lines_revision != Some(scene.lines_revision) {
            self.line_vertices.write(device, queue, scene.lines);
            self.lines_revision = Some(scene.lines_revision);
        }

        let view_proj = camera::view_proj(self.viewport.aspect()).to_cols_array_2d();
        let field_model = scene.field_model().to_cols_array_2d();
        let resolution = [self.config.width as f32, self.config.height as f32];
        let w = scene.warp_intensity;
        let [r, g, b] = scene.line_color;

        let field = DrawUniforms {
            view_proj,
            model: field_model,
            resolution,
            point_scale: FIELD_POINT_SCALE,
            size_gain: FIELD_WARP_SIZE_GAIN,
            warp_strength: w,
            opacity: 1.0,
            streak: 0.0,
            max_point_px: MAX_POINT_SIZE_PX,
            color: [0.0; 4],
        };
        let warp = DrawUniforms {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            point_scale: WARP_POINT_SCALE,
            size_gain: WARP_WARP_SIZE_GAIN,
            streak: 1.0,
            ..field
        };
        let lines = DrawUniforms {
            opacity: scene.line_opacity,
            color: [r, g, b, 1.0],
            ..field
        };
        self.field_uniforms.write(queue, &field);
        self.warp_uniforms.write(queue, &warp);
        self.line_uniforms.write(queue, &lines);
    }
}

impl RenderBackend for GpuRenderer {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let (width, height) = viewport.physical_size();
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.ctx.device, &self.config);
    }

    fn draw(&mut self, scene: &SceneFrame<'_>) -> Result<(), RenderError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("[render] surface lost/outdated; reconfiguring");
                self.surface.configure(&self.ctx.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("[render] surface timeout; skipping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            #[allow(unreachable_patterns)]
            Err(e) => return Err(RenderError::Surface(format!("{:?}", e))),
        };
        self.upload(scene);

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("particles_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("particles_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let n_lines = self.line_vertices.len();
            if n_lines > 0 && scene.line_opacity > 0.0 {
                rpass.set_pipeline(&self.pipelines.lines);
                rpass.set_bind_group(0, &self.line_uniforms.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.line_vertices.slice());
                rpass.draw(0..n_lines, 0..1);
            }

            rpass.set_pipeline(&self.pipelines.points);
            let n_field = self.field_instances.len();
            if n_field > 0 {
                rpass.set_bind_group(0, &self.field_uniforms.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.field_instances.slice());
                rpass.draw(0..6, 0..n_field);
            }
            // warp alpha scales with intensity, nothing to show while idle
            let n_warp = self.warp_instances.len();
            if n_warp > 0 && scene.warp_intensity > 0.0 {
                rpass.set_bind_group(0, &self.warp_uniforms.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.warp_instances.slice());
                rpass.draw(0..6, 0..n_warp);
            }
        }
        self.ctx.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl Drop for GpuRenderer {
    fn drop(&mut self) {
        self.field_instances.destroy();
        self.warp_instances.destroy();
        self.line_vertices.destroy();
        self.field_uniforms.buffer.destroy();
        self.warp_uniforms.buffer.destroy();
        self.line_uniforms.buffer.destroy();
        log::debug!("[render] renderer released");
    }
}
