use warp_core::{LineVertex, PointInstance};

/// Per-draw uniforms shared by the point and line passes (176 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct DrawUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) resolution: [f32; 2],
    pub(crate) point_scale: f32,
    pub(crate) size_gain: f32,
    pub(crate) warp_strength: f32,
    pub(crate) opacity: f32,
    pub(crate) streak: f32,
    pub(crate) max_point_px: f32,
    pub(crate) color: [f32; 4],
}

/// Additive: overlapping sprites brighten instead of occluding.
pub(crate) const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
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
};

const POINT_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32x3];
const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

pub(crate) struct Pipelines {
    pub(crate) points: wgpu::RenderPipeline,
    pub(crate) lines: wgpu::RenderPipeline,
    pub(crate) bgl: wgpu::BindGroupLayout,
}

/// A uniform buffer and the bind group that exposes it.
pub(crate) struct UniformSlot {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    pub(crate) fn new(device: &wgpu::Device, bgl: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<DrawUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    #[inline]
    pub(crate) fn write(&self, queue: &wgpu::Queue, uniforms: &DrawUniforms) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniforms));
    }
}

pub(crate) fn create_pipelines(device: &wgpu::Device, format: wgpu::TextureFormat) -> Pipelines {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("particles_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::PARTICLES_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("particles_bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("particles_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });

    let points = make_pipeline(
        device,
        &layout,
        &shader,
        PipelineDesc {
            label: "points_pipeline",
            vs: "vs_point",
            fs: "fs_point",
            buffer: wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<PointInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &POINT_ATTRIBUTES,
            },
            topology: wgpu::PrimitiveTopology::TriangleList,
        },
        format,
    );
    let lines = make_pipeline(
        device,
        &layout,
        &shader,
        PipelineDesc {
            label: "lines_pipeline",
            vs: "vs_line",
            fs: "fs_line",
            buffer: wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LineVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &LINE_ATTRIBUTES,
            },
            topology: wgpu::PrimitiveTopology::LineList,
        },
        format,
    );

    Pipelines { points, lines, bgl }
}

struct PipelineDesc<'a> {
    label: &'a str,
    vs: &'a str,
    fs: &'a str,
    buffer: wgpu::VertexBufferLayout<'a>,
    topology: wgpu::PrimitiveTopology,
}

fn make_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    desc: PipelineDesc<'_>,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(desc.vs),
            buffers: &[desc.buffer],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(desc.fs),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(ADDITIVE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_matches_wgsl_struct() {
        // two mat4 + vec2 + six f32 + vec4
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 176);
        assert_eq!(std::mem::size_of::<DrawUniforms>() % 16, 0);
    }

    #[test]
    fn point_attributes_cover_instance_stride() {
        let last = POINT_ATTRIBUTES[2];
        assert_eq!(last.offset + 12, 28);
        assert!(last.offset + 12 <= std::mem::size_of::<PointInstance>() as u64);
    }
}
