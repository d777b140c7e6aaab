use glam::Mat4;
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline};

use crate::fold::FoldUniforms;

/// Per-frame shader uniforms: the model-view-projection matrix plus the four
/// values the fold solver produces. Layout matches the `Uniforms` struct in
/// `shader.wgsl` (std140: the mat4 first, then descending alignment).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    pub mvp: [[f32; 4]; 4],
    pub bounds: [f32; 4],
    pub apex: [f32; 2],
    pub direction: [f32; 2],
    pub finger_tip: [f32; 2],
    pub curl_radius: f32,
    pub _padding: f32,
}

impl Uniforms {
    pub fn new(mvp: Mat4, fold: &FoldUniforms, curl_radius: f32) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            bounds: fold.bounds,
            apex: fold.apex,
            direction: fold.direction,
            finger_tip: fold.finger_tip,
            curl_radius,
            _padding: 0.0,
        }
    }
}

/// The page's depth buffer format. The rolled part of the page overlaps the
/// flat part, so the draw needs depth testing even for a single mesh.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];
const TEX_COORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![2 => Float32x2];

/// The mesh keeps its streams in separate buffers, so the pipeline takes
/// three vertex buffers: positions, colors, texture coordinates.
pub fn vertex_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    [
        wgpu::VertexBufferLayout {
            array_stride: 12,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: 16,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &COLOR_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: 8,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &TEX_COORD_ATTRIBUTES,
        },
    ]
}

pub fn create_uniform_bind_group_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("uniform_bind_group_layout"),
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
    })
}

pub fn create_texture_bind_group_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("page_texture_bind_group_layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Creates the uniform buffer and its bind group, seeded with the given
/// uniform values.
pub fn create_uniform_binding(
    device: &Device,
    layout: &BindGroupLayout,
    uniforms: Uniforms,
) -> (Buffer, BindGroup) {
    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Page Uniform Buffer"),
        contents: bytemuck::cast_slice(&[uniforms]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
        label: Some("page_uniform_bind_group"),
    });

    (uniform_buffer, bind_group)
}

/// Creates the curl render pipeline and the two bind group layouts it uses.
///
/// The curled page shows its back face to the viewer, so culling is off.
/// Blending is standard alpha, the same state the renderer clears with.
pub fn create_curl_pipeline(
    device: &Device,
    config: &wgpu::SurfaceConfiguration,
) -> (BindGroupLayout, BindGroupLayout, RenderPipeline) {
    let uniform_bind_group_layout = create_uniform_bind_group_layout(device);
    let texture_bind_group_layout = create_texture_bind_group_layout(device);

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Curl Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("./shader.wgsl").into()),
    });

    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Curl Pipeline Layout"),
        bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
        push_constant_ranges: &[],
    });

    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Curl Pipeline"),
        layout: Some(&render_pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &vertex_buffer_layouts(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: config.format,
                blend: Some(wgpu::BlendState {
                    color: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::SrcAlpha,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                    alpha: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::One,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    (
        uniform_bind_group_layout,
        texture_bind_group_layout,
        render_pipeline,
    )
}

pub fn create_depth_texture(device: &Device, size: (u32, u32)) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
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
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniforms_match_the_wgsl_struct_layout() {
        // mat4x4 (64) + vec4 (16) + three vec2 (24) + f32 + pad (8) = 112,
        // a multiple of the struct's 16-byte alignment.
        assert_eq!(std::mem::size_of::<Uniforms>(), 112);
        assert_eq!(std::mem::offset_of!(Uniforms, bounds), 64);
        assert_eq!(std::mem::offset_of!(Uniforms, apex), 80);
        assert_eq!(std::mem::offset_of!(Uniforms, direction), 88);
        assert_eq!(std::mem::offset_of!(Uniforms, finger_tip), 96);
        assert_eq!(std::mem::offset_of!(Uniforms, curl_radius), 104);
    }

    #[test]
    fn vertex_layout_strides_match_the_stream_types() {
        let [positions, colors, tex_coords] = vertex_buffer_layouts();
        assert_eq!(positions.array_stride, 12);
        assert_eq!(colors.array_stride, 16);
        assert_eq!(tex_coords.array_stride, 8);
    }
}
