//! Additive rim-glow pipeline.
//!
//! Draws the back faces of the glow shell with additive blending. The vertex
//! stage computes `intensity = pow(c - dot(normal, view), p)`, which peaks at
//! the planet silhouette and falls off toward the center, producing a soft
//! atmospheric halo.

use bytemuck::{Pod, Zeroable};

use orrery_materials::GlowUniform;

use crate::buffer::{MeshBuffer, VertexPositionNormalUv};
use crate::pipeline;

/// Per-frame uniform for the glow shell.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlowParams {
    pub model: [[f32; 4]; 4],
    /// Packed glow material plus the current camera view vector.
    pub material: GlowUniform,
}

/// Render pipeline for the additive glow shell.
pub struct GlowPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub params_bind_group_layout: wgpu::BindGroupLayout,
}

impl GlowPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = pipeline::create_shader(device, "glow-shader", GLOW_SHADER_SOURCE);

        let camera_bind_group_layout = pipeline::camera_bind_group_layout(device);
        let params_bind_group_layout = pipeline::params_bind_group_layout(
            device,
            "glow-params-bind-group-layout",
            std::mem::size_of::<GlowParams>() as u64,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glow-pipeline-layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &params_bind_group_layout],
            immediate_size: 0,
        });

        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("glow-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormalUv::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Render only the back of the shell: the halo must appear
                // behind the planet limb, not in front of the surface.
                cull_mode: Some(wgpu::Face::Front),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(pipeline::depth_stencil_state(false)),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(additive),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_bind_group_layout,
            params_bind_group_layout,
        }
    }

    pub fn draw<'a>(
        &self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        params_bind_group: &'a wgpu::BindGroup,
        mesh: &'a MeshBuffer,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, params_bind_group, &[]);
        mesh.bind(render_pass);
        mesh.draw(render_pass);
    }
}

/// WGSL shader for the rim glow.
///
/// The intensity formula is evaluated per vertex and interpolated; pow with a
/// negative base is undefined in WGSL (typically NaN), which additive
/// blending renders as no contribution on common hardware. The base goes
/// negative only where the shell faces the camera head-on, which front-face
/// culling already removes.
pub const GLOW_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
};

struct GlowParams {
    model: mat4x4<f32>,
    // xyz = glow color, w = base constant c
    color_c: vec4<f32>,
    // xyz = normalized view vector, w = falloff exponent p
    view_p: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(1) @binding(0) var<uniform> params: GlowParams;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) intensity: f32,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = params.model * vec4<f32>(in.position, 1.0);
    let normal = normalize((params.model * vec4<f32>(in.normal, 0.0)).xyz);
    let c = params.color_c.w;
    let p = params.view_p.w;
    out.intensity = pow(c - dot(normal, params.view_p.xyz), p);
    out.clip_position = camera.view_proj * world;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(params.color_c.xyz * in.intensity, 1.0);
}
"#;
