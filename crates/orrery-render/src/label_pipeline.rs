//! Solid-color lit pipeline for the extruded text label.

use bytemuck::{Pod, Zeroable};

use crate::buffer::{MeshBuffer, VertexPositionNormal};
use crate::pipeline;

/// Per-frame uniform for the label mesh.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LabelParams {
    pub model: [[f32; 4]; 4],
    /// rgb = material color.
    pub color: [f32; 4],
    /// xyz = world-space light position.
    pub light_pos: [f32; 4],
}

/// Render pipeline for untextured, Phong-lit geometry.
pub struct LabelPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub params_bind_group_layout: wgpu::BindGroupLayout,
}

impl LabelPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = pipeline::create_shader(device, "label-shader", LABEL_SHADER_SOURCE);

        let camera_bind_group_layout = pipeline::camera_bind_group_layout(device);
        let params_bind_group_layout = pipeline::params_bind_group_layout(
            device,
            "label-params-bind-group-layout",
            std::mem::size_of::<LabelParams>() as u64,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("label-pipeline-layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &params_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("label-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormal::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(pipeline::depth_stencil_state(true)),
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
                    blend: None, // opaque
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

/// WGSL shader for the solid-color lit label.
pub const LABEL_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
};

struct LabelParams {
    model: mat4x4<f32>,
    color: vec4<f32>,
    light_pos: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(1) @binding(0) var<uniform> params: LabelParams;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = params.model * vec4<f32>(in.position, 1.0);
    out.world_pos = world.xyz;
    out.world_normal = (params.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.clip_position = camera.view_proj * world;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let light_dir = normalize(params.light_pos.xyz - in.world_pos);
    let view_dir = normalize(camera.camera_pos.xyz - in.world_pos);
    let diffuse = max(dot(n, light_dir), 0.0);

    let half_dir = normalize(light_dir + view_dir);
    let specular = pow(max(dot(n, half_dir), 0.0), 30.0) * 0.07;

    return vec4<f32>(params.color.rgb * diffuse + vec3<f32>(specular), 1.0);
}
"#;
