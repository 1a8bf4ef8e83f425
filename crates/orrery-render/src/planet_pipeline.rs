//! Phong-lit planet surface pipeline.
//!
//! Samples a color map, a bump height map, and a specular mask. Bump mapping
//! uses screen-space derivative perturbation so no tangent data is needed.

use bytemuck::{Pod, Zeroable};

use orrery_materials::SurfaceUniform;

use crate::buffer::{MeshBuffer, VertexPositionNormalUv};
use crate::pipeline;

/// Per-frame uniform for the surface layer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PlanetParams {
    /// Model matrix (layer spin applied here).
    pub model: [[f32; 4]; 4],
    /// Packed surface material (specular, shininess, bump scale, opacity).
    pub material: SurfaceUniform,
    /// xyz = world-space light position.
    pub light_pos: [f32; 4],
}

/// Render pipeline for the textured, Phong-lit surface sphere.
pub struct PlanetPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub params_bind_group_layout: wgpu::BindGroupLayout,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
}

impl PlanetPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = pipeline::create_shader(device, "planet-shader", PLANET_SHADER_SOURCE);

        let camera_bind_group_layout = pipeline::camera_bind_group_layout(device);
        let params_bind_group_layout = pipeline::params_bind_group_layout(
            device,
            "planet-params-bind-group-layout",
            std::mem::size_of::<PlanetParams>() as u64,
        );

        // Three maps plus one shared sampler.
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("planet-texture-bind-group-layout"),
                entries: &[
                    texture_entry(0),
                    texture_entry(1),
                    texture_entry(2),
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("planet-pipeline-layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &params_bind_group_layout,
                &texture_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("planet-pipeline"),
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
            texture_bind_group_layout,
        }
    }

    /// Bind the three surface maps and the shared sampler as group 2.
    pub fn create_texture_bind_group(
        &self,
        device: &wgpu::Device,
        color: &wgpu::TextureView,
        bump: &wgpu::TextureView,
        specular: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("planet-texture-bind-group"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(color),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(bump),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(specular),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    pub fn draw<'a>(
        &self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        params_bind_group: &'a wgpu::BindGroup,
        texture_bind_group: &'a wgpu::BindGroup,
        mesh: &'a MeshBuffer,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, params_bind_group, &[]);
        render_pass.set_bind_group(2, texture_bind_group, &[]);
        mesh.bind(render_pass);
        mesh.draw(render_pass);
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// WGSL shader for the planet surface.
pub const PLANET_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
};

struct PlanetParams {
    model: mat4x4<f32>,
    // xyz = specular color, w = shininess
    specular_shininess: vec4<f32>,
    // x = bump scale, y = opacity
    bump_opacity: vec4<f32>,
    light_pos: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(1) @binding(0) var<uniform> params: PlanetParams;
@group(2) @binding(0) var color_map: texture_2d<f32>;
@group(2) @binding(1) var bump_map: texture_2d<f32>;
@group(2) @binding(2) var specular_map: texture_2d<f32>;
@group(2) @binding(3) var map_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = params.model * vec4<f32>(in.position, 1.0);
    out.world_pos = world.xyz;
    out.world_normal = (params.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    out.clip_position = camera.view_proj * world;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(color_map, map_sampler, in.uv);
    let height = textureSample(bump_map, map_sampler, in.uv).r;
    let dst_dx = dpdx(in.uv);
    let dst_dy = dpdy(in.uv);
    let h_dx = textureSample(bump_map, map_sampler, in.uv + dst_dx).r - height;
    let h_dy = textureSample(bump_map, map_sampler, in.uv + dst_dy).r - height;
    let spec_mask = textureSample(specular_map, map_sampler, in.uv).rgb;

    // Derivative-based bump perturbation; no tangent attributes needed.
    var n = normalize(in.world_normal);
    let sigma_x = dpdx(in.world_pos);
    let sigma_y = dpdy(in.world_pos);
    let r1 = cross(sigma_y, n);
    let r2 = cross(n, sigma_x);
    let det = dot(sigma_x, r1);
    let bump_scale = params.bump_opacity.x;
    if (abs(det) > 1e-12) {
        let grad = sign(det) * (bump_scale * h_dx * r1 + bump_scale * h_dy * r2);
        n = normalize(abs(det) * n - grad);
    }

    let light_dir = normalize(params.light_pos.xyz - in.world_pos);
    let view_dir = normalize(camera.camera_pos.xyz - in.world_pos);
    let diffuse = max(dot(n, light_dir), 0.0);

    let half_dir = normalize(light_dir + view_dir);
    let shininess = params.specular_shininess.w;
    let specular = pow(max(dot(n, half_dir), 0.0), shininess)
        * params.specular_shininess.xyz * spec_mask;

    let color = base.rgb * diffuse + specular;
    return vec4<f32>(color, params.bump_opacity.y);
}
"#;
