//! Translucent cloud layer pipeline.
//!
//! Rendered double-sided with alpha blending over the opaque surface. The
//! cloud color map supplies color; the alpha map supplies per-texel coverage,
//! scaled by the material opacity.

use bytemuck::{Pod, Zeroable};

use orrery_materials::AtmosphereUniform;

use crate::buffer::{MeshBuffer, VertexPositionNormalUv};
use crate::pipeline;

/// Per-frame uniform for the cloud layer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CloudParams {
    pub model: [[f32; 4]; 4],
    /// Packed atmosphere material (opacity).
    pub material: AtmosphereUniform,
    /// xyz = world-space light position.
    pub light_pos: [f32; 4],
}

/// Render pipeline for the translucent cloud sphere.
pub struct CloudPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub params_bind_group_layout: wgpu::BindGroupLayout,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
}

impl CloudPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = pipeline::create_shader(device, "cloud-shader", CLOUD_SHADER_SOURCE);

        let camera_bind_group_layout = pipeline::camera_bind_group_layout(device);
        let params_bind_group_layout = pipeline::params_bind_group_layout(
            device,
            "cloud-params-bind-group-layout",
            std::mem::size_of::<CloudParams>() as u64,
        );

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("cloud-texture-bind-group-layout"),
                entries: &[
                    texture_entry(0),
                    texture_entry(1),
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cloud-pipeline-layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &params_bind_group_layout,
                &texture_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cloud-pipeline"),
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
                cull_mode: None, // double-sided
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            // Translucent: tested against the surface but not written, so the
            // glow shell behind the limb is not clipped by the cloud sphere.
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
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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

    /// Bind the cloud color and alpha maps plus the shared sampler as group 2.
    pub fn create_texture_bind_group(
        &self,
        device: &wgpu::Device,
        color: &wgpu::TextureView,
        alpha: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cloud-texture-bind-group"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(color),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(alpha),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
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

/// WGSL shader for the cloud layer.
pub const CLOUD_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
};

struct CloudParams {
    model: mat4x4<f32>,
    // x = opacity
    misc: vec4<f32>,
    light_pos: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(1) @binding(0) var<uniform> params: CloudParams;
@group(2) @binding(0) var cloud_map: texture_2d<f32>;
@group(2) @binding(1) var alpha_map: texture_2d<f32>;
@group(2) @binding(2) var map_sampler: sampler;

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
fn fs_main(in: VertexOutput, @builtin(front_facing) front_facing: bool) -> @location(0) vec4<f32> {
    let color = textureSample(cloud_map, map_sampler, in.uv);
    let coverage = textureSample(alpha_map, map_sampler, in.uv).r;

    var n = normalize(in.world_normal);
    if (!front_facing) {
        n = -n;
    }
    let light_dir = normalize(params.light_pos.xyz - in.world_pos);
    let diffuse = max(dot(n, light_dir), 0.0);

    let alpha = params.misc.x * coverage;
    return vec4<f32>(color.rgb * diffuse, alpha);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::create_test_device_queue;

    #[test]
    fn test_cloud_params_layout() {
        // mat4x4 (64) + AtmosphereUniform (16) + light vec4 (16)
        assert_eq!(std::mem::size_of::<CloudParams>(), 96);
        assert_eq!(std::mem::size_of::<CloudParams>() % 16, 0);
    }

    #[test]
    fn test_shader_entry_points_present() {
        assert!(CLOUD_SHADER_SOURCE.contains("fn vs_main"));
        assert!(CLOUD_SHADER_SOURCE.contains("fn fs_main"));
    }

    #[test]
    fn test_pipeline_creation_succeeds() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let _pipeline = CloudPipeline::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb);
    }
}
