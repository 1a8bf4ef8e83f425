//! Starfield backdrop: an inside-out textured sphere drawn behind the scene.
//!
//! The camera orbits well inside the sphere, so only the back faces are drawn
//! and the texture is sampled unlit.

use bytemuck::{Pod, Zeroable};

use orrery_render::buffer::{MeshBuffer, VertexPositionNormalUv};
use orrery_render::pipeline;

/// Radius of the backdrop sphere in world units.
pub const BACKDROP_RADIUS: f32 = 100.0;

/// Per-frame uniform for the backdrop sphere.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BackdropParams {
    pub model: [[f32; 4]; 4],
}

/// Render pipeline for the unlit starfield sphere.
pub struct BackdropPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub params_bind_group_layout: wgpu::BindGroupLayout,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
}

impl BackdropPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = pipeline::create_shader(device, "backdrop-shader", BACKDROP_SHADER_SOURCE);

        let camera_bind_group_layout = pipeline::camera_bind_group_layout(device);
        let params_bind_group_layout = pipeline::params_bind_group_layout(
            device,
            "backdrop-params-bind-group-layout",
            std::mem::size_of::<BackdropParams>() as u64,
        );

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("backdrop-texture-bind-group-layout"),
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
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("backdrop-pipeline-layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &params_bind_group_layout,
                &texture_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("backdrop-pipeline"),
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
                // The camera sits inside the sphere: keep only the back faces.
                cull_mode: Some(wgpu::Face::Front),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            // Tested but not written: the backdrop is the farthest geometry
            // and must never occlude the scene.
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
                    blend: None,
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

    /// Bind the starfield texture and sampler as group 2.
    pub fn create_texture_bind_group(
        &self,
        device: &wgpu::Device,
        starfield: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("backdrop-texture-bind-group"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(starfield),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
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

/// WGSL shader for the unlit backdrop sphere.
pub const BACKDROP_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
};

struct BackdropParams {
    model: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(1) @binding(0) var<uniform> params: BackdropParams;
@group(2) @binding(0) var star_map: texture_2d<f32>;
@group(2) @binding(1) var map_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = params.model * vec4<f32>(in.position, 1.0);
    out.uv = in.uv;
    out.clip_position = camera.view_proj * world;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(textureSample(star_map, map_sampler, in.uv).rgb, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backdrop_params_layout() {
        assert_eq!(std::mem::size_of::<BackdropParams>(), 64);
    }

    #[test]
    fn test_backdrop_radius_clears_scene_geometry() {
        // The orbit never exceeds 5 units from the origin; the backdrop must
        // stay far outside that.
        assert!(BACKDROP_RADIUS > 10.0);
    }

    #[test]
    fn test_shader_entry_points_present() {
        assert!(BACKDROP_SHADER_SOURCE.contains("fn vs_main"));
        assert!(BACKDROP_SHADER_SOURCE.contains("fn fs_main"));
    }
}
