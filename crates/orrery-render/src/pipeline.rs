//! Shared pipeline plumbing: the camera uniform, bind group layout helpers,
//! and the depth/light conventions every scene pipeline agrees on.

use bytemuck::{Pod, Zeroable};
use std::num::NonZeroU64;

use crate::depth::DepthBuffer;

/// World-space position of the scene's single white point light.
pub const LIGHT_POSITION: glam::Vec3 = glam::Vec3::new(1.0, 1.0, 2.0);

/// Uniform buffer for the camera: view-projection matrix plus world position
/// (needed by the Phong specular term).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4], // 64 bytes, mat4x4
    pub camera_pos: [f32; 4],     // xyz = position
}

/// Bind group layout for the camera uniform (group 0 in every scene pipeline).
pub fn camera_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("camera-bind-group-layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(
                    std::mem::size_of::<CameraUniform>() as u64
                ),
            },
            count: None,
        }],
    })
}

/// Bind group layout for a per-object parameter uniform (group 1).
pub fn params_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
    size: u64,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size),
            },
            count: None,
        }],
    })
}

/// Standard reverse-Z depth state shared by the scene pipelines.
pub fn depth_stencil_state(depth_write_enabled: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DepthBuffer::FORMAT,
        depth_write_enabled,
        depth_compare: DepthBuffer::COMPARE_FUNCTION,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Compile a WGSL shader module.
pub fn create_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}

/// Create a uniform buffer sized for `T`, zero-initialized on the GPU.
pub fn create_uniform_buffer<T: Pod>(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<T>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Bind a single uniform buffer at binding 0 of the given layout.
pub fn create_uniform_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_uniform_size() {
        // mat4x4 (64) + vec4 (16)
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn test_light_position_matches_scene() {
        assert_eq!(LIGHT_POSITION, glam::Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn test_depth_state_uses_reverse_z_compare() {
        let state = depth_stencil_state(true);
        assert_eq!(state.depth_compare, wgpu::CompareFunction::GreaterEqual);
        assert_eq!(state.format, wgpu::TextureFormat::Depth32Float);
    }
}
