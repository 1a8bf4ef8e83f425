//! wgpu rendering layer: GPU context, surface and depth management, camera,
//! mesh buffers, texture caching, and the scene's render pipelines (Phong
//! surface, translucent clouds, additive rim glow, solid-color label).

pub mod buffer;
pub mod camera;
pub mod cloud_pipeline;
pub mod depth;
pub mod glow_pipeline;
pub mod gpu;
pub mod label_pipeline;
pub mod pass;
pub mod pipeline;
pub mod planet_pipeline;
pub mod sphere;
pub mod surface;
pub mod texture;

pub use buffer::{
    BufferAllocator, IndexData, MeshBuffer, VertexPositionNormal, VertexPositionNormalUv,
};
pub use camera::Camera;
pub use cloud_pipeline::{CLOUD_SHADER_SOURCE, CloudParams, CloudPipeline};
pub use depth::DepthBuffer;
pub use glow_pipeline::{GLOW_SHADER_SOURCE, GlowParams, GlowPipeline};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use label_pipeline::{LABEL_SHADER_SOURCE, LabelParams, LabelPipeline};
pub use pass::{DepthAttachmentConfig, FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use pipeline::{
    CameraUniform, LIGHT_POSITION, camera_bind_group_layout, create_shader,
    create_uniform_bind_group, create_uniform_buffer, depth_stencil_state,
    params_bind_group_layout,
};
pub use planet_pipeline::{PLANET_SHADER_SOURCE, PlanetParams, PlanetPipeline};
pub use sphere::{SphereMesh, generate_uv_sphere};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};
pub use texture::{ManagedTexture, TextureError, TextureManager};
