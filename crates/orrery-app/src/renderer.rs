//! Owns every GPU resource the scene needs and draws one frame at a time.
//!
//! The draw order inside the single render pass is fixed: backdrop first, then
//! the opaque surface, then the translucent cloud shell, then the additive
//! glow, and finally the floating label. Everything translucent reads depth
//! but never writes it, so the order is what keeps the layering correct.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use thiserror::Error;

use orrery_assets::{TextureLoadResult, load_font_bytes};
use orrery_config::Config;
use orrery_materials::{GlowUniform, SurfaceUniform, TextureSlot};
use orrery_render::{
    BufferAllocator, Camera, CloudParams, CloudPipeline, DepthBuffer, FrameEncoder, GlowParams,
    GlowPipeline, IndexData, LIGHT_POSITION, LabelParams, LabelPipeline, MeshBuffer, PlanetParams,
    PlanetPipeline, RenderContext, RenderPassBuilder, SurfaceError, TextureError, TextureManager,
    camera_bind_group_layout, create_uniform_bind_group, create_uniform_buffer,
    generate_uv_sphere,
};
use orrery_scene::{LayerSpin, OrbitController, Planet, SceneError, SceneGraph};
use orrery_space::{BACKDROP_RADIUS, BackdropParams, BackdropPipeline, fallback_starfield};
use orrery_text::build_label_mesh;

/// Longitude and latitude segments for every sphere in the scene.
const SPHERE_SEGMENTS: u32 = 32;

/// Label glyph height in world units.
const LABEL_SIZE: f32 = 0.15;
/// Label extrusion depth in world units.
const LABEL_DEPTH: f32 = 0.02;
/// Where the label floats, to the left of and slightly in front of the planet.
const LABEL_POSITION: Vec3 = Vec3::new(-0.6, 0.0, 0.5);
/// Warm off-white, so the label is not washed out against the clouds.
const LABEL_COLOR: [f32; 4] = [1.0, 0.933, 0.933, 1.0];

/// Errors raised while assembling the scene's GPU state.
#[derive(Debug, Error)]
pub enum RendererInitError {
    #[error("scene assembly failed: {0}")]
    Scene(#[from] SceneError),

    #[error("texture creation failed: {0}")]
    Texture(#[from] TextureError),

    #[error("texture cache is missing a placeholder slot")]
    MissingPlaceholder,
}

/// All GPU state for the scene plus the CPU-side animation it samples.
pub struct SceneRenderer {
    camera: Camera,
    orbit: OrbitController,
    spin: LayerSpin,
    graph: SceneGraph,
    planet: Planet,
    depth_buffer: DepthBuffer,
    textures: TextureManager,

    backdrop_pipeline: BackdropPipeline,
    planet_pipeline: PlanetPipeline,
    cloud_pipeline: CloudPipeline,
    glow_pipeline: GlowPipeline,
    label_pipeline: LabelPipeline,

    backdrop_mesh: MeshBuffer,
    surface_mesh: MeshBuffer,
    atmosphere_mesh: MeshBuffer,
    glow_mesh: MeshBuffer,
    label_mesh: Option<MeshBuffer>,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    // The backdrop and label params are written once at init; their bind
    // groups keep the underlying buffers alive.
    backdrop_params_bind_group: wgpu::BindGroup,
    planet_params_buffer: wgpu::Buffer,
    planet_params_bind_group: wgpu::BindGroup,
    cloud_params_buffer: wgpu::Buffer,
    cloud_params_bind_group: wgpu::BindGroup,
    glow_params_buffer: wgpu::Buffer,
    glow_params_bind_group: wgpu::BindGroup,
    label_params_bind_group: wgpu::BindGroup,

    planet_texture_bind_group: wgpu::BindGroup,
    cloud_texture_bind_group: wgpu::BindGroup,
    backdrop_texture_bind_group: wgpu::BindGroup,

    starfield_seed: u64,
}

impl SceneRenderer {
    /// Build the whole scene: graph, meshes, pipelines, placeholder textures,
    /// uniform buffers, and bind groups.
    pub fn new(gpu: &RenderContext, config: &Config) -> Result<Self, RendererInitError> {
        let device = &gpu.device;

        let mut graph = SceneGraph::new();
        let planet = Planet::build(&mut graph, &config.planet)?;
        let orbit = OrbitController::new(&config.camera);
        let spin = LayerSpin::new();

        let mut camera = Camera {
            position: orbit.position(),
            ..Camera::default()
        };
        camera.set_aspect_ratio(
            gpu.surface_config.width as f32,
            gpu.surface_config.height as f32,
        );
        camera.look_at(orbit.target());

        let depth_buffer =
            DepthBuffer::new(device, gpu.surface_config.width, gpu.surface_config.height);

        let mut textures = TextureManager::new(device);
        for slot in TextureSlot::ALL {
            textures.create_placeholder(
                device,
                &gpu.queue,
                &placeholder_name(slot),
                placeholder_rgba(slot),
            )?;
        }

        let backdrop_pipeline = BackdropPipeline::new(device, gpu.surface_format);
        let planet_pipeline = PlanetPipeline::new(device, gpu.surface_format);
        let cloud_pipeline = CloudPipeline::new(device, gpu.surface_format);
        let glow_pipeline = GlowPipeline::new(device, gpu.surface_format);
        let label_pipeline = LabelPipeline::new(device, gpu.surface_format);

        let allocator = BufferAllocator::new(device);
        let backdrop_mesh = upload_sphere(&allocator, "backdrop-mesh", BACKDROP_RADIUS);
        let surface_mesh = upload_sphere(&allocator, "surface-mesh", planet.surface.radius);
        let atmosphere_mesh =
            upload_sphere(&allocator, "atmosphere-mesh", planet.atmosphere.radius);
        let glow_mesh = upload_sphere(&allocator, "glow-mesh", planet.glow.radius);
        let label_mesh = build_label(&allocator, config);

        let camera_buffer = create_uniform_buffer::<orrery_render::CameraUniform>(
            device,
            "camera-uniform-buffer",
        );
        let camera_layout = camera_bind_group_layout(device);
        let camera_bind_group =
            create_uniform_bind_group(device, "camera-bind-group", &camera_layout, &camera_buffer);

        let backdrop_params_buffer =
            create_uniform_buffer::<BackdropParams>(device, "backdrop-params-buffer");
        let backdrop_params_bind_group = create_uniform_bind_group(
            device,
            "backdrop-params-bind-group",
            &backdrop_pipeline.params_bind_group_layout,
            &backdrop_params_buffer,
        );
        let planet_params_buffer =
            create_uniform_buffer::<PlanetParams>(device, "planet-params-buffer");
        let planet_params_bind_group = create_uniform_bind_group(
            device,
            "planet-params-bind-group",
            &planet_pipeline.params_bind_group_layout,
            &planet_params_buffer,
        );
        let cloud_params_buffer =
            create_uniform_buffer::<CloudParams>(device, "cloud-params-buffer");
        let cloud_params_bind_group = create_uniform_bind_group(
            device,
            "cloud-params-bind-group",
            &cloud_pipeline.params_bind_group_layout,
            &cloud_params_buffer,
        );
        let glow_params_buffer = create_uniform_buffer::<GlowParams>(device, "glow-params-buffer");
        let glow_params_bind_group = create_uniform_bind_group(
            device,
            "glow-params-bind-group",
            &glow_pipeline.params_bind_group_layout,
            &glow_params_buffer,
        );
        let label_params_buffer =
            create_uniform_buffer::<LabelParams>(device, "label-params-buffer");
        let label_params_bind_group = create_uniform_bind_group(
            device,
            "label-params-bind-group",
            &label_pipeline.params_bind_group_layout,
            &label_params_buffer,
        );

        // The backdrop and label never move; their params are written once.
        gpu.queue.write_buffer(
            &backdrop_params_buffer,
            0,
            bytemuck::bytes_of(&BackdropParams {
                model: Mat4::IDENTITY.to_cols_array_2d(),
            }),
        );
        gpu.queue.write_buffer(
            &label_params_buffer,
            0,
            bytemuck::bytes_of(&LabelParams {
                model: Mat4::from_translation(LABEL_POSITION).to_cols_array_2d(),
                color: LABEL_COLOR,
                light_pos: light_pos(),
            }),
        );

        let planet_texture_bind_group =
            build_planet_texture_bind_group(device, &textures, &planet_pipeline)
                .ok_or(RendererInitError::MissingPlaceholder)?;
        let cloud_texture_bind_group =
            build_cloud_texture_bind_group(device, &textures, &cloud_pipeline)
                .ok_or(RendererInitError::MissingPlaceholder)?;
        let backdrop_texture_bind_group =
            build_backdrop_texture_bind_group(device, &textures, &backdrop_pipeline)
                .ok_or(RendererInitError::MissingPlaceholder)?;

        Ok(Self {
            camera,
            orbit,
            spin,
            graph,
            planet,
            depth_buffer,
            textures,
            backdrop_pipeline,
            planet_pipeline,
            cloud_pipeline,
            glow_pipeline,
            label_pipeline,
            backdrop_mesh,
            surface_mesh,
            atmosphere_mesh,
            glow_mesh,
            label_mesh,
            camera_buffer,
            camera_bind_group,
            backdrop_params_bind_group,
            planet_params_buffer,
            planet_params_bind_group,
            cloud_params_buffer,
            cloud_params_bind_group,
            glow_params_buffer,
            glow_params_bind_group,
            label_params_bind_group,
            planet_texture_bind_group,
            cloud_texture_bind_group,
            backdrop_texture_bind_group,
            starfield_seed: config.assets.starfield_seed,
        })
    }

    /// Apply completed texture loads: upload, flip the slot state, rebuild the
    /// affected bind group. A failed starfield load falls back to a baked
    /// procedural sky; every other failure keeps the placeholder texel.
    pub fn process_load_results(&mut self, gpu: &RenderContext, results: Vec<TextureLoadResult>) {
        for completed in results {
            let slot = completed.slot;
            match completed.result {
                Ok(image) => {
                    let upload = self.textures.create_texture(
                        &gpu.device,
                        &gpu.queue,
                        slot.key(),
                        &image.rgba,
                        image.width,
                        image.height,
                        slot_format(slot),
                        true,
                    );
                    match upload {
                        Ok(_) => {
                            tracing::info!(
                                slot = slot.key(),
                                width = image.width,
                                height = image.height,
                                "texture uploaded"
                            );
                            self.planet.textures.complete(slot, Ok(()));
                        }
                        Err(error) => {
                            tracing::warn!(slot = slot.key(), %error, "texture upload rejected");
                            self.planet.textures.complete(slot, Err(error.to_string()));
                        }
                    }
                }
                Err(error) => {
                    if slot == TextureSlot::Starfield {
                        self.bake_starfield_fallback(gpu);
                    }
                    self.planet.textures.complete(slot, Err(error.to_string()));
                }
            }

            match slot {
                TextureSlot::ColorMap | TextureSlot::BumpMap | TextureSlot::SpecularMap => {
                    self.rebuild_planet_textures(&gpu.device);
                }
                TextureSlot::CloudMap | TextureSlot::CloudAlphaMap => {
                    self.rebuild_cloud_textures(&gpu.device);
                }
                TextureSlot::Starfield => {
                    self.rebuild_backdrop_textures(&gpu.device);
                }
            }
        }

        if self.planet.textures.all_resolved() {
            tracing::debug!("all texture slots resolved");
        }
    }

    fn bake_starfield_fallback(&mut self, gpu: &RenderContext) {
        let bitmap = fallback_starfield(self.starfield_seed);
        let upload = self.textures.create_texture(
            &gpu.device,
            &gpu.queue,
            TextureSlot::Starfield.key(),
            &bitmap.to_rgba8(),
            bitmap.width,
            bitmap.height,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            true,
        );
        if let Err(error) = upload {
            tracing::warn!(%error, "procedural starfield upload rejected");
        }
    }

    /// Advance animation state and render one frame.
    pub fn render_frame(&mut self, gpu: &RenderContext) -> Result<(), SurfaceError> {
        self.spin.step();
        self.planet.apply_spin(&mut self.graph, &self.spin);
        self.orbit.advance();
        self.camera.position = self.orbit.position();
        self.camera.look_at(self.orbit.target());

        let surface_texture = gpu.get_current_texture()?;
        self.write_frame_uniforms(&gpu.queue);

        let mut encoder = FrameEncoder::new(&gpu.device, Arc::new(gpu.queue.clone()), surface_texture);
        {
            let builder = RenderPassBuilder::new()
                .label("scene-pass")
                .depth(self.depth_buffer.view.clone(), DepthBuffer::CLEAR_VALUE);
            let mut pass = encoder.begin_render_pass(&builder);

            self.backdrop_pipeline.draw(
                &mut pass,
                &self.camera_bind_group,
                &self.backdrop_params_bind_group,
                &self.backdrop_texture_bind_group,
                &self.backdrop_mesh,
            );
            self.planet_pipeline.draw(
                &mut pass,
                &self.camera_bind_group,
                &self.planet_params_bind_group,
                &self.planet_texture_bind_group,
                &self.surface_mesh,
            );
            self.cloud_pipeline.draw(
                &mut pass,
                &self.camera_bind_group,
                &self.cloud_params_bind_group,
                &self.cloud_texture_bind_group,
                &self.atmosphere_mesh,
            );
            self.glow_pipeline.draw(
                &mut pass,
                &self.camera_bind_group,
                &self.glow_params_bind_group,
                &self.glow_mesh,
            );
            if let Some(mesh) = &self.label_mesh {
                self.label_pipeline.draw(
                    &mut pass,
                    &self.camera_bind_group,
                    &self.label_params_bind_group,
                    mesh,
                );
            }
        }
        encoder.submit();
        Ok(())
    }

    fn write_frame_uniforms(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&self.camera.to_uniform()),
        );
        queue.write_buffer(
            &self.planet_params_buffer,
            0,
            bytemuck::bytes_of(&PlanetParams {
                model: self
                    .graph
                    .world_matrix(self.planet.surface.node)
                    .to_cols_array_2d(),
                material: SurfaceUniform::from(&self.planet.surface_material),
                light_pos: light_pos(),
            }),
        );
        queue.write_buffer(
            &self.cloud_params_buffer,
            0,
            bytemuck::bytes_of(&CloudParams {
                model: self
                    .graph
                    .world_matrix(self.planet.atmosphere.node)
                    .to_cols_array_2d(),
                material: (&self.planet.atmosphere_material).into(),
                light_pos: light_pos(),
            }),
        );
        // The rim formula needs the camera's current view vector every frame.
        queue.write_buffer(
            &self.glow_params_buffer,
            0,
            bytemuck::bytes_of(&GlowParams {
                model: self
                    .graph
                    .world_matrix(self.planet.glow.node)
                    .to_cols_array_2d(),
                material: GlowUniform::from_def(&self.planet.glow_material, self.camera.position),
            }),
        );
    }

    /// Resize the depth buffer and camera frustum to the new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.camera.set_aspect_ratio(width as f32, height as f32);
        self.depth_buffer.resize(device, width, height);
    }

    /// The graph node count, exposed for frame stats logging.
    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    fn rebuild_planet_textures(&mut self, device: &wgpu::Device) {
        if let Some(bind_group) =
            build_planet_texture_bind_group(device, &self.textures, &self.planet_pipeline)
        {
            self.planet_texture_bind_group = bind_group;
        }
    }

    fn rebuild_cloud_textures(&mut self, device: &wgpu::Device) {
        if let Some(bind_group) =
            build_cloud_texture_bind_group(device, &self.textures, &self.cloud_pipeline)
        {
            self.cloud_texture_bind_group = bind_group;
        }
    }

    fn rebuild_backdrop_textures(&mut self, device: &wgpu::Device) {
        if let Some(bind_group) =
            build_backdrop_texture_bind_group(device, &self.textures, &self.backdrop_pipeline)
        {
            self.backdrop_texture_bind_group = bind_group;
        }
    }
}

/// The loaded texture for a slot, or its one-texel placeholder.
fn slot_view(
    textures: &TextureManager,
    slot: TextureSlot,
) -> Option<Arc<orrery_render::ManagedTexture>> {
    textures
        .get(slot.key())
        .or_else(|| textures.get(&placeholder_name(slot)))
}

fn build_planet_texture_bind_group(
    device: &wgpu::Device,
    textures: &TextureManager,
    pipeline: &PlanetPipeline,
) -> Option<wgpu::BindGroup> {
    let color = slot_view(textures, TextureSlot::ColorMap)?;
    let bump = slot_view(textures, TextureSlot::BumpMap)?;
    let specular = slot_view(textures, TextureSlot::SpecularMap)?;
    Some(pipeline.create_texture_bind_group(
        device,
        &color.view,
        &bump.view,
        &specular.view,
        textures.sampler_linear(),
    ))
}

fn build_cloud_texture_bind_group(
    device: &wgpu::Device,
    textures: &TextureManager,
    pipeline: &CloudPipeline,
) -> Option<wgpu::BindGroup> {
    let color = slot_view(textures, TextureSlot::CloudMap)?;
    let alpha = slot_view(textures, TextureSlot::CloudAlphaMap)?;
    Some(pipeline.create_texture_bind_group(
        device,
        &color.view,
        &alpha.view,
        textures.sampler_linear(),
    ))
}

fn build_backdrop_texture_bind_group(
    device: &wgpu::Device,
    textures: &TextureManager,
    pipeline: &BackdropPipeline,
) -> Option<wgpu::BindGroup> {
    let starfield = slot_view(textures, TextureSlot::Starfield)?;
    Some(pipeline.create_texture_bind_group(device, &starfield.view, textures.sampler_linear()))
}

fn upload_sphere(allocator: &BufferAllocator, label: &str, radius: f32) -> MeshBuffer {
    let mesh = generate_uv_sphere(radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
    allocator.create_mesh(
        label,
        bytemuck::cast_slice(&mesh.vertices),
        IndexData::U32(&mesh.indices),
    )
}

/// Load the font and extrude the label text. Any failure means the scene
/// simply runs without a label.
fn build_label(allocator: &BufferAllocator, config: &Config) -> Option<MeshBuffer> {
    let font_bytes = match load_font_bytes(&config.assets.font_path) {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(%error, "label font unavailable, skipping label");
            return None;
        }
    };
    let label = match build_label_mesh(&font_bytes, &config.assets.label_text, LABEL_SIZE, LABEL_DEPTH)
    {
        Ok(label) => label,
        Err(error) => {
            tracing::warn!(%error, "label mesh build failed, skipping label");
            return None;
        }
    };
    if label.mesh.is_empty() {
        tracing::warn!(text = %config.assets.label_text, "label produced no geometry");
        return None;
    }
    tracing::info!(
        text = %config.assets.label_text,
        advance = label.advance_width,
        "label mesh built"
    );
    Some(allocator.create_mesh(
        "label-mesh",
        bytemuck::cast_slice(&label.mesh.vertices),
        IndexData::U32(&label.mesh.indices),
    ))
}

fn light_pos() -> [f32; 4] {
    [LIGHT_POSITION.x, LIGHT_POSITION.y, LIGHT_POSITION.z, 0.0]
}

fn placeholder_name(slot: TextureSlot) -> String {
    format!("{}_placeholder", slot.key())
}

/// One-texel stand-in colors chosen so the untextured scene still reads:
/// gray-blue ball, invisible clouds, black sky.
fn placeholder_rgba(slot: TextureSlot) -> [u8; 4] {
    match slot {
        TextureSlot::ColorMap => [96, 112, 140, 255],
        TextureSlot::BumpMap => [128, 128, 128, 255],
        TextureSlot::SpecularMap => [0, 0, 0, 255],
        TextureSlot::CloudMap => [255, 255, 255, 255],
        TextureSlot::CloudAlphaMap => [0, 0, 0, 255],
        TextureSlot::Starfield => [0, 0, 0, 255],
    }
}

/// Color maps are authored in sRGB; data maps stay linear.
fn slot_format(slot: TextureSlot) -> wgpu::TextureFormat {
    match slot {
        TextureSlot::ColorMap | TextureSlot::CloudMap | TextureSlot::Starfield => {
            wgpu::TextureFormat::Rgba8UnormSrgb
        }
        TextureSlot::BumpMap | TextureSlot::SpecularMap | TextureSlot::CloudAlphaMap => {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_maps_are_srgb() {
        assert!(slot_format(TextureSlot::ColorMap).is_srgb());
        assert!(slot_format(TextureSlot::CloudMap).is_srgb());
        assert!(slot_format(TextureSlot::Starfield).is_srgb());
    }

    #[test]
    fn test_data_maps_are_linear() {
        assert!(!slot_format(TextureSlot::BumpMap).is_srgb());
        assert!(!slot_format(TextureSlot::SpecularMap).is_srgb());
        assert!(!slot_format(TextureSlot::CloudAlphaMap).is_srgb());
    }

    #[test]
    fn test_placeholder_names_unique_per_slot() {
        let mut names: Vec<String> = TextureSlot::ALL.iter().map(|s| placeholder_name(*s)).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), TextureSlot::ALL.len());
    }

    #[test]
    fn test_cloud_placeholder_is_invisible() {
        // Alpha map placeholder must be black so unloaded clouds don't show.
        assert_eq!(placeholder_rgba(TextureSlot::CloudAlphaMap), [0, 0, 0, 255]);
    }

    #[test]
    fn test_label_floats_left_of_planet() {
        assert!(LABEL_POSITION.x < 0.0);
        assert!(LABEL_POSITION.z > 0.0);
    }
}
