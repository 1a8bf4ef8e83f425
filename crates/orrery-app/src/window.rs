//! Window creation and event handling via winit.
//!
//! Provides [`AppState`] which implements winit's [`ApplicationHandler`]
//! trait, and a [`run`] function to start the event loop. Animation is tied to
//! presented frames: each `RedrawRequested` advances the spin and orbit by one
//! step and immediately requests the next redraw.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use orrery_assets::AssetLoader;
use orrery_config::Config;
use orrery_materials::TextureSlot;
use orrery_render::{RenderContext, SurfaceError, SurfaceWrapper, init_render_context_blocking};

use crate::renderer::SceneRenderer;

/// Worker threads for background texture decoding.
const LOADER_WORKERS: usize = 2;
/// Frames between frame-stat log lines when enabled.
const FRAME_STATS_INTERVAL: u64 = 300;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Application state that manages the window, GPU context, scene renderer,
/// and background asset loading.
pub struct AppState {
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    surface_wrapper: SurfaceWrapper,
    renderer: Option<SceneRenderer>,
    loader: AssetLoader,
    config: Config,
    frame_count: u64,
    stats_marker: Instant,
}

impl AppState {
    pub fn with_config(config: Config) -> Self {
        Self {
            window: None,
            gpu: None,
            surface_wrapper: SurfaceWrapper::new(config.window.width, config.window.height, 1.0),
            renderer: None,
            loader: AssetLoader::new(LOADER_WORKERS),
            config,
            frame_count: 0,
            stats_marker: Instant::now(),
        }
    }

    /// Queue all six texture slots for background loading.
    fn request_textures(&self) {
        for slot in TextureSlot::ALL {
            let path: PathBuf = self.config.assets.texture_dir.join(slot.file_name());
            if !self.loader.request(slot, path.clone()) {
                warn!(slot = slot.key(), "texture request refused, loader is down");
            } else {
                info!(slot = slot.key(), path = %path.display(), "texture requested");
            }
        }
    }

    fn apply_resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
        }
        if let (Some(renderer), Some(gpu)) = (&mut self.renderer, &self.gpu) {
            renderer.resize(&gpu.device, width, height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(renderer)) = (&self.gpu, &mut self.renderer) else {
            return;
        };

        renderer.process_load_results(gpu, self.loader.drain_results());

        match renderer.render_frame(gpu) {
            Ok(()) => {}
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
            }
            Err(SurfaceError::Lost) => {
                error!("Surface lost and unrecoverable, shutting down");
                event_loop.exit();
                return;
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, shutting down");
                event_loop.exit();
                return;
            }
        }

        self.frame_count += 1;
        if self.config.debug.log_frame_stats && self.frame_count % FRAME_STATS_INTERVAL == 0 {
            let elapsed = self.stats_marker.elapsed();
            let fps = FRAME_STATS_INTERVAL as f64 / elapsed.as_secs_f64().max(1e-6);
            info!(
                frames = self.frame_count,
                fps = format!("{fps:.1}"),
                nodes = renderer.node_count(),
                "frame stats"
            );
            self.stats_marker = Instant::now();
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = window_attributes_from_config(&self.config);
        let window = event_loop
            .create_window(attrs)
            .expect("Failed to create window");
        let window = Arc::new(window);

        let scale_factor = window.scale_factor();
        let inner_size = window.inner_size();
        self.surface_wrapper = SurfaceWrapper::new(inner_size.width, inner_size.height, scale_factor);
        info!(
            "Surface wrapper initialized: {}x{} (scale: {:.2})",
            inner_size.width, inner_size.height, scale_factor
        );

        let gpu = match init_render_context_blocking(window.clone()) {
            Ok(ctx) => ctx,
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };

        match SceneRenderer::new(&gpu, &self.config) {
            Ok(renderer) => {
                self.renderer = Some(renderer);
            }
            Err(e) => {
                error!("Scene initialization failed: {e}");
                event_loop.exit();
                return;
            }
        }

        self.gpu = Some(gpu);
        self.request_textures();

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.loader.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(resize) = self
                    .surface_wrapper
                    .handle_resize(new_size.width, new_size.height)
                {
                    let w = resize.physical.width;
                    let h = resize.physical.height;
                    self.apply_resize(w, h);
                    info!(
                        "Window resized to {}x{} (scale: {:.2})",
                        w, h, resize.scale_factor
                    );
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let new_inner = window.inner_size();
                    if let Some(resize) = self.surface_wrapper.handle_scale_factor_changed(
                        scale_factor,
                        new_inner.width,
                        new_inner.height,
                    ) {
                        let w = resize.physical.width;
                        let h = resize.physical.height;
                        self.apply_resize(w, h);
                        info!(
                            "Scale factor changed to {:.2}, resized to {}x{}",
                            scale_factor, w, h
                        );
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

/// Start the event loop with the given configuration. Blocks until exit.
pub fn run_with_config(config: Config) {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = AppState::with_config(config);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
