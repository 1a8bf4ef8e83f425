//! Camera orbit controller.
//!
//! The camera slowly circles the planet on an ellipse in the XZ plane, aimed
//! at the origin. The mode is chosen once at startup: either the controller
//! drives the camera every frame, or it stands aside for user-driven input.

use glam::Vec3;

use orrery_config::CameraConfig;

/// Who moves the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbitMode {
    /// The controller writes the camera position every frame.
    AutoOrbit,
    /// External input owns the camera; the controller is inert.
    UserControlled,
}

/// Frame-stepped elliptical orbit around the origin.
///
/// In [`OrbitMode::AutoOrbit`], each frame advances the angular accumulator by
/// a fixed step and places the camera at
/// `(-sin(a) * radius_x, 0, -cos(a) * radius_z)`. Zoom is carried but never
/// animated.
#[derive(Clone, Copy, Debug)]
pub struct OrbitController {
    mode: OrbitMode,
    step: f32,
    radius_x: f32,
    radius_z: f32,
    accumulator: f32,
    position: Vec3,
    zoom: f32,
}

impl OrbitController {
    pub fn new(config: &CameraConfig) -> Self {
        let mode = if config.auto_orbit {
            OrbitMode::AutoOrbit
        } else {
            OrbitMode::UserControlled
        };
        let mut controller = Self {
            mode,
            step: config.orbit_step,
            radius_x: config.orbit_radius_x,
            radius_z: config.orbit_radius_z,
            accumulator: 0.0,
            position: Vec3::ZERO,
            zoom: 1.0,
        };
        // Start on the ellipse rather than at the origin.
        controller.position = controller.position_at(0.0);
        controller
    }

    fn position_at(&self, angle: f32) -> Vec3 {
        Vec3::new(
            -angle.sin() * self.radius_x,
            0.0,
            -angle.cos() * self.radius_z,
        )
    }

    /// Advance one frame. A no-op in [`OrbitMode::UserControlled`].
    pub fn advance(&mut self) {
        if self.mode != OrbitMode::AutoOrbit {
            return;
        }
        self.accumulator += self.step;
        self.position = self.position_at(self.accumulator);
    }

    pub fn mode(&self) -> OrbitMode {
        self.mode
    }

    /// Current camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The point the camera is aimed at every frame.
    pub fn target(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Angular accumulator, in radians.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Zoom factor. Held constant for the session.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }
}
