//! Per-layer Y-axis spin animation state.

use std::f32::consts::TAU;

/// Surface spin per frame, in radians. Negative is westward.
pub const SURFACE_SPIN_STEP: f32 = -0.01 / 10.0;

/// Atmosphere spin per frame, in radians. Always twice the surface rate, so
/// the cloud layer visibly drifts over the ground.
pub const ATMOSPHERE_SPIN_STEP: f32 = -0.01 / 5.0;

/// Accumulated Y rotation of the surface and atmosphere layers.
///
/// Advanced exactly once per rendered frame; angles are kept wrapped to
/// (-2π, 2π) so long sessions never lose float precision.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayerSpin {
    surface_angle: f32,
    atmosphere_angle: f32,
}

impl LayerSpin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both layers by one frame.
    pub fn step(&mut self) {
        self.surface_angle = (self.surface_angle + SURFACE_SPIN_STEP) % TAU;
        self.atmosphere_angle = (self.atmosphere_angle + ATMOSPHERE_SPIN_STEP) % TAU;
    }

    /// Current surface Y rotation, in radians.
    pub fn surface_angle(&self) -> f32 {
        self.surface_angle
    }

    /// Current atmosphere Y rotation, in radians.
    pub fn atmosphere_angle(&self) -> f32 {
        self.atmosphere_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step_amounts() {
        let mut spin = LayerSpin::new();
        spin.step();
        assert!((spin.surface_angle() - (-0.001)).abs() < 1e-7);
        assert!((spin.atmosphere_angle() - (-0.002)).abs() < 1e-7);
    }

    #[test]
    fn test_atmosphere_always_twice_surface() {
        let mut spin = LayerSpin::new();
        for _ in 0..500 {
            spin.step();
            assert!(
                (spin.atmosphere_angle() - 2.0 * spin.surface_angle()).abs() < 1e-4,
                "cloud layer must spin at 2x the surface rate"
            );
        }
    }

    #[test]
    fn test_angle_after_n_frames() {
        let mut spin = LayerSpin::new();
        let n = 1000;
        for _ in 0..n {
            spin.step();
        }
        let expected_surface = (n as f32 * SURFACE_SPIN_STEP) % TAU;
        assert!((spin.surface_angle() - expected_surface).abs() < 1e-3);
    }

    #[test]
    fn test_angles_stay_wrapped() {
        let mut spin = LayerSpin::new();
        // Enough frames for the atmosphere to pass several full turns.
        for _ in 0..20_000 {
            spin.step();
        }
        assert!(spin.surface_angle().abs() < TAU);
        assert!(spin.atmosphere_angle().abs() < TAU);
    }
}
