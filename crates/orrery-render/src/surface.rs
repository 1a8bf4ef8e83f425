//! Cross-platform surface size tracking.
//!
//! Normalizes Wayland zero-size windows, macOS Retina scaling, and Windows
//! DPI changes into a single resize event stream with physical-pixel
//! dimensions for GPU surface configuration.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

/// Event produced when the surface dimensions or scale factor change.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceResizeEvent {
    /// New physical pixel dimensions.
    pub physical: PhysicalSize,
    /// Current scale factor.
    pub scale_factor: f64,
}

/// Tracks surface dimensions and deduplicates resize events.
///
/// Zero-size surfaces (common on Wayland before the compositor assigns a
/// size) are clamped to 1x1. Repeated resizes to the same dimensions produce
/// no event, keeping the downstream viewport update idempotent.
pub struct SurfaceWrapper {
    physical_width: u32,
    physical_height: u32,
    scale_factor: f64,
}

impl SurfaceWrapper {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical_width: physical_width.max(MIN_SURFACE_DIMENSION),
            physical_height: physical_height.max(MIN_SURFACE_DIMENSION),
            scale_factor,
        }
    }

    /// Handle a window resize event. Returns a resize event only if the
    /// clamped dimensions actually changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);

        if width == self.physical_width && height == self.physical_height {
            return None;
        }

        self.physical_width = width;
        self.physical_height = height;

        Some(SurfaceResizeEvent {
            physical: PhysicalSize { width, height },
            scale_factor: self.scale_factor,
        })
    }

    /// Handle a scale factor change. Returns a resize event because the
    /// physical dimensions change even if the logical size stays the same.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        self.scale_factor = new_scale_factor;
        self.handle_resize(new_physical_width, new_physical_height)
    }

    /// Current physical pixel dimensions for surface configuration.
    pub fn physical_size(&self) -> PhysicalSize {
        PhysicalSize {
            width: self.physical_width,
            height: self.physical_height,
        }
    }

    /// Current aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f32 {
        self.physical_width as f32 / self.physical_height as f32
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_surface_clamped() {
        let wrapper = SurfaceWrapper::new(0, 0, 1.0);
        let size = wrapper.physical_size();
        assert_eq!(size, PhysicalSize { width: 1, height: 1 });
    }

    #[test]
    fn test_resize_produces_event_with_new_size() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        let event = wrapper.handle_resize(1920, 1080).unwrap();
        assert_eq!(event.physical.width, 1920);
        assert_eq!(event.physical.height, 1080);
    }

    #[test]
    fn test_no_event_on_same_dimensions() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0);
        assert!(wrapper.handle_resize(1920, 1080).is_none());
    }

    #[test]
    fn test_zero_resize_clamped_to_one() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        let event = wrapper.handle_resize(0, 0);
        assert!(event.is_some());
        assert_eq!(
            wrapper.physical_size(),
            PhysicalSize { width: 1, height: 1 }
        );
    }

    #[test]
    fn test_aspect_ratio_tracks_resize() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        wrapper.handle_resize(1920, 1080);
        assert!((wrapper.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_factor_change_updates_physical_size() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0);
        let event = wrapper.handle_scale_factor_changed(2.0, 3840, 2160).unwrap();
        assert_eq!(event.physical.width, 3840);
        assert_eq!(event.scale_factor, 2.0);
        assert_eq!(wrapper.scale_factor(), 2.0);
    }
}
