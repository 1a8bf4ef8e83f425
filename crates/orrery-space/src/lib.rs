//! Starfield backdrop: procedural star generation and the inside-out sphere
//! pipeline that draws the sky behind the scene.

pub mod backdrop;
pub mod starfield;

pub use backdrop::{
    BACKDROP_RADIUS, BACKDROP_SHADER_SOURCE, BackdropParams, BackdropPipeline,
};
pub use starfield::{StarPoint, StarfieldBitmap, StarfieldGenerator, blackbody_to_rgb};

/// Star count used for the procedural fallback sky.
pub const FALLBACK_STAR_COUNT: u32 = 5000;

/// Dimensions of the baked fallback bitmap (equirectangular, 2:1).
pub const FALLBACK_BITMAP_WIDTH: u32 = 1024;
pub const FALLBACK_BITMAP_HEIGHT: u32 = 512;

/// Bake a procedural starfield bitmap for use when the starfield texture
/// cannot be loaded from disk.
pub fn fallback_starfield(seed: u64) -> StarfieldBitmap {
    tracing::info!(seed, "baking procedural starfield fallback");
    let stars = StarfieldGenerator::new(seed, FALLBACK_STAR_COUNT).generate();
    StarfieldBitmap::render(&stars, FALLBACK_BITMAP_WIDTH, FALLBACK_BITMAP_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_starfield_dimensions() {
        let bitmap = fallback_starfield(42);
        assert_eq!(bitmap.width, FALLBACK_BITMAP_WIDTH);
        assert_eq!(bitmap.height, FALLBACK_BITMAP_HEIGHT);
        assert_eq!(
            bitmap.pixels.len(),
            (FALLBACK_BITMAP_WIDTH * FALLBACK_BITMAP_HEIGHT) as usize
        );
    }

    #[test]
    fn test_fallback_starfield_deterministic() {
        let a = fallback_starfield(7).to_rgba8();
        let b = fallback_starfield(7).to_rgba8();
        assert_eq!(a, b);
    }
}
