//! Procedural starfield generation: deterministic star placement on the sky
//! sphere, baked into an equirectangular bitmap. Used as a fallback when the
//! starfield texture is missing from disk.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A single star in the procedural catalog.
#[derive(Clone, Debug)]
pub struct StarPoint {
    /// Unit direction vector on the sky sphere.
    pub direction: glam::Vec3,
    /// Brightness in [0.0, 1.0] where 1.0 is the brightest visible star.
    pub brightness: f32,
    /// Color temperature mapped to RGB. Blue-white (high temp) to red (low temp).
    pub color: [f32; 3],
}

/// Generates a deterministic catalog of stars from a seed.
pub struct StarfieldGenerator {
    seed: u64,
    star_count: u32,
}

impl StarfieldGenerator {
    pub fn new(seed: u64, star_count: u32) -> Self {
        Self { seed, star_count }
    }

    /// Generate the star catalog. Deterministic for a given seed.
    pub fn generate(&self) -> Vec<StarPoint> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut stars = Vec::with_capacity(self.star_count as usize);

        for _ in 0..self.star_count {
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();

            let direction =
                glam::Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());

            // Power-law brightness: many dim stars, few bright ones.
            let raw: f32 = rng.random();
            let brightness = raw.powf(4.0).clamp(0.0, 1.0);

            let temperature = 2000.0 + brightness * 28000.0;
            let color = blackbody_to_rgb(temperature);

            stars.push(StarPoint {
                direction,
                brightness,
                color,
            });
        }

        stars
    }
}

/// Convert a blackbody temperature in Kelvin to an approximate sRGB color.
///
/// Uses a simplified Planckian locus approximation (Tanner Helland algorithm).
pub fn blackbody_to_rgb(temperature_k: f32) -> [f32; 3] {
    let t = temperature_k / 100.0;
    let r = if t <= 66.0 {
        1.0
    } else {
        (329.698_73 * (t - 60.0).powf(-0.133_204_76) / 255.0).clamp(0.0, 1.0)
    };
    let g = if t <= 66.0 {
        (99.470_8 * t.ln() - 161.119_57).clamp(0.0, 255.0) / 255.0
    } else {
        (288.122_17 * (t - 60.0).powf(-0.075_514_85) / 255.0).clamp(0.0, 1.0)
    };
    let b = if t >= 66.0 {
        1.0
    } else if t <= 19.0 {
        0.0
    } else {
        (138.517_73 * (t - 10.0).ln() - 305.044_8).clamp(0.0, 255.0) / 255.0
    };
    [r, g, b]
}

/// An equirectangular star bitmap ready for upload to a 2D texture.
///
/// The mapping matches the UV layout of the backdrop sphere: u wraps around
/// the equator, v runs from the north pole (0) to the south pole (1).
pub struct StarfieldBitmap {
    pub width: u32,
    pub height: u32,
    /// `width * height` pixels, RGBA f32, row-major from the top.
    pub pixels: Vec<[f32; 4]>,
}

impl StarfieldBitmap {
    /// Render a star catalog into an equirectangular bitmap.
    pub fn render(stars: &[StarPoint], width: u32, height: u32) -> Self {
        let mut pixels = vec![[0.0, 0.0, 0.0, 1.0]; (width * height) as usize];

        for star in stars {
            let (u, v) = direction_to_equirect_uv(star.direction);
            let px = ((u * width as f32) as u32).min(width - 1);
            let py = ((v * height as f32) as u32).min(height - 1);
            let idx = (py * width + px) as usize;

            // Additive blend: multiple dim stars in the same pixel accumulate.
            let pixel = &mut pixels[idx];
            let b = star.brightness * 8.0 + 0.4;
            pixel[0] = (pixel[0] + star.color[0] * b).min(1.0);
            pixel[1] = (pixel[1] + star.color[1] * b).min(1.0);
            pixel[2] = (pixel[2] + star.color[2] * b).min(1.0);

            // Bright stars bleed into neighboring pixels for a glow effect.
            if star.brightness > 0.3 {
                let glow = star.brightness * 2.0;
                let offsets: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
                for (dx, dy) in offsets {
                    // u wraps around the seam; v clamps at the poles.
                    let nx = (px as i32 + dx).rem_euclid(width as i32) as u32;
                    let ny = py as i32 + dy;
                    if ny >= 0 && ny < height as i32 {
                        let ni = (ny as u32 * width + nx) as usize;
                        let np = &mut pixels[ni];
                        np[0] = (np[0] + star.color[0] * glow * 0.3).min(1.0);
                        np[1] = (np[1] + star.color[1] * glow * 0.3).min(1.0);
                        np[2] = (np[2] + star.color[2] * glow * 0.3).min(1.0);
                    }
                }
            }
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to RGBA8 bytes suitable for GPU upload.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            bytes.push((pixel[0].clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((pixel[1].clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((pixel[2].clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((pixel[3].clamp(0.0, 1.0) * 255.0) as u8);
        }
        bytes
    }
}

/// Map a unit direction vector to equirectangular UV coordinates in [0, 1].
pub(crate) fn direction_to_equirect_uv(dir: glam::Vec3) -> (f32, f32) {
    let u = 0.5 + dir.z.atan2(dir.x) / std::f32::consts::TAU;
    let v = 0.5 - dir.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI;
    (u.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_count_matches_request() {
        let generator = StarfieldGenerator::new(42, 5000);
        assert_eq!(generator.generate().len(), 5000);
    }

    #[test]
    fn test_star_directions_are_unit_vectors() {
        let generator = StarfieldGenerator::new(42, 5000);
        for (i, star) in generator.generate().iter().enumerate() {
            let len = star.direction.length();
            assert!(
                (len - 1.0).abs() < 1e-5,
                "Star {i} direction is not a unit vector: length = {len}"
            );
        }
    }

    #[test]
    fn test_star_distribution_covers_full_sky() {
        let generator = StarfieldGenerator::new(42, 5000);
        let stars = generator.generate();
        let mut octant_counts = [0u32; 8];

        for star in &stars {
            let d = star.direction;
            let octant = ((d.x >= 0.0) as usize)
                | (((d.y >= 0.0) as usize) << 1)
                | (((d.z >= 0.0) as usize) << 2);
            octant_counts[octant] += 1;
        }

        for (i, &count) in octant_counts.iter().enumerate() {
            assert!(
                (300..=900).contains(&count),
                "Octant {i} has {count} stars, expected roughly 625 (range 300-900)"
            );
        }
    }

    #[test]
    fn test_same_seed_produces_same_starfield() {
        let stars_a = StarfieldGenerator::new(123, 1000).generate();
        let stars_b = StarfieldGenerator::new(123, 1000).generate();

        assert_eq!(stars_a.len(), stars_b.len());
        for (i, (a, b)) in stars_a.iter().zip(stars_b.iter()).enumerate() {
            assert!(
                (a.direction - b.direction).length() < 1e-6,
                "Star {i} direction differs between identical seeds"
            );
        }
    }

    #[test]
    fn test_different_seed_produces_different_starfield() {
        let stars_a = StarfieldGenerator::new(1, 1000).generate();
        let stars_b = StarfieldGenerator::new(9999, 1000).generate();

        let differences = stars_a
            .iter()
            .zip(stars_b.iter())
            .filter(|(a, b)| (a.direction - b.direction).length() > 0.01)
            .count();
        assert!(
            differences > 500,
            "Expected most stars to differ between seeds, only {differences}/1000 differed"
        );
    }

    #[test]
    fn test_brightness_distribution_skews_dim() {
        let stars = StarfieldGenerator::new(42, 5000).generate();
        let dim_count = stars.iter().filter(|s| s.brightness < 0.1).count();
        let bright_count = stars.iter().filter(|s| s.brightness > 0.5).count();
        assert!(
            dim_count > bright_count * 3,
            "Expected many more dim stars ({dim_count}) than bright stars ({bright_count})"
        );
    }

    #[test]
    fn test_blackbody_red_at_low_temperature() {
        let color = blackbody_to_rgb(2000.0);
        assert!(
            color[0] > color[2],
            "At 2000K, red ({}) should exceed blue ({})",
            color[0],
            color[2]
        );
    }

    #[test]
    fn test_blackbody_blue_at_high_temperature() {
        let color = blackbody_to_rgb(30000.0);
        assert!(
            color[2] > 0.5,
            "At 30000K, blue channel ({}) should be high",
            color[2]
        );
    }

    #[test]
    fn test_equirect_uv_mapping_landmarks() {
        // +Y is the north pole, -Y the south pole.
        let (_, v_north) = direction_to_equirect_uv(glam::Vec3::Y);
        let (_, v_south) = direction_to_equirect_uv(glam::Vec3::NEG_Y);
        assert!(v_north < 0.01, "North pole should map to v ~ 0, got {v_north}");
        assert!(v_south > 0.99, "South pole should map to v ~ 1, got {v_south}");

        // Equator directions map to v = 0.5.
        let (u_x, v_x) = direction_to_equirect_uv(glam::Vec3::X);
        assert!((v_x - 0.5).abs() < 1e-6);
        assert!((u_x - 0.5).abs() < 1e-6, "+X should map to u = 0.5, got {u_x}");
    }

    #[test]
    fn test_bitmap_render_produces_lit_pixels() {
        let stars = StarfieldGenerator::new(42, 5000).generate();
        let bitmap = StarfieldBitmap::render(&stars, 256, 128);

        let lit = bitmap
            .pixels
            .iter()
            .filter(|p| p[0] > 0.0 || p[1] > 0.0 || p[2] > 0.0)
            .count();
        assert!(lit > 100, "Expected many lit pixels, got {lit}");
    }

    #[test]
    fn test_bitmap_to_rgba8_length() {
        let stars = StarfieldGenerator::new(42, 100).generate();
        let bitmap = StarfieldBitmap::render(&stars, 64, 32);
        assert_eq!(bitmap.to_rgba8().len(), 64 * 32 * 4);
    }
}
