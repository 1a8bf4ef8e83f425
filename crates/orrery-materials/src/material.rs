//! Core material types: [`SurfaceMaterialDef`], [`AtmosphereMaterialDef`],
//! and [`GlowMaterialDef`], with their packed GPU uniforms.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// MaterialError
// ---------------------------------------------------------------------------

/// Errors returned during material validation.
#[derive(Debug, Error)]
pub enum MaterialError {
    /// Shininess must be positive for the specular term to be defined.
    #[error("shininess must be > 0, got {0}")]
    NonPositiveShininess(f32),

    /// The glow falloff exponent must be positive.
    #[error("glow falloff exponent must be > 0, got {0}")]
    NonPositiveFalloff(f32),
}

// ---------------------------------------------------------------------------
// SurfaceMaterialDef
// ---------------------------------------------------------------------------

/// Phong-lit planet surface material.
///
/// Texture inputs (color map, bump map, specular map) are attached separately
/// through [`crate::TextureBinding`]s; this struct carries only the scalar
/// shading parameters. All fields are validated and clamped via
/// [`SurfaceMaterialDef::validated`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SurfaceMaterialDef {
    /// Bump map displacement scale. Clamped to `[0.0, 1.0]`.
    pub bump_scale: f32,

    /// Specular highlight color in linear RGB. Components clamped to `[0.0, 1.0]`.
    pub specular: [f32; 3],

    /// Phong shininess exponent. Must be > 0.
    pub shininess: f32,

    /// Opacity: 1.0 = fully opaque. Clamped to `[0.0, 1.0]`.
    pub opacity: f32,
}

impl Default for SurfaceMaterialDef {
    fn default() -> Self {
        Self {
            bump_scale: 0.05,
            specular: [0.5, 0.5, 0.5],
            shininess: 10.0,
            opacity: 1.0,
        }
    }
}

impl SurfaceMaterialDef {
    /// Validates and clamps all fields to their legal ranges.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::NonPositiveShininess`] if shininess <= 0.
    pub fn validated(mut self) -> Result<Self, MaterialError> {
        if self.shininess <= 0.0 {
            return Err(MaterialError::NonPositiveShininess(self.shininess));
        }

        self.bump_scale = self.bump_scale.clamp(0.0, 1.0);
        self.opacity = self.opacity.clamp(0.0, 1.0);
        for c in &mut self.specular {
            *c = c.clamp(0.0, 1.0);
        }

        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// AtmosphereMaterialDef
// ---------------------------------------------------------------------------

/// Translucent cloud layer material.
///
/// Rendered double-sided with alpha blending; the cloud color map supplies
/// color and the cloud alpha map supplies per-texel transparency.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AtmosphereMaterialDef {
    /// Layer opacity multiplier. Clamped to `[0.0, 1.0]`.
    pub opacity: f32,
}

impl Default for AtmosphereMaterialDef {
    fn default() -> Self {
        Self { opacity: 0.8 }
    }
}

impl AtmosphereMaterialDef {
    /// Clamps opacity to `[0.0, 1.0]`. Infallible; kept as a `Result` for
    /// symmetry with the other material kinds.
    pub fn validated(mut self) -> Result<Self, MaterialError> {
        self.opacity = self.opacity.clamp(0.0, 1.0);
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// GlowMaterialDef
// ---------------------------------------------------------------------------

/// Rim-glow shell material.
///
/// The shader computes `intensity = (c - dot(normal, view))^p` per vertex and
/// outputs `color * intensity` with additive blending on back faces only,
/// producing a soft halo around the planet silhouette.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GlowMaterialDef {
    /// Base constant `c` in the rim intensity formula.
    pub intensity: f32,

    /// Falloff exponent `p` in the rim intensity formula. Must be > 0.
    pub fade: f32,

    /// Glow color in linear RGB. Components clamped to `[0.0, 1.0]`.
    pub color: [f32; 3],
}

impl Default for GlowMaterialDef {
    fn default() -> Self {
        Self {
            intensity: 0.7,
            fade: 7.0,
            color: [0.576, 0.812, 0.937],
        }
    }
}

impl GlowMaterialDef {
    /// Validates and clamps all fields to their legal ranges.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::NonPositiveFalloff`] if fade <= 0.
    pub fn validated(mut self) -> Result<Self, MaterialError> {
        if self.fade <= 0.0 {
            return Err(MaterialError::NonPositiveFalloff(self.fade));
        }
        for c in &mut self.color {
            *c = c.clamp(0.0, 1.0);
        }
        Ok(self)
    }
}

/// CPU reference for the rim intensity formula used by the glow shader.
///
/// `intensity = (c - dot(normal, view_dir))^p`. When the base is negative and
/// `p` is non-integer the result is implementation-defined (`powf` of a
/// negative base yields NaN); callers that need a displayable value should
/// clamp the base first, as the shader's additive blend makes NaN harmless
/// only on hardware that flushes it to zero.
pub fn glow_intensity(c: f32, p: f32, normal: Vec3, view_dir: Vec3) -> f32 {
    (c - normal.dot(view_dir)).powf(p)
}

// ---------------------------------------------------------------------------
// GPU uniforms
// ---------------------------------------------------------------------------

/// Packed surface material uniform, 32 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SurfaceUniform {
    /// xyz = specular color, w = shininess.
    pub specular_shininess: [f32; 4],
    /// Bump map displacement scale.
    pub bump_scale: f32,
    /// Opacity.
    pub opacity: f32,
    /// Padding for 16-byte alignment.
    pub _pad: [f32; 2],
}

impl From<&SurfaceMaterialDef> for SurfaceUniform {
    fn from(m: &SurfaceMaterialDef) -> Self {
        Self {
            specular_shininess: [m.specular[0], m.specular[1], m.specular[2], m.shininess],
            bump_scale: m.bump_scale,
            opacity: m.opacity,
            _pad: [0.0; 2],
        }
    }
}

/// Packed atmosphere material uniform, 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct AtmosphereUniform {
    /// Layer opacity multiplier.
    pub opacity: f32,
    /// Padding for 16-byte alignment.
    pub _pad: [f32; 3],
}

impl From<&AtmosphereMaterialDef> for AtmosphereUniform {
    fn from(m: &AtmosphereMaterialDef) -> Self {
        Self {
            opacity: m.opacity,
            _pad: [0.0; 3],
        }
    }
}

/// Packed glow material uniform, 32 bytes.
///
/// The view vector is per-frame state and lives here rather than in the def:
/// the shader compares world-space normals against the camera direction.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlowUniform {
    /// xyz = glow color, w = base constant `c`.
    pub color_c: [f32; 4],
    /// xyz = normalized view vector, w = falloff exponent `p`.
    pub view_p: [f32; 4],
}

impl GlowUniform {
    /// Pack a glow material and the current camera view vector.
    pub fn from_def(def: &GlowMaterialDef, view_vector: Vec3) -> Self {
        let v = view_vector.normalize_or_zero();
        Self {
            color_c: [def.color[0], def.color[1], def.color[2], def.intensity],
            view_p: [v.x, v.y, v.z, def.fade],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_surface_material() {
        let mat = SurfaceMaterialDef::default();
        assert!((mat.bump_scale - 0.05).abs() < 1e-6);
        assert_eq!(mat.specular, [0.5, 0.5, 0.5]);
        assert!((mat.shininess - 10.0).abs() < 1e-6);
        assert_eq!(mat.opacity, 1.0);
    }

    #[test]
    fn test_surface_fields_clamped() {
        let mat = SurfaceMaterialDef {
            bump_scale: 2.0,
            specular: [1.5, -0.3, 0.5],
            shininess: 10.0,
            opacity: -1.0,
        }
        .validated()
        .unwrap();

        assert_eq!(mat.bump_scale, 1.0);
        assert_eq!(mat.specular, [1.0, 0.0, 0.5]);
        assert_eq!(mat.opacity, 0.0);
    }

    #[test]
    fn test_non_positive_shininess_rejected() {
        let result = SurfaceMaterialDef {
            shininess: 0.0,
            ..Default::default()
        }
        .validated();
        assert!(result.is_err());
    }

    #[test]
    fn test_atmosphere_opacity_clamped() {
        let mat = AtmosphereMaterialDef { opacity: 1.4 }.validated().unwrap();
        assert_eq!(mat.opacity, 1.0);
    }

    #[test]
    fn test_glow_falloff_rejected_when_non_positive() {
        let result = GlowMaterialDef {
            fade: -1.0,
            ..Default::default()
        }
        .validated();
        assert!(result.is_err());
    }

    #[test]
    fn test_glow_intensity_formula() {
        // Head-on view: base = c - 1
        let head_on = glow_intensity(0.7, 7.0, Vec3::Z, Vec3::Z);
        let expected = (0.7_f32 - 1.0).powf(7.0);
        // Both are NaN-free here only if the sign survives the odd exponent;
        // powf of a negative base is NaN, which is the documented behavior.
        assert_eq!(head_on.is_nan(), expected.is_nan());

        // Grazing view: normal perpendicular to view, base = c
        let grazing = glow_intensity(0.7, 7.0, Vec3::X, Vec3::Z);
        assert!((grazing - 0.7_f32.powf(7.0)).abs() < 1e-6);
    }

    #[test]
    fn test_glow_intensity_negative_base_is_nan() {
        // c - dot = 0.7 - 1.0 = -0.3; powf with fractional exponent is NaN.
        let value = glow_intensity(0.7, 6.5, Vec3::Z, Vec3::Z);
        assert!(value.is_nan());
    }

    #[test]
    fn test_glow_brightest_at_silhouette() {
        let c = 0.7;
        let p = 7.0;
        let view = Vec3::Z;
        let silhouette = glow_intensity(c, p, Vec3::X, view);
        let oblique = glow_intensity(c, p, Vec3::new(0.5, 0.0, 0.5).normalize(), view);
        assert!(silhouette > oblique);
    }

    #[test]
    fn test_surface_uniform_packing() {
        let mat = SurfaceMaterialDef::default();
        let uniform = SurfaceUniform::from(&mat);
        assert_eq!(uniform.specular_shininess, [0.5, 0.5, 0.5, 10.0]);
        assert!((uniform.bump_scale - 0.05).abs() < 1e-6);
        assert_eq!(std::mem::size_of::<SurfaceUniform>(), 32);
    }

    #[test]
    fn test_glow_uniform_packing() {
        let def = GlowMaterialDef::default();
        let uniform = GlowUniform::from_def(&def, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(uniform.color_c[3], 0.7);
        assert_eq!(uniform.view_p[3], 7.0);
        // View vector is normalized on packing.
        assert!((uniform.view_p[2] - 1.0).abs() < 1e-6);
        assert_eq!(std::mem::size_of::<GlowUniform>(), 32);
    }

    #[test]
    fn test_uniform_alignment() {
        assert_eq!(std::mem::size_of::<SurfaceUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<AtmosphereUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<GlowUniform>() % 16, 0);
    }
}
