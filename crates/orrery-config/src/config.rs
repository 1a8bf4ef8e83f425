//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Camera orbit settings.
    pub camera: CameraConfig,
    /// Planet geometry and glow settings.
    pub planet: PlanetConfig,
    /// Asset locations.
    pub assets: AssetConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

/// Camera orbit configuration.
///
/// When `auto_orbit` is false the camera is left to user-driven orbit input
/// and the controller performs no per-frame writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Drive the camera on a programmatic orbit around the planet.
    pub auto_orbit: bool,
    /// Angular step per frame, in radians.
    pub orbit_step: f32,
    /// Orbit ellipse radius along the X axis.
    pub orbit_radius_x: f32,
    /// Orbit ellipse radius along the Z axis.
    pub orbit_radius_z: f32,
}

/// Planet geometry and glow configuration.
///
/// Radii must be strictly increasing (surface < atmosphere < glow); the scene
/// builder validates this at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Surface sphere radius.
    pub surface_radius: f32,
    /// Atmosphere shell radius.
    pub atmosphere_radius: f32,
    /// Cloud layer opacity (0.0 - 1.0).
    pub atmosphere_opacity: f32,
    /// Glow shell radius.
    pub glow_radius: f32,
    /// Glow base constant `c` in the rim intensity formula.
    pub glow_intensity: f32,
    /// Glow falloff exponent `p` in the rim intensity formula.
    pub glow_fade: f32,
    /// Glow color in linear RGB.
    pub glow_color: [f32; 3],
}

/// Asset locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory containing the planet and starfield bitmaps.
    pub texture_dir: PathBuf,
    /// Path to the TTF font used for the floating label.
    pub font_path: PathBuf,
    /// Text rendered by the floating label.
    pub label_text: String,
    /// Seed for the procedural starfield fallback.
    pub starfield_seed: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log frame statistics periodically.
    pub log_frame_stats: bool,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            auto_orbit: true,
            orbit_step: 0.002,
            orbit_radius_x: 1.0,
            orbit_radius_z: 5.0,
        }
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            surface_radius: 0.5,
            atmosphere_radius: 0.503,
            atmosphere_opacity: 0.8,
            glow_radius: 0.523,
            glow_intensity: 0.7,
            glow_fade: 7.0,
            // #93cfef, a pale sky blue
            glow_color: [0.576, 0.812, 0.937],
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("assets/textures"),
            font_path: PathBuf::from("assets/fonts/helvetiker_regular.ttf"),
            label_text: "Hello World!".to_string(),
            starfield_seed: 42,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_frame_stats: false,
        }
    }
}

// --- Load / Save ---

/// How [`Config::load_or_create`] obtained its result.
///
/// Returned to the caller instead of being logged here, since config loading
/// happens before the logging subscriber is installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// An existing `config.ron` was read.
    Loaded,
    /// No file existed; a default `config.ron` was written.
    CreatedDefault,
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(|source| {
                ConfigError::Io {
                    path: config_path.clone(),
                    source,
                }
            })?;
            let config: Config = ron::from_str(&contents).map_err(|source| {
                ConfigError::Malformed {
                    path: config_path.clone(),
                    source,
                }
            })?;
            Ok((config, ConfigSource::Loaded))
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            Ok((config, ConfigSource::CreatedDefault))
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Io {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Io {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(!ron_str.is_empty());
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("auto_orbit: true"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        // Config missing the `camera` section entirely
        let ron_str = "(window: (), planet: (), assets: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.window.height = 1080;
        config.camera.auto_orbit = false;

        config.save(dir.path()).unwrap();
        let (loaded, source) = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
        assert_eq!(source, ConfigSource::Loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(source, ConfigSource::CreatedDefault);
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_malformed_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "(window: oops").unwrap();

        let err = Config::load_or_create(dir.path()).unwrap_err();
        match err {
            ConfigError::Malformed { path, .. } => assert!(path.ends_with("config.ron")),
            other => panic!("Expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_default_radii_strictly_increasing() {
        let planet = PlanetConfig::default();
        assert!(planet.surface_radius > 0.0);
        assert!(planet.atmosphere_radius > planet.surface_radius);
        assert!(planet.glow_radius > planet.atmosphere_radius);
    }

    #[test]
    fn test_default_orbit_parameters() {
        let camera = CameraConfig::default();
        assert!((camera.orbit_step - 0.002).abs() < 1e-9);
        assert!((camera.orbit_radius_x - 1.0).abs() < 1e-9);
        assert!((camera.orbit_radius_z - 5.0).abs() < 1e-9);
    }
}
