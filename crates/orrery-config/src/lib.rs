//! Configuration system for the Orrery planet viewer.
//!
//! Provides runtime-configurable settings that persist to disk as RON files,
//! with CLI overrides via clap and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AssetConfig, CameraConfig, Config, ConfigSource, DebugConfig, PlanetConfig, WindowConfig,
};
pub use error::ConfigError;
