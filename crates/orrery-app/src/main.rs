//! The binary entry point for the Orrery planet viewer.

mod renderer;
mod window;

use std::path::PathBuf;

use clap::Parser;

use orrery_config::{CliArgs, Config, ConfigSource};

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(|| dirs::config_dir().map(|d| d.join("orrery")))
        .unwrap_or_else(|| PathBuf::from(".orrery"));

    // Logging is not up yet, so load_or_create reports how it resolved and
    // the outcome is logged once the subscriber is installed.
    let (mut config, config_source) = match Config::load_or_create(&config_dir) {
        Ok((config, source)) => (config, Some(source)),
        Err(e) => {
            eprintln!("Config unavailable ({e}), continuing with defaults");
            (Config::default(), None)
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = dirs::data_dir()
        .map(|d| d.join("orrery").join("logs"))
        .unwrap_or_else(|| config_dir.join("logs"));
    orrery_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match config_source {
        Some(ConfigSource::Loaded) => {
            tracing::info!(config_dir = %config_dir.display(), "loaded config")
        }
        Some(ConfigSource::CreatedDefault) => {
            tracing::info!(config_dir = %config_dir.display(), "created default config")
        }
        None => tracing::warn!("running on built-in default config"),
    }

    tracing::info!("starting orrery");
    window::run_with_config(config);
}
