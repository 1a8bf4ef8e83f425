//! Typed failures for the config load/save path.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while persisting or restoring `config.ron`.
///
/// Filesystem variants carry the offending path so startup messages can point
/// at the exact file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file or its directory could not be read or written.
    #[error("config io failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid RON for this config shape.
    #[error("config at {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// The in-memory config could not be rendered as RON.
    #[error("config serialization failed: {0}")]
    Serialize(#[from] ron::Error),
}
