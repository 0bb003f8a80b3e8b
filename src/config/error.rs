//! Error types for credential context resolution.

use crate::compute::domain::{RegionError, ValidationError};
use camino::Utf8PathBuf;
use std::io;
use thiserror::Error;

/// Errors raised while loading provider configuration.
///
/// A configuration error makes the whole context unusable, not just one
/// call.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("provider config file not found at {path}")]
    NotFound {
        /// Path that was looked up.
        path: Utf8PathBuf,
    },

    /// The config file could not be read.
    #[error("failed to read provider config from {path}: {source}")]
    Io {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The config file is malformed.
    #[error("failed to parse provider config {path} at line {line}: {reason}")]
    Parse {
        /// Path that was parsed.
        path: Utf8PathBuf,
        /// One-based line number.
        line: usize,
        /// Parser diagnostic.
        reason: String,
    },

    /// The requested profile is not present in the config file.
    #[error("profile '{profile}' not found in {path}")]
    ProfileNotFound {
        /// Profile name.
        profile: String,
        /// Config file path.
        path: Utf8PathBuf,
    },

    /// A required key is absent and no override supplies it.
    #[error("profile '{profile}' is missing required key '{key}'")]
    MissingKey {
        /// Profile name.
        profile: String,
        /// Missing key.
        key: &'static str,
    },

    /// The tenancy identifier is unusable.
    #[error("invalid tenancy identifier: {0}")]
    InvalidTenancy(#[source] ValidationError),

    /// The default region is not a valid region code.
    #[error("invalid default region: {0}")]
    InvalidRegion(#[source] RegionError),

    /// Key or token material could not be loaded.
    #[error("failed to load credential material from {path}: {source}")]
    CredentialMaterial {
        /// Path of the key or token file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
