//! Service-level error taxonomy.

use crate::compute::{
    domain::{RegionError, ValidationError},
    ports::ProviderError,
};
use crate::config::ConfigError;
use std::fmt;
use thiserror::Error;

/// Kind of resource a lookup targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A compartment, including the tenancy root.
    Compartment,
    /// A compute instance.
    Instance,
}

impl ResourceKind {
    /// Returns the lowercase label used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compartment => "compartment",
            Self::Instance => "instance",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors returned by compute services.
#[derive(Debug, Error)]
pub enum ComputeServiceError {
    /// The credential context is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The region is invalid or its client could not be built.
    #[error(transparent)]
    Region(#[from] RegionError),
    /// The resource is absent or a name lookup matched nothing.
    #[error("{message}")]
    NotFound {
        /// Kind of resource looked up.
        kind: ResourceKind,
        /// Identifier or name that was looked up.
        key: String,
        /// Human-readable message, including provider text when available.
        message: String,
    },
    /// A tool argument is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Any other provider failure.
    #[error(transparent)]
    Service(#[from] ProviderError),
}

/// Result type for compute service operations.
pub type ComputeServiceResult<T> = Result<T, ComputeServiceError>;

impl ComputeServiceError {
    /// Creates a not-found error for a lookup that matched nothing.
    #[must_use]
    pub fn not_found(
        kind: ResourceKind,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
            message: message.into(),
        }
    }

    /// Classifies a provider failure from a direct lookup.
    ///
    /// Absence becomes [`ComputeServiceError::NotFound`] with the provider
    /// text appended; everything else stays a service error.
    #[must_use]
    pub fn from_lookup(error: ProviderError, kind: ResourceKind, key: &str) -> Self {
        if error.is_not_found() {
            let message = format!("{kind} '{key}' not found: {}", error.message());
            return Self::not_found(kind, key, message);
        }
        Self::Service(error)
    }
}
