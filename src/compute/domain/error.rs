//! Error types for compute domain validation.

use thiserror::Error;

/// Errors raised when tool arguments fail validation.
///
/// Every variant is detected before any provider call is issued.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A provider identifier is empty after trimming.
    #[error("{kind} identifier must not be empty")]
    EmptyIdentifier {
        /// Kind of resource the identifier names.
        kind: &'static str,
    },

    /// A display name used for lookup is empty after trimming.
    #[error("{kind} name must not be empty")]
    EmptyName {
        /// Kind of resource the name refers to.
        kind: &'static str,
    },

    /// The lifecycle action is not one of the supported actions.
    #[error("invalid action '{0}'; valid actions are START, STOP, RESTART, RESET")]
    UnknownAction(String),

    /// No tool is registered under the requested name.
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    /// Tool arguments did not match the tool's parameter structure.
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments {
        /// Tool name.
        tool: String,
        /// Decoder diagnostic.
        reason: String,
    },
}

/// Errors raised while selecting or constructing a regional client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegionError {
    /// The region code is not syntactically valid.
    #[error("invalid region identifier '{0}' (expected a code such as 'us-ashburn-1')")]
    InvalidRegion(String),

    /// The provider client for a region could not be constructed.
    #[error("failed to create client for region {region}: {message}")]
    Connect {
        /// Region the client was requested for.
        region: String,
        /// Provider diagnostic text.
        message: String,
    },

    /// The client cache could not be accessed.
    #[error("region client cache unavailable: {0}")]
    PoolUnavailable(String),
}
