//! Uniform success and error envelope.

use crate::compute::domain::ValidationError;
use crate::compute::services::ComputeServiceError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Machine-matchable failure class of a [`ToolResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credential, tenancy or region configuration is unusable.
    Configuration,
    /// The resource does not exist or a name matched nothing.
    NotFound,
    /// A tool argument is malformed.
    InvalidArgument,
    /// The provider rejected or failed the request.
    ServiceError,
}

impl ErrorKind {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::NotFound => "not_found",
            Self::InvalidArgument => "invalid_argument",
            Self::ServiceError => "service_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Envelope every tool returns.
///
/// Successful results carry `data`; failures carry `errorKind` and
/// `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ToolResult {
    const fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error_kind: None,
            message: None,
        }
    }

    const fn failure(error_kind: ErrorKind, message: String) -> Self {
        Self {
            ok: false,
            data: None,
            error_kind: Some(error_kind),
            message: Some(message),
        }
    }

    /// Returns whether the call succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.ok
    }

    /// Returns the result payload of a successful call.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Returns the failure class of a failed call.
    #[must_use]
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    /// Returns the human-readable failure message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Serializes the envelope as one line of JSON.
    #[must_use]
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"ok":false,"errorKind":"service_error","message":"failed to serialize tool result"}"#
                .to_owned()
        })
    }
}

/// Translates service results into [`ToolResult`] envelopes.
///
/// This is the only place internal failures become envelope failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Wraps a service result.
    ///
    /// Success values are serialized into `data` unchanged in structure.
    /// Provider messages are kept verbatim.
    #[must_use]
    pub fn wrap<T: Serialize>(result: Result<T, ComputeServiceError>) -> ToolResult {
        match result {
            Ok(value) => match serde_json::to_value(value) {
                Ok(data) => ToolResult::success(data),
                Err(err) => ToolResult::failure(
                    ErrorKind::ServiceError,
                    format!("failed to serialize result: {err}"),
                ),
            },
            Err(err) => ToolResult::failure(Self::classify(&err), err.to_string()),
        }
    }

    /// Returns the envelope failure class for a service error.
    #[must_use]
    pub const fn classify(error: &ComputeServiceError) -> ErrorKind {
        match error {
            ComputeServiceError::Config(_) | ComputeServiceError::Region(_) => {
                ErrorKind::Configuration
            }
            ComputeServiceError::NotFound { .. } => ErrorKind::NotFound,
            ComputeServiceError::Validation(_) => ErrorKind::InvalidArgument,
            ComputeServiceError::Service(_) => ErrorKind::ServiceError,
        }
    }
}

impl From<ValidationError> for ToolResult {
    fn from(error: ValidationError) -> Self {
        ResponseNormalizer::wrap::<()>(Err(error.into()))
    }
}
