//! Regional provider client port.

use crate::compute::domain::{
    Compartment, CompartmentId, ComputeInstance, InstanceId, ProviderAction, RegionId,
};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Result type for provider client operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// One page of a paginated provider listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Token for the next page, `None` on the last page.
    pub next_page: Option<String>,
}

impl<T> Page<T> {
    /// Creates the final page of a listing.
    #[must_use]
    pub const fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }
}

/// Client bound to one provider region.
///
/// Implementations translate provider payloads into the narrow domain
/// snapshots. Every method is a single provider request; callers own
/// pagination.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Region the client sends requests to.
    fn region(&self) -> &RegionId;

    /// Lists direct child compartments of `parent_id`.
    async fn list_compartments(
        &self,
        parent_id: &CompartmentId,
        page: Option<&str>,
    ) -> ProviderResult<Page<Compartment>>;

    /// Lists every compartment below `root_id` at any depth, in provider
    /// order. Only the tenancy root supports subtree listings.
    async fn list_compartments_in_subtree(
        &self,
        root_id: &CompartmentId,
        page: Option<&str>,
    ) -> ProviderResult<Page<Compartment>>;

    /// Fetches one compartment, including the tenancy root.
    async fn get_compartment(&self, compartment_id: &CompartmentId) -> ProviderResult<Compartment>;

    /// Lists instances in a compartment of this region.
    async fn list_instances(
        &self,
        compartment_id: &CompartmentId,
        page: Option<&str>,
    ) -> ProviderResult<Page<ComputeInstance>>;

    /// Fetches one instance with detail fields.
    async fn get_instance(&self, instance_id: &InstanceId) -> ProviderResult<ComputeInstance>;

    /// Submits a lifecycle action and returns the instance as the provider
    /// reports it on acceptance.
    async fn instance_action(
        &self,
        instance_id: &InstanceId,
        action: ProviderAction,
    ) -> ProviderResult<ComputeInstance>;
}

/// Classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// The resource does not exist or is not visible.
    NotFound,
    /// The caller is not permitted to perform the request.
    NotAuthorized,
    /// The request conflicts with the resource state.
    Conflict,
    /// The request was rate limited.
    Throttled,
    /// The service is temporarily unavailable.
    Unavailable,
    /// The request was rejected as malformed.
    InvalidRequest,
    /// Any other failure.
    Internal,
}

impl ProviderErrorKind {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::NotAuthorized => "not_authorized",
            Self::Conflict => "conflict",
            Self::Throttled => "throttled",
            Self::Unavailable => "unavailable",
            Self::InvalidRequest => "invalid_request",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Failure reported by a provider client.
///
/// `message` is the provider's diagnostic text and is displayed verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    kind: ProviderErrorKind,
    code: String,
    message: String,
}

impl ProviderError {
    /// Creates a provider error.
    #[must_use]
    pub fn new(
        kind: ProviderErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::NotFound, "NotAuthorizedOrNotFound", message)
    }

    /// Creates an invalid-state conflict error.
    #[must_use]
    pub fn incorrect_state(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Conflict, "IncorrectState", message)
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    /// Returns the provider error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the provider diagnostic text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether the provider reported the resource absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ProviderErrorKind::NotFound)
    }
}
