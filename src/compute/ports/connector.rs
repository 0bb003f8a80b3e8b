//! Port for constructing regional provider clients.

use super::{ProviderClient, ProviderResult};
use crate::compute::domain::RegionId;
use crate::config::CredentialContext;
use async_trait::async_trait;

/// Builds provider clients from a credential context.
///
/// Construction may perform I/O (endpoint discovery, credential checks). The
/// region client pool calls it at most once per region.
#[async_trait]
pub trait ProviderConnector: Send + Sync {
    /// Client type produced for a region.
    type Client: ProviderClient + 'static;

    /// Constructs a client for `region`.
    async fn connect(
        &self,
        context: &CredentialContext,
        region: &RegionId,
    ) -> ProviderResult<Self::Client>;
}
