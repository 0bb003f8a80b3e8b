//! Port contracts for the cloud provider.

mod connector;
mod provider;

pub use connector::ProviderConnector;
pub use provider::{Page, ProviderClient, ProviderError, ProviderErrorKind, ProviderResult};
