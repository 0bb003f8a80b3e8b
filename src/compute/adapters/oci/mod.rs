//! Live provider adapter over the signed REST APIs.
//!
//! [`OciConnector`] builds one [`OciRegionClient`] per region. Each client
//! talks to that region's identity and compute endpoints and signs every
//! request with the credential context's key. Service error bodies are
//! mapped into [`ProviderError`](crate::compute::ports::ProviderError) kinds
//! with the service's code and message kept verbatim.

mod client;
mod signer;
mod wire;

pub use client::{DEFAULT_REALM_DOMAIN, OciConnector, OciEndpoints, OciRegionClient};
pub use signer::{RequestSigner, SignableRequest, SignedHeaders};
pub use wire::error_from_response;
