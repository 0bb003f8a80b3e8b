//! Deterministic in-memory provider.
//!
//! [`InMemoryCloud`] models a tenancy's compartment tree and per-region
//! instances, including pagination and asynchronous lifecycle transitions.
//! It records every request so tests can assert routing and call counts.
//! [`TenancySnapshot`] loads such a cloud from JSON.

mod cloud;
mod snapshot;

pub use cloud::{
    InMemoryCloud, InMemoryConnector, InMemoryRegionClient, ProviderOperation, ProviderRequest,
};
pub use snapshot::{SnapshotError, TenancySnapshot};
