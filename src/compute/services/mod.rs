//! Routing, lookup and action services for the compute tool surface.

mod actions;
mod client_pool;
mod compartments;
mod error;
mod instances;
mod pagination;

pub use actions::InstanceActionExecutor;
pub use client_pool::RegionClientPool;
pub use compartments::CompartmentResolver;
pub use error::{ComputeServiceError, ComputeServiceResult, ResourceKind};
pub use instances::InstanceQueryEngine;
pub use pagination::drain_pages;
