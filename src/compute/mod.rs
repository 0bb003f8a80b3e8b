//! Compartment and compute-instance management for OCI Compute Tools.
//!
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Provider contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Routing and query services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
