//! Compartment and compute-instance tools for an automated agent.
//!
//! The crate resolves one credential context at startup, routes each call to
//! a lazily constructed regional provider client, and normalizes results and
//! failures into a single [`tools::ToolResult`] envelope.
//!
//! # Architecture
//!
//! The compute module follows hexagonal architecture principles:
//!
//! - **Domain**: identifiers, compartments, instances and lifecycle actions
//! - **Ports**: the regional provider client and its connector
//! - **Adapters**: a signed REST client for the live identity and compute
//!   services, and an in-memory provider that can be loaded from a JSON
//!   tenancy snapshot
//! - **Services**: the region client pool, compartment resolution, instance
//!   queries and action submission
//!
//! # Modules
//!
//! - [`config`]: provider config files, environment overrides and the
//!   credential context
//! - [`compute`]: the compute domain and its services
//! - [`tools`]: tool parameters, definitions, dispatch and the result
//!   envelope

pub mod compute;
pub mod config;
mod fs;
pub mod tools;
