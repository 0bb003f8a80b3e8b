//! Adapter implementations of the provider ports.
//!
//! [`oci`] talks to the live services; [`memory`] serves a local tenancy.

pub mod memory;
pub mod oci;
