//! Domain model for compartments, compute instances and lifecycle actions.
//!
//! Values in this module are read-only snapshots of remote provider state.
//! They carry only the fields the tool surface consumes; wider provider
//! payloads are narrowed at the adapter boundary.

mod action;
mod compartment;
mod error;
mod ids;
mod instance;
mod region;

pub use action::{ActionOutcome, ActionRequest, InstanceAction, ProviderAction};
pub use compartment::{Compartment, CompartmentLifecycleState};
pub use error::{RegionError, ValidationError};
pub use ids::{CompartmentId, InstanceId};
pub use instance::{ComputeInstance, ComputeInstanceData, InstanceLifecycleState, ShapeConfig};
pub use region::RegionId;
