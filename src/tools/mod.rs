//! Tool surface over the compute services.
//!
//! Each tool takes a fixed parameter structure and returns a [`ToolResult`]
//! envelope whether it succeeds or fails. Callers distinguish outcomes by
//! the envelope's `ok` field.

mod definitions;
mod envelope;
mod params;
mod surface;

pub use definitions::{ToolDefinition, tool_definitions};
pub use envelope::{ErrorKind, ResponseNormalizer, ToolResult};
pub use params::{
    ComputeInstanceActionParams, GetCompartmentByNameParams, GetComputeInstanceByNameParams,
    GetComputeInstanceParams, ListCompartmentsParams, ListComputeInstancesParams, ToolName,
};
pub use surface::ComputeTools;
