//! Compute instance snapshot value.

use super::{CompartmentId, InstanceId, RegionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle state of a compute instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstanceLifecycleState {
    /// Instance is being provisioned.
    Provisioning,
    /// Instance is running.
    Running,
    /// Instance is starting.
    Starting,
    /// Instance is stopping.
    Stopping,
    /// Instance is stopped.
    Stopped,
    /// A custom image is being taken from the instance.
    CreatingImage,
    /// Instance is terminating.
    Terminating,
    /// Instance has been terminated.
    Terminated,
    /// Instance is moving between compartments.
    Moving,
    /// State not known to this crate, preserved verbatim.
    Unknown(String),
}

impl InstanceLifecycleState {
    /// Returns the provider representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Provisioning => "PROVISIONING",
            Self::Running => "RUNNING",
            Self::Starting => "STARTING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::CreatingImage => "CREATING_IMAGE",
            Self::Terminating => "TERMINATING",
            Self::Terminated => "TERMINATED",
            Self::Moving => "MOVING",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns whether the state is one of the documented states.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for InstanceLifecycleState {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "PROVISIONING" => Self::Provisioning,
            "RUNNING" => Self::Running,
            "STARTING" => Self::Starting,
            "STOPPING" => Self::Stopping,
            "STOPPED" => Self::Stopped,
            "CREATING_IMAGE" => Self::CreatingImage,
            "TERMINATING" => Self::Terminating,
            "TERMINATED" => Self::Terminated,
            "MOVING" => Self::Moving,
            _ => Self::Unknown(value.to_owned()),
        }
    }
}

impl From<String> for InstanceLifecycleState {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<InstanceLifecycleState> for String {
    fn from(value: InstanceLifecycleState) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for InstanceLifecycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// CPU and memory allocation of a flexible shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeConfig {
    /// Number of OCPUs.
    #[serde(default)]
    pub ocpus: Option<f32>,
    /// Memory in gigabytes.
    #[serde(default)]
    pub memory_in_gbs: Option<f32>,
}

/// Snapshot of a compute instance.
///
/// List responses populate the summary fields; the optional detail fields are
/// filled by a direct fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeInstance {
    id: InstanceId,
    display_name: String,
    compartment_id: CompartmentId,
    region: RegionId,
    shape: String,
    lifecycle_state: InstanceLifecycleState,
    availability_domain: String,
    time_created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fault_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    launch_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shape_config: Option<ShapeConfig>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

/// Parameter object carrying the summary fields of an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeInstanceData {
    /// Instance identifier.
    pub id: InstanceId,
    /// Display name.
    pub display_name: String,
    /// Owning compartment.
    pub compartment_id: CompartmentId,
    /// Region hosting the instance.
    pub region: RegionId,
    /// Shape name.
    pub shape: String,
    /// Lifecycle state.
    pub lifecycle_state: InstanceLifecycleState,
    /// Availability domain.
    pub availability_domain: String,
    /// Creation timestamp.
    pub time_created: DateTime<Utc>,
}

impl ComputeInstance {
    /// Creates an instance snapshot from its summary fields.
    #[must_use]
    pub fn new(data: ComputeInstanceData) -> Self {
        Self {
            id: data.id,
            display_name: data.display_name,
            compartment_id: data.compartment_id,
            region: data.region,
            shape: data.shape,
            lifecycle_state: data.lifecycle_state,
            availability_domain: data.availability_domain,
            time_created: data.time_created,
            fault_domain: None,
            image_id: None,
            launch_mode: None,
            shape_config: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Sets the fault domain.
    #[must_use]
    pub fn with_fault_domain(mut self, fault_domain: impl Into<String>) -> Self {
        self.fault_domain = Some(fault_domain.into());
        self
    }

    /// Sets the boot image identifier.
    #[must_use]
    pub fn with_image_id(mut self, image_id: impl Into<String>) -> Self {
        self.image_id = Some(image_id.into());
        self
    }

    /// Sets the launch mode.
    #[must_use]
    pub fn with_launch_mode(mut self, launch_mode: impl Into<String>) -> Self {
        self.launch_mode = Some(launch_mode.into());
        self
    }

    /// Sets the flexible shape configuration.
    #[must_use]
    pub const fn with_shape_config(mut self, shape_config: ShapeConfig) -> Self {
        self.shape_config = Some(shape_config);
        self
    }

    /// Adds one user metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Replaces the lifecycle state.
    #[must_use]
    pub fn with_lifecycle_state(mut self, lifecycle_state: InstanceLifecycleState) -> Self {
        self.lifecycle_state = lifecycle_state;
        self
    }

    /// Returns a copy without the detail-only fields, as a list call reports it.
    #[must_use]
    pub fn summary(&self) -> Self {
        Self {
            fault_domain: None,
            image_id: None,
            launch_mode: None,
            shape_config: None,
            metadata: BTreeMap::new(),
            ..self.clone()
        }
    }

    /// Returns the instance identifier.
    #[must_use]
    pub const fn id(&self) -> &InstanceId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the owning compartment identifier.
    #[must_use]
    pub const fn compartment_id(&self) -> &CompartmentId {
        &self.compartment_id
    }

    /// Returns the hosting region.
    #[must_use]
    pub const fn region(&self) -> &RegionId {
        &self.region
    }

    /// Returns the shape name.
    #[must_use]
    pub fn shape(&self) -> &str {
        &self.shape
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn lifecycle_state(&self) -> &InstanceLifecycleState {
        &self.lifecycle_state
    }

    /// Returns the availability domain.
    #[must_use]
    pub fn availability_domain(&self) -> &str {
        &self.availability_domain
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn time_created(&self) -> DateTime<Utc> {
        self.time_created
    }

    /// Returns the fault domain, if fetched.
    #[must_use]
    pub fn fault_domain(&self) -> Option<&str> {
        self.fault_domain.as_deref()
    }

    /// Returns the boot image identifier, if fetched.
    #[must_use]
    pub fn image_id(&self) -> Option<&str> {
        self.image_id.as_deref()
    }

    /// Returns the launch mode, if fetched.
    #[must_use]
    pub fn launch_mode(&self) -> Option<&str> {
        self.launch_mode.as_deref()
    }

    /// Returns the flexible shape configuration, if fetched.
    #[must_use]
    pub const fn shape_config(&self) -> Option<&ShapeConfig> {
        self.shape_config.as_ref()
    }

    /// Returns user metadata.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}
