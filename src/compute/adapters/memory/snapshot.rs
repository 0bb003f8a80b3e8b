//! JSON tenancy snapshots for the in-memory provider.
//!
//! ```json
//! {
//!   "tenancy": { "id": "ocid1.tenancy.oc1..root", "name": "acme" },
//!   "compartments": [
//!     { "id": "ocid1.compartment.oc1..prod", "name": "prod" },
//!     { "id": "ocid1.compartment.oc1..web", "name": "web",
//!       "parent_id": "ocid1.compartment.oc1..prod" }
//!   ],
//!   "instances": [
//!     { "id": "ocid1.instance.oc1.iad..web1", "display_name": "web-1",
//!       "compartment_id": "ocid1.compartment.oc1..web", "region": "us-ashburn-1",
//!       "shape": "VM.Standard.E4.Flex", "lifecycle_state": "RUNNING",
//!       "availability_domain": "Uocm:US-ASHBURN-AD-1" }
//!   ]
//! }
//! ```
//!
//! Compartments without `parent_id` sit directly under the tenancy and
//! default to `ACTIVE`. Instances without `time_created` are stamped with the
//! supplied clock.

use super::InMemoryCloud;
use crate::compute::{
    domain::{
        Compartment, CompartmentId, CompartmentLifecycleState, ComputeInstance,
        ComputeInstanceData, InstanceId, InstanceLifecycleState, RegionError, RegionId,
        ShapeConfig, ValidationError,
    },
    ports::ProviderError,
};
use crate::fs;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io;
use thiserror::Error;

/// Errors raised while loading a tenancy snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read.
    #[error("failed to read tenancy snapshot {path}: {source}")]
    Io {
        /// Snapshot path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The snapshot is not valid JSON for the expected layout.
    #[error("failed to parse tenancy snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    /// An identifier in the snapshot is empty.
    #[error("invalid tenancy snapshot: {0}")]
    InvalidIdentifier(#[from] ValidationError),
    /// A region code in the snapshot is malformed.
    #[error("invalid tenancy snapshot: {0}")]
    InvalidRegion(#[from] RegionError),
    /// The snapshot describes a different tenancy from the credentials.
    #[error("tenancy snapshot is for {snapshot} but the profile names {configured}")]
    TenancyMismatch {
        /// Tenancy declared by the snapshot.
        snapshot: String,
        /// Tenancy resolved from the profile.
        configured: String,
    },
    /// The in-memory cloud rejected the data.
    #[error("failed to populate in-memory cloud: {0}")]
    Populate(#[from] ProviderError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotTenancy {
    id: String,
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotCompartment {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    lifecycle_state: Option<String>,
    #[serde(default)]
    time_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotInstance {
    id: String,
    display_name: String,
    compartment_id: String,
    region: String,
    shape: String,
    lifecycle_state: String,
    availability_domain: String,
    #[serde(default)]
    time_created: Option<DateTime<Utc>>,
    #[serde(default)]
    fault_domain: Option<String>,
    #[serde(default)]
    image_id: Option<String>,
    #[serde(default)]
    launch_mode: Option<String>,
    #[serde(default)]
    shape_config: Option<ShapeConfig>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

/// Declarative description of a tenancy.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenancySnapshot {
    tenancy: SnapshotTenancy,
    #[serde(default)]
    compartments: Vec<SnapshotCompartment>,
    #[serde(default)]
    instances: Vec<SnapshotInstance>,
}

impl TenancySnapshot {
    /// Parses a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] for malformed JSON.
    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads and parses a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] when the file cannot be read and
    /// [`SnapshotError::Parse`] for malformed JSON.
    pub fn load(path: &Utf8Path) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Returns the tenancy identifier declared by the snapshot.
    #[must_use]
    pub fn tenancy_id(&self) -> &str {
        &self.tenancy.id
    }

    /// Checks that the snapshot describes `tenancy_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::TenancyMismatch`] when the identifiers differ.
    pub fn ensure_tenancy(&self, tenancy_id: &CompartmentId) -> Result<(), SnapshotError> {
        if self.tenancy.id == tenancy_id.as_str() {
            return Ok(());
        }
        Err(SnapshotError::TenancyMismatch {
            snapshot: self.tenancy.id.clone(),
            configured: tenancy_id.to_string(),
        })
    }

    /// Builds an in-memory cloud serving the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] for empty identifiers or malformed regions.
    pub fn into_cloud(self, clock: &impl Clock) -> Result<InMemoryCloud, SnapshotError> {
        let tenancy_id = CompartmentId::new(&self.tenancy.id)?;
        let cloud = InMemoryCloud::new(tenancy_id.clone(), self.tenancy.name);

        for entry in self.compartments {
            let parent_id = match entry.parent_id {
                Some(parent) => CompartmentId::new(parent)?,
                None => tenancy_id.clone(),
            };
            let state = entry
                .lifecycle_state
                .map_or(CompartmentLifecycleState::Active, CompartmentLifecycleState::from);
            let mut compartment =
                Compartment::new(CompartmentId::new(entry.id)?, entry.name, Some(parent_id), state);
            if let Some(description) = entry.description {
                compartment = compartment.with_description(description);
            }
            if let Some(created) = entry.time_created {
                compartment = compartment.with_time_created(created);
            }
            cloud.add_compartment(compartment)?;
        }

        for entry in self.instances {
            cloud.add_instance(build_instance(entry, clock)?)?;
        }

        Ok(cloud)
    }
}

fn build_instance(
    entry: SnapshotInstance,
    clock: &impl Clock,
) -> Result<ComputeInstance, SnapshotError> {
    let mut instance = ComputeInstance::new(ComputeInstanceData {
        id: InstanceId::new(entry.id)?,
        display_name: entry.display_name,
        compartment_id: CompartmentId::new(entry.compartment_id)?,
        region: RegionId::new(entry.region)?,
        shape: entry.shape,
        lifecycle_state: InstanceLifecycleState::from(entry.lifecycle_state),
        availability_domain: entry.availability_domain,
        time_created: entry.time_created.unwrap_or_else(|| clock.utc()),
    });
    if let Some(fault_domain) = entry.fault_domain {
        instance = instance.with_fault_domain(fault_domain);
    }
    if let Some(image_id) = entry.image_id {
        instance = instance.with_image_id(image_id);
    }
    if let Some(launch_mode) = entry.launch_mode {
        instance = instance.with_launch_mode(launch_mode);
    }
    if let Some(shape_config) = entry.shape_config {
        instance = instance.with_shape_config(shape_config);
    }
    for (key, value) in entry.metadata {
        instance = instance.with_metadata(key, value);
    }
    Ok(instance)
}
