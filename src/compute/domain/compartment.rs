//! Compartment snapshot value.

use super::CompartmentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a compartment.
///
/// States the provider introduces after this crate was written are kept
/// verbatim in [`CompartmentLifecycleState::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompartmentLifecycleState {
    /// Compartment is being created.
    Creating,
    /// Compartment is usable.
    Active,
    /// Compartment exists but is not usable.
    Inactive,
    /// Compartment is being deleted.
    Deleting,
    /// Compartment has been deleted.
    Deleted,
    /// State not known to this crate.
    Unknown(String),
}

impl CompartmentLifecycleState {
    /// Returns the provider representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Creating => "CREATING",
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Deleting => "DELETING",
            Self::Deleted => "DELETED",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns whether the compartment is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<&str> for CompartmentLifecycleState {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "CREATING" => Self::Creating,
            "ACTIVE" => Self::Active,
            "INACTIVE" => Self::Inactive,
            "DELETING" => Self::Deleting,
            "DELETED" => Self::Deleted,
            _ => Self::Unknown(value.to_owned()),
        }
    }
}

impl From<String> for CompartmentLifecycleState {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<CompartmentLifecycleState> for String {
    fn from(value: CompartmentLifecycleState) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for CompartmentLifecycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Snapshot of a compartment as reported by the provider.
///
/// Compartments form a tree rooted at the tenancy; only the root has no
/// parent. Names are not unique across the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compartment {
    id: CompartmentId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parent_id: Option<CompartmentId>,
    lifecycle_state: CompartmentLifecycleState,
    #[serde(default)]
    time_created: Option<DateTime<Utc>>,
}

impl Compartment {
    /// Creates a compartment snapshot.
    #[must_use]
    pub fn new(
        id: CompartmentId,
        name: impl Into<String>,
        parent_id: Option<CompartmentId>,
        lifecycle_state: CompartmentLifecycleState,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            parent_id,
            lifecycle_state,
            time_created: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn with_time_created(mut self, time_created: DateTime<Utc>) -> Self {
        self.time_created = Some(time_created);
        self
    }

    /// Returns the compartment identifier.
    #[must_use]
    pub const fn id(&self) -> &CompartmentId {
        &self.id
    }

    /// Returns the compartment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the parent identifier, `None` for the tenancy root.
    #[must_use]
    pub const fn parent_id(&self) -> Option<&CompartmentId> {
        self.parent_id.as_ref()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn lifecycle_state(&self) -> &CompartmentLifecycleState {
        &self.lifecycle_state
    }

    /// Returns the creation timestamp, if reported.
    #[must_use]
    pub const fn time_created(&self) -> Option<DateTime<Utc>> {
        self.time_created
    }

    /// Returns whether this is the tenancy root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
