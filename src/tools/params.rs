//! Fixed parameter structures, one per tool.

use crate::compute::domain::ValidationError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Names of the tools this crate serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// `list_compartments`
    ListCompartments,
    /// `get_compartment_by_name`
    GetCompartmentByName,
    /// `list_compute_instances`
    ListComputeInstances,
    /// `get_compute_instance`
    GetComputeInstance,
    /// `get_compute_instance_by_name`
    GetComputeInstanceByName,
    /// `compute_instance_action`
    ComputeInstanceAction,
}

impl ToolName {
    /// Every tool in registration order.
    pub const ALL: [Self; 6] = [
        Self::ListCompartments,
        Self::GetCompartmentByName,
        Self::ListComputeInstances,
        Self::GetComputeInstance,
        Self::GetComputeInstanceByName,
        Self::ComputeInstanceAction,
    ];

    /// Returns the registered tool name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListCompartments => "list_compartments",
            Self::GetCompartmentByName => "get_compartment_by_name",
            Self::ListComputeInstances => "list_compute_instances",
            Self::GetComputeInstance => "get_compute_instance",
            Self::GetComputeInstanceByName => "get_compute_instance_by_name",
            Self::ComputeInstanceAction => "compute_instance_action",
        }
    }

    /// Decodes raw JSON arguments into this tool's parameter structure.
    ///
    /// `null` is accepted as an empty argument object.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidArguments`] when the arguments do
    /// not match the structure.
    pub fn decode<T: DeserializeOwned>(self, arguments: Value) -> Result<T, ValidationError> {
        let object = if arguments.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            arguments
        };
        serde_json::from_value(object).map_err(|err| ValidationError::InvalidArguments {
            tool: self.as_str().to_owned(),
            reason: err.to_string(),
        })
    }
}

impl FromStr for ToolName {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownTool(value.to_owned()))
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Treats an absent or blank region argument as the default region.
fn requested(region: Option<&str>) -> Option<&str> {
    region
        .map(str::trim)
        .filter(|code| !code.is_empty())
}

/// Parameters of `list_compartments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListCompartmentsParams {}

/// Parameters of `get_compartment_by_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetCompartmentByNameParams {
    /// Exact, case-sensitive compartment name.
    pub compartment_name: String,
}

/// Parameters of `list_compute_instances`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListComputeInstancesParams {
    /// Exact, case-sensitive compartment name.
    pub compartment_name: String,
    /// Region to list in; the default region when absent.
    #[serde(default)]
    pub region: Option<String>,
}

impl ListComputeInstancesParams {
    /// Returns the requested region, `None` for the default region.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        requested(self.region.as_deref())
    }
}

/// Parameters of `get_compute_instance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetComputeInstanceParams {
    /// Instance identifier.
    pub instance_id: String,
    /// Region hosting the instance; the default region when absent.
    #[serde(default)]
    pub region: Option<String>,
}

impl GetComputeInstanceParams {
    /// Returns the requested region, `None` for the default region.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        requested(self.region.as_deref())
    }
}

/// Parameters of `get_compute_instance_by_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetComputeInstanceByNameParams {
    /// Exact, case-sensitive instance display name.
    pub instance_name: String,
    /// Exact, case-sensitive compartment name.
    pub compartment_name: String,
    /// Region to search in; the default region when absent.
    #[serde(default)]
    pub region: Option<String>,
}

impl GetComputeInstanceByNameParams {
    /// Returns the requested region, `None` for the default region.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        requested(self.region.as_deref())
    }
}

/// Parameters of `compute_instance_action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComputeInstanceActionParams {
    /// Instance identifier.
    pub instance_id: String,
    /// One of `START`, `STOP`, `RESTART`, `RESET`.
    pub action: String,
    /// Region hosting the instance; the default region when absent.
    #[serde(default)]
    pub region: Option<String>,
}

impl ComputeInstanceActionParams {
    /// Returns the requested region, `None` for the default region.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        requested(self.region.as_deref())
    }
}
