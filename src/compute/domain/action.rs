//! Lifecycle actions and their outcomes.

use super::{InstanceId, InstanceLifecycleState, RegionError, RegionId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle action accepted by the tool surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceAction {
    /// Power on a stopped instance.
    Start,
    /// Power off a running instance.
    Stop,
    /// Gracefully reboot a running instance.
    Restart,
    /// Hard-reset a running instance.
    Reset,
}

impl InstanceAction {
    /// All supported actions in canonical order.
    pub const ALL: [Self; 4] = [Self::Start, Self::Stop, Self::Restart, Self::Reset];

    /// Returns the canonical tool-facing name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Stop => "STOP",
            Self::Restart => "RESTART",
            Self::Reset => "RESET",
        }
    }

    /// Returns the provider action issued for this tool action.
    #[must_use]
    pub const fn provider_action(self) -> ProviderAction {
        match self {
            Self::Start => ProviderAction::Start,
            Self::Stop => ProviderAction::Stop,
            Self::Restart => ProviderAction::SoftReset,
            Self::Reset => ProviderAction::Reset,
        }
    }
}

impl FromStr for InstanceAction {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownAction(value.to_owned()))
    }
}

impl fmt::Display for InstanceAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Action verb understood by the provider's instance action endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderAction {
    /// `START`
    Start,
    /// `STOP`
    Stop,
    /// `SOFTRESET`
    #[serde(rename = "SOFTRESET")]
    SoftReset,
    /// `RESET`
    Reset,
}

impl ProviderAction {
    /// Returns the provider representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Stop => "STOP",
            Self::SoftReset => "SOFTRESET",
            Self::Reset => "RESET",
        }
    }
}

impl fmt::Display for ProviderAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Validated request to run a lifecycle action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    instance_id: InstanceId,
    action: InstanceAction,
    region: Option<RegionId>,
}

impl ActionRequest {
    /// Creates a request from validated parts.
    #[must_use]
    pub const fn new(
        instance_id: InstanceId,
        action: InstanceAction,
        region: Option<RegionId>,
    ) -> Self {
        Self {
            instance_id,
            action,
            region,
        }
    }

    /// Parses a request from raw tool arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an empty instance id or an unsupported
    /// action.
    pub fn parse(instance_id: &str, action: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(InstanceId::new(instance_id)?, action.parse()?, None))
    }

    /// Targets a specific region instead of the default region.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidRegion`] for malformed codes.
    pub fn in_region(mut self, region: &str) -> Result<Self, RegionError> {
        self.region = Some(RegionId::new(region)?);
        Ok(self)
    }

    /// Returns the target instance.
    #[must_use]
    pub const fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    /// Returns the requested action.
    #[must_use]
    pub const fn action(&self) -> InstanceAction {
        self.action
    }

    /// Returns the target region, `None` for the default region.
    #[must_use]
    pub const fn region(&self) -> Option<&RegionId> {
        self.region.as_ref()
    }
}

/// Result of a lifecycle action the provider accepted.
///
/// `lifecycle_state` is the state reported immediately after submission. The
/// transition completes asynchronously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Target instance.
    pub instance_id: InstanceId,
    /// Display name of the target instance.
    pub instance_name: String,
    /// Tool-facing action.
    pub action: InstanceAction,
    /// Verb sent to the provider.
    pub provider_action: ProviderAction,
    /// State observed before submission.
    pub previous_state: InstanceLifecycleState,
    /// State observed right after submission.
    pub lifecycle_state: InstanceLifecycleState,
    /// Fixed acceptance marker.
    pub status: String,
}
