//! Provider JSON payloads and their narrowing into domain snapshots.

use crate::compute::domain::{
    Compartment, CompartmentId, CompartmentLifecycleState, ComputeInstance, ComputeInstanceData,
    InstanceId, RegionId, ShapeConfig,
};
use crate::compute::ports::{ProviderError, ProviderErrorKind, ProviderResult};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// `Compartment` as returned by the identity service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompartmentPayload {
    id: String,
    #[serde(default)]
    compartment_id: Option<String>,
    name: String,
    #[serde(default)]
    description: Option<String>,
    lifecycle_state: String,
    #[serde(default)]
    time_created: Option<DateTime<Utc>>,
}

impl CompartmentPayload {
    /// Narrows the payload. A compartment that names itself, or nothing, as
    /// its parent is the tenancy root.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidResponse` error for an empty identifier.
    pub fn into_domain(self) -> ProviderResult<Compartment> {
        let id = CompartmentId::new(&self.id).map_err(|err| invalid_response(&err))?;
        let parent_id = self
            .compartment_id
            .filter(|parent| !parent.is_empty() && *parent != self.id)
            .map(|parent| CompartmentId::new(parent).map_err(|err| invalid_response(&err)))
            .transpose()?;

        let mut compartment = Compartment::new(
            id,
            self.name,
            parent_id,
            CompartmentLifecycleState::from(self.lifecycle_state),
        );
        if let Some(description) = self.description.filter(|text| !text.is_empty()) {
            compartment = compartment.with_description(description);
        }
        if let Some(time_created) = self.time_created {
            compartment = compartment.with_time_created(time_created);
        }
        Ok(compartment)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShapeConfigPayload {
    #[serde(default)]
    ocpus: Option<f32>,
    #[serde(default, rename = "memoryInGBs")]
    memory_in_gbs: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceDetailsPayload {
    #[serde(default)]
    image_id: Option<String>,
}

/// `Instance` as returned by the compute service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePayload {
    id: String,
    display_name: String,
    compartment_id: String,
    shape: String,
    lifecycle_state: String,
    availability_domain: String,
    time_created: DateTime<Utc>,
    #[serde(default)]
    fault_domain: Option<String>,
    #[serde(default)]
    image_id: Option<String>,
    #[serde(default)]
    source_details: Option<SourceDetailsPayload>,
    #[serde(default)]
    launch_mode: Option<String>,
    #[serde(default)]
    shape_config: Option<ShapeConfigPayload>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

impl InstancePayload {
    /// Narrows the payload to an instance hosted in `region`.
    ///
    /// The payload's own `region` field is a short key for some regions, so
    /// the client's region is used instead.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidResponse` error for empty identifiers.
    pub fn into_domain(self, region: &RegionId) -> ProviderResult<ComputeInstance> {
        let mut instance = ComputeInstance::new(ComputeInstanceData {
            id: InstanceId::new(&self.id).map_err(|err| invalid_response(&err))?,
            display_name: self.display_name,
            compartment_id: CompartmentId::new(&self.compartment_id)
                .map_err(|err| invalid_response(&err))?,
            region: region.clone(),
            shape: self.shape,
            lifecycle_state: self.lifecycle_state.into(),
            availability_domain: self.availability_domain,
            time_created: self.time_created,
        });

        if let Some(fault_domain) = self.fault_domain {
            instance = instance.with_fault_domain(fault_domain);
        }
        let image_id = self
            .image_id
            .or_else(|| self.source_details.and_then(|source| source.image_id));
        if let Some(image) = image_id {
            instance = instance.with_image_id(image);
        }
        if let Some(launch_mode) = self.launch_mode {
            instance = instance.with_launch_mode(launch_mode);
        }
        if let Some(shape_config) = self.shape_config {
            instance = instance.with_shape_config(ShapeConfig {
                ocpus: shape_config.ocpus,
                memory_in_gbs: shape_config.memory_in_gbs,
            });
        }
        for (key, value) in self.metadata {
            instance = instance.with_metadata(key, value);
        }
        Ok(instance)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Maps an unsuccessful response to a provider error.
///
/// The service's `{code, message}` body is kept verbatim when present;
/// otherwise the status line stands in for both.
#[must_use]
pub fn error_from_response(status: StatusCode, body: &str) -> ProviderError {
    let payload = serde_json::from_str::<ErrorPayload>(body).ok();
    let (reported_code, reported_message) =
        payload.map_or((None, None), |parsed| (parsed.code, parsed.message));

    let reason = status.canonical_reason().unwrap_or("Unknown");
    let code = reported_code.unwrap_or_else(|| reason.replace(' ', ""));
    let message = reported_message.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            format!("{} {reason}", status.as_u16())
        } else {
            trimmed.to_owned()
        }
    });
    ProviderError::new(classify(status, &code), code, message)
}

fn classify(status: StatusCode, code: &str) -> ProviderErrorKind {
    if code == "IncorrectState" || status == StatusCode::CONFLICT {
        return ProviderErrorKind::Conflict;
    }
    match status {
        StatusCode::NOT_FOUND => ProviderErrorKind::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderErrorKind::NotAuthorized,
        StatusCode::TOO_MANY_REQUESTS => ProviderErrorKind::Throttled,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            ProviderErrorKind::Unavailable
        }
        other if other.is_client_error() => ProviderErrorKind::InvalidRequest,
        _ => ProviderErrorKind::Internal,
    }
}

fn invalid_response(err: &impl fmt::Display) -> ProviderError {
    ProviderError::new(
        ProviderErrorKind::Internal,
        "InvalidResponse",
        format!("unexpected provider payload: {err}"),
    )
}
