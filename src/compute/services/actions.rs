//! Lifecycle action submission.

use super::{ComputeServiceError, ComputeServiceResult, InstanceQueryEngine, ResourceKind};
use crate::compute::{
    domain::{ActionOutcome, ActionRequest},
    ports::ProviderClient,
};
use tracing::info;

const ACCEPTED: &str = "accepted";

/// Validates and submits lifecycle actions.
///
/// Submission reports acceptance only. The provider completes the transition
/// asynchronously and callers observe it with later fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstanceActionExecutor {
    queries: InstanceQueryEngine,
}

impl InstanceActionExecutor {
    /// Creates an executor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            queries: InstanceQueryEngine::new(),
        }
    }

    /// Parses raw arguments and submits the action.
    ///
    /// Arguments are validated before any provider call.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeServiceError::Validation`] for an empty id or an
    /// unsupported action, otherwise as [`Self::submit`].
    pub async fn act<P>(
        &self,
        client: &P,
        instance_id: &str,
        action: &str,
    ) -> ComputeServiceResult<ActionOutcome>
    where
        P: ProviderClient + ?Sized,
    {
        let request = ActionRequest::parse(instance_id, action)?;
        self.submit(client, &request).await
    }

    /// Submits a validated action request.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeServiceError::NotFound`] when the instance does not
    /// exist and [`ComputeServiceError::Service`] when the provider rejects
    /// the action, with the provider message preserved.
    pub async fn submit<P>(
        &self,
        client: &P,
        request: &ActionRequest,
    ) -> ComputeServiceResult<ActionOutcome>
    where
        P: ProviderClient + ?Sized,
    {
        let instance_id = request.instance_id();
        let current = self.queries.get(client, instance_id).await?;
        let provider_action = request.action().provider_action();

        info!(
            instance = %instance_id,
            region = %client.region(),
            action = %request.action(),
            provider_action = %provider_action,
            previous_state = %current.lifecycle_state(),
            "submitting instance action"
        );

        let accepted = client
            .instance_action(instance_id, provider_action)
            .await
            .map_err(|err| {
                ComputeServiceError::from_lookup(err, ResourceKind::Instance, instance_id.as_str())
            })?;

        Ok(ActionOutcome {
            instance_id: instance_id.clone(),
            instance_name: current.display_name().to_owned(),
            action: request.action(),
            provider_action,
            previous_state: current.lifecycle_state().clone(),
            lifecycle_state: accepted.lifecycle_state().clone(),
            status: ACCEPTED.to_owned(),
        })
    }
}
