//! Instance listing, fetch and name lookup.

use super::{ComputeServiceError, ComputeServiceResult, ResourceKind, drain_pages};
use crate::compute::{
    domain::{CompartmentId, ComputeInstance, InstanceId, ValidationError},
    ports::ProviderClient,
};

/// Queries compute instances through a regional client.
///
/// The engine only talks to the client it is given. Covering several regions
/// means one call per region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstanceQueryEngine;

impl InstanceQueryEngine {
    /// Creates a query engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Lists every instance in a compartment.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeServiceError::Service`] for provider failures.
    pub async fn list<P>(
        &self,
        client: &P,
        compartment_id: &CompartmentId,
    ) -> ComputeServiceResult<Vec<ComputeInstance>>
    where
        P: ProviderClient + ?Sized,
    {
        let instances = drain_pages(|page| async move {
            client.list_instances(compartment_id, page.as_deref()).await
        })
        .await?;
        Ok(instances)
    }

    /// Fetches one instance with its detail fields.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeServiceError::NotFound`] when the provider reports
    /// the instance absent and [`ComputeServiceError::Service`] otherwise.
    pub async fn get<P>(
        &self,
        client: &P,
        instance_id: &InstanceId,
    ) -> ComputeServiceResult<ComputeInstance>
    where
        P: ProviderClient + ?Sized,
    {
        client.get_instance(instance_id).await.map_err(|err| {
            ComputeServiceError::from_lookup(err, ResourceKind::Instance, instance_id.as_str())
        })
    }

    /// Finds the first listed instance whose display name equals `name`
    /// exactly.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeServiceError::Validation`] for an empty name,
    /// [`ComputeServiceError::NotFound`] when nothing matches, and
    /// [`ComputeServiceError::Service`] for provider failures.
    pub async fn find_by_name<P>(
        &self,
        client: &P,
        compartment_id: &CompartmentId,
        name: &str,
    ) -> ComputeServiceResult<ComputeInstance>
    where
        P: ProviderClient + ?Sized,
    {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName {
                kind: ResourceKind::Instance.as_str(),
            }
            .into());
        }

        self.list(client, compartment_id)
            .await?
            .into_iter()
            .find(|instance| instance.display_name() == name)
            .ok_or_else(|| {
                ComputeServiceError::not_found(
                    ResourceKind::Instance,
                    name,
                    format!("instance '{name}' not found in compartment '{compartment_id}'"),
                )
            })
    }
}
