//! Typed tool entry points and name-based dispatch.

use super::{
    ComputeInstanceActionParams, GetCompartmentByNameParams, GetComputeInstanceByNameParams,
    GetComputeInstanceParams, ListCompartmentsParams, ListComputeInstancesParams,
    ResponseNormalizer, ToolName, ToolResult,
};
use crate::compute::{
    domain::{ActionOutcome, ActionRequest, Compartment, ComputeInstance, InstanceId},
    ports::ProviderConnector,
    services::{
        CompartmentResolver, ComputeServiceResult, InstanceActionExecutor, InstanceQueryEngine,
        RegionClientPool,
    },
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

/// The compute tool surface over one region client pool.
///
/// Compartment names are resolved with the default-region client because
/// compartments are tenancy-wide. Instance calls go to the requested region.
pub struct ComputeTools<C>
where
    C: ProviderConnector,
{
    pool: Arc<RegionClientPool<C>>,
    compartments: CompartmentResolver,
    instances: InstanceQueryEngine,
    actions: InstanceActionExecutor,
}

impl<C> ComputeTools<C>
where
    C: ProviderConnector,
{
    /// Creates the tool surface for the pool's tenancy.
    #[must_use]
    pub fn new(pool: Arc<RegionClientPool<C>>) -> Self {
        let compartments = CompartmentResolver::new(pool.context().tenancy_id().clone());
        Self {
            pool,
            compartments,
            instances: InstanceQueryEngine::new(),
            actions: InstanceActionExecutor::new(),
        }
    }

    /// Returns the shared client pool.
    #[must_use]
    pub const fn pool(&self) -> &Arc<RegionClientPool<C>> {
        &self.pool
    }

    /// `list_compartments`: the root and every active compartment below it.
    pub async fn list_compartments(&self, _params: &ListCompartmentsParams) -> ToolResult {
        ResponseNormalizer::wrap(self.compartment_tree().await)
    }

    /// `get_compartment_by_name`
    pub async fn get_compartment_by_name(&self, params: &GetCompartmentByNameParams) -> ToolResult {
        ResponseNormalizer::wrap(self.compartment_named(&params.compartment_name).await)
    }

    /// `list_compute_instances`
    pub async fn list_compute_instances(&self, params: &ListComputeInstancesParams) -> ToolResult {
        ResponseNormalizer::wrap(self.instances_in(params).await)
    }

    /// `get_compute_instance`
    pub async fn get_compute_instance(&self, params: &GetComputeInstanceParams) -> ToolResult {
        ResponseNormalizer::wrap(self.instance_by_id(params).await)
    }

    /// `get_compute_instance_by_name`
    pub async fn get_compute_instance_by_name(
        &self,
        params: &GetComputeInstanceByNameParams,
    ) -> ToolResult {
        ResponseNormalizer::wrap(self.instance_by_name(params).await)
    }

    /// `compute_instance_action`
    pub async fn compute_instance_action(
        &self,
        params: &ComputeInstanceActionParams,
    ) -> ToolResult {
        ResponseNormalizer::wrap(self.run_action(params).await)
    }

    /// Dispatches a tool call by name with raw JSON arguments.
    ///
    /// Unknown tools and malformed arguments produce `invalid_argument`
    /// envelopes.
    pub async fn invoke(&self, tool: &str, arguments: Value) -> ToolResult {
        let invocation = Uuid::new_v4();
        let span = info_span!("tool", tool, %invocation);
        async {
            let result = self.dispatch(tool, arguments).await;
            if let (Some(kind), Some(message)) = (result.error_kind(), result.message()) {
                warn!(error_kind = %kind, message, "tool call failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, tool: &str, arguments: Value) -> ToolResult {
        let name = match tool.parse::<ToolName>() {
            Ok(known) => known,
            Err(err) => return err.into(),
        };

        match name {
            ToolName::ListCompartments => match name.decode(arguments) {
                Ok(params) => self.list_compartments(&params).await,
                Err(err) => err.into(),
            },
            ToolName::GetCompartmentByName => match name.decode(arguments) {
                Ok(params) => self.get_compartment_by_name(&params).await,
                Err(err) => err.into(),
            },
            ToolName::ListComputeInstances => match name.decode(arguments) {
                Ok(params) => self.list_compute_instances(&params).await,
                Err(err) => err.into(),
            },
            ToolName::GetComputeInstance => match name.decode(arguments) {
                Ok(params) => self.get_compute_instance(&params).await,
                Err(err) => err.into(),
            },
            ToolName::GetComputeInstanceByName => match name.decode(arguments) {
                Ok(params) => self.get_compute_instance_by_name(&params).await,
                Err(err) => err.into(),
            },
            ToolName::ComputeInstanceAction => match name.decode(arguments) {
                Ok(params) => self.compute_instance_action(&params).await,
                Err(err) => err.into(),
            },
        }
    }

    async fn compartment_tree(&self) -> ComputeServiceResult<Vec<Compartment>> {
        let client = self.pool.get_client(None).await?;
        self.compartments.list_tree(client.as_ref()).await
    }

    async fn compartment_named(&self, name: &str) -> ComputeServiceResult<Compartment> {
        let client = self.pool.get_client(None).await?;
        self.compartments.find_by_name(client.as_ref(), name).await
    }

    async fn instances_in(
        &self,
        params: &ListComputeInstancesParams,
    ) -> ComputeServiceResult<Vec<ComputeInstance>> {
        let region = self.pool.resolve_region(params.region())?;
        let compartment = self.compartment_named(&params.compartment_name).await?;
        let client = self.pool.client_for(&region).await?;
        self.instances.list(client.as_ref(), compartment.id()).await
    }

    async fn instance_by_id(
        &self,
        params: &GetComputeInstanceParams,
    ) -> ComputeServiceResult<ComputeInstance> {
        let instance_id = InstanceId::new(&params.instance_id)?;
        let client = self.pool.get_client(params.region()).await?;
        self.instances.get(client.as_ref(), &instance_id).await
    }

    async fn instance_by_name(
        &self,
        params: &GetComputeInstanceByNameParams,
    ) -> ComputeServiceResult<ComputeInstance> {
        let region = self.pool.resolve_region(params.region())?;
        let compartment = self.compartment_named(&params.compartment_name).await?;
        let client = self.pool.client_for(&region).await?;
        let summary = self
            .instances
            .find_by_name(client.as_ref(), compartment.id(), &params.instance_name)
            .await?;
        self.instances.get(client.as_ref(), summary.id()).await
    }

    async fn run_action(
        &self,
        params: &ComputeInstanceActionParams,
    ) -> ComputeServiceResult<ActionOutcome> {
        let parsed = ActionRequest::parse(&params.instance_id, &params.action)?;
        let request = match params.region() {
            Some(code) => parsed.in_region(code)?,
            None => parsed,
        };
        let region = request
            .region()
            .cloned()
            .unwrap_or_else(|| self.pool.context().default_region().clone());
        let client = self.pool.client_for(&region).await?;
        self.actions.submit(client.as_ref(), &request).await
    }
}
