//! In-memory cloud state, regional clients and connector.

use crate::compute::{
    domain::{
        Compartment, CompartmentId, CompartmentLifecycleState, ComputeInstance, InstanceId,
        InstanceLifecycleState, ProviderAction, RegionId,
    },
    ports::{
        Page, ProviderClient, ProviderConnector, ProviderError, ProviderErrorKind, ProviderResult,
    },
};
use crate::config::CredentialContext;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

const DEFAULT_PAGE_SIZE: usize = 100;

/// Provider operation recorded in the request log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOperation {
    /// `ListCompartments`
    ListCompartments,
    /// `GetCompartment`
    GetCompartment,
    /// `ListInstances`
    ListInstances,
    /// `GetInstance`
    GetInstance,
    /// `InstanceAction`
    InstanceAction,
}

/// One request received by the in-memory provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    /// Region of the client that sent the request.
    pub region: RegionId,
    /// Requested operation.
    pub operation: ProviderOperation,
}

/// Shared state of an in-memory tenancy.
///
/// Clones share state, so a test can keep a handle while the connector and
/// its clients serve requests.
#[derive(Debug, Clone)]
pub struct InMemoryCloud {
    state: Arc<RwLock<CloudState>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    connects: Arc<AtomicUsize>,
}

#[derive(Debug)]
struct CloudState {
    tenancy_id: CompartmentId,
    compartments: Vec<Compartment>,
    instances: Vec<ComputeInstance>,
    pending: HashMap<InstanceId, InstanceLifecycleState>,
    page_size: usize,
    failures: HashMap<ProviderOperation, ProviderError>,
    unreachable_regions: HashMap<RegionId, String>,
    connect_delay: Option<Duration>,
}

fn lock_error(err: impl Display) -> ProviderError {
    ProviderError::new(ProviderErrorKind::Internal, "LockPoisoned", err.to_string())
}

impl InMemoryCloud {
    /// Creates a cloud whose tenancy root has the given id and name.
    #[must_use]
    pub fn new(tenancy_id: CompartmentId, tenancy_name: impl Into<String>) -> Self {
        let root = Compartment::new(
            tenancy_id.clone(),
            tenancy_name,
            None,
            CompartmentLifecycleState::Active,
        );
        Self {
            state: Arc::new(RwLock::new(CloudState {
                tenancy_id,
                compartments: vec![root],
                instances: Vec::new(),
                pending: HashMap::new(),
                page_size: DEFAULT_PAGE_SIZE,
                failures: HashMap::new(),
                unreachable_regions: HashMap::new(),
                connect_delay: None,
            })),
            requests: Arc::new(Mutex::new(Vec::new())),
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns a connector building clients over this cloud.
    #[must_use]
    pub fn connector(&self) -> InMemoryConnector {
        InMemoryConnector {
            cloud: self.clone(),
        }
    }

    /// Returns a client for `region` without going through a connector.
    #[must_use]
    pub fn client(&self, region: RegionId) -> InMemoryRegionClient {
        InMemoryRegionClient {
            cloud: self.clone(),
            region,
        }
    }

    /// Returns the tenancy root identifier.
    ///
    /// # Errors
    ///
    /// Returns a provider error when the state lock is poisoned.
    pub fn tenancy_id(&self) -> ProviderResult<CompartmentId> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tenancy_id.clone())
    }

    /// Adds a compartment under its parent.
    ///
    /// # Errors
    ///
    /// Returns a provider error when the state lock is poisoned.
    pub fn add_compartment(&self, compartment: Compartment) -> ProviderResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.compartments.push(compartment);
        Ok(())
    }

    /// Adds an instance, replacing any instance with the same id.
    ///
    /// # Errors
    ///
    /// Returns a provider error when the state lock is poisoned.
    pub fn add_instance(&self, instance: ComputeInstance) -> ProviderResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.instances.retain(|existing| existing.id() != instance.id());
        state.instances.push(instance);
        Ok(())
    }

    /// Sets the maximum number of items per page.
    ///
    /// # Errors
    ///
    /// Returns a provider error when the state lock is poisoned.
    pub fn set_page_size(&self, page_size: usize) -> ProviderResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.page_size = page_size.max(1);
        Ok(())
    }

    /// Makes every request of `operation` fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns a provider error when the state lock is poisoned.
    pub fn fail_operation(
        &self,
        operation: ProviderOperation,
        error: ProviderError,
    ) -> ProviderResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.failures.insert(operation, error);
        Ok(())
    }

    /// Makes client construction for `region` fail with `message`.
    ///
    /// # Errors
    ///
    /// Returns a provider error when the state lock is poisoned.
    pub fn make_unreachable(
        &self,
        region: RegionId,
        message: impl Into<String>,
    ) -> ProviderResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.unreachable_regions.insert(region, message.into());
        Ok(())
    }

    /// Delays every client construction, widening race windows in tests.
    ///
    /// # Errors
    ///
    /// Returns a provider error when the state lock is poisoned.
    pub fn set_connect_delay(&self, delay: Duration) -> ProviderResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.connect_delay = Some(delay);
        Ok(())
    }

    /// Completes every in-flight lifecycle transition.
    ///
    /// # Errors
    ///
    /// Returns a provider error when the state lock is poisoned.
    pub fn settle(&self) -> ProviderResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let pending: Vec<(InstanceId, InstanceLifecycleState)> = state.pending.drain().collect();
        for (instance_id, target) in pending {
            if let Some(slot) = state
                .instances
                .iter_mut()
                .find(|instance| *instance.id() == instance_id)
            {
                *slot = slot.clone().with_lifecycle_state(target);
            }
        }
        Ok(())
    }

    /// Returns the number of client constructions performed.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Returns every request received so far, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns a provider error when the log lock is poisoned.
    pub fn requests(&self) -> ProviderResult<Vec<ProviderRequest>> {
        let log = self.requests.lock().map_err(lock_error)?;
        Ok(log.clone())
    }

    fn record(&self, region: &RegionId, operation: ProviderOperation) -> ProviderResult<()> {
        let mut log = self.requests.lock().map_err(lock_error)?;
        log.push(ProviderRequest {
            region: region.clone(),
            operation,
        });
        drop(log);

        let state = self.state.read().map_err(lock_error)?;
        state
            .failures
            .get(&operation)
            .map_or(Ok(()), |failure| Err(failure.clone()))
    }
}

fn paginate<T: Clone>(
    items: &[T],
    page: Option<&str>,
    page_size: usize,
) -> ProviderResult<Page<T>> {
    let offset = match page {
        None => 0,
        Some(token) => token.parse::<usize>().map_err(|_| {
            ProviderError::new(
                ProviderErrorKind::InvalidRequest,
                "InvalidParameter",
                format!("invalid page token '{token}'"),
            )
        })?,
    };
    let end = offset.saturating_add(page_size).min(items.len());
    let slice = items.get(offset..end).unwrap_or_default();
    let next_page = (end < items.len()).then(|| end.to_string());
    Ok(Page {
        items: slice.to_vec(),
        next_page,
    })
}

fn transition(
    instance: &ComputeInstance,
    action: ProviderAction,
) -> ProviderResult<(InstanceLifecycleState, InstanceLifecycleState)> {
    let current = instance.lifecycle_state();
    let allowed = match action {
        ProviderAction::Start => matches!(current, InstanceLifecycleState::Stopped).then_some((
            InstanceLifecycleState::Starting,
            InstanceLifecycleState::Running,
        )),
        ProviderAction::Stop => matches!(current, InstanceLifecycleState::Running).then_some((
            InstanceLifecycleState::Stopping,
            InstanceLifecycleState::Stopped,
        )),
        ProviderAction::SoftReset | ProviderAction::Reset => {
            matches!(current, InstanceLifecycleState::Running).then_some((
                InstanceLifecycleState::Stopping,
                InstanceLifecycleState::Running,
            ))
        }
    };
    allowed.ok_or_else(|| {
        ProviderError::incorrect_state(format!(
            "Instance {} is in lifecycle state {current} and cannot accept action {action}",
            instance.id()
        ))
    })
}

/// Provider client bound to one region of an [`InMemoryCloud`].
#[derive(Debug, Clone)]
pub struct InMemoryRegionClient {
    cloud: InMemoryCloud,
    region: RegionId,
}

#[async_trait]
impl ProviderClient for InMemoryRegionClient {
    fn region(&self) -> &RegionId {
        &self.region
    }

    async fn list_compartments(
        &self,
        parent_id: &CompartmentId,
        page: Option<&str>,
    ) -> ProviderResult<Page<Compartment>> {
        self.cloud
            .record(&self.region, ProviderOperation::ListCompartments)?;
        let state = self.cloud.state.read().map_err(lock_error)?;
        let children: Vec<Compartment> = state
            .compartments
            .iter()
            .filter(|compartment| compartment.parent_id() == Some(parent_id))
            .cloned()
            .collect();
        paginate(&children, page, state.page_size)
    }

    async fn list_compartments_in_subtree(
        &self,
        root_id: &CompartmentId,
        page: Option<&str>,
    ) -> ProviderResult<Page<Compartment>> {
        self.cloud
            .record(&self.region, ProviderOperation::ListCompartments)?;
        let state = self.cloud.state.read().map_err(lock_error)?;
        if *root_id != state.tenancy_id {
            return Err(ProviderError::new(
                ProviderErrorKind::InvalidRequest,
                "InvalidParameter",
                "compartmentIdInSubtree is only supported for the tenancy",
            ));
        }
        let descendants: Vec<Compartment> = state
            .compartments
            .iter()
            .filter(|compartment| !compartment.is_root())
            .cloned()
            .collect();
        paginate(&descendants, page, state.page_size)
    }

    async fn get_compartment(&self, compartment_id: &CompartmentId) -> ProviderResult<Compartment> {
        self.cloud
            .record(&self.region, ProviderOperation::GetCompartment)?;
        let state = self.cloud.state.read().map_err(lock_error)?;
        state
            .compartments
            .iter()
            .find(|compartment| compartment.id() == compartment_id)
            .cloned()
            .ok_or_else(|| {
                ProviderError::not_found(format!(
                    "Authorization failed or requested resource not found: compartment {compartment_id}"
                ))
            })
    }

    async fn list_instances(
        &self,
        compartment_id: &CompartmentId,
        page: Option<&str>,
    ) -> ProviderResult<Page<ComputeInstance>> {
        self.cloud
            .record(&self.region, ProviderOperation::ListInstances)?;
        let state = self.cloud.state.read().map_err(lock_error)?;
        let instances: Vec<ComputeInstance> = state
            .instances
            .iter()
            .filter(|instance| {
                instance.compartment_id() == compartment_id && *instance.region() == self.region
            })
            .map(ComputeInstance::summary)
            .collect();
        paginate(&instances, page, state.page_size)
    }

    async fn get_instance(&self, instance_id: &InstanceId) -> ProviderResult<ComputeInstance> {
        self.cloud
            .record(&self.region, ProviderOperation::GetInstance)?;
        let state = self.cloud.state.read().map_err(lock_error)?;
        state
            .instances
            .iter()
            .find(|instance| instance.id() == instance_id && *instance.region() == self.region)
            .cloned()
            .ok_or_else(|| {
                ProviderError::not_found(format!(
                    "Authorization failed or requested resource not found: instance {instance_id}"
                ))
            })
    }

    async fn instance_action(
        &self,
        instance_id: &InstanceId,
        action: ProviderAction,
    ) -> ProviderResult<ComputeInstance> {
        self.cloud
            .record(&self.region, ProviderOperation::InstanceAction)?;
        let mut state = self.cloud.state.write().map_err(lock_error)?;
        let region = &self.region;
        let slot = state
            .instances
            .iter_mut()
            .find(|instance| instance.id() == instance_id && instance.region() == region)
            .ok_or_else(|| {
                ProviderError::not_found(format!(
                    "Authorization failed or requested resource not found: instance {instance_id}"
                ))
            })?;

        let (transient, target) = transition(slot, action)?;
        *slot = slot.clone().with_lifecycle_state(transient);
        let accepted = slot.clone();
        state.pending.insert(instance_id.clone(), target);
        Ok(accepted)
    }
}

/// Connector producing [`InMemoryRegionClient`]s.
#[derive(Debug, Clone)]
pub struct InMemoryConnector {
    cloud: InMemoryCloud,
}

#[async_trait]
impl ProviderConnector for InMemoryConnector {
    type Client = InMemoryRegionClient;

    async fn connect(
        &self,
        _context: &CredentialContext,
        region: &RegionId,
    ) -> ProviderResult<Self::Client> {
        self.cloud.connects.fetch_add(1, Ordering::SeqCst);

        let (delay, unreachable) = {
            let state = self.cloud.state.read().map_err(lock_error)?;
            (
                state.connect_delay,
                state.unreachable_regions.get(region).cloned(),
            )
        };
        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }
        if let Some(message) = unreachable {
            return Err(ProviderError::new(
                ProviderErrorKind::Unavailable,
                "ServiceUnavailable",
                message,
            ));
        }

        Ok(self.cloud.client(region.clone()))
    }
}
