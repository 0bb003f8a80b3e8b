//! Lazily constructed, per-region provider clients.

use crate::compute::{
    domain::{RegionError, RegionId},
    ports::ProviderConnector,
};
use crate::config::CredentialContext;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::{info, warn};

type ClientSlot<T> = Arc<OnceCell<Arc<T>>>;

/// Owner of every regional provider client in the process.
///
/// Each region has its own initialization cell, so concurrent first requests
/// for one region wait on a single construction while other regions proceed
/// independently. A failed construction drops the region's cell, so the next
/// request constructs afresh; the pool never retries on its own.
pub struct RegionClientPool<C>
where
    C: ProviderConnector,
{
    connector: C,
    context: Arc<CredentialContext>,
    slots: Mutex<HashMap<RegionId, ClientSlot<C::Client>>>,
}

impl<C> RegionClientPool<C>
where
    C: ProviderConnector,
{
    /// Creates an empty pool.
    #[must_use]
    pub fn new(connector: C, context: Arc<CredentialContext>) -> Self {
        Self {
            connector,
            context,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the credential context clients are built from.
    #[must_use]
    pub fn context(&self) -> &CredentialContext {
        &self.context
    }

    /// Returns the connector.
    #[must_use]
    pub const fn connector(&self) -> &C {
        &self.connector
    }

    /// Resolves an optional region argument, defaulting to the context region.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidRegion`] for malformed codes.
    pub fn resolve_region(&self, region: Option<&str>) -> Result<RegionId, RegionError> {
        region.map_or_else(
            || Ok(self.context.default_region().clone()),
            |code| RegionId::new(code),
        )
    }

    /// Returns the client for `region`, or the default region when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidRegion`] for malformed codes and
    /// [`RegionError::Connect`] when construction fails.
    pub async fn get_client(&self, region: Option<&str>) -> Result<Arc<C::Client>, RegionError> {
        let region_id = self.resolve_region(region)?;
        self.client_for(&region_id).await
    }

    /// Returns the client for a validated region, constructing it once.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::Connect`] when construction fails.
    pub async fn client_for(&self, region: &RegionId) -> Result<Arc<C::Client>, RegionError> {
        let slot = self.slot(region)?;
        let constructed = slot
            .get_or_try_init(|| async {
                info!(region = %region, "constructing provider client");
                self.connector
                    .connect(&self.context, region)
                    .await
                    .map(Arc::new)
            })
            .await;
        match constructed {
            Ok(client) => Ok(Arc::clone(client)),
            Err(err) => {
                warn!(region = %region, code = err.code(), "provider client construction failed");
                self.release(region, &slot)?;
                Err(RegionError::Connect {
                    region: region.to_string(),
                    message: err.message().to_owned(),
                })
            }
        }
    }

    /// Returns the regions whose client has been constructed.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::PoolUnavailable`] when the cache lock is
    /// poisoned.
    pub fn cached_regions(&self) -> Result<Vec<RegionId>, RegionError> {
        let slots = self
            .slots
            .lock()
            .map_err(|err| RegionError::PoolUnavailable(err.to_string()))?;
        let mut regions: Vec<RegionId> = slots
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(region, _)| region.clone())
            .collect();
        regions.sort();
        Ok(regions)
    }

    fn slot(&self, region: &RegionId) -> Result<ClientSlot<C::Client>, RegionError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|err| RegionError::PoolUnavailable(err.to_string()))?;
        Ok(Arc::clone(slots.entry(region.clone()).or_default()))
    }

    /// Drops an empty slot after a failed construction so that regions which
    /// never connect do not accumulate. A slot another caller has since
    /// filled or replaced is left alone.
    fn release(
        &self,
        region: &RegionId,
        slot: &ClientSlot<C::Client>,
    ) -> Result<(), RegionError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|err| RegionError::PoolUnavailable(err.to_string()))?;
        let unused = slots
            .get(region)
            .is_some_and(|cached| Arc::ptr_eq(cached, slot) && !cached.initialized());
        if unused {
            slots.remove(region);
        }
        Ok(())
    }

    /// Returns the number of regions holding a slot, filled or not.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::PoolUnavailable`] when the cache lock is
    /// poisoned.
    pub fn slot_count(&self) -> Result<usize, RegionError> {
        let slots = self
            .slots
            .lock()
            .map_err(|err| RegionError::PoolUnavailable(err.to_string()))?;
        Ok(slots.len())
    }
}
