//! Compartment listing and name lookup.

use super::{ComputeServiceError, ComputeServiceResult, ResourceKind, drain_pages};
use crate::compute::{
    domain::{Compartment, CompartmentId, ValidationError},
    ports::ProviderClient,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::ops::ControlFlow;
use tracing::debug;

/// Resolves compartments of one tenancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompartmentResolver {
    tenancy_id: CompartmentId,
}

impl CompartmentResolver {
    /// Creates a resolver rooted at `tenancy_id`.
    #[must_use]
    pub const fn new(tenancy_id: CompartmentId) -> Self {
        Self { tenancy_id }
    }

    /// Returns the tenancy root identifier.
    #[must_use]
    pub const fn tenancy_id(&self) -> &CompartmentId {
        &self.tenancy_id
    }

    /// Lists the direct children of the tenancy root.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeServiceError::Service`] for provider failures.
    pub async fn list<P>(&self, client: &P) -> ComputeServiceResult<Vec<Compartment>>
    where
        P: ProviderClient + ?Sized,
    {
        let tenancy_id = &self.tenancy_id;
        let children = drain_pages(|page| async move {
            client.list_compartments(tenancy_id, page.as_deref()).await
        })
        .await?;
        Ok(children)
    }

    /// Lists the tenancy root and every active compartment beneath it in
    /// breadth-first order.
    ///
    /// The tree is read with one paginated subtree listing and ordered
    /// locally; siblings keep provider order. Compartments below an inactive
    /// one are not reported.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeServiceError::NotFound`] when the root cannot be
    /// fetched and [`ComputeServiceError::Service`] for other failures.
    pub async fn list_tree<P>(&self, client: &P) -> ComputeServiceResult<Vec<Compartment>>
    where
        P: ProviderClient + ?Sized,
    {
        let mut found = Vec::new();
        self.traverse(client, |compartment| {
            found.push(compartment.clone());
            ControlFlow::Continue(())
        })
        .await?;
        Ok(found)
    }

    /// Finds the first compartment in traversal order whose name equals
    /// `name` exactly.
    ///
    /// Names are not unique; callers needing a particular compartment should
    /// use its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeServiceError::Validation`] for an empty name,
    /// [`ComputeServiceError::NotFound`] when nothing matches, and
    /// [`ComputeServiceError::Service`] for provider failures.
    pub async fn find_by_name<P>(&self, client: &P, name: &str) -> ComputeServiceResult<Compartment>
    where
        P: ProviderClient + ?Sized,
    {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName {
                kind: ResourceKind::Compartment.as_str(),
            }
            .into());
        }

        let mut matched = None;
        self.traverse(client, |compartment| {
            if compartment.name() == name {
                matched = Some(compartment.clone());
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await?;

        matched.ok_or_else(|| {
            ComputeServiceError::not_found(
                ResourceKind::Compartment,
                name,
                format!(
                    "compartment '{name}' not found. Use list_compartments to see available compartments."
                ),
            )
        })
    }

    async fn traverse<P, F>(&self, client: &P, mut visit: F) -> ComputeServiceResult<()>
    where
        P: ProviderClient + ?Sized,
        F: FnMut(&Compartment) -> ControlFlow<()>,
    {
        let root = client
            .get_compartment(&self.tenancy_id)
            .await
            .map_err(|err| {
                ComputeServiceError::from_lookup(
                    err,
                    ResourceKind::Compartment,
                    self.tenancy_id.as_str(),
                )
            })?;
        if visit(&root).is_break() {
            return Ok(());
        }

        let tenancy_id = &self.tenancy_id;
        let descendants = drain_pages(|page| async move {
            client
                .list_compartments_in_subtree(tenancy_id, page.as_deref())
                .await
        })
        .await?;
        debug!(descendants = descendants.len(), "listed compartment subtree");

        let mut children: HashMap<CompartmentId, Vec<Compartment>> = HashMap::new();
        for compartment in descendants {
            if let Some(parent_id) = compartment.parent_id().cloned() {
                children.entry(parent_id).or_default().push(compartment);
            }
        }

        let mut visited = HashSet::from([root.id().clone()]);
        let mut queue = VecDeque::from([root.id().clone()]);
        while let Some(parent_id) = queue.pop_front() {
            let Some(level) = children.remove(&parent_id) else {
                continue;
            };
            for child in level {
                if !child.lifecycle_state().is_active() || !visited.insert(child.id().clone()) {
                    continue;
                }
                if visit(&child).is_break() {
                    return Ok(());
                }
                queue.push_back(child.id().clone());
            }
        }
        Ok(())
    }
}
