//! # Registry Service
//!
//! Orchestration layer every caller goes through. Each operation takes the
//! requesting principal explicitly and proceeds authorize → validate →
//! delegate → classify. The authorization gate runs before any lookup, so a
//! denial never reveals whether the target record exists, and lower-layer
//! classifications (NotFound, Conflict, Internal) pass through unchanged.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::authz::{authorize, Action, Principal};
use crate::error::{RegistryError, Result};
use crate::models::{Credential, NewRegistry, Registry, RegistryUpdate};
use crate::probe::{ConnectivityProbe, ProbeTarget};
use crate::store::RegistryStore;

/// Probe request: either a reference to a stored record (`id`), inline
/// target data, or both. Inline fields overlay the stored ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PingRequest {
    pub id: Option<i64>,
    pub url: Option<String>,
    pub credential: Option<Credential>,
    pub insecure: Option<bool>,
}

/// Authorization-gated configuration service over registry records.
pub struct RegistryService {
    store: Arc<dyn RegistryStore>,
    probe: Arc<dyn ConnectivityProbe>,
}

impl RegistryService {
    pub fn new(store: Arc<dyn RegistryStore>, probe: Arc<dyn ConnectivityProbe>) -> Self {
        Self { store, probe }
    }

    /// Create a registry record.
    pub async fn create(&self, principal: &Principal, new: NewRegistry) -> Result<Registry> {
        self.require(principal, Action::Create)?;
        if new.name.trim().is_empty() {
            return Err(RegistryError::invalid_input("name is required"));
        }
        if new.url.trim().is_empty() {
            return Err(RegistryError::invalid_input("url is required"));
        }

        let registry = self.store.create(new).await?;
        info!(
            registry_id = registry.id,
            name = %registry.name,
            principal = %principal.name,
            "registry created"
        );
        Ok(registry)
    }

    /// Fetch a registry record by id.
    pub async fn get(&self, principal: &Principal, id: i64) -> Result<Registry> {
        self.require(principal, Action::Read)?;
        Self::check_id(id)?;
        self.store.get(id).await
    }

    /// All registry records, in stable id order.
    pub async fn list(&self, principal: &Principal) -> Result<Vec<Registry>> {
        self.require(principal, Action::List)?;
        self.store.list().await
    }

    /// Apply a partial update to a registry record.
    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        update: RegistryUpdate,
    ) -> Result<Registry> {
        self.require(principal, Action::Update)?;
        Self::check_id(id)?;

        let registry = self.store.update(id, update).await?;
        info!(
            registry_id = registry.id,
            name = %registry.name,
            principal = %principal.name,
            "registry updated"
        );
        Ok(registry)
    }

    /// Delete a registry record permanently.
    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<()> {
        self.require(principal, Action::Delete)?;
        Self::check_id(id)?;

        self.store.delete(id).await?;
        info!(registry_id = id, principal = %principal.name, "registry deleted");
        Ok(())
    }

    /// Probe a registry endpoint. The target is resolved from the stored
    /// record (when `id` is set) overlaid with any inline fields, then probed
    /// without holding any store state across the network I/O.
    pub async fn ping(&self, principal: &Principal, request: PingRequest) -> Result<()> {
        self.require(principal, Action::Probe)?;
        let target = self.resolve_target(request).await?;
        self.probe.ping(&target).await
    }

    async fn resolve_target(&self, request: PingRequest) -> Result<ProbeTarget> {
        // An unknown id is NotFound; a resolved record that later proves
        // unreachable is Internal. The two paths stay distinct.
        let stored = match request.id {
            Some(id) => Some(self.store.get(id).await?),
            None => None,
        };

        let url = request
            .url
            .filter(|u| !u.trim().is_empty())
            .or_else(|| stored.as_ref().map(|r| r.url.clone()))
            .unwrap_or_default();
        if url.trim().is_empty() {
            return Err(RegistryError::invalid_input(
                "url is required to probe an endpoint",
            ));
        }

        let credential = request
            .credential
            .or_else(|| stored.as_ref().and_then(|r| r.credential.clone()));
        let insecure = request
            .insecure
            .unwrap_or_else(|| stored.as_ref().is_some_and(|r| r.insecure));

        Ok(ProbeTarget {
            url,
            credential,
            insecure,
        })
    }

    fn require(&self, principal: &Principal, action: Action) -> Result<()> {
        if authorize(principal, action) {
            Ok(())
        } else {
            warn!(
                principal = %principal.name,
                action = action.as_str(),
                "registry operation denied"
            );
            Err(RegistryError::Forbidden)
        }
    }

    fn check_id(id: i64) -> Result<()> {
        if id < 1 {
            return Err(RegistryError::invalid_input(format!(
                "registry id must be a positive integer, got {id}"
            )));
        }
        Ok(())
    }
}
