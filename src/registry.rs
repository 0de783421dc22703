//! Named cluster clients, built at most once per name.
//!
//! The registry is an ordinary value: create it where the application is
//! wired together and share it behind an `Arc`. Lookups take a read lock;
//! the write lock is held only to insert an empty slot for a new name.
//! Construction itself happens inside the slot, so building one cluster
//! never blocks lookups of another, and concurrent first callers for the
//! same name wait on a single build.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, warn};

use crate::error::Result;
use crate::es_client::{split_hosts, EsClient, EsClientBuilder};

type Slot = Arc<OnceCell<Arc<EsClient>>>;

#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<String, Slot>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, name: &str) -> Slot {
        if let Some(slot) = self.clients.read().await.get(name) {
            return Arc::clone(slot);
        }
        let mut clients = self.clients.write().await;
        Arc::clone(clients.entry(name.to_string()).or_default())
    }

    /// Returns the client cached under `name`, building it from `hosts` on
    /// first use. On a hit `hosts` is not consulted.
    pub async fn get_or_create(&self, name: &str, hosts: &str) -> Result<Arc<EsClient>> {
        self.get_or_create_with(name, EsClientBuilder::new(hosts))
            .await
    }

    /// Same as [`get_or_create`](Self::get_or_create) with a configured
    /// builder. A failed build leaves the name unset.
    pub async fn get_or_create_with(
        &self,
        name: &str,
        builder: EsClientBuilder,
    ) -> Result<Arc<EsClient>> {
        let slot = self.slot(name).await;
        if let Some(client) = slot.get() {
            warn_on_host_mismatch(name, client, builder.get_hosts());
            return Ok(Arc::clone(client));
        }

        let built = slot
            .get_or_try_init(|| async {
                debug!("Building client '{}' for {}", name, builder.get_hosts());
                builder.clone().build().await.map(Arc::new)
            })
            .await
            .map(Arc::clone);
        match built {
            Ok(client) => {
                warn_on_host_mismatch(name, &client, builder.get_hosts());
                Ok(client)
            }
            Err(e) => {
                self.discard_empty_slot(name, &slot).await;
                Err(e)
            }
        }
    }

    /// Drops the slot for `name` after a failed build unless another caller
    /// still holds it and may yet fill it.
    async fn discard_empty_slot(&self, name: &str, slot: &Slot) {
        let mut clients = self.clients.write().await;
        let unused = clients
            .get(name)
            .map(|current| {
                Arc::ptr_eq(current, slot)
                    && !slot.initialized()
                    && Arc::strong_count(slot) == 2
            })
            .unwrap_or(false);
        if unused {
            clients.remove(name);
        }
    }

    pub async fn get(&self, name: &str) -> Option<Arc<EsClient>> {
        self.clients
            .read()
            .await
            .get(name)
            .and_then(|slot| slot.get().cloned())
    }

    /// Names with a built client, sorted.
    pub async fn names(&self) -> Vec<String> {
        let clients = self.clients.read().await;
        let mut names: Vec<String> = clients
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.clients
            .read()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn warn_on_host_mismatch(name: &str, client: &EsClient, hosts: &str) {
    let same = split_hosts(hosts)
        .map(|endpoints| endpoints.as_slice() == client.endpoints())
        .unwrap_or(false);
    if !same {
        warn!(
            "Client '{}' already exists; ignoring host list '{}'",
            name, hosts
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EsError;

    #[tokio::test]
    async fn failed_builds_leave_no_slots_behind() {
        let registry = ClientRegistry::new();
        for name in ["a", "b", "c"] {
            let err = registry.get_or_create(name, "").await.unwrap_err();
            assert!(matches!(err, EsError::NoEndpoints));
        }
        assert!(registry.clients.read().await.is_empty());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn unreachable_cluster_leaves_no_slot_behind() {
        let registry = ClientRegistry::new();
        assert!(registry
            .get_or_create("down", "http://127.0.0.1:1")
            .await
            .is_err());
        assert!(registry.clients.read().await.get("down").is_none());
    }
}
