//! In-memory registry store.
//!
//! A single write lock spans the uniqueness check and the mutation, so no
//! two concurrent creates or renames can both succeed with the same name.
//! Reads return point-in-time clones; callers never hold the lock.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::error::{RegistryError, Result};
use crate::models::{NewRegistry, Registry, RegistryUpdate};
use crate::store::RegistryStore;

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<i64, Registry>,
    last_id: i64,
}

/// Registry store backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryRegistryStore {
    inner: RwLock<Inner>,
}

impl InMemoryRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistryStore for InMemoryRegistryStore {
    async fn create(&self, new: NewRegistry) -> Result<Registry> {
        let mut inner = self.inner.write();
        if inner.records.values().any(|r| r.name == new.name) {
            return Err(RegistryError::conflict(new.name));
        }

        // Ids count up monotonically and are never reused after deletion.
        inner.last_id += 1;
        let now = Utc::now();
        let registry = Registry {
            id: inner.last_id,
            name: new.name,
            url: new.url,
            kind: new.kind,
            credential: new.credential,
            description: new.description,
            insecure: new.insecure,
            created_at: now,
            updated_at: now,
        };
        inner.records.insert(registry.id, registry.clone());
        Ok(registry)
    }

    async fn get(&self, id: i64) -> Result<Registry> {
        self.inner
            .read()
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(format!("registry {id}")))
    }

    async fn get_by_name(&self, name: &str) -> Result<Registry> {
        self.inner
            .read()
            .records
            .values()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(format!("registry {name:?}")))
    }

    async fn list(&self) -> Result<Vec<Registry>> {
        Ok(self.inner.read().records.values().cloned().collect())
    }

    async fn update(&self, id: i64, update: RegistryUpdate) -> Result<Registry> {
        let mut inner = self.inner.write();
        let mut registry = inner
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(format!("registry {id}")))?;

        update.apply(&mut registry);
        if inner
            .records
            .values()
            .any(|r| r.id != id && r.name == registry.name)
        {
            return Err(RegistryError::conflict(registry.name));
        }

        registry.updated_at = Utc::now();
        inner.records.insert(id, registry.clone());
        Ok(registry)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write();
        inner
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RegistryError::not_found(format!("registry {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credential, CredentialType};

    fn new_registry(name: &str) -> NewRegistry {
        NewRegistry {
            name: name.to_string(),
            url: format!("https://{name}.example.com"),
            kind: "oci".to_string(),
            credential: Some(Credential {
                kind: CredentialType::Basic,
                access_key: "admin".to_string(),
                access_secret: "secret".to_string(),
            }),
            description: None,
            insecure: false,
        }
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let store = InMemoryRegistryStore::new();
        let first = store.create(new_registry("r1")).await.unwrap();
        let second = store.create(new_registry("r2")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_and_is_not_persisted() {
        let store = InMemoryRegistryStore::new();
        store.create(new_registry("r1")).await.unwrap();

        let err = store.create(new_registry("r1")).await.unwrap_err();
        assert!(matches!(err, RegistryError::Conflict { ref name } if name == "r1"));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_creates_admit_exactly_one_winner() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryRegistryStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(
                async move { store.create(new_registry("r1")).await },
            ));
        }

        let mut created = 0;
        let mut conflicted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(RegistryError::Conflict { ref name }) if name == "r1" => conflicted += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicted, 15);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ids_are_never_reused_after_delete() {
        let store = InMemoryRegistryStore::new();
        let first = store.create(new_registry("r1")).await.unwrap();
        store.delete(first.id).await.unwrap();

        let second = store.create(new_registry("r1")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn get_and_delete_missing_are_not_found() {
        let store = InMemoryRegistryStore::new();
        assert!(matches!(
            store.get(42).await.unwrap_err(),
            RegistryError::NotFound { .. }
        ));
        assert!(matches!(
            store.delete(42).await.unwrap_err(),
            RegistryError::NotFound { .. }
        ));
        assert!(matches!(
            store.update(42, RegistryUpdate::default()).await.unwrap_err(),
            RegistryError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn partial_update_preserves_untouched_fields() {
        let store = InMemoryRegistryStore::new();
        let created = store.create(new_registry("r1")).await.unwrap();

        let update = RegistryUpdate {
            access_key: Some("k2".to_string()),
            ..Default::default()
        };
        let updated = store.update(created.id, update).await.unwrap();

        assert_eq!(updated.name, created.name);
        assert_eq!(updated.url, created.url);
        assert_eq!(updated.credential.unwrap().access_key, "k2");
    }

    #[tokio::test]
    async fn rename_onto_existing_name_conflicts() {
        let store = InMemoryRegistryStore::new();
        store.create(new_registry("r1")).await.unwrap();
        let second = store.create(new_registry("r2")).await.unwrap();

        let update = RegistryUpdate {
            name: Some("r1".to_string()),
            ..Default::default()
        };
        let err = store.update(second.id, update).await.unwrap_err();
        assert!(matches!(err, RegistryError::Conflict { .. }));

        // The failed rename must not have been applied.
        assert_eq!(store.get(second.id).await.unwrap().name, "r2");
    }

    #[tokio::test]
    async fn rename_to_own_name_is_allowed() {
        let store = InMemoryRegistryStore::new();
        let created = store.create(new_registry("r1")).await.unwrap();

        let update = RegistryUpdate {
            name: Some("r1".to_string()),
            ..Default::default()
        };
        assert!(store.update(created.id, update).await.is_ok());
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = InMemoryRegistryStore::new();
        store.create(new_registry("b")).await.unwrap();
        store.create(new_registry("a")).await.unwrap();

        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn get_by_name_finds_record() {
        let store = InMemoryRegistryStore::new();
        let created = store.create(new_registry("r1")).await.unwrap();
        assert_eq!(store.get_by_name("r1").await.unwrap().id, created.id);
        assert!(store.get_by_name("missing").await.is_err());
    }
}
