//! # Registry Store
//!
//! Persistence abstraction over registry records. Two backends: an
//! in-memory store for tests and single-node fallback, and a Postgres store
//! for production. Both enforce the name-uniqueness invariant atomically
//! with respect to concurrent writes.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewRegistry, Registry, RegistryUpdate};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRegistryStore;
pub use postgres::PgRegistryStore;

/// Transactional record store for registries, keyed by id.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Persist a new record, assigning a fresh id. Fails with Conflict if a
    /// record with the same name already exists.
    async fn create(&self, new: NewRegistry) -> Result<Registry>;

    /// Fetch a record by id. Fails with NotFound if absent.
    async fn get(&self, id: i64) -> Result<Registry>;

    /// Fetch a record by name. Fails with NotFound if absent.
    async fn get_by_name(&self, name: &str) -> Result<Registry>;

    /// All records in ascending id order.
    async fn list(&self) -> Result<Vec<Registry>>;

    /// Apply the present fields of a partial update. Fails with NotFound if
    /// the id is absent, or Conflict if a rename collides with another
    /// record's name.
    async fn update(&self, id: i64, update: RegistryUpdate) -> Result<Registry>;

    /// Remove a record permanently. Fails with NotFound if absent.
    async fn delete(&self, id: i64) -> Result<()>;
}
