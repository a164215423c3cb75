//! Postgres-backed registry store.
//!
//! Name uniqueness is enforced by a unique index (`registries_name_key`);
//! SQLSTATE 23505 from a create or rename surfaces as Conflict. Partial
//! updates run read-modify-write inside a transaction with the row locked.
//! Schema lives in `migrations/`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::models::{Credential, CredentialType, NewRegistry, Registry, RegistryUpdate};
use crate::store::RegistryStore;

const UNIQUE_VIOLATION: &str = "23505";

const SELECT_COLUMNS: &str = "id, name, url, kind, credential_type, access_key, access_secret, \
     description, insecure, created_at, updated_at";

/// Registry store backed by a Postgres pool.
pub struct PgRegistryStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct RegistryRow {
    id: i64,
    name: String,
    url: String,
    kind: String,
    credential_type: Option<String>,
    access_key: Option<String>,
    access_secret: Option<String>,
    description: Option<String>,
    insecure: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RegistryRow> for Registry {
    type Error = RegistryError;

    fn try_from(row: RegistryRow) -> Result<Self> {
        let credential = match row.credential_type {
            Some(scheme) => {
                let kind = CredentialType::parse(&scheme).ok_or_else(|| {
                    RegistryError::internal(format!("unknown credential scheme in store: {scheme}"))
                })?;
                Some(Credential {
                    kind,
                    access_key: row.access_key.unwrap_or_default(),
                    access_secret: row.access_secret.unwrap_or_default(),
                })
            }
            None => None,
        };

        Ok(Registry {
            id: row.id,
            name: row.name,
            url: row.url,
            kind: row.kind,
            credential,
            description: row.description,
            insecure: row.insecure,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl PgRegistryStore {
    /// Connect to Postgres and build a store over a fresh pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        debug!("connecting registry store to postgres");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(|e| RegistryError::internal(format!("database connection failed: {e}")))?;
        Ok(Self::with_pool(pool))
    }

    /// Build a store over an existing pool.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_write_error(error: sqlx::Error, name: &str) -> RegistryError {
        if let sqlx::Error::Database(db) = &error {
            if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return RegistryError::conflict(name);
            }
        }
        RegistryError::internal(format!("database write failed: {error}"))
    }

    fn map_read_error(error: sqlx::Error) -> RegistryError {
        RegistryError::internal(format!("database read failed: {error}"))
    }
}

#[async_trait]
impl RegistryStore for PgRegistryStore {
    async fn create(&self, new: NewRegistry) -> Result<Registry> {
        let credential_type = new.credential.as_ref().map(|c| c.kind.as_str());
        let access_key = new.credential.as_ref().map(|c| c.access_key.as_str());
        let access_secret = new.credential.as_ref().map(|c| c.access_secret.as_str());

        let sql = format!(
            "INSERT INTO registries \
                 (name, url, kind, credential_type, access_key, access_secret, description, insecure) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {SELECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RegistryRow>(&sql)
            .bind(&new.name)
            .bind(&new.url)
            .bind(&new.kind)
            .bind(credential_type)
            .bind(access_key)
            .bind(access_secret)
            .bind(&new.description)
            .bind(new.insecure)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(e, &new.name))?;

        row.try_into()
    }

    async fn get(&self, id: i64) -> Result<Registry> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM registries WHERE id = $1");
        let row = sqlx::query_as::<_, RegistryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_read_error)?
            .ok_or_else(|| RegistryError::not_found(format!("registry {id}")))?;
        row.try_into()
    }

    async fn get_by_name(&self, name: &str) -> Result<Registry> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM registries WHERE name = $1");
        let row = sqlx::query_as::<_, RegistryRow>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_read_error)?
            .ok_or_else(|| RegistryError::not_found(format!("registry {name:?}")))?;
        row.try_into()
    }

    async fn list(&self) -> Result<Vec<Registry>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM registries ORDER BY id");
        let rows = sqlx::query_as::<_, RegistryRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Self::map_read_error)?;
        rows.into_iter().map(Registry::try_from).collect()
    }

    async fn update(&self, id: i64, update: RegistryUpdate) -> Result<Registry> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RegistryError::internal(format!("transaction begin failed: {e}")))?;

        let sql = format!("SELECT {SELECT_COLUMNS} FROM registries WHERE id = $1 FOR UPDATE");
        let row = sqlx::query_as::<_, RegistryRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Self::map_read_error)?
            .ok_or_else(|| RegistryError::not_found(format!("registry {id}")))?;

        let mut registry: Registry = row.try_into()?;
        update.apply(&mut registry);

        let credential_type = registry.credential.as_ref().map(|c| c.kind.as_str());
        let access_key = registry.credential.as_ref().map(|c| c.access_key.as_str());
        let access_secret = registry.credential.as_ref().map(|c| c.access_secret.as_str());

        let sql = format!(
            "UPDATE registries SET \
                 name = $2, url = $3, kind = $4, credential_type = $5, access_key = $6, \
                 access_secret = $7, description = $8, insecure = $9, updated_at = now() \
             WHERE id = $1 \
             RETURNING {SELECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RegistryRow>(&sql)
            .bind(id)
            .bind(&registry.name)
            .bind(&registry.url)
            .bind(&registry.kind)
            .bind(credential_type)
            .bind(access_key)
            .bind(access_secret)
            .bind(&registry.description)
            .bind(registry.insecure)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| Self::map_write_error(e, &registry.name))?;

        tx.commit()
            .await
            .map_err(|e| RegistryError::internal(format!("transaction commit failed: {e}")))?;

        row.try_into()
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM registries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RegistryError::internal(format!("database write failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::not_found(format!("registry {id}")));
        }
        Ok(())
    }
}
