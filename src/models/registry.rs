//! # Registry Records
//!
//! A `Registry` describes a remote endpoint target used by the replication
//! platform: a network address, a type tag, and optional credentials.
//! `RegistryUpdate` is the partial-update descriptor. Every field is an
//! `Option` so "omitted" stays distinguishable from "set to empty".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authentication scheme of a [`Credential`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialType {
    /// Access-key / access-secret pair, sent as HTTP basic authorization.
    Basic,
}

impl CredentialType {
    /// Stable string form used in persisted rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialType::Basic => "basic",
        }
    }

    /// Parse the persisted string form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "basic" => Some(CredentialType::Basic),
            _ => None,
        }
    }
}

/// Authentication material attached to a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(rename = "type")]
    pub kind: CredentialType,
    pub access_key: String,
    pub access_secret: String,
}

/// A stored registry record. `id` is assigned by the store at creation and
/// never mutated or reused; `name` is unique across live records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Skip TLS certificate verification when probing this endpoint.
    #[serde(default)]
    pub insecure: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload for a registry (generated fields omitted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegistry {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub credential: Option<Credential>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub insecure: bool,
}

/// Partial-update descriptor. `None` leaves the target field untouched;
/// `Some`, including an explicitly empty string, overwrites it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub insecure: Option<bool>,
    pub credential_type: Option<CredentialType>,
    pub access_key: Option<String>,
    pub access_secret: Option<String>,
}

impl RegistryUpdate {
    /// Whether any credential sub-field is present.
    fn touches_credential(&self) -> bool {
        self.credential_type.is_some() || self.access_key.is_some() || self.access_secret.is_some()
    }

    /// Apply the present fields to a record in place. Credential sub-fields
    /// applied to a record without a credential materialize a Basic one.
    /// Timestamps are the store's responsibility.
    pub fn apply(&self, registry: &mut Registry) {
        if let Some(name) = &self.name {
            registry.name = name.clone();
        }
        if let Some(url) = &self.url {
            registry.url = url.clone();
        }
        if let Some(kind) = &self.kind {
            registry.kind = kind.clone();
        }
        if let Some(description) = &self.description {
            registry.description = Some(description.clone());
        }
        if let Some(insecure) = self.insecure {
            registry.insecure = insecure;
        }
        if self.touches_credential() {
            let credential = registry.credential.get_or_insert_with(|| Credential {
                kind: CredentialType::Basic,
                access_key: String::new(),
                access_secret: String::new(),
            });
            if let Some(kind) = self.credential_type {
                credential.kind = kind;
            }
            if let Some(access_key) = &self.access_key {
                credential.access_key = access_key.clone();
            }
            if let Some(access_secret) = &self.access_secret {
                credential.access_secret = access_secret.clone();
            }
        }
    }
}
