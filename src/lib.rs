//! # Registry Service
//!
//! Authorization-gated configuration service for remote replication
//! endpoints. Privileged operators create, inspect, update, delete, and
//! health-check registry records; every other principal is denied all of it.
//!
//! ## Module Organization
//!
//! - [`models`] - Registry records, credentials, and the partial-update descriptor
//! - [`authz`] - Role-based policy table over registry actions
//! - [`store`] - Persistence abstraction (in-memory and Postgres backends)
//! - [`probe`] - On-demand connectivity probe against remote endpoints
//! - [`service`] - Orchestration: authorize, validate, delegate, classify
//! - [`web`] - Axum HTTP surface mapping the error taxonomy to status codes
//! - [`config`] - Environment-driven configuration
//! - [`error`] - The classified error taxonomy
//! - [`logging`] - Structured tracing setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use registry_service::probe::HttpProbe;
//! use registry_service::service::RegistryService;
//! use registry_service::store::InMemoryRegistryStore;
//!
//! let service = RegistryService::new(
//!     Arc::new(InMemoryRegistryStore::new()),
//!     Arc::new(HttpProbe::new(Duration::from_secs(30))),
//! );
//! ```

pub mod authz;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod probe;
pub mod service;
pub mod store;
pub mod web;

pub use authz::{authorize, Action, Principal, Role};
pub use config::ServiceConfig;
pub use error::{RegistryError, Result};
pub use models::{Credential, CredentialType, NewRegistry, Registry, RegistryUpdate};
pub use service::{PingRequest, RegistryService};
