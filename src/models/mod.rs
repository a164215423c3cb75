//! Data model for registry configuration records.

pub mod registry;

pub use registry::{Credential, CredentialType, NewRegistry, Registry, RegistryUpdate};
