//! HTTP handlers for the registry API.

pub mod health;
pub mod registries;
