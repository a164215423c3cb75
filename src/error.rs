//! # Error Taxonomy
//!
//! The classification contract every caller of the registry service depends
//! on. Lower layers (store, probe) produce these variants directly and the
//! service propagates them unchanged, only fronting Forbidden/InvalidInput
//! checks of its own.

use thiserror::Error;

/// Classified failure modes for registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Malformed or missing required data. Never reaches storage or network.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Authorization denied. Checked before any lookup so the response never
    /// leaks whether the target record exists.
    #[error("operation not permitted for the requesting principal")]
    Forbidden,

    /// The referenced id or name does not exist.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Uniqueness violation on a registry name.
    #[error("registry name already in use: {name}")]
    Conflict { name: String },

    /// Store or network fault; the operation could not be completed.
    #[error("internal failure: {message}")]
    Internal { message: String },
}

impl RegistryError {
    /// Create an InvalidInput error naming the offending field or value.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a NotFound error naming what was looked up.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a Conflict error carrying the colliding name.
    pub fn conflict(name: impl Into<String>) -> Self {
        Self::Conflict { name: name.into() }
    }

    /// Create an Internal error with failure context.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
