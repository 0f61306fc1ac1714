//! Global application error types and handlers.
//!
//! This module defines the domain errors used across the backend. Handlers
//! convert them into HTTP responses through `api::common::service_error_to_http`;
//! token-validation detail (expired vs malformed vs bad signature) never
//! crosses that boundary, it is logged and collapsed into a generic 401.

use thiserror::Error;

/// Generic service error used across all entities and the auth flows.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad username/password at login. One variant for both causes so the
    /// response cannot be used to probe for valid usernames.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Missing/invalid/expired token at the gate or in the refresh flow.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Refresh target deleted or deactivated since the token was issued.
    #[error("Subject no longer exists: {identifier}")]
    SubjectNotFound { identifier: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("{entity} already exists: {identifier}")]
    AlreadyExists { entity: String, identifier: String },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn already_exists(entity: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity: entity.into(),
            identifier: identifier.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}
