//! Error types for the Facultrack system.

use thiserror::Error;

use crate::models::inspection::InspectionStatus;

#[derive(Debug, Error)]
pub enum FacultrackError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid transition: cannot {action} a record in status '{from}'")]
    InvalidTransition {
        from: InspectionStatus,
        action: &'static str,
    },

    #[error("Unauthorized: {reason}. Please sign in again")]
    Unauthorized { reason: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Conflict on {entity} {id}: expected version {expected}, found {actual}")]
    Conflict {
        entity: String,
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FacultrackError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation { .. } => "validation_failed",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Forbidden { .. } => "forbidden",
            Self::Conflict { .. } => "conflict",
            Self::Database(_) => "database_error",
            Self::Crypto(_) => "crypto_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

pub type FacultrackResult<T> = Result<T, FacultrackError>;
