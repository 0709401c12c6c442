//! Application errors - The failure taxonomy callers branch on

use crate::application::ports::outbound::PersistenceError;
use crate::domain::entities::{DomainError, EntityKind};
use crate::domain::value_objects::{FieldError, ValidationError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// One or more field rules failed; never retried
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced aggregate does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The store failed; propagated unchanged, never retried here
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Request was cancelled")]
    Cancelled,

    #[error("No handler registered for {0}")]
    HandlerNotRegistered(&'static str),
}

impl AppError {
    pub fn not_found(entity: EntityKind, id: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable, lower-case tag for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound { .. } => "not_found",
            AppError::Domain(_) => "domain",
            AppError::Persistence(_) => "persistence",
            AppError::Cancelled => "cancelled",
            AppError::HandlerNotRegistered(_) => "internal",
        }
    }
}

impl From<FieldError> for AppError {
    fn from(error: FieldError) -> Self {
        AppError::Validation(error.into())
    }
}
