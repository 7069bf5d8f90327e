//! Error taxonomy for engine operations

use thiserror::Error;

use crate::content::ContentError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed or out-of-range caller input. Never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A profile or plan item stayed contended for every update attempt.
    /// Transient; the caller may retry the whole request.
    #[error("Conflict: records of {user_id} still contended after {attempts} attempts")]
    Conflict { user_id: String, attempts: u32 },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Content service error: {0}")]
    Content(#[from] ContentError),
}

impl EngineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
