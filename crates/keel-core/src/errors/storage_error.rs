//! Storage collaborator errors.

use super::error_code::{self, KeelErrorCode};

/// Errors surfaced by an [`AnalysisStore`](crate::traits::AnalysisStore)
/// implementation. The engine never retries; these propagate unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage backend error: {message}")]
    Backend { message: String },

    #[error("Record not found: {kind} {id}")]
    NotFound { kind: String, id: String },

    #[error("Storage lock poisoned: {resource}")]
    LockPoisoned { resource: String },

    #[error("Record serialization failed: {message}")]
    Serialization { message: String },
}

impl KeelErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned { .. } => error_code::STORAGE_LOCK_POISONED,
            _ => error_code::STORAGE_ERROR,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
