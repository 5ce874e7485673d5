//! Top-level analysis error.

use super::error_code::KeelErrorCode;
use super::{ConfidenceError, ConfigError, GraphError, StorageError};

/// Errors that can occur while running an analysis.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Confidence error: {0}")]
    Confidence(#[from] ConfidenceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl KeelErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.error_code(),
            Self::Confidence(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
