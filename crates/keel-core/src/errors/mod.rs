//! Error handling for Keel.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod analysis_error;
pub mod config_error;
pub mod confidence_error;
pub mod error_code;
pub mod graph_error;
pub mod storage_error;

pub use analysis_error::{AnalysisError, AnalysisResult};
pub use config_error::ConfigError;
pub use confidence_error::ConfidenceError;
pub use error_code::KeelErrorCode;
pub use graph_error::GraphError;
pub use storage_error::{StorageError, StorageResult};
