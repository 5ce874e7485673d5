//! KeelErrorCode trait for structured error reporting.

/// Every Keel error enum implements this to expose a stable code string
/// that survives message rewording (used by callers that log or forward
/// errors across process boundaries).
pub trait KeelErrorCode {
    /// Returns the error code string (e.g., "GRAPH_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const GRAPH_ERROR: &str = "GRAPH_ERROR";
pub const INVALID_LINE_RANGE: &str = "INVALID_LINE_RANGE";
pub const CONFIDENCE_ERROR: &str = "CONFIDENCE_ERROR";
pub const INVALID_WEIGHT: &str = "INVALID_WEIGHT";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const STORAGE_LOCK_POISONED: &str = "STORAGE_LOCK_POISONED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
