//! Graph construction and traversal errors.

use super::error_code::{self, KeelErrorCode};

/// Errors raised by the deterministic graph layer.
///
/// Edges that reference unknown nodes are skipped, not reported here.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid line range for {function_id}: start {start_line} > end {end_line}")]
    InvalidLineRange {
        function_id: String,
        start_line: u32,
        end_line: u32,
    },

    #[error("Unknown node: {id}")]
    UnknownNode { id: String },
}

impl KeelErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidLineRange { .. } => error_code::INVALID_LINE_RANGE,
            Self::UnknownNode { .. } => error_code::GRAPH_ERROR,
        }
    }
}
