//! Confidence model errors.

use super::error_code::{self, KeelErrorCode};

/// Errors raised by the probabilistic layer for invalid caller input.
/// Degenerate Beta parameters are never an error; they fall back to the prior.
#[derive(Debug, thiserror::Error)]
pub enum ConfidenceError {
    #[error("Invalid weight for {parameter}: {value} (must be within [0, 1])")]
    InvalidWeight { parameter: String, value: f64 },

    #[error("Invalid aggregation weights: {message}")]
    InvalidWeights { message: String },

    #[error("Invalid credible level {level} (must be within (0, 1))")]
    InvalidCredibleLevel { level: f64 },

    #[error("Estimate {index} has a non-finite mean ({mean})")]
    NonFiniteEstimate { index: usize, mean: f64 },
}

impl KeelErrorCode for ConfidenceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidWeight { .. } | Self::InvalidWeights { .. } => error_code::INVALID_WEIGHT,
            Self::InvalidCredibleLevel { .. } | Self::NonFiniteEstimate { .. } => {
                error_code::CONFIDENCE_ERROR
            }
        }
    }
}
