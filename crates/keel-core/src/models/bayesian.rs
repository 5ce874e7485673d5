//! Beta-Bernoulli confidence record and its derived estimate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Jeffreys prior: Beta(0.5, 0.5).
pub const JEFFREYS_PRIOR: f64 = 0.5;

/// Per-entity Beta posterior.
///
/// Invariants: `posterior_alpha >= prior_alpha`, `posterior_beta >= prior_beta`,
/// both priors `> 0`, and
/// `observation_count == (posterior_alpha - prior_alpha) + (posterior_beta - prior_beta)`.
/// Records are only ever superseded by updated copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianConfidence {
    pub entity_id: String,
    pub entity_type: String,
    pub prior_alpha: f64,
    pub prior_beta: f64,
    pub posterior_alpha: f64,
    pub posterior_beta: f64,
    pub observation_count: u64,
    pub computed_at: DateTime<Utc>,
}

impl BayesianConfidence {
    /// Successes observed since the prior.
    pub fn successes(&self) -> f64 {
        self.posterior_alpha - self.prior_alpha
    }

    /// Failures observed since the prior.
    pub fn failures(&self) -> f64 {
        self.posterior_beta - self.prior_beta
    }
}

/// Summary statistics derived from a [`BayesianConfidence`]. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceEstimate {
    pub mean: f64,
    pub variance: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub observations: u64,
}

impl ConfidenceEstimate {
    /// The uninformative estimate returned when nothing is known.
    pub fn uninformative() -> Self {
        Self {
            mean: 0.5,
            variance: 0.25,
            lower_bound: 0.0,
            upper_bound: 1.0,
            observations: 0,
        }
    }

    /// Width of the credible interval.
    pub fn interval_width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}
