//! Probabilistic layer configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the Bayesian confidence model, propagation, and
/// uncertainty reporting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Credible interval mass. Default: 0.95.
    pub credible_level: Option<f64>,
    /// Weight of an entity's own confidence during propagation. Default: 0.7.
    pub self_weight: Option<f64>,
    /// Observations below this count are `minimal` data quality. Default: 10.
    pub minimal_data_threshold: Option<u64>,
    /// Posterior means below this are treated as low confidence. Default: 0.5.
    pub low_mean_threshold: Option<f64>,
    /// Observations needed for `low` uncertainty. Default: 30.
    pub low_uncertainty_observations: Option<u64>,
    /// Largest variance still `low` uncertainty. Default: 0.01.
    pub low_uncertainty_variance: Option<f64>,
    /// Observations needed for `moderate` uncertainty. Default: 10.
    pub moderate_uncertainty_observations: Option<u64>,
    /// Largest variance still `moderate` uncertainty. Default: 0.03.
    pub moderate_uncertainty_variance: Option<f64>,
    /// Observations that alone keep uncertainty at `high`. Default: 3.
    pub high_uncertainty_observations: Option<u64>,
    /// Variance that alone keeps uncertainty at `high`. Default: 0.05.
    pub high_uncertainty_variance: Option<f64>,
}

impl ConfidenceConfig {
    /// Returns the effective credible level, defaulting to 0.95.
    pub fn effective_credible_level(&self) -> f64 {
        self.credible_level.unwrap_or(0.95)
    }

    /// Returns the effective propagation self weight, defaulting to 0.7.
    pub fn effective_self_weight(&self) -> f64 {
        self.self_weight.unwrap_or(0.7)
    }

    /// Returns the effective minimal-data threshold, defaulting to 10.
    pub fn effective_minimal_data_threshold(&self) -> u64 {
        self.minimal_data_threshold.unwrap_or(10)
    }

    /// Returns the effective low-mean threshold, defaulting to 0.5.
    pub fn effective_low_mean_threshold(&self) -> f64 {
        self.low_mean_threshold.unwrap_or(0.5)
    }

    pub fn effective_low_uncertainty_observations(&self) -> u64 {
        self.low_uncertainty_observations.unwrap_or(30)
    }

    pub fn effective_low_uncertainty_variance(&self) -> f64 {
        self.low_uncertainty_variance.unwrap_or(0.01)
    }

    pub fn effective_moderate_uncertainty_observations(&self) -> u64 {
        self.moderate_uncertainty_observations.unwrap_or(10)
    }

    pub fn effective_moderate_uncertainty_variance(&self) -> f64 {
        self.moderate_uncertainty_variance.unwrap_or(0.03)
    }

    pub fn effective_high_uncertainty_observations(&self) -> u64 {
        self.high_uncertainty_observations.unwrap_or(3)
    }

    pub fn effective_high_uncertainty_variance(&self) -> f64 {
        self.high_uncertainty_variance.unwrap_or(0.05)
    }
}
