//! Control stability configuration.

use serde::{Deserialize, Serialize};

/// Thresholds used when fusing structural risk with volatility.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StabilityConfig {
    /// Volatility at or above this marks an entity volatile. Default: 0.3.
    pub volatile_threshold: Option<f64>,
    /// Volatility at or below this marks an entity stable. Default: 0.1.
    pub stable_threshold: Option<f64>,
    /// Weight of `1 - feedback_loop_risk` when volatility data exists. Default: 0.6.
    pub structural_weight: Option<f64>,
}

impl StabilityConfig {
    pub fn effective_volatile_threshold(&self) -> f64 {
        self.volatile_threshold.unwrap_or(0.3)
    }

    pub fn effective_stable_threshold(&self) -> f64 {
        self.stable_threshold.unwrap_or(0.1)
    }

    pub fn effective_structural_weight(&self) -> f64 {
        self.structural_weight.unwrap_or(0.6)
    }
}
