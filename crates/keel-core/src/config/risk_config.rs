//! Risk propagation configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RiskConfig {
    /// Share of a dependency's direct risk inherited by its dependents. Default: 0.5.
    pub propagation_weight: Option<f64>,
    /// Direct risk above which a dependency is listed as a risk source. Default: 0.3.
    pub contribution_threshold: Option<f64>,
}

impl RiskConfig {
    pub fn effective_propagation_weight(&self) -> f64 {
        self.propagation_weight.unwrap_or(0.5)
    }

    pub fn effective_contribution_threshold(&self) -> f64 {
        self.contribution_threshold.unwrap_or(0.3)
    }
}
