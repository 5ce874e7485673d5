//! System health configuration.

use serde::{Deserialize, Serialize};

/// Sub-score weights and thresholds for the system health report.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HealthConfig {
    /// Weight of structural health. Default: 0.30.
    pub structural_weight: Option<f64>,
    /// Weight of confidence health. Default: 0.25.
    pub confidence_weight: Option<f64>,
    /// Weight of stability health. Default: 0.25.
    pub stability_weight: Option<f64>,
    /// Weight of coupling health. Default: 0.20.
    pub coupling_weight: Option<f64>,
    /// Sub-scores below this raise a critical issue. Default: 40.
    pub critical_floor: Option<f64>,
    /// Average efferent/afferent coupling above this is penalized. Default: 5.0.
    pub coupling_threshold: Option<f64>,
    /// A node whose in- or out-degree exceeds this is extremely coupled. Default: 20.
    pub extreme_coupling_degree: Option<usize>,
}

impl HealthConfig {
    pub fn effective_structural_weight(&self) -> f64 {
        self.structural_weight.unwrap_or(0.30)
    }

    pub fn effective_confidence_weight(&self) -> f64 {
        self.confidence_weight.unwrap_or(0.25)
    }

    pub fn effective_stability_weight(&self) -> f64 {
        self.stability_weight.unwrap_or(0.25)
    }

    pub fn effective_coupling_weight(&self) -> f64 {
        self.coupling_weight.unwrap_or(0.20)
    }

    pub fn effective_critical_floor(&self) -> f64 {
        self.critical_floor.unwrap_or(40.0)
    }

    pub fn effective_coupling_threshold(&self) -> f64 {
        self.coupling_threshold.unwrap_or(5.0)
    }

    pub fn effective_extreme_coupling_degree(&self) -> usize {
        self.extreme_coupling_degree.unwrap_or(20)
    }
}
