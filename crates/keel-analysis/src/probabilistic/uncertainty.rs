//! Classification of how much a confidence estimate can be trusted.

use std::fmt;

use keel_core::config::ConfidenceConfig;
use keel_core::errors::AnalysisResult;
use keel_core::models::ConfidenceEstimate;
use keel_core::traits::AnalysisStore;
use serde::{Deserialize, Serialize};

use super::bayesian::estimate_stored_confidence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl UncertaintyLevel {
    /// With the default thresholds:
    /// - low: at least 30 observations and variance <= 0.01
    /// - moderate: at least 10 observations and variance <= 0.03
    /// - high: at least 3 observations or variance <= 0.05
    /// - very high: otherwise
    pub fn classify(observations: u64, variance: f64, config: &ConfidenceConfig) -> Self {
        if observations >= config.effective_low_uncertainty_observations()
            && variance <= config.effective_low_uncertainty_variance()
        {
            Self::Low
        } else if observations >= config.effective_moderate_uncertainty_observations()
            && variance <= config.effective_moderate_uncertainty_variance()
        {
            Self::Moderate
        } else if observations >= config.effective_high_uncertainty_observations()
            || variance <= config.effective_high_uncertainty_variance()
        {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for UncertaintyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    Minimal,
    Sufficient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyReport {
    pub entity_id: String,
    pub mean: f64,
    pub variance: f64,
    pub interval_width: f64,
    pub observations: u64,
    pub uncertainty_level: UncertaintyLevel,
    pub data_quality: DataQuality,
    pub recommendation: String,
}

pub fn generate_uncertainty_report(
    entity_id: &str,
    estimate: &ConfidenceEstimate,
    config: &ConfidenceConfig,
) -> UncertaintyReport {
    let uncertainty_level = UncertaintyLevel::classify(estimate.observations, estimate.variance, config);
    let minimal_threshold = config.effective_minimal_data_threshold();
    let data_quality = if estimate.observations < minimal_threshold {
        DataQuality::Minimal
    } else {
        DataQuality::Sufficient
    };
    let low_mean = estimate.mean < config.effective_low_mean_threshold();

    let recommendation = match (data_quality, low_mean) {
        (DataQuality::Minimal, true) => format!(
            "Low confidence ({:.2}) from only {} observations: collect at least {} and review {} for quality issues",
            estimate.mean, estimate.observations, minimal_threshold, entity_id
        ),
        (DataQuality::Minimal, false) => format!(
            "Only {} observations: collect at least {} before relying on this estimate",
            estimate.observations, minimal_threshold
        ),
        (DataQuality::Sufficient, true) => format!(
            "Consistently low confidence ({:.2}): investigate {} for quality issues",
            estimate.mean, entity_id
        ),
        (DataQuality::Sufficient, false) => match uncertainty_level {
            UncertaintyLevel::Low | UncertaintyLevel::Moderate => {
                "Estimate is reliable; no action needed".to_string()
            }
            UncertaintyLevel::High | UncertaintyLevel::VeryHigh => {
                "Outcomes are inconsistent: keep collecting observations".to_string()
            }
        },
    };

    UncertaintyReport {
        entity_id: entity_id.to_string(),
        mean: estimate.mean,
        variance: estimate.variance,
        interval_width: estimate.interval_width(),
        observations: estimate.observations,
        uncertainty_level,
        data_quality,
        recommendation,
    }
}

/// Report for a stored entity. Entities without a record get the
/// uninformative estimate.
pub fn report_stored_uncertainty(
    store: &dyn AnalysisStore,
    entity_id: &str,
    entity_type: &str,
    config: &ConfidenceConfig,
) -> AnalysisResult<UncertaintyReport> {
    let estimate = estimate_stored_confidence(store, entity_id, entity_type, config)?
        .unwrap_or_else(ConfidenceEstimate::uninformative);
    Ok(generate_uncertainty_report(entity_id, &estimate, config))
}
