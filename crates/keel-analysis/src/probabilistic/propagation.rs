//! Confidence diffusion along dependency edges.

use keel_core::confidence::{sequential, ConfidenceValue};
use keel_core::config::ConfidenceConfig;
use keel_core::errors::{AnalysisResult, ConfidenceError};
use keel_core::traits::AnalysisStore;
use keel_core::types::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use super::bayesian::load_confidence_means;
use crate::graph::GraphSnapshot;

/// Mean assumed for entities without a confidence record.
pub const DEFAULT_MEAN: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagatedConfidence {
    pub entity_id: String,
    pub own_confidence: f64,
    pub propagated_confidence: f64,
    /// The entity itself plus each known dependency, defaulted or not.
    pub contributing_sources: usize,
}

/// `w * own + (1 - w) * mean(dependency means)` for every node.
///
/// Missing means default to 0.5. Nodes without known dependencies keep
/// their own mean, so `self_weight == 1.0` is the identity.
pub fn propagate_confidence(
    snapshot: &GraphSnapshot,
    means: &BTreeMap<String, f64>,
    self_weight: f64,
) -> Result<Vec<PropagatedConfidence>, ConfidenceError> {
    if !(0.0..=1.0).contains(&self_weight) {
        return Err(ConfidenceError::InvalidWeight {
            parameter: "self_weight".to_string(),
            value: self_weight,
        });
    }
    let mean_of = |id: &str| means.get(id).copied().unwrap_or(DEFAULT_MEAN);

    let results: Vec<PropagatedConfidence> = snapshot
        .nodes()
        .map(|id| {
            let own = mean_of(id);
            let deps: Vec<f64> = snapshot.forward().successors(id).map(mean_of).collect();
            let propagated = if deps.is_empty() {
                own
            } else {
                let dep_mean = deps.iter().sum::<f64>() / deps.len() as f64;
                self_weight * own + (1.0 - self_weight) * dep_mean
            };
            PropagatedConfidence {
                entity_id: id.to_string(),
                own_confidence: own,
                propagated_confidence: propagated.clamp(0.0, 1.0),
                contributing_sources: 1 + deps.len(),
            }
        })
        .collect();

    tracing::debug!(
        nodes = results.len(),
        known = means.len(),
        self_weight,
        "propagated confidence"
    );
    Ok(results)
}

/// [`propagate_confidence`] with means loaded from the store and the
/// configured self weight.
pub fn propagate_stored_confidence(
    store: &dyn AnalysisStore,
    snapshot: &GraphSnapshot,
    config: &ConfidenceConfig,
) -> AnalysisResult<Vec<PropagatedConfidence>> {
    let means = load_confidence_means(store, snapshot)?;
    Ok(propagate_confidence(snapshot, &means, config.effective_self_weight())?)
}

/// Confidence of a dependency path under the weakest-link rule.
/// Unknown entities contribute the default mean; an empty path is `Absent`.
pub fn path_confidence(path: &[String], means: &BTreeMap<String, f64>) -> ConfidenceValue {
    let steps: Vec<ConfidenceValue> = path
        .iter()
        .map(|id| match means.get(id) {
            Some(&mean) => ConfidenceValue::measured(mean, 1, format!("posterior mean of {id}")),
            None => ConfidenceValue::measured(DEFAULT_MEAN, 0, format!("default for {id}")),
        })
        .collect();
    sequential(&steps)
}
