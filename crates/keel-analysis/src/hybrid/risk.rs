//! Risk propagation: `1 - confidence` diffused along dependency edges.

use std::cmp::Ordering;

use keel_core::config::RiskConfig;
use keel_core::errors::AnalysisResult;
use keel_core::traits::AnalysisStore;
use keel_core::types::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::graph::GraphSnapshot;
use crate::probabilistic::bayesian::load_confidence_means;
use crate::probabilistic::propagation::DEFAULT_MEAN;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPropagationResult {
    pub entity_id: String,
    /// `1 - confidence mean`.
    pub direct_risk: f64,
    /// Direct risk plus a weighted share of each dependency's direct risk.
    /// Not capped at 1.
    pub propagated_risk: f64,
    /// Dependencies whose direct risk exceeds the contribution threshold, sorted.
    pub risk_sources: Vec<String>,
    /// Nodes that depend on this one.
    pub dependent_count: usize,
}

/// Risk for every node from the given confidence means (0.5 when missing).
/// Sorted by descending propagated risk, ties by id.
pub fn propagate_risk(
    snapshot: &GraphSnapshot,
    means: &BTreeMap<String, f64>,
    config: &RiskConfig,
) -> Vec<RiskPropagationResult> {
    let weight = config.effective_propagation_weight();
    let threshold = config.effective_contribution_threshold();
    let direct = |id: &str| 1.0 - means.get(id).copied().unwrap_or(DEFAULT_MEAN).clamp(0.0, 1.0);

    let mut results: Vec<RiskPropagationResult> = snapshot
        .nodes()
        .map(|id| {
            let direct_risk = direct(id);
            let mut propagated_risk = direct_risk;
            let mut risk_sources = Vec::new();
            for dep in snapshot.forward().successors(id) {
                let dep_risk = direct(dep);
                propagated_risk += weight * dep_risk;
                if dep_risk > threshold {
                    risk_sources.push(dep.to_string());
                }
            }
            RiskPropagationResult {
                entity_id: id.to_string(),
                direct_risk,
                propagated_risk,
                risk_sources,
                dependent_count: snapshot.in_degree(id),
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.propagated_risk
            .partial_cmp(&a.propagated_risk)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });
    results
}

/// [`propagate_risk`] with means loaded from the store.
pub fn compute_risk_propagation(
    store: &dyn AnalysisStore,
    snapshot: &GraphSnapshot,
    config: &RiskConfig,
) -> AnalysisResult<Vec<RiskPropagationResult>> {
    let means = load_confidence_means(store, snapshot)?;
    let results = propagate_risk(snapshot, &means, config);
    if let Some(top) = results.first() {
        tracing::debug!(
            entities = results.len(),
            top_entity = %top.entity_id,
            top_risk = top.propagated_risk,
            "propagated risk"
        );
    }
    Ok(results)
}
