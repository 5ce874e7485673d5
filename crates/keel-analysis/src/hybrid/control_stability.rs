//! Control stability: structural loop risk fused with observed volatility.

use keel_core::config::StabilityConfig;
use keel_core::errors::AnalysisResult;
use keel_core::models::FeedbackLoop;
use keel_core::traits::AnalysisStore;
use keel_core::types::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::graph::GraphSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlStabilityReport {
    /// Share of nodes that sit in at least one feedback loop.
    pub feedback_loop_risk: f64,
    pub overall_stability: f64,
    /// Sorted ids with volatility at or above the volatile threshold.
    pub volatile_entities: Vec<String>,
    /// Sorted ids with volatility at or below the stable threshold.
    pub stable_entities: Vec<String>,
    pub loop_count: usize,
    /// Nodes with stored stability metrics.
    pub entities_with_metrics: usize,
    pub mean_volatility: Option<f64>,
}

/// `overall = w (1 - risk) + (1 - w) mean(1 - volatility)` over nodes with
/// stored metrics, or `1 - risk` when none have metrics.
pub fn compute_control_stability(
    store: &dyn AnalysisStore,
    snapshot: &GraphSnapshot,
    loops: &[FeedbackLoop],
    config: &StabilityConfig,
) -> AnalysisResult<ControlStabilityReport> {
    let in_loops: BTreeSet<&str> = loops
        .iter()
        .flat_map(|l| l.entities.iter().map(String::as_str))
        .filter(|id| snapshot.forward().contains(id))
        .collect();
    let node_count = snapshot.node_count();
    let feedback_loop_risk = if node_count == 0 {
        0.0
    } else {
        in_loops.len() as f64 / node_count as f64
    };

    let volatile_threshold = config.effective_volatile_threshold();
    let stable_threshold = config.effective_stable_threshold();
    let mut volatilities = Vec::new();
    let mut volatile_entities = Vec::new();
    let mut stable_entities = Vec::new();

    for id in snapshot.nodes() {
        let Some(metrics) = store.get_stability_metrics(id, snapshot.entity_type())? else {
            continue;
        };
        let volatility = metrics.volatility.clamp(0.0, 1.0);
        volatilities.push(volatility);
        if volatility >= volatile_threshold {
            volatile_entities.push(id.to_string());
        }
        if volatility <= stable_threshold {
            stable_entities.push(id.to_string());
        }
    }

    let structural = 1.0 - feedback_loop_risk;
    let mean_volatility = if volatilities.is_empty() {
        None
    } else {
        Some(volatilities.iter().sum::<f64>() / volatilities.len() as f64)
    };
    let overall_stability = match mean_volatility {
        Some(mean) => {
            let w = config.effective_structural_weight();
            w * structural + (1.0 - w) * (1.0 - mean)
        }
        None => structural,
    };

    tracing::debug!(
        feedback_loop_risk,
        overall_stability,
        volatile = volatile_entities.len(),
        stable = stable_entities.len(),
        "computed control stability"
    );

    Ok(ControlStabilityReport {
        feedback_loop_risk,
        overall_stability: overall_stability.clamp(0.0, 1.0),
        volatile_entities,
        stable_entities,
        loop_count: loops.len(),
        entities_with_metrics: volatilities.len(),
        mean_volatility,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ModuleGraph;
    use crate::hybrid::feedback_loops::detect_feedback_loops;
    use chrono::Utc;
    use keel_core::models::StabilityMetrics;
    use keel_core::InMemoryAnalysisStore;

    fn metrics(id: &str, volatility: f64) -> StabilityMetrics {
        StabilityMetrics {
            entity_id: id.to_string(),
            entity_type: "module".to_string(),
            volatility,
            trend: 0.0,
            mean_reversion_rate: 0.0,
            half_life_days: None,
            window_days: 10.0,
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn test_dag_without_metrics_is_fully_stable() {
        let store = InMemoryAnalysisStore::new();
        let snapshot = GraphSnapshot::new(ModuleGraph::from_edges([("a", "b")]));
        let report = compute_control_stability(&store, &snapshot, &[], &StabilityConfig::default()).unwrap();
        assert_eq!(report.feedback_loop_risk, 0.0);
        assert_eq!(report.overall_stability, 1.0);
        assert_eq!(report.mean_volatility, None);
    }

    #[test]
    fn test_full_cycle_without_metrics() {
        let store = InMemoryAnalysisStore::new();
        let snapshot = GraphSnapshot::new(ModuleGraph::from_edges([("a", "b"), ("b", "a")]));
        let loops = detect_feedback_loops(&snapshot);
        let report =
            compute_control_stability(&store, &snapshot, &loops, &StabilityConfig::default()).unwrap();
        assert_eq!(report.feedback_loop_risk, 1.0);
        assert_eq!(report.overall_stability, 0.0);
        assert_eq!(report.loop_count, 1);
    }

    #[test]
    fn test_volatility_blend_and_lists() {
        let store = InMemoryAnalysisStore::new();
        store.upsert_stability_metrics(&metrics("b", 0.5)).unwrap();
        store.upsert_stability_metrics(&metrics("a", 0.05)).unwrap();
        let snapshot = GraphSnapshot::new(ModuleGraph::from_edges([("a", "b"), ("c", "b")]));
        let report = compute_control_stability(&store, &snapshot, &[], &StabilityConfig::default()).unwrap();

        // 0.6 * 1.0 + 0.4 * (1 - 0.275)
        assert!((report.overall_stability - 0.89).abs() < 1e-12);
        assert_eq!(report.volatile_entities, ["b"]);
        assert_eq!(report.stable_entities, ["a"]);
        assert_eq!(report.entities_with_metrics, 2);
    }
}
