//! System health: one graded score fused from structural, confidence,
//! stability, and coupling sub-scores.

use std::fmt;

use keel_core::config::HealthConfig;
use keel_core::confidence::{sequential, ConfidenceValue};
use keel_core::errors::AnalysisResult;
use keel_core::models::{FeedbackLoop, LoopType};
use keel_core::traits::AnalysisStore;
use serde::{Deserialize, Serialize};

use super::control_stability::ControlStabilityReport;
use crate::graph::{GraphSnapshot, StronglyConnectedComponent};
use crate::probabilistic::bayesian::beta_mean;
use crate::probabilistic::propagation::DEFAULT_MEAN;

/// Structural points lost per extremely coupled node.
const EXTREME_COUPLING_PENALTY: f64 = 5.0;
const MAX_EXTREME_COUPLING_PENALTY: f64 = 30.0;
/// Cap on the penalty for one coupling direction.
const MAX_COUPLING_PENALTY: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthGrade {
    A,
    B,
    C,
    D,
    F,
}

impl HealthGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 80.0 {
            Self::B
        } else if score >= 70.0 {
            Self::C
        } else if score >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }
}

impl fmt::Display for HealthGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealthReport {
    pub score: f64,
    pub grade: HealthGrade,
    pub structural_health: f64,
    pub confidence_health: f64,
    pub stability_health: f64,
    pub coupling_health: f64,
    pub critical_issues: Vec<String>,
    pub recommendations: Vec<String>,
    /// How much evidence backs the score.
    pub evidence: ConfidenceValue,
}

/// `components` must come from
/// [`find_strongly_connected_components`](crate::graph::find_strongly_connected_components)
/// on `snapshot`.
pub fn compute_system_health(
    store: &dyn AnalysisStore,
    snapshot: &GraphSnapshot,
    components: &[StronglyConnectedComponent],
    loops: &[FeedbackLoop],
    control: &ControlStabilityReport,
    config: &HealthConfig,
) -> AnalysisResult<SystemHealthReport> {
    let structural_health = structural_health(snapshot, components, config);

    // Confidence: mean posterior over all nodes, missing records at 0.5.
    let mut mean_sum = 0.0;
    let mut observations = 0u64;
    let mut recorded = 0usize;
    for id in snapshot.nodes() {
        match store.get_bayesian_confidence(id, snapshot.entity_type())? {
            Some(record) => {
                mean_sum += beta_mean(record.posterior_alpha, record.posterior_beta);
                observations += record.observation_count;
                recorded += 1;
            }
            None => mean_sum += DEFAULT_MEAN,
        }
    }
    let mean_confidence = if snapshot.node_count() == 0 {
        DEFAULT_MEAN
    } else {
        mean_sum / snapshot.node_count() as f64
    };
    let confidence_health = (mean_confidence * 100.0).clamp(0.0, 100.0);
    let stability_health = (control.overall_stability * 100.0).clamp(0.0, 100.0);
    let coupling_health = coupling_health(snapshot, config);

    let weighted = [
        (config.effective_structural_weight(), structural_health),
        (config.effective_confidence_weight(), confidence_health),
        (config.effective_stability_weight(), stability_health),
        (config.effective_coupling_weight(), coupling_health),
    ];
    let total_weight: f64 = weighted.iter().map(|(w, _)| w).sum();
    let score = if total_weight > 0.0 {
        weighted.iter().map(|(w, s)| w * s).sum::<f64>() / total_weight
    } else {
        0.0
    };
    let score = score.clamp(0.0, 100.0);

    let floor = config.effective_critical_floor();
    let mut critical_issues = Vec::new();
    let mut recommendations = Vec::new();
    for (name, value, advice) in [
        (
            "structural",
            structural_health,
            "Break dependency cycles and split modules with extreme fan-in or fan-out",
        ),
        (
            "confidence",
            confidence_health,
            "Record more outcomes and review low-confidence modules",
        ),
        (
            "stability",
            stability_health,
            "Stabilize volatile modules and resolve feedback loops",
        ),
        (
            "coupling",
            coupling_health,
            "Reduce average module coupling by introducing narrower interfaces",
        ),
    ] {
        if value < floor {
            critical_issues.push(format!("{name} health is critically low ({value:.1})"));
        }
        if value < 100.0 {
            recommendations.push(format!("{advice} ({name} health {value:.1})"));
        }
    }
    for feedback_loop in loops.iter().filter(|l| l.loop_type == LoopType::StateCycle) {
        critical_issues.push(format!(
            "state cycle across {} entities: {}",
            feedback_loop.cycle_length,
            feedback_loop.entities.join(", ")
        ));
    }

    let confidence_evidence = if recorded == 0 {
        ConfidenceValue::absent("no confidence records")
    } else {
        ConfidenceValue::measured(mean_confidence, observations, "mean beta posterior")
    };
    let stability_evidence = if control.entities_with_metrics == 0 {
        ConfidenceValue::bounded(0.0, 1.0, "no stability metrics; structural risk only")
    } else {
        ConfidenceValue::measured(
            control.overall_stability,
            control.entities_with_metrics as u64,
            "structural risk blended with volatility",
        )
    };
    let evidence = sequential(&[
        ConfidenceValue::deterministic("strongly connected components"),
        confidence_evidence,
        stability_evidence,
    ]);

    let grade = HealthGrade::from_score(score);
    tracing::info!(
        score,
        %grade,
        structural = structural_health,
        confidence = confidence_health,
        stability = stability_health,
        coupling = coupling_health,
        critical = critical_issues.len(),
        "computed system health"
    );

    Ok(SystemHealthReport {
        score,
        grade,
        structural_health,
        confidence_health,
        stability_health,
        coupling_health,
        critical_issues,
        recommendations,
        evidence,
    })
}

/// `100 (1 - cyclic component ratio)` minus 5 per node whose in- or
/// out-degree exceeds the extreme coupling degree, capped at 30.
fn structural_health(
    snapshot: &GraphSnapshot,
    components: &[StronglyConnectedComponent],
    config: &HealthConfig,
) -> f64 {
    if components.is_empty() {
        return 100.0;
    }
    let cyclic = components.iter().filter(|c| c.is_cyclic()).count();
    let ratio = cyclic as f64 / components.len() as f64;

    let extreme = config.effective_extreme_coupling_degree();
    let extreme_nodes = snapshot
        .nodes()
        .filter(|id| snapshot.out_degree(id) > extreme || snapshot.in_degree(id) > extreme)
        .count();
    let penalty = (extreme_nodes as f64 * EXTREME_COUPLING_PENALTY).min(MAX_EXTREME_COUPLING_PENALTY);

    (100.0 * (1.0 - ratio) - penalty).clamp(0.0, 100.0)
}

/// Penalizes average efferent coupling (over all nodes) and average afferent
/// coupling (over nodes that have dependents) above the threshold:
/// `min(50, (avg - threshold) * 10)` each.
fn coupling_health(snapshot: &GraphSnapshot, config: &HealthConfig) -> f64 {
    let n = snapshot.node_count();
    if n == 0 {
        return 100.0;
    }
    let threshold = config.effective_coupling_threshold();
    let penalty = |avg: f64| ((avg - threshold) * 10.0).clamp(0.0, MAX_COUPLING_PENALTY);

    let edges = snapshot.forward().edge_count() as f64;
    let efferent = edges / n as f64;
    let depended_on = snapshot.nodes().filter(|id| snapshot.in_degree(id) > 0).count();
    let afferent = if depended_on == 0 {
        0.0
    } else {
        edges / depended_on as f64
    };

    (100.0 - penalty(efferent) - penalty(afferent)).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{find_strongly_connected_components, ModuleGraph};

    fn structural(snapshot: &GraphSnapshot, config: &HealthConfig) -> f64 {
        structural_health(snapshot, &find_strongly_connected_components(snapshot), config)
    }

    #[test]
    fn test_grades() {
        assert_eq!(HealthGrade::from_score(95.0), HealthGrade::A);
        assert_eq!(HealthGrade::from_score(90.0), HealthGrade::A);
        assert_eq!(HealthGrade::from_score(85.0), HealthGrade::B);
        assert_eq!(HealthGrade::from_score(70.0), HealthGrade::C);
        assert_eq!(HealthGrade::from_score(60.0), HealthGrade::D);
        assert_eq!(HealthGrade::from_score(59.9), HealthGrade::F);
    }

    #[test]
    fn test_structural_penalizes_cycles() {
        let config = HealthConfig::default();
        let dag = GraphSnapshot::new(ModuleGraph::from_edges([("a", "b")]));
        assert_eq!(structural(&dag, &config), 100.0);

        let cyclic = GraphSnapshot::new(ModuleGraph::from_edges([("a", "b"), ("b", "a"), ("c", "a")]));
        // Components {a, b} and {c}: half are cyclic.
        assert_eq!(structural(&cyclic, &config), 50.0);
    }

    #[test]
    fn test_extreme_fan_in_penalty() {
        let mut graph = ModuleGraph::new();
        for i in 0..25 {
            graph.add_edge(format!("client{i:02}"), "hub");
        }
        let snapshot = GraphSnapshot::new(graph);
        assert_eq!(structural(&snapshot, &HealthConfig::default()), 95.0);
        // 25 edges over one depended-on node.
        assert_eq!(coupling_health(&snapshot, &HealthConfig::default()), 50.0);
    }
}
