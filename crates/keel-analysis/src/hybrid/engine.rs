//! AnalysisEngine: runs the full pipeline against a store.
//!
//! SCC membership → feedback loops → control stability → risk → health.

use std::time::Instant;

use keel_core::config::KeelConfig;
use keel_core::errors::AnalysisResult;
use keel_core::models::{ConfidenceEstimate, FeedbackLoop};
use keel_core::tracing::metrics;
use keel_core::traits::AnalysisStore;
use keel_core::types::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use super::control_stability::{compute_control_stability, ControlStabilityReport};
use super::feedback_loops::{loops_from_components, store_detected_loops};
use super::risk::{compute_risk_propagation, RiskPropagationResult};
use super::system_health::{compute_system_health, SystemHealthReport};
use crate::graph::{
    find_strongly_connected_components, store_scc_components, GraphSnapshot, SccSummary,
};
use crate::probabilistic::{
    estimate_stored_confidence, propagate_stored_confidence, report_stored_uncertainty,
    PropagatedConfidence, UncertaintyReport,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysisReport {
    pub node_count: usize,
    pub edge_count: usize,
    pub scc: SccSummary,
    pub feedback_loops: Vec<FeedbackLoop>,
    pub control_stability: ControlStabilityReport,
    pub risk: Vec<RiskPropagationResult>,
    pub health: SystemHealthReport,
    /// Elapsed milliseconds per phase, keyed by metric name.
    pub phase_timings: BTreeMap<String, u64>,
}

pub struct AnalysisEngine<'a> {
    store: &'a dyn AnalysisStore,
    config: KeelConfig,
}

impl<'a> AnalysisEngine<'a> {
    pub fn new(store: &'a dyn AnalysisStore, config: KeelConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &KeelConfig {
        &self.config
    }

    /// Posterior estimate at the configured credible level, `None` without a record.
    pub fn estimate_confidence(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> AnalysisResult<Option<ConfidenceEstimate>> {
        estimate_stored_confidence(self.store, entity_id, entity_type, &self.config.confidence)
    }

    /// Stored means diffused with the configured self weight.
    pub fn propagate_confidence(
        &self,
        snapshot: &GraphSnapshot,
    ) -> AnalysisResult<Vec<PropagatedConfidence>> {
        propagate_stored_confidence(self.store, snapshot, &self.config.confidence)
    }

    /// Uncertainty report with the configured thresholds.
    pub fn uncertainty_report(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> AnalysisResult<UncertaintyReport> {
        report_stored_uncertainty(self.store, entity_id, entity_type, &self.config.confidence)
    }

    /// Run every phase in order. The first storage error aborts the run.
    pub fn run(&self, snapshot: &GraphSnapshot) -> AnalysisResult<FullAnalysisReport> {
        let node_count = snapshot.node_count();
        let edge_count = snapshot.forward().edge_count();
        let span = info_span!("keel_analysis", node_count, edge_count);
        let _guard = span.enter();
        let started = Instant::now();
        let mut phase_timings = BTreeMap::new();

        // One Tarjan pass feeds membership, loops, and structural health.
        let (components, scc) = timed(&mut phase_timings, metrics::SCC_DURATION_MS, || {
            let components = find_strongly_connected_components(snapshot);
            let summary = store_scc_components(self.store, snapshot, &components)?;
            Ok((components, summary))
        })?;
        let feedback_loops = timed(&mut phase_timings, metrics::FEEDBACK_LOOP_DURATION_MS, || {
            let loops = loops_from_components(snapshot, &components);
            store_detected_loops(self.store, &loops)?;
            Ok(loops)
        })?;
        let control_stability =
            timed(&mut phase_timings, metrics::CONTROL_STABILITY_DURATION_MS, || {
                compute_control_stability(
                    self.store,
                    snapshot,
                    &feedback_loops,
                    &self.config.stability,
                )
            })?;
        let risk = timed(&mut phase_timings, metrics::RISK_PROPAGATION_DURATION_MS, || {
            compute_risk_propagation(self.store, snapshot, &self.config.risk)
        })?;
        let health = timed(&mut phase_timings, metrics::SYSTEM_HEALTH_DURATION_MS, || {
            compute_system_health(
                self.store,
                snapshot,
                &components,
                &feedback_loops,
                &control_stability,
                &self.config.health,
            )
        })?;

        let total_ms = started.elapsed().as_millis() as u64;
        phase_timings.insert(metrics::ANALYSIS_DURATION_MS.to_string(), total_ms);
        info!(
            duration_ms = total_ms,
            loops = feedback_loops.len(),
            score = health.score,
            grade = %health.grade,
            "analysis complete"
        );

        Ok(FullAnalysisReport {
            node_count,
            edge_count,
            scc,
            feedback_loops,
            control_stability,
            risk,
            health,
            phase_timings,
        })
    }
}

fn timed<T>(
    timings: &mut BTreeMap<String, u64>,
    metric: &str,
    phase: impl FnOnce() -> AnalysisResult<T>,
) -> AnalysisResult<T> {
    let started = Instant::now();
    let result = phase();
    let elapsed = started.elapsed().as_millis() as u64;
    tracing::debug!(phase = metric, elapsed_ms = elapsed, ok = result.is_ok(), "phase finished");
    timings.insert(metric.to_string(), elapsed);
    result
}
