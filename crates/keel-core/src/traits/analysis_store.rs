use crate::errors::StorageResult;
use crate::models::{
    BayesianConfidence, FeedbackLoop, FeedbackLoopFilter, SccRecord, StabilityMetrics,
};

/// Typed persistence for analysis records, keyed by `(entity_id, entity_type)`.
///
/// Implementations use interior mutability; every method takes `&self`.
/// Errors propagate to the caller unchanged.
pub trait AnalysisStore: Send + Sync {
    // --- SCC membership ---
    fn get_scc_by_entity(&self, entity_id: &str, entity_type: &str)
        -> StorageResult<Option<SccRecord>>;
    /// Replace the membership of every entity in `records`.
    fn store_scc_records(&self, records: &[SccRecord]) -> StorageResult<()>;

    // --- Bayesian confidence ---
    fn get_bayesian_confidence(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> StorageResult<Option<BayesianConfidence>>;
    fn upsert_bayesian_confidence(&self, record: &BayesianConfidence) -> StorageResult<()>;

    // --- Stability ---
    fn get_stability_metrics(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> StorageResult<Option<StabilityMetrics>>;
    fn upsert_stability_metrics(&self, metrics: &StabilityMetrics) -> StorageResult<()>;

    // --- Feedback loops ---
    /// Loops matching `filter`, ordered by id.
    fn get_feedback_loops(&self, filter: &FeedbackLoopFilter) -> StorageResult<Vec<FeedbackLoop>>;
    /// Insert or supersede loops by id. A superseded loop keeps its `resolved` flag.
    fn store_feedback_loops(&self, loops: &[FeedbackLoop]) -> StorageResult<()>;
    /// Mark a loop resolved. Returns `NotFound` for an unknown id.
    fn resolve_feedback_loop(&self, loop_id: &str) -> StorageResult<()>;
}
