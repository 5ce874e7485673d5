//! Tests for tracing initialization.

use keel_core::tracing::{init_tracing, metrics};

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!(target: "keel", node_count = 3, "tracing initialized twice");
}

#[test]
fn test_metric_names_are_unique() {
    let names = [
        metrics::NODE_COUNT,
        metrics::EDGE_COUNT,
        metrics::SCC_DURATION_MS,
        metrics::FEEDBACK_LOOP_DURATION_MS,
        metrics::CONTROL_STABILITY_DURATION_MS,
        metrics::RISK_PROPAGATION_DURATION_MS,
        metrics::SYSTEM_HEALTH_DURATION_MS,
        metrics::ANALYSIS_DURATION_MS,
    ];
    let unique: std::collections::BTreeSet<_> = names.iter().collect();
    assert_eq!(unique.len(), names.len());
    assert!(names.iter().all(|n| n.chars().all(|c| c.is_ascii_lowercase() || c == '_')));
}
