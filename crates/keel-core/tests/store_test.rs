//! Tests for the in-memory analysis store.

use chrono::Utc;
use keel_core::errors::StorageError;
use keel_core::models::*;
use keel_core::{AnalysisStore, InMemoryAnalysisStore};

fn feedback_loop(id: &str, entities: &[&str], loop_type: LoopType, severity: LoopSeverity) -> FeedbackLoop {
    FeedbackLoop {
        id: id.to_string(),
        entities: entities.iter().map(|e| e.to_string()).collect(),
        loop_type,
        cycle_length: entities.len(),
        severity,
        confidence: 0.75,
        resolved: false,
        detected_at: Utc::now(),
    }
}

#[test]
fn test_confidence_is_keyed_by_id_and_type() {
    let store = InMemoryAnalysisStore::new();
    let record = BayesianConfidence {
        entity_id: "auth".into(),
        entity_type: "module".into(),
        prior_alpha: JEFFREYS_PRIOR,
        prior_beta: JEFFREYS_PRIOR,
        posterior_alpha: 3.5,
        posterior_beta: 1.5,
        observation_count: 4,
        computed_at: Utc::now(),
    };
    store.upsert_bayesian_confidence(&record).unwrap();

    assert_eq!(store.get_bayesian_confidence("auth", "module").unwrap(), Some(record.clone()));
    assert_eq!(store.get_bayesian_confidence("auth", "function").unwrap(), None);

    let mut updated = record.clone();
    updated.posterior_alpha = 4.5;
    updated.observation_count = 5;
    store.upsert_bayesian_confidence(&updated).unwrap();
    assert_eq!(store.confidence_count().unwrap(), 1);
    assert_eq!(
        store.get_bayesian_confidence("auth", "module").unwrap().unwrap().observation_count,
        5
    );
}

#[test]
fn test_scc_records_replace_membership() {
    let store = InMemoryAnalysisStore::new();
    let record = SccRecord {
        entity_id: "a".into(),
        entity_type: "module".into(),
        component_id: "scc-0".into(),
        component_size: 2,
        members: vec!["a".into(), "b".into()],
        has_self_loop: false,
    };
    store.store_scc_records(std::slice::from_ref(&record)).unwrap();
    let mut moved = record.clone();
    moved.component_id = "scc-3".into();
    moved.component_size = 1;
    moved.members = vec!["a".into()];
    store.store_scc_records(&[moved]).unwrap();

    let stored = store.get_scc_by_entity("a", "module").unwrap().unwrap();
    assert_eq!(stored.component_id, "scc-3");
    assert!(!stored.is_cyclic());
    assert_eq!(store.scc_count().unwrap(), 1);
}

#[test]
fn test_feedback_loop_filters() {
    let store = InMemoryAnalysisStore::new();
    store
        .store_feedback_loops(&[
            feedback_loop("loop-1", &["a", "b"], LoopType::MutualRecursion, LoopSeverity::Low),
            feedback_loop("loop-2", &["c", "d", "e"], LoopType::CircularImport, LoopSeverity::Moderate),
            feedback_loop(
                "loop-3",
                &["f", "g", "h", "i", "j"],
                LoopType::StateCycle,
                LoopSeverity::Critical,
            ),
        ])
        .unwrap();

    let all = store.get_feedback_loops(&FeedbackLoopFilter::default()).unwrap();
    assert_eq!(all.len(), 3);

    let severe = store
        .get_feedback_loops(&FeedbackLoopFilter {
            min_severity: Some(LoopSeverity::Moderate),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(severe.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(), ["loop-2", "loop-3"]);

    let by_type = store
        .get_feedback_loops(&FeedbackLoopFilter {
            loop_type: Some(LoopType::StateCycle),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_type.len(), 1);

    let by_entity = store
        .get_feedback_loops(&FeedbackLoopFilter {
            entity_id: Some("d".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_entity[0].id, "loop-2");
}

#[test]
fn test_resolution_survives_redetection() {
    let store = InMemoryAnalysisStore::new();
    let detected = feedback_loop("loop-1", &["a", "b"], LoopType::MutualRecursion, LoopSeverity::Low);
    store.store_feedback_loops(std::slice::from_ref(&detected)).unwrap();
    store.resolve_feedback_loop("loop-1").unwrap();

    assert!(store.get_feedback_loops(&FeedbackLoopFilter::unresolved()).unwrap().is_empty());

    store.store_feedback_loops(&[detected]).unwrap();
    let all = store.get_feedback_loops(&FeedbackLoopFilter::default()).unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].resolved);
}

#[test]
fn test_resolve_unknown_loop_is_not_found() {
    let store = InMemoryAnalysisStore::new();
    let err = store.resolve_feedback_loop("loop-missing").unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[test]
fn test_stability_round_trip_through_json() {
    let store = InMemoryAnalysisStore::new();
    let metrics = StabilityMetrics {
        entity_id: "billing".into(),
        entity_type: "module".into(),
        volatility: 0.12,
        trend: -0.01,
        mean_reversion_rate: 0.4,
        half_life_days: None,
        window_days: 30.0,
        computed_at: Utc::now(),
    };
    store.upsert_stability_metrics(&metrics).unwrap();
    let stored = store.get_stability_metrics("billing", "module").unwrap().unwrap();
    let json = serde_json::to_string(&stored).unwrap();
    let back: StabilityMetrics = serde_json::from_str(&json).unwrap();
    assert_eq!(back, metrics);
}

#[test]
fn test_store_is_shareable_across_threads() {
    let store = std::sync::Arc::new(InMemoryAnalysisStore::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                let loop_id = format!("loop-{i}");
                store
                    .store_feedback_loops(&[feedback_loop(
                        &loop_id,
                        &["x", "y"],
                        LoopType::MutualRecursion,
                        LoopSeverity::Low,
                    )])
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.get_feedback_loops(&FeedbackLoopFilter::default()).unwrap().len(), 4);
}
