//! Tests for the error enums and their codes.

use keel_core::errors::error_code;
use keel_core::errors::*;

#[test]
fn test_every_variant_has_a_code() {
    let cases: Vec<(Box<dyn Fn() -> String>, &str)> = vec![
        (
            Box::new(|| {
                GraphError::InvalidLineRange {
                    function_id: "f".into(),
                    start_line: 10,
                    end_line: 3,
                }
                .coded_string()
            }),
            error_code::INVALID_LINE_RANGE,
        ),
        (
            Box::new(|| GraphError::UnknownNode { id: "x".into() }.coded_string()),
            error_code::GRAPH_ERROR,
        ),
        (
            Box::new(|| {
                ConfidenceError::InvalidWeight {
                    parameter: "self_weight".into(),
                    value: 1.5,
                }
                .coded_string()
            }),
            error_code::INVALID_WEIGHT,
        ),
        (
            Box::new(|| ConfidenceError::InvalidCredibleLevel { level: 1.0 }.coded_string()),
            error_code::CONFIDENCE_ERROR,
        ),
        (
            Box::new(|| {
                ConfidenceError::NonFiniteEstimate {
                    index: 0,
                    mean: f64::NAN,
                }
                .coded_string()
            }),
            error_code::CONFIDENCE_ERROR,
        ),
        (
            Box::new(|| {
                StorageError::LockPoisoned {
                    resource: "scc".into(),
                }
                .coded_string()
            }),
            error_code::STORAGE_LOCK_POISONED,
        ),
        (
            Box::new(|| {
                StorageError::Backend {
                    message: "disk full".into(),
                }
                .coded_string()
            }),
            error_code::STORAGE_ERROR,
        ),
        (
            Box::new(|| {
                ConfigError::FileNotFound {
                    path: "keel.toml".into(),
                }
                .coded_string()
            }),
            error_code::CONFIG_ERROR,
        ),
    ];

    for (render, code) in cases {
        let rendered = render();
        assert!(
            rendered.starts_with(&format!("[{code}] ")),
            "{rendered} should start with [{code}]"
        );
    }
}

#[test]
fn test_analysis_error_preserves_inner_code() {
    let inner = GraphError::InvalidLineRange {
        function_id: "parse".into(),
        start_line: 20,
        end_line: 5,
    };
    let err: AnalysisError = inner.into();
    assert_eq!(err.error_code(), error_code::INVALID_LINE_RANGE);
    assert!(err.to_string().contains("start 20 > end 5"));

    let err: AnalysisError = StorageError::NotFound {
        kind: "feedback_loop".into(),
        id: "loop-1".into(),
    }
    .into();
    assert_eq!(err.error_code(), error_code::STORAGE_ERROR);
}

#[test]
fn test_question_mark_converts_subsystem_errors() {
    fn failing() -> AnalysisResult<()> {
        Err(ConfidenceError::InvalidWeights {
            message: "length mismatch".into(),
        })?;
        Ok(())
    }
    let err = failing().unwrap_err();
    assert!(matches!(err, AnalysisError::Confidence(_)));
    assert_eq!(err.error_code(), error_code::INVALID_WEIGHT);
}
