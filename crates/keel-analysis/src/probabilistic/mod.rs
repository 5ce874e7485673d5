//! Bayesian confidence: posteriors, propagation, aggregation, stability,
//! and uncertainty reporting.

pub mod aggregation;
pub mod bayesian;
pub mod propagation;
pub mod stability;
pub mod uncertainty;

pub use aggregation::aggregate_confidence;
pub use bayesian::{
    apply_observations, beta_mean, beta_variance, compute_confidence_estimate,
    create_initial_confidence, credible_interval, estimate_stored_confidence,
    load_confidence_means, record_outcome, update_confidence,
};
pub use propagation::{
    path_confidence, propagate_confidence, propagate_stored_confidence, PropagatedConfidence,
};
pub use stability::{analyze_entity_stability, compute_stability_from_history, StabilitySummary};
pub use uncertainty::{
    generate_uncertainty_report, report_stored_uncertainty, DataQuality, UncertaintyLevel,
    UncertaintyReport,
};
