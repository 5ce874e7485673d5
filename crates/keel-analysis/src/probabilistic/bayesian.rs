//! Beta-Bernoulli confidence per entity.
//!
//! Prior: Jeffreys, Beta(0.5, 0.5).
//! Posterior: Beta(0.5 + successes, 0.5 + failures).
//! Credible interval: equal-tailed, via the `statrs` inverse CDF.

use chrono::Utc;
use keel_core::config::ConfidenceConfig;
use keel_core::errors::{AnalysisResult, ConfidenceError};
use keel_core::models::{BayesianConfidence, ConfidenceEstimate, JEFFREYS_PRIOR};
use keel_core::traits::AnalysisStore;
use keel_core::types::collections::BTreeMap;
use statrs::distribution::{Beta, ContinuousCDF};

use crate::graph::GraphSnapshot;

/// A fresh record carrying only the Jeffreys prior.
pub fn create_initial_confidence(entity_id: &str, entity_type: &str) -> BayesianConfidence {
    BayesianConfidence {
        entity_id: entity_id.to_string(),
        entity_type: entity_type.to_string(),
        prior_alpha: JEFFREYS_PRIOR,
        prior_beta: JEFFREYS_PRIOR,
        posterior_alpha: JEFFREYS_PRIOR,
        posterior_beta: JEFFREYS_PRIOR,
        observation_count: 0,
        computed_at: Utc::now(),
    }
}

/// Record one observation. Returns a new record; the input is untouched.
pub fn update_confidence(record: &BayesianConfidence, success: bool) -> BayesianConfidence {
    if success {
        apply_observations(record, 1, 0)
    } else {
        apply_observations(record, 0, 1)
    }
}

/// Record a batch of observations.
pub fn apply_observations(
    record: &BayesianConfidence,
    successes: u64,
    failures: u64,
) -> BayesianConfidence {
    BayesianConfidence {
        posterior_alpha: record.posterior_alpha + successes as f64,
        posterior_beta: record.posterior_beta + failures as f64,
        observation_count: record.observation_count + successes + failures,
        computed_at: Utc::now(),
        ..record.clone()
    }
}

/// `alpha / (alpha + beta)`, or 0.5 for degenerate parameters.
pub fn beta_mean(alpha: f64, beta: f64) -> f64 {
    let sum = alpha + beta;
    if alpha < 0.0 || beta < 0.0 || sum <= 0.0 || !sum.is_finite() {
        return 0.5;
    }
    let mean = alpha / sum;
    if mean.is_finite() {
        mean.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// `alpha * beta / ((alpha + beta)^2 (alpha + beta + 1))`, or 0.25 for
/// degenerate parameters.
pub fn beta_variance(alpha: f64, beta: f64) -> f64 {
    let sum = alpha + beta;
    if alpha < 0.0 || beta < 0.0 || sum <= 0.0 || !sum.is_finite() {
        return 0.25;
    }
    let var = (alpha * beta) / (sum * sum * (sum + 1.0));
    if var.is_finite() {
        var.max(0.0)
    } else {
        0.25
    }
}

/// Equal-tailed interval holding `level` of the posterior mass.
/// Falls back to `(0, 1)` for parameters `statrs` rejects.
pub fn credible_interval(alpha: f64, beta: f64, level: f64) -> (f64, f64) {
    if alpha <= 0.0 || beta <= 0.0 || !alpha.is_finite() || !beta.is_finite() {
        return (0.0, 1.0);
    }
    if !(level > 0.0 && level < 1.0) {
        return (0.0, 1.0);
    }

    // Inverse CDF loses precision for huge parameters; the posterior is a spike there.
    if alpha > 1e6 || beta > 1e6 {
        let mean = beta_mean(alpha, beta);
        let spread = beta_variance(alpha, beta).sqrt() * 4.0;
        return ((mean - spread).max(0.0), (mean + spread).min(1.0));
    }

    let tail = (1.0 - level) / 2.0;
    match Beta::new(alpha, beta) {
        Ok(dist) => {
            let low = dist.inverse_cdf(tail);
            let high = dist.inverse_cdf(1.0 - tail);
            let low = if low.is_finite() { low.clamp(0.0, 1.0) } else { 0.0 };
            let high = if high.is_finite() { high.clamp(0.0, 1.0) } else { 1.0 };
            (low.min(high), high.max(low))
        }
        Err(_) => (0.0, 1.0),
    }
}

/// Mean, variance, and credible interval of a record's posterior.
///
/// Degenerate records (non-positive or non-finite parameters) yield the
/// uninformative estimate rather than an error.
pub fn compute_confidence_estimate(
    record: &BayesianConfidence,
    level: f64,
) -> Result<ConfidenceEstimate, ConfidenceError> {
    if !(level > 0.0 && level < 1.0) {
        return Err(ConfidenceError::InvalidCredibleLevel { level });
    }
    let (alpha, beta) = (record.posterior_alpha, record.posterior_beta);
    if alpha <= 0.0 || beta <= 0.0 || !alpha.is_finite() || !beta.is_finite() {
        tracing::warn!(
            entity_id = %record.entity_id,
            alpha,
            beta,
            "degenerate posterior, using uninformative estimate"
        );
        return Ok(ConfidenceEstimate {
            observations: record.observation_count,
            ..ConfidenceEstimate::uninformative()
        });
    }

    let (lower_bound, upper_bound) = credible_interval(alpha, beta, level);
    Ok(ConfidenceEstimate {
        mean: beta_mean(alpha, beta),
        variance: beta_variance(alpha, beta),
        lower_bound,
        upper_bound,
        observations: record.observation_count,
    })
}

/// Read-update-write one observation for an entity through the store,
/// creating the record from the prior when none exists.
pub fn record_outcome(
    store: &dyn AnalysisStore,
    entity_id: &str,
    entity_type: &str,
    success: bool,
) -> AnalysisResult<BayesianConfidence> {
    let current = store
        .get_bayesian_confidence(entity_id, entity_type)?
        .unwrap_or_else(|| create_initial_confidence(entity_id, entity_type));
    let updated = update_confidence(&current, success);
    store.upsert_bayesian_confidence(&updated)?;
    tracing::debug!(
        entity_id,
        success,
        observations = updated.observation_count,
        "recorded outcome"
    );
    Ok(updated)
}

/// Estimate for a stored record at the configured credible level.
/// `None` when the entity has no record.
pub fn estimate_stored_confidence(
    store: &dyn AnalysisStore,
    entity_id: &str,
    entity_type: &str,
    config: &ConfidenceConfig,
) -> AnalysisResult<Option<ConfidenceEstimate>> {
    let Some(record) = store.get_bayesian_confidence(entity_id, entity_type)? else {
        return Ok(None);
    };
    Ok(Some(compute_confidence_estimate(&record, config.effective_credible_level())?))
}

/// Posterior means of every node in the snapshot that has a stored record.
pub fn load_confidence_means(
    store: &dyn AnalysisStore,
    snapshot: &GraphSnapshot,
) -> AnalysisResult<BTreeMap<String, f64>> {
    let entity_type = snapshot.entity_type();
    let mut means = BTreeMap::new();
    for id in snapshot.nodes() {
        if let Some(record) = store.get_bayesian_confidence(id, entity_type)? {
            means.insert(
                id.to_string(),
                beta_mean(record.posterior_alpha, record.posterior_beta),
            );
        }
    }
    Ok(means)
}
