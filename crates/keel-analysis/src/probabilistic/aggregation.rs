//! Combining several confidence estimates into one.

use keel_core::errors::ConfidenceError;
use keel_core::models::ConfidenceEstimate;

/// z-score of the two-sided 95% normal interval.
const Z_95: f64 = 1.959_963_984_540_054;

/// Weighted geometric mean of the estimate means.
///
/// - mean: `exp(sum(w ln m) / sum(w))`; 0 if any positively weighted mean is 0
/// - variance: `sum(w^2 var) / sum(w)^2`
/// - observations: summed
/// - bounds: `mean ± 1.96 sd`, clamped to [0, 1]
///
/// `weights` default to uniform. All-zero weights also fall back to uniform.
/// A non-finite mean is rejected rather than clamped.
/// Empty input yields the uninformative estimate.
pub fn aggregate_confidence(
    estimates: &[ConfidenceEstimate],
    weights: Option<&[f64]>,
) -> Result<ConfidenceEstimate, ConfidenceError> {
    if let Some(w) = weights {
        if w.len() != estimates.len() {
            return Err(ConfidenceError::InvalidWeights {
                message: format!("{} weights for {} estimates", w.len(), estimates.len()),
            });
        }
        if let Some(bad) = w.iter().find(|x| !x.is_finite() || **x < 0.0) {
            return Err(ConfidenceError::InvalidWeights {
                message: format!("weight {bad} is negative or not finite"),
            });
        }
    }
    if let Some((index, bad)) = estimates.iter().enumerate().find(|(_, e)| !e.mean.is_finite()) {
        return Err(ConfidenceError::NonFiniteEstimate { index, mean: bad.mean });
    }
    if estimates.is_empty() {
        return Ok(ConfidenceEstimate::uninformative());
    }

    let weights: Vec<f64> = match weights {
        Some(w) if w.iter().sum::<f64>() > 0.0 => w.to_vec(),
        _ => vec![1.0; estimates.len()],
    };
    let total: f64 = weights.iter().sum();

    let any_zero = estimates
        .iter()
        .zip(&weights)
        .any(|(e, &w)| w > 0.0 && e.mean <= 0.0);
    let mean = if any_zero {
        0.0
    } else {
        let log_sum: f64 = estimates
            .iter()
            .zip(&weights)
            .filter(|(_, &w)| w > 0.0)
            .map(|(e, &w)| w * e.mean.min(1.0).ln())
            .sum();
        (log_sum / total).exp().clamp(0.0, 1.0)
    };

    let variance = estimates
        .iter()
        .zip(&weights)
        .map(|(e, &w)| w * w * e.variance.max(0.0))
        .sum::<f64>()
        / (total * total);
    let variance = if variance.is_finite() { variance } else { 0.25 };

    let half_width = Z_95 * variance.sqrt();
    Ok(ConfidenceEstimate {
        mean,
        variance,
        lower_bound: (mean - half_width).max(0.0),
        upper_bound: (mean + half_width).min(1.0),
        observations: estimates.iter().map(|e| e.observations).sum(),
    })
}
