//! Volatility, trend, and mean reversion of an entity's value history.

use chrono::{DateTime, Utc};
use keel_core::errors::AnalysisResult;
use keel_core::models::StabilityMetrics;
use keel_core::traits::AnalysisStore;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Statistics computed from a history, before they are attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StabilitySummary {
    pub volatility: f64,
    pub trend: f64,
    pub mean_reversion_rate: f64,
    pub half_life_days: Option<f64>,
    pub window_days: f64,
}

/// Analyze a chronological series of values.
///
/// - volatility: population standard deviation
/// - trend: least-squares slope per day; 0 with fewer than two points or no time spread
/// - mean reversion: `1 - phi` of an AR(1) fit on deviations from the mean, in [0, 1]
/// - half-life: `ln 2 / -ln phi` steps, in days; `None` unless `0 < phi < 1`
///
/// Mismatched lengths use the common prefix. Empty input yields zeros.
pub fn compute_stability_from_history(values: &[f64], timestamps: &[DateTime<Utc>]) -> StabilitySummary {
    if values.len() != timestamps.len() {
        tracing::warn!(
            values = values.len(),
            timestamps = timestamps.len(),
            "history length mismatch, using common prefix"
        );
    }
    let n = values.len().min(timestamps.len());
    if n == 0 {
        return StabilitySummary::default();
    }
    let values = &values[..n];
    let timestamps = &timestamps[..n];

    let origin = timestamps[0];
    let days: Vec<f64> = timestamps
        .iter()
        .map(|t| (*t - origin).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY)
        .collect();
    let window_days = days.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        - days.iter().copied().fold(f64::INFINITY, f64::min);

    let mean = values.iter().sum::<f64>() / n as f64;
    let volatility = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64).sqrt();

    let trend = least_squares_slope(&days, values);

    let phi = ar1_coefficient(values, mean);
    let mean_reversion_rate = phi.map_or(0.0, |p| (1.0 - p).clamp(0.0, 1.0));
    let step_days = if n > 1 { window_days / (n - 1) as f64 } else { 0.0 };
    let half_life_days = match phi {
        Some(p) if p > 0.0 && p < 1.0 && step_days > 0.0 => {
            Some(std::f64::consts::LN_2 / -p.ln() * step_days)
        }
        _ => None,
    };

    StabilitySummary {
        volatility: finite_or_zero(volatility),
        trend: finite_or_zero(trend),
        mean_reversion_rate,
        half_life_days: half_life_days.filter(|h| h.is_finite()),
        window_days: finite_or_zero(window_days),
    }
}

fn least_squares_slope(x: &[f64], y: &[f64]) -> f64 {
    if x.len() < 2 {
        return 0.0;
    }
    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;
    let (num, den) = x.iter().zip(y).fold((0.0, 0.0), |(num, den), (xi, yi)| {
        (num + (xi - x_mean) * (yi - y_mean), den + (xi - x_mean).powi(2))
    });
    if den <= 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Lag-1 autoregression coefficient of deviations from `mean`.
/// `None` with fewer than three points or a constant series.
fn ar1_coefficient(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 3 {
        return None;
    }
    let (num, den) = values.windows(2).fold((0.0, 0.0), |(num, den), pair| {
        let (prev, next) = (pair[0] - mean, pair[1] - mean);
        (num + prev * next, den + prev * prev)
    });
    if den <= f64::EPSILON {
        None
    } else {
        Some(num / den).filter(|phi| phi.is_finite())
    }
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Compute and persist stability metrics for one entity.
pub fn analyze_entity_stability(
    store: &dyn AnalysisStore,
    entity_id: &str,
    entity_type: &str,
    values: &[f64],
    timestamps: &[DateTime<Utc>],
) -> AnalysisResult<StabilityMetrics> {
    let summary = compute_stability_from_history(values, timestamps);
    let metrics = StabilityMetrics {
        entity_id: entity_id.to_string(),
        entity_type: entity_type.to_string(),
        volatility: summary.volatility,
        trend: summary.trend,
        mean_reversion_rate: summary.mean_reversion_rate,
        half_life_days: summary.half_life_days,
        window_days: summary.window_days,
        computed_at: Utc::now(),
    };
    store.upsert_stability_metrics(&metrics)?;
    tracing::debug!(
        entity_id,
        volatility = metrics.volatility,
        trend = metrics.trend,
        "stored stability metrics"
    );
    Ok(metrics)
}
