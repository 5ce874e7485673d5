use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Volatility and trend of one entity's value history. Recomputed and
/// superseded on every analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityMetrics {
    pub entity_id: String,
    pub entity_type: String,
    /// Standard deviation of the history.
    pub volatility: f64,
    /// Least-squares slope, in value units per day.
    pub trend: f64,
    /// `1 - phi` of an AR(1) fit on deviations from the mean, in [0, 1].
    pub mean_reversion_rate: f64,
    /// Days for a deviation to halve; `None` when the series does not revert.
    pub half_life_days: Option<f64>,
    /// Time spanned by the history.
    pub window_days: f64,
    pub computed_at: DateTime<Utc>,
}
