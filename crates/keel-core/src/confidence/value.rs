use std::fmt;

use serde::{Deserialize, Serialize};

/// A confidence figure tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfidenceValue {
    /// Exact by construction (e.g. a graph fact).
    Deterministic { basis: String },
    /// Estimated from observed samples.
    Measured {
        value: f64,
        sample_size: u64,
        method: String,
    },
    /// Known only to lie within an interval.
    Bounded {
        lower: f64,
        upper: f64,
        basis: String,
    },
    /// No evidence.
    Absent { reason: String },
    /// Composed from other values.
    Derived {
        value: f64,
        formula: String,
        inputs: Vec<ConfidenceValue>,
    },
}

impl ConfidenceValue {
    pub fn deterministic(basis: impl Into<String>) -> Self {
        Self::Deterministic { basis: basis.into() }
    }

    pub fn measured(value: f64, sample_size: u64, method: impl Into<String>) -> Self {
        Self::Measured {
            value: clamp_unit(value),
            sample_size,
            method: method.into(),
        }
    }

    /// Bounds are clamped to [0, 1] and swapped if given in reverse.
    pub fn bounded(lower: f64, upper: f64, basis: impl Into<String>) -> Self {
        let (lower, upper) = (clamp_unit(lower), clamp_unit(upper));
        let (lower, upper) = if lower <= upper { (lower, upper) } else { (upper, lower) };
        Self::Bounded {
            lower,
            upper,
            basis: basis.into(),
        }
    }

    pub fn absent(reason: impl Into<String>) -> Self {
        Self::Absent { reason: reason.into() }
    }

    /// Point value used when composing: the conservative end of the range.
    pub fn point(&self) -> f64 {
        match self {
            Self::Deterministic { .. } => 1.0,
            Self::Measured { value, .. } => *value,
            Self::Bounded { lower, .. } => *lower,
            Self::Absent { .. } => 0.0,
            Self::Derived { value, .. } => *value,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Deterministic { .. } => "deterministic",
            Self::Measured { .. } => "measured",
            Self::Bounded { .. } => "bounded",
            Self::Absent { .. } => "absent",
            Self::Derived { .. } => "derived",
        }
    }
}

impl fmt::Display for ConfidenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deterministic { basis } => write!(f, "deterministic ({basis})"),
            Self::Measured {
                value,
                sample_size,
                method,
            } => write!(f, "{value:.3} measured by {method} (n={sample_size})"),
            Self::Bounded { lower, upper, basis } => {
                write!(f, "[{lower:.3}, {upper:.3}] ({basis})")
            }
            Self::Absent { reason } => write!(f, "absent ({reason})"),
            Self::Derived { value, formula, .. } => write!(f, "{value:.3} = {formula}"),
        }
    }
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
