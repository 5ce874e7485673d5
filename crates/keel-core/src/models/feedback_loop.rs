//! Dependency cycles classified by shape and severity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopType {
    /// Two entities depending on each other.
    MutualRecursion,
    /// A simple ring of three or more entities.
    CircularImport,
    /// Three or more entities with more internal edges than a ring.
    StateCycle,
}

impl LoopType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MutualRecursion => "mutual_recursion",
            Self::CircularImport => "circular_import",
            Self::StateCycle => "state_cycle",
        }
    }
}

impl fmt::Display for LoopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopSeverity {
    Low,
    Moderate,
    Critical,
}

impl LoopSeverity {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::Critical => "critical",
        }
    }

    /// One level up, saturating at `Critical`.
    pub fn escalate(self) -> Self {
        match self {
            Self::Low => Self::Moderate,
            Self::Moderate | Self::Critical => Self::Critical,
        }
    }
}

impl fmt::Display for LoopSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackLoop {
    /// Deterministic id derived from the sorted member ids.
    pub id: String,
    pub entities: Vec<String>,
    pub loop_type: LoopType,
    pub cycle_length: usize,
    pub severity: LoopSeverity,
    /// Detector confidence in [0.5, 1.0].
    pub confidence: f64,
    /// Set only by an explicit resolution action.
    pub resolved: bool,
    pub detected_at: DateTime<Utc>,
}

/// Filter for [`AnalysisStore::get_feedback_loops`](crate::traits::AnalysisStore::get_feedback_loops).
#[derive(Debug, Clone, Default)]
pub struct FeedbackLoopFilter {
    pub unresolved_only: bool,
    pub loop_type: Option<LoopType>,
    pub min_severity: Option<LoopSeverity>,
    /// Only loops containing this entity.
    pub entity_id: Option<String>,
}

impl FeedbackLoopFilter {
    pub fn unresolved() -> Self {
        Self {
            unresolved_only: true,
            ..Default::default()
        }
    }

    pub fn matches(&self, feedback_loop: &FeedbackLoop) -> bool {
        if self.unresolved_only && feedback_loop.resolved {
            return false;
        }
        if let Some(loop_type) = self.loop_type {
            if feedback_loop.loop_type != loop_type {
                return false;
            }
        }
        if let Some(min) = self.min_severity {
            if feedback_loop.severity < min {
                return false;
            }
        }
        if let Some(ref entity) = self.entity_id {
            if !feedback_loop.entities.iter().any(|e| e == entity) {
                return false;
            }
        }
        true
    }
}
