//! Records exchanged with the storage collaborator.

pub mod bayesian;
pub mod feedback_loop;
pub mod scc;
pub mod stability;

pub use bayesian::{BayesianConfidence, ConfidenceEstimate, JEFFREYS_PRIOR};
pub use feedback_loop::{FeedbackLoop, FeedbackLoopFilter, LoopSeverity, LoopType};
pub use scc::SccRecord;
pub use stability::StabilityMetrics;
