//! Structured span field names shared by all analyzers.
//!
//! Using one set of names keeps log queries stable across phases.

/// Number of nodes in the analyzed graph.
pub const NODE_COUNT: &str = "node_count";

/// Number of known edges in the analyzed graph.
pub const EDGE_COUNT: &str = "edge_count";

/// SCC phase duration in milliseconds.
pub const SCC_DURATION_MS: &str = "scc_duration_ms";

/// Feedback loop detection duration in milliseconds.
pub const FEEDBACK_LOOP_DURATION_MS: &str = "feedback_loop_duration_ms";

/// Control stability duration in milliseconds.
pub const CONTROL_STABILITY_DURATION_MS: &str = "control_stability_duration_ms";

/// Risk propagation duration in milliseconds.
pub const RISK_PROPAGATION_DURATION_MS: &str = "risk_propagation_duration_ms";

/// System health duration in milliseconds.
pub const SYSTEM_HEALTH_DURATION_MS: &str = "system_health_duration_ms";

/// Full analysis duration in milliseconds.
pub const ANALYSIS_DURATION_MS: &str = "analysis_duration_ms";
