//! Fusion of the deterministic and probabilistic layers.

pub mod control_stability;
pub mod engine;
pub mod feedback_loops;
pub mod risk;
pub mod system_health;

pub use control_stability::{compute_control_stability, ControlStabilityReport};
pub use engine::{AnalysisEngine, FullAnalysisReport};
pub use feedback_loops::{
    detect_and_store_feedback_loops, detect_feedback_loops, loop_id, loops_from_components,
    store_detected_loops,
};
pub use risk::{compute_risk_propagation, propagate_risk, RiskPropagationResult};
pub use system_health::{compute_system_health, HealthGrade, SystemHealthReport};
