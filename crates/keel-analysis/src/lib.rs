//! # keel-analysis
//!
//! Analysis engine for code knowledge graphs, in three layers:
//! deterministic graph algorithms, Bayesian confidence, and hybrid fusion
//! of the two into feedback-loop, stability, health, and risk reports.

pub mod graph;
pub mod hybrid;
pub mod probabilistic;

pub use graph::{GraphSnapshot, ModuleGraph};
pub use hybrid::engine::{AnalysisEngine, FullAnalysisReport};
