//! Seams to external collaborators.

pub mod analysis_store;

pub use analysis_store::AnalysisStore;
