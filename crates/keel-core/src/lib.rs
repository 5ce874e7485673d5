//! # keel-core
//!
//! Foundation crate for the Keel analysis engine.
//! Errors, configuration, tracing, shared collections, persisted record
//! models, the confidence algebra, and the storage contract.

pub mod config;
pub mod confidence;
pub mod errors;
pub mod models;
pub mod store;
pub mod traits;
pub mod tracing;
pub mod types;

pub use config::KeelConfig;
pub use confidence::ConfidenceValue;
pub use errors::{AnalysisError, AnalysisResult, KeelErrorCode};
pub use store::InMemoryAnalysisStore;
pub use traits::AnalysisStore;
