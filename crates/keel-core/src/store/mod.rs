//! Bundled [`AnalysisStore`](crate::traits::AnalysisStore) implementations.

pub mod memory;

pub use memory::InMemoryAnalysisStore;
