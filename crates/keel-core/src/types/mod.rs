//! Shared collection and interning types.

pub mod collections;
pub mod interning;

pub use interning::NodeInterner;
