//! Shared confidence algebra.
//!
//! Every score the engine reports can be expressed as a [`ConfidenceValue`]
//! that says where the number came from. Values compose with two rules:
//! sequential (weakest link, `min`) and parallel (all must hold, product).

pub mod compose;
pub mod value;

pub use compose::{parallel_all, sequential};
pub use value::ConfidenceValue;
