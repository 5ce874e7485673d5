//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::{BTreeMap, BTreeSet};

/// SmallVec sized for module adjacency lists (usually <4 successors).
pub type SmallVec4<T> = SmallVec<[T; 4]>;
