//! Node id interning.
//!
//! Graph algorithms run over dense `u32` indices instead of string ids.
//! `lasso::Rodeo` assigns keys in insertion order, so the first interned id
//! gets index 0, the next index 1, and so on.

use lasso::{Key, Rodeo, Spur};

/// Interns node ids to dense, insertion-ordered indices.
#[derive(Debug, Default)]
pub struct NodeInterner {
    inner: Rodeo,
}

impl NodeInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an id, returning its dense index.
    pub fn intern(&mut self, id: &str) -> u32 {
        spur_index(self.inner.get_or_intern(id))
    }

    /// Look up a previously interned id without inserting.
    pub fn get(&self, id: &str) -> Option<u32> {
        self.inner.get(id).map(spur_index)
    }

    /// Resolve an index back to its id.
    pub fn resolve(&self, index: u32) -> Option<&str> {
        Spur::try_from_usize(index as usize).and_then(|spur| self.inner.try_resolve(&spur))
    }

    /// Number of interned ids.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

fn spur_index(spur: Spur) -> u32 {
    spur.into_usize() as u32
}
