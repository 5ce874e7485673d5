use serde::{Deserialize, Serialize};

/// Strongly-connected-component membership of one entity.
///
/// Every node belongs to exactly one component and
/// `component_size == members.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SccRecord {
    pub entity_id: String,
    pub entity_type: String,
    pub component_id: String,
    pub component_size: usize,
    pub members: Vec<String>,
    /// The entity has an edge to itself. Self-loops never merge components,
    /// so a singleton can still be self-referential.
    pub has_self_loop: bool,
}

impl SccRecord {
    /// Component with more than one member (the dependent layers' notion of "cyclic").
    pub fn is_cyclic(&self) -> bool {
        self.component_size > 1
    }
}
