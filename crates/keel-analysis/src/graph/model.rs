//! Module dependency graph and its analysis snapshot.

use keel_core::types::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};

/// Entity type used when a graph does not name one.
pub const DEFAULT_ENTITY_TYPE: &str = "module";

/// Forward adjacency: node id -> ids it depends on.
///
/// The node set is the key set. A successor that is not itself a key is an
/// unknown node; every algorithm skips edges to it. Iteration is in id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleGraph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
    entity_type: String,
}

impl Default for ModuleGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::with_entity_type(DEFAULT_ENTITY_TYPE)
    }

    pub fn with_entity_type(entity_type: impl Into<String>) -> Self {
        Self {
            adjacency: BTreeMap::new(),
            entity_type: entity_type.into(),
        }
    }

    /// Wrap an existing adjacency map as-is. Targets missing from the key set
    /// stay as unknown references.
    pub fn from_adjacency(adjacency: BTreeMap<String, BTreeSet<String>>) -> Self {
        Self {
            adjacency,
            entity_type: DEFAULT_ENTITY_TYPE.to_string(),
        }
    }

    /// Build from `(from, to)` pairs. Both endpoints become nodes.
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut graph = Self::new();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    pub fn add_node(&mut self, id: impl Into<String>) {
        self.adjacency.entry(id.into()).or_default();
    }

    /// Add `from -> to`, inserting both endpoints.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let to = to.into();
        self.add_node(to.clone());
        self.adjacency.entry(from.into()).or_default().insert(to);
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Node ids in order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Known successors of `id`, in order. Empty for an unknown node.
    pub fn successors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.adjacency
            .get(id)
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(move |target| self.adjacency.contains_key(*target))
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.successors(id).count()
    }

    /// Every edge between known nodes, in `(from, to)` order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.adjacency.iter().flat_map(move |(from, targets)| {
            targets
                .iter()
                .filter(move |to| self.adjacency.contains_key(to.as_str()))
                .map(move |to| (from.as_str(), to.as_str()))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Edges whose target is not a known node.
    pub fn dangling_edge_count(&self) -> usize {
        self.adjacency
            .values()
            .flatten()
            .filter(|to| !self.adjacency.contains_key(to.as_str()))
            .count()
    }

    /// The reverse graph: every known node, with only edges between known nodes flipped.
    fn reversed(&self) -> Self {
        let mut reverse = Self::with_entity_type(self.entity_type.clone());
        for id in self.nodes() {
            reverse.add_node(id);
        }
        for (from, to) in self.edges() {
            reverse
                .adjacency
                .entry(to.to_string())
                .or_default()
                .insert(from.to_string());
        }
        reverse
    }
}

/// A forward graph paired with its derived reverse graph.
///
/// The reverse graph is always computed from the forward graph, so the two
/// can never disagree. Deserialize a [`ModuleGraph`] and call [`GraphSnapshot::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    forward: ModuleGraph,
    reverse: ModuleGraph,
}

impl GraphSnapshot {
    pub fn new(forward: ModuleGraph) -> Self {
        let reverse = forward.reversed();
        if forward.dangling_edge_count() > 0 {
            tracing::debug!(
                dangling = forward.dangling_edge_count(),
                "skipping edges to unknown nodes"
            );
        }
        Self { forward, reverse }
    }

    pub fn forward(&self) -> &ModuleGraph {
        &self.forward
    }

    /// Dependents: `reverse().successors(x)` are the nodes that depend on `x`.
    pub fn reverse(&self) -> &ModuleGraph {
        &self.reverse
    }

    pub fn entity_type(&self) -> &str {
        self.forward.entity_type()
    }

    pub fn node_count(&self) -> usize {
        self.forward.node_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.forward.nodes()
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.reverse.out_degree(id)
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.forward.out_degree(id)
    }
}

impl From<ModuleGraph> for GraphSnapshot {
    fn from(forward: ModuleGraph) -> Self {
        Self::new(forward)
    }
}
