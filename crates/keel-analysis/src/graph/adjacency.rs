//! Per-node neighborhood: direct successors, transitive reach, and degrees.

use std::collections::VecDeque;

use keel_core::types::collections::{BTreeMap, BTreeSet, FxHashSet};
use serde::{Deserialize, Serialize};

use super::model::GraphSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyInfo {
    pub node: String,
    /// Known forward successors, in id order.
    pub direct_neighbors: Vec<String>,
    /// Every node reachable by one or more forward edges, in id order.
    /// Contains `node` itself only when it sits on a cycle.
    pub transitive_reach: Vec<String>,
    pub out_degree: usize,
    pub in_degree: usize,
}

/// Adjacency info for every node, keyed by id.
pub fn analyze_adjacency(snapshot: &GraphSnapshot) -> BTreeMap<String, AdjacencyInfo> {
    snapshot
        .nodes()
        .filter_map(|id| analyze_node(snapshot, id).map(|info| (id.to_string(), info)))
        .collect()
}

/// Adjacency info for one node. `None` for an unknown id.
pub fn analyze_node(snapshot: &GraphSnapshot, id: &str) -> Option<AdjacencyInfo> {
    let forward = snapshot.forward();
    if !forward.contains(id) {
        return None;
    }
    let direct_neighbors: Vec<String> = forward.successors(id).map(str::to_string).collect();
    Some(AdjacencyInfo {
        node: id.to_string(),
        out_degree: direct_neighbors.len(),
        in_degree: snapshot.in_degree(id),
        transitive_reach: transitive_reach(snapshot, id),
        direct_neighbors,
    })
}

/// BFS from the successors of `start`. The visited set starts empty, so
/// `start` is reported only when a cycle leads back to it.
fn transitive_reach(snapshot: &GraphSnapshot, start: &str) -> Vec<String> {
    let forward = snapshot.forward();
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut queue: VecDeque<&str> = forward.successors(start).collect();
    let mut reach = BTreeSet::new();

    while let Some(node) = queue.pop_front() {
        if !visited.insert(node) {
            continue;
        }
        reach.insert(node.to_string());
        queue.extend(forward.successors(node).filter(|s| !visited.contains(s)));
    }
    reach.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ModuleGraph;

    #[test]
    fn test_chain_reach_excludes_start() {
        let snapshot = GraphSnapshot::new(ModuleGraph::from_edges([("a", "b"), ("b", "c")]));
        let info = analyze_node(&snapshot, "a").unwrap();
        assert_eq!(info.direct_neighbors, ["b"]);
        assert_eq!(info.transitive_reach, ["b", "c"]);
        assert_eq!(info.out_degree, 1);
        assert_eq!(info.in_degree, 0);
    }

    #[test]
    fn test_cycle_reach_includes_start() {
        let snapshot = GraphSnapshot::new(ModuleGraph::from_edges([("a", "b"), ("b", "a")]));
        let info = analyze_node(&snapshot, "a").unwrap();
        assert_eq!(info.transitive_reach, ["a", "b"]);
    }

    #[test]
    fn test_unknown_node() {
        let snapshot = GraphSnapshot::new(ModuleGraph::new());
        assert!(analyze_node(&snapshot, "nope").is_none());
        assert!(analyze_adjacency(&snapshot).is_empty());
    }
}
