//! Unweighted shortest paths between modules.

use std::collections::VecDeque;

use keel_core::types::collections::FxHashMap;

use super::model::GraphSnapshot;

/// Shortest path from `source` to `target` by edge count, following forward
/// edges. `Some([source])` when they are equal; `None` when either endpoint
/// is unknown or `target` is unreachable.
pub fn find_shortest_path(snapshot: &GraphSnapshot, source: &str, target: &str) -> Option<Vec<String>> {
    let forward = snapshot.forward();
    if !forward.contains(source) || !forward.contains(target) {
        return None;
    }
    if source == target {
        return Some(vec![source.to_string()]);
    }

    // Predecessor map doubles as the visited set.
    let mut prev: FxHashMap<&str, &str> = FxHashMap::default();
    let mut queue = VecDeque::from([source]);

    while let Some(node) = queue.pop_front() {
        for next in forward.successors(node) {
            if next == source || prev.contains_key(next) {
                continue;
            }
            prev.insert(next, node);
            if next == target {
                // Reconstruct path
                let mut path = vec![target.to_string()];
                let mut current = target;
                while let Some(&p) = prev.get(current) {
                    path.push(p.to_string());
                    current = p;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(next);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ModuleGraph;

    fn diamond() -> GraphSnapshot {
        GraphSnapshot::new(ModuleGraph::from_edges([
            ("a", "b"),
            ("b", "d"),
            ("a", "c"),
            ("c", "e"),
            ("e", "d"),
        ]))
    }

    #[test]
    fn test_shortest_by_edge_count() {
        assert_eq!(find_shortest_path(&diamond(), "a", "d").unwrap(), ["a", "b", "d"]);
    }

    #[test]
    fn test_same_node() {
        assert_eq!(find_shortest_path(&diamond(), "c", "c").unwrap(), ["c"]);
    }

    #[test]
    fn test_unreachable_and_unknown() {
        assert!(find_shortest_path(&diamond(), "d", "a").is_none());
        assert!(find_shortest_path(&diamond(), "a", "zzz").is_none());
        assert!(find_shortest_path(&diamond(), "zzz", "zzz").is_none());
    }
}
