//! Aggregate structural statistics.

use serde::{Deserialize, Serialize};

use super::model::GraphSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeExtreme {
    pub node: String,
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub average_out_degree: f64,
    /// `E / (N * (N - 1))`; 0 for graphs with fewer than two nodes.
    pub density: f64,
    /// In-degree 0.
    pub root_nodes: Vec<String>,
    /// Out-degree 0.
    pub leaf_nodes: Vec<String>,
    /// Neither in- nor out-edges.
    pub isolated_nodes: Vec<String>,
    pub max_out_degree: Option<DegreeExtreme>,
    pub max_in_degree: Option<DegreeExtreme>,
}

pub fn compute_graph_metrics(snapshot: &GraphSnapshot) -> GraphMetrics {
    let node_count = snapshot.node_count();
    let edge_count = snapshot.forward().edge_count();

    let mut root_nodes = Vec::new();
    let mut leaf_nodes = Vec::new();
    let mut isolated_nodes = Vec::new();
    let mut max_out: Option<DegreeExtreme> = None;
    let mut max_in: Option<DegreeExtreme> = None;

    for id in snapshot.nodes() {
        let out_degree = snapshot.out_degree(id);
        let in_degree = snapshot.in_degree(id);
        if in_degree == 0 {
            root_nodes.push(id.to_string());
        }
        if out_degree == 0 {
            leaf_nodes.push(id.to_string());
        }
        if in_degree == 0 && out_degree == 0 {
            isolated_nodes.push(id.to_string());
        }
        // Strict comparison keeps the first node in id order on ties.
        if max_out.as_ref().map_or(true, |m| out_degree > m.degree) {
            max_out = Some(DegreeExtreme { node: id.to_string(), degree: out_degree });
        }
        if max_in.as_ref().map_or(true, |m| in_degree > m.degree) {
            max_in = Some(DegreeExtreme { node: id.to_string(), degree: in_degree });
        }
    }

    let (average_out_degree, density) = if node_count == 0 {
        (0.0, 0.0)
    } else {
        let n = node_count as f64;
        let density = if node_count > 1 {
            edge_count as f64 / (n * (n - 1.0))
        } else {
            0.0
        };
        (edge_count as f64 / n, density)
    };

    GraphMetrics {
        node_count,
        edge_count,
        average_out_degree,
        density,
        root_nodes,
        leaf_nodes,
        isolated_nodes,
        max_out_degree: max_out,
        max_in_degree: max_in,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ModuleGraph;

    #[test]
    fn test_star_metrics() {
        let mut graph = ModuleGraph::from_edges([("hub", "a"), ("hub", "b"), ("hub", "c")]);
        graph.add_node("alone");
        let metrics = compute_graph_metrics(&GraphSnapshot::new(graph));

        assert_eq!(metrics.node_count, 5);
        assert_eq!(metrics.edge_count, 3);
        assert!((metrics.average_out_degree - 0.6).abs() < 1e-12);
        assert!((metrics.density - 3.0 / 20.0).abs() < 1e-12);
        assert_eq!(metrics.root_nodes, ["alone", "hub"]);
        assert_eq!(metrics.leaf_nodes, ["a", "alone", "b", "c"]);
        assert_eq!(metrics.isolated_nodes, ["alone"]);
        assert_eq!(metrics.max_out_degree.unwrap(), DegreeExtreme { node: "hub".into(), degree: 3 });
        // a, b and c tie at in-degree 1; "a" comes first.
        assert_eq!(metrics.max_in_degree.unwrap().node, "a");
    }

    #[test]
    fn test_complete_digraph_has_unit_density() {
        let metrics = compute_graph_metrics(&GraphSnapshot::new(ModuleGraph::from_edges([
            ("a", "b"),
            ("a", "c"),
            ("b", "a"),
            ("b", "c"),
            ("c", "a"),
            ("c", "b"),
        ])));
        assert_eq!(metrics.edge_count, 6);
        assert_eq!(metrics.density, 1.0);
    }

    #[test]
    fn test_empty_graph() {
        let metrics = compute_graph_metrics(&GraphSnapshot::new(ModuleGraph::new()));
        assert_eq!(metrics.node_count, 0);
        assert_eq!(metrics.density, 0.0);
        assert!(metrics.max_out_degree.is_none());
        assert!(metrics.max_in_degree.is_none());
    }

    #[test]
    fn test_single_node_density_is_zero() {
        let metrics = compute_graph_metrics(&GraphSnapshot::new(ModuleGraph::from_edges([("a", "a")])));
        assert_eq!(metrics.edge_count, 1);
        assert_eq!(metrics.density, 0.0);
    }
}
