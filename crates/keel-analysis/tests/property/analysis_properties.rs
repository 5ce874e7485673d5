//! Property tests for the graph and confidence layers.

use std::collections::BTreeSet;

use proptest::prelude::*;

use keel_analysis::graph::{find_strongly_connected_components, scc_records, GraphSnapshot, ModuleGraph};
use keel_analysis::probabilistic::{
    apply_observations, create_initial_confidence, propagate_confidence, update_confidence,
};
use keel_core::types::collections::BTreeMap;

fn node(i: usize) -> String {
    format!("n{i:02}")
}

fn build_graph(n: usize, edges: &[(usize, usize)]) -> ModuleGraph {
    let mut graph = ModuleGraph::new();
    for i in 0..n {
        graph.add_node(node(i));
    }
    for &(from, to) in edges {
        if from < n && to < n {
            graph.add_edge(node(from), node(to));
        }
    }
    graph
}

fn edge_strategy(n: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..n, 0..n), 0..n * 3)
}

/// Partition as a set of sorted member sets, order-free.
fn partition_of(components: Vec<Vec<String>>) -> BTreeSet<Vec<String>> {
    components
        .into_iter()
        .map(|mut members| {
            members.sort();
            members
        })
        .collect()
}

fn petgraph_partition(n: usize, edges: &[(usize, usize)]) -> BTreeSet<Vec<String>> {
    let mut graph = petgraph::graph::DiGraph::<String, ()>::new();
    let indices: Vec<_> = (0..n).map(|i| graph.add_node(node(i))).collect();
    for &(from, to) in edges {
        if from < n && to < n {
            graph.update_edge(indices[from], indices[to], ());
        }
    }
    partition_of(
        petgraph::algo::tarjan_scc(&graph)
            .into_iter()
            .map(|component| component.into_iter().map(|ix| graph[ix].clone()).collect())
            .collect(),
    )
}

proptest! {
    #[test]
    fn tarjan_matches_petgraph(edges in edge_strategy(15)) {
        let snapshot = GraphSnapshot::new(build_graph(15, &edges));
        let ours = partition_of(
            find_strongly_connected_components(&snapshot)
                .into_iter()
                .map(|c| c.members)
                .collect(),
        );
        prop_assert_eq!(ours, petgraph_partition(15, &edges));
    }

    #[test]
    fn every_node_in_exactly_one_component(edges in edge_strategy(12)) {
        let snapshot = GraphSnapshot::new(build_graph(12, &edges));
        let records = scc_records(&snapshot);
        prop_assert_eq!(records.len(), 12);
        for record in &records {
            prop_assert_eq!(record.component_size, record.members.len());
            prop_assert!(record.members.contains(&record.entity_id));
        }
    }

    #[test]
    fn reverse_graph_mirrors_forward(edges in edge_strategy(10)) {
        let snapshot = GraphSnapshot::new(build_graph(10, &edges));
        let forward: BTreeSet<(String, String)> = snapshot
            .forward()
            .edges()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        let reversed: BTreeSet<(String, String)> = snapshot
            .reverse()
            .edges()
            .map(|(a, b)| (b.to_string(), a.to_string()))
            .collect();
        prop_assert_eq!(forward, reversed);
    }

    #[test]
    fn update_order_does_not_matter(outcomes in prop::collection::vec(any::<bool>(), 0..40)) {
        let initial = create_initial_confidence("m", "module");
        let forward = outcomes.iter().fold(initial.clone(), |r, &s| update_confidence(&r, s));
        let backward = outcomes.iter().rev().fold(initial.clone(), |r, &s| update_confidence(&r, s));
        let successes = outcomes.iter().filter(|s| **s).count() as u64;
        let batch = apply_observations(&initial, successes, outcomes.len() as u64 - successes);

        for record in [&backward, &batch] {
            prop_assert_eq!(forward.posterior_alpha, record.posterior_alpha);
            prop_assert_eq!(forward.posterior_beta, record.posterior_beta);
            prop_assert_eq!(forward.observation_count, record.observation_count);
        }
        prop_assert_eq!(
            forward.observation_count as f64,
            (forward.posterior_alpha - forward.prior_alpha) + (forward.posterior_beta - forward.prior_beta)
        );
    }

    #[test]
    fn full_self_weight_is_identity(
        edges in edge_strategy(10),
        values in prop::collection::vec(0.0f64..=1.0, 10),
    ) {
        let snapshot = GraphSnapshot::new(build_graph(10, &edges));
        let means: BTreeMap<String, f64> =
            values.iter().enumerate().map(|(i, v)| (node(i), *v)).collect();
        for result in propagate_confidence(&snapshot, &means, 1.0).unwrap() {
            prop_assert_eq!(result.propagated_confidence, means[&result.entity_id]);
        }
    }

    #[test]
    fn propagation_stays_in_unit_interval(
        edges in edge_strategy(10),
        values in prop::collection::vec(0.0f64..=1.0, 10),
        weight in 0.0f64..=1.0,
    ) {
        let snapshot = GraphSnapshot::new(build_graph(10, &edges));
        let means: BTreeMap<String, f64> =
            values.iter().enumerate().map(|(i, v)| (node(i), *v)).collect();
        for result in propagate_confidence(&snapshot, &means, weight).unwrap() {
            prop_assert!((0.0..=1.0).contains(&result.propagated_confidence));
        }
    }
}
