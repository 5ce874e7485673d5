//! Deterministic layer over a small layered service graph.

use keel_analysis::graph::*;
use keel_core::{AnalysisStore, InMemoryAnalysisStore};

/// api -> {auth, billing}; auth <-> session; billing -> db; auth -> db; report isolated.
fn service_graph() -> GraphSnapshot {
    let mut graph = ModuleGraph::from_edges([
        ("api", "auth"),
        ("api", "billing"),
        ("auth", "session"),
        ("session", "auth"),
        ("billing", "db"),
        ("auth", "db"),
    ]);
    graph.add_node("report");
    GraphSnapshot::new(graph)
}

#[test]
fn test_scc_partition() {
    let components = find_strongly_connected_components(&service_graph());
    assert_eq!(components.len(), 5);
    let cyclic: Vec<_> = components.iter().filter(|c| c.is_cyclic()).collect();
    assert_eq!(cyclic.len(), 1);
    assert_eq!(cyclic[0].members, ["auth", "session"]);
    let total: usize = components.iter().map(|c| c.len()).sum();
    assert_eq!(total, 6);
}

#[test]
fn test_store_scc_analysis_persists_membership() {
    let store = InMemoryAnalysisStore::new();
    let summary = store_scc_analysis(&store, &service_graph()).unwrap();
    assert_eq!(summary.total_components, 5);
    assert_eq!(summary.cyclic_components, 1);
    assert_eq!(summary.self_loop_components, 0);
    assert_eq!(summary.largest_component, 2);

    let auth = store.get_scc_by_entity("auth", "module").unwrap().unwrap();
    let session = store.get_scc_by_entity("session", "module").unwrap().unwrap();
    assert_eq!(auth.component_id, session.component_id);
    assert_eq!(auth.members, ["auth", "session"]);
    assert!(store.get_scc_by_entity("report", "module").unwrap().is_some());
    assert_eq!(store.scc_count().unwrap(), 6);
}

#[test]
fn test_precomputed_components_store_same_membership() {
    let snapshot = service_graph();
    let components = find_strongly_connected_components(&snapshot);
    assert_eq!(records_from_components(&snapshot, &components), scc_records(&snapshot));

    let store = InMemoryAnalysisStore::new();
    let summary = store_scc_components(&store, &snapshot, &components).unwrap();
    assert_eq!(summary, SccSummary::from_components(&components));
    assert_eq!(summary.total_components, 5);
    assert_eq!(store.scc_count().unwrap(), 6);
    let db = store.get_scc_by_entity("db", "module").unwrap().unwrap();
    assert_eq!(db.component_size, 1);
}

#[test]
fn test_adjacency() {
    let all = analyze_adjacency(&service_graph());
    assert_eq!(all.len(), 6);
    let api = &all["api"];
    assert_eq!(api.direct_neighbors, ["auth", "billing"]);
    assert_eq!(api.transitive_reach, ["auth", "billing", "db", "session"]);
    assert_eq!(api.in_degree, 0);

    let auth = &all["auth"];
    assert!(auth.transitive_reach.contains(&"auth".to_string()));
    let db = &all["db"];
    assert_eq!(db.in_degree, 2);
    assert!(db.transitive_reach.is_empty());
}

#[test]
fn test_shortest_paths() {
    let snapshot = service_graph();
    assert_eq!(find_shortest_path(&snapshot, "api", "db").unwrap(), ["api", "auth", "db"]);
    assert_eq!(
        find_shortest_path(&snapshot, "session", "db").unwrap(),
        ["session", "auth", "db"]
    );
    assert!(find_shortest_path(&snapshot, "db", "api").is_none());
    assert!(find_shortest_path(&snapshot, "api", "report").is_none());
}

#[test]
fn test_metrics() {
    let metrics = compute_graph_metrics(&service_graph());
    assert_eq!(metrics.node_count, 6);
    assert_eq!(metrics.edge_count, 6);
    assert!((metrics.density - 6.0 / 30.0).abs() < 1e-12);
    assert_eq!(metrics.root_nodes, ["api", "report"]);
    assert_eq!(metrics.leaf_nodes, ["db", "report"]);
    assert_eq!(metrics.isolated_nodes, ["report"]);
    // api and auth both have out-degree 2; api comes first.
    assert_eq!(metrics.max_out_degree.unwrap().node, "api");
    // auth (api, session) and db (auth, billing) tie at 2; auth comes first.
    assert_eq!(metrics.max_in_degree.unwrap().node, "auth");
}

#[test]
fn test_entity_type_flows_into_records() {
    let mut graph = ModuleGraph::with_entity_type("function");
    graph.add_edge("parse", "lex");
    graph.add_edge("lex", "parse");
    let records = scc_records(&GraphSnapshot::new(graph));
    assert!(records.iter().all(|r| r.entity_type == "function"));
    assert!(records.iter().all(|r| r.component_id == "scc-0"));
}
