//! Deterministic graph algorithms over module dependency graphs.

pub mod adjacency;
pub mod control_flow;
pub mod metrics;
pub mod model;
pub mod path_finding;
pub mod scc;

pub use adjacency::{analyze_adjacency, analyze_node, AdjacencyInfo};
pub use control_flow::{build_control_flow_graph, BasicBlock, CfgEdge, CfgEdgeKind, ControlFlowGraph};
pub use metrics::{compute_graph_metrics, DegreeExtreme, GraphMetrics};
pub use model::{GraphSnapshot, ModuleGraph, DEFAULT_ENTITY_TYPE};
pub use path_finding::find_shortest_path;
pub use scc::{
    find_strongly_connected_components, records_from_components, scc_records,
    store_scc_analysis, store_scc_components, SccSummary, StronglyConnectedComponent,
};
