//! Strongly connected components via Tarjan's algorithm.
//!
//! Runs iteratively over dense interned indices so deep dependency chains
//! cannot overflow the native stack. O(V + E).

use keel_core::errors::AnalysisResult;
use keel_core::models::SccRecord;
use keel_core::traits::AnalysisStore;
use keel_core::types::collections::SmallVec4;
use keel_core::types::NodeInterner;
use serde::{Deserialize, Serialize};

use super::model::{GraphSnapshot, ModuleGraph};

/// One strongly connected component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StronglyConnectedComponent {
    /// Member ids, sorted.
    pub members: Vec<String>,
    /// Some member has an edge to itself.
    pub has_self_loop: bool,
}

impl StronglyConnectedComponent {
    /// More than one member. Self-loops alone do not make a component cyclic.
    pub fn is_cyclic(&self) -> bool {
        self.members.len() > 1
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of [`store_scc_analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SccSummary {
    pub total_components: usize,
    pub cyclic_components: usize,
    pub self_loop_components: usize,
    pub largest_component: usize,
}

/// Graph re-indexed to dense `u32` ids.
struct IndexedGraph {
    interner: NodeInterner,
    adjacency: Vec<SmallVec4<u32>>,
}

impl IndexedGraph {
    fn build(graph: &ModuleGraph) -> Self {
        let mut interner = NodeInterner::new();
        for id in graph.nodes() {
            interner.intern(id);
        }
        let mut adjacency = vec![SmallVec4::new(); interner.len()];
        for (from, to) in graph.edges() {
            if let (Some(f), Some(t)) = (interner.get(from), interner.get(to)) {
                adjacency[f as usize].push(t);
            }
        }
        Self { interner, adjacency }
    }

    fn name(&self, index: u32) -> String {
        self.interner.resolve(index).unwrap_or_default().to_string()
    }
}

struct Frame {
    node: u32,
    next_child: usize,
}

/// Partition every known node into strongly connected components.
///
/// Components are returned in the order Tarjan closes them (a reverse
/// topological order of the condensation).
pub fn find_strongly_connected_components(snapshot: &GraphSnapshot) -> Vec<StronglyConnectedComponent> {
    let indexed = IndexedGraph::build(snapshot.forward());
    let n = indexed.adjacency.len();

    let mut next_index: u32 = 0;
    let mut index: Vec<Option<u32>> = vec![None; n];
    let mut lowlink: Vec<u32> = vec![0; n];
    let mut on_stack: Vec<bool> = vec![false; n];
    let mut stack: Vec<u32> = Vec::new();
    let mut call_stack: Vec<Frame> = Vec::new();
    let mut components = Vec::new();

    for root in 0..n as u32 {
        if index[root as usize].is_some() {
            continue;
        }
        visit(root, &mut next_index, &mut index, &mut lowlink, &mut on_stack, &mut stack);
        call_stack.push(Frame { node: root, next_child: 0 });

        while let Some(frame) = call_stack.last_mut() {
            let v = frame.node as usize;
            if let Some(&w) = indexed.adjacency[v].get(frame.next_child) {
                frame.next_child += 1;
                match index[w as usize] {
                    None => {
                        visit(w, &mut next_index, &mut index, &mut lowlink, &mut on_stack, &mut stack);
                        call_stack.push(Frame { node: w, next_child: 0 });
                    }
                    Some(w_index) if on_stack[w as usize] => {
                        lowlink[v] = lowlink[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            call_stack.pop();
            if Some(lowlink[v]) == index[v] {
                let mut members = Vec::new();
                let mut has_self_loop = false;
                while let Some(w) = stack.pop() {
                    on_stack[w as usize] = false;
                    has_self_loop |= indexed.adjacency[w as usize].contains(&w);
                    members.push(indexed.name(w));
                    if w as usize == v {
                        break;
                    }
                }
                members.sort();
                components.push(StronglyConnectedComponent {
                    members,
                    has_self_loop,
                });
            }
            if let Some(parent) = call_stack.last() {
                let p = parent.node as usize;
                lowlink[p] = lowlink[p].min(lowlink[v]);
            }
        }
    }

    tracing::debug!(
        nodes = n,
        components = components.len(),
        cyclic = components.iter().filter(|c| c.is_cyclic()).count(),
        "tarjan complete"
    );
    components
}

fn visit(
    node: u32,
    next_index: &mut u32,
    index: &mut [Option<u32>],
    lowlink: &mut [u32],
    on_stack: &mut [bool],
    stack: &mut Vec<u32>,
) {
    index[node as usize] = Some(*next_index);
    lowlink[node as usize] = *next_index;
    *next_index += 1;
    stack.push(node);
    on_stack[node as usize] = true;
}

impl SccSummary {
    pub fn from_components(components: &[StronglyConnectedComponent]) -> Self {
        Self {
            total_components: components.len(),
            cyclic_components: components.iter().filter(|c| c.is_cyclic()).count(),
            self_loop_components: components.iter().filter(|c| c.has_self_loop).count(),
            largest_component: components.iter().map(|c| c.len()).max().unwrap_or(0),
        }
    }
}

/// One membership record per node, with component ids `scc-<n>` in
/// [`find_strongly_connected_components`] order.
pub fn scc_records(snapshot: &GraphSnapshot) -> Vec<SccRecord> {
    records_from_components(snapshot, &find_strongly_connected_components(snapshot))
}

/// Membership records for components already computed from `snapshot`.
pub fn records_from_components(
    snapshot: &GraphSnapshot,
    components: &[StronglyConnectedComponent],
) -> Vec<SccRecord> {
    let forward = snapshot.forward();
    let entity_type = snapshot.entity_type();
    components
        .iter()
        .enumerate()
        .flat_map(|(n, component)| {
            let component_id = format!("scc-{n}");
            component
                .members
                .iter()
                .map(|member| SccRecord {
                    entity_id: member.clone(),
                    entity_type: entity_type.to_string(),
                    component_id: component_id.clone(),
                    component_size: component.members.len(),
                    members: component.members.clone(),
                    has_self_loop: forward.successors(member).any(|s| s == member),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Compute SCC membership for every node and persist it.
pub fn store_scc_analysis(
    store: &dyn AnalysisStore,
    snapshot: &GraphSnapshot,
) -> AnalysisResult<SccSummary> {
    let components = find_strongly_connected_components(snapshot);
    store_scc_components(store, snapshot, &components)
}

/// Persist membership for components already computed from `snapshot`.
pub fn store_scc_components(
    store: &dyn AnalysisStore,
    snapshot: &GraphSnapshot,
    components: &[StronglyConnectedComponent],
) -> AnalysisResult<SccSummary> {
    let summary = SccSummary::from_components(components);
    store.store_scc_records(&records_from_components(snapshot, components))?;

    tracing::info!(
        total = summary.total_components,
        cyclic = summary.cyclic_components,
        largest = summary.largest_component,
        "stored scc analysis"
    );
    Ok(summary)
}
