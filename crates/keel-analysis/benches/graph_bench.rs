//! Graph and propagation benchmarks.
//!
//! Run with: cargo bench -p keel-analysis --bench graph_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keel_analysis::graph::{find_strongly_connected_components, GraphSnapshot, ModuleGraph};
use keel_analysis::probabilistic::propagate_confidence;
use keel_core::types::collections::BTreeMap;

/// Layered graph with a back edge every tenth node so SCCs are non-trivial.
fn layered_graph(n: usize) -> GraphSnapshot {
    let mut graph = ModuleGraph::new();
    for i in 0..n {
        let from = format!("m{i:06}");
        for step in [1, 7, 31] {
            if i + step < n {
                graph.add_edge(from.clone(), format!("m{:06}", i + step));
            }
        }
        if i % 10 == 9 {
            graph.add_edge(from, format!("m{:06}", i - 9));
        }
    }
    GraphSnapshot::new(graph)
}

fn bench_scc(c: &mut Criterion) {
    let mut group = c.benchmark_group("tarjan_scc");
    for n in [1_000, 10_000, 50_000] {
        let snapshot = layered_graph(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &snapshot, |b, s| {
            b.iter(|| find_strongly_connected_components(black_box(s)))
        });
    }
    group.finish();
}

fn bench_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagate_confidence");
    for n in [1_000, 10_000] {
        let snapshot = layered_graph(n);
        let means: BTreeMap<String, f64> = snapshot
            .nodes()
            .enumerate()
            .map(|(i, id)| (id.to_string(), (i % 100) as f64 / 100.0))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &snapshot, |b, s| {
            b.iter(|| propagate_confidence(black_box(s), &means, 0.7))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scc, bench_propagation);
criterion_main!(benches);
