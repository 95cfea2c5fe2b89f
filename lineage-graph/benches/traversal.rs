//! Benchmarks for lineage traversal and serialization
//!
//! Run with: cargo bench -p lineage-graph

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lineage_graph::graph::memory;
use lineage_graph::serialize::to_graphson;
use lineage_graph::{AssetContext, LineageGraph, TraversalConfig, TraversalEngine};
use lineage_shared::relationships::{
    ATTRIBUTE_FOR_SCHEMA, LINEAGE_MAPPING, RELATIONAL_COLUMN, RELATIONAL_TABLE,
};
use lineage_shared::{Edge, LineageEntity, Scope, View};
use rand::prelude::*;

// ============================================================================
// Helpers for synthetic graph generation
// ============================================================================

fn column_guid(n: u32) -> String {
    format!("column-{n:08}")
}

fn add_column(graph: &mut LineageGraph, n: u32) -> String {
    let guid = column_guid(n);
    graph.add_vertex(LineageEntity::new(guid.clone(), RELATIONAL_COLUMN));
    guid
}

fn add_mapping(graph: &mut LineageGraph, from: &str, to: &str) {
    let _ = graph.insert_edge(Edge::new(from, to, LINEAGE_MAPPING));
}

/// Unbounded engine so large synthetic graphs never hit the budget
fn unbounded() -> TraversalEngine {
    TraversalEngine::new(TraversalConfig {
        max_hops: usize::MAX,
        timeout: None,
        ..TraversalConfig::default()
    })
}

/// Generate a linear chain: 0 -> 1 -> 2 -> ... -> n-1
fn generate_linear_chain(n: u32) -> (LineageGraph, String) {
    let mut graph = LineageGraph::new();
    let guids: Vec<String> = (0..n).map(|i| add_column(&mut graph, i)).collect();

    for pair in guids.windows(2) {
        add_mapping(&mut graph, &pair[0], &pair[1]);
    }

    let last = guids.last().cloned().unwrap_or_default();
    (graph, last)
}

/// Generate a wide fan-in: [1, 2, ..., n-1] -> sink
fn generate_fan_in(n: u32) -> (LineageGraph, String) {
    let mut graph = LineageGraph::new();
    let sink = add_column(&mut graph, 0);

    for i in 1..n {
        let source = add_column(&mut graph, i);
        add_mapping(&mut graph, &source, &sink);
    }

    (graph, sink)
}

/// Generate a random graph with n nodes and e edges
fn generate_random_graph(n: u32, edges: u32, seed: u64) -> (LineageGraph, String) {
    let mut graph = LineageGraph::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let guids: Vec<String> = (0..n).map(|i| add_column(&mut graph, i)).collect();

    for _ in 0..edges {
        let source = rng.gen_range(0..n) as usize;
        let target = rng.gen_range(0..n) as usize;
        if source != target {
            add_mapping(&mut graph, &guids[source], &guids[target]);
        }
    }

    (graph, guids[0].clone())
}

/// Generate tables of `width` columns each, with each column mapped to the
/// same column of the next table
fn generate_tables(tables: u32, width: u32) -> (LineageGraph, String) {
    let mut graph = LineageGraph::new();
    let mut previous: Vec<String> = Vec::new();

    for t in 0..tables {
        let table = format!("table-{t:05}");
        graph.add_vertex(LineageEntity::new(table.clone(), RELATIONAL_TABLE));

        let mut current = Vec::with_capacity(width as usize);
        for c in 0..width {
            let column = add_column(&mut graph, t * width + c);
            let _ = graph.insert_edge(Edge::new(table.clone(), column.clone(), ATTRIBUTE_FOR_SCHEMA));
            if let Some(upstream) = previous.get(c as usize) {
                add_mapping(&mut graph, upstream, &column);
            }
            current.push(column);
        }
        previous = current;
    }

    let last = previous.first().cloned().unwrap_or_default();
    (graph, last)
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_ultimate_source_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("ultimate_source_chain");
    let engine = unbounded();

    for size in [100, 500, 1000, 5000] {
        let (graph, sink) = generate_linear_chain(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let result = engine
                    .lineage(&graph, Scope::UltimateSource, View::ColumnView, &sink)
                    .map(|s| s.vertex_count());
                black_box(result)
            });
        });
    }

    group.finish();
}

fn bench_source_and_destination_fan_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("source_and_destination_fan_in");
    let engine = unbounded();

    for size in [100, 1000, 5000] {
        let (graph, sink) = generate_fan_in(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let result = engine
                    .lineage(&graph, Scope::SourceAndDestination, View::ColumnView, &sink)
                    .map(|s| s.edge_count());
                black_box(result)
            });
        });
    }

    group.finish();
}

fn bench_end_to_end_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end_random");
    let engine = unbounded();

    // (nodes, edges)
    for (nodes, edges) in [(100, 200), (1000, 5000), (5000, 20000)] {
        let (graph, start) = generate_random_graph(nodes, edges, 42);

        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_with_input(
            BenchmarkId::new("nodes", format!("{}_edges_{}", nodes, edges)),
            &nodes,
            |b, _| {
                b.iter(|| {
                    let result = engine
                        .lineage(&graph, Scope::EndToEnd, View::ColumnView, &start)
                        .map(|s| s.vertex_count());
                    black_box(result)
                });
            },
        );
    }

    group.finish();
}

fn bench_view_collapsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_collapsing");
    let engine = unbounded();
    let (graph, last) = generate_tables(200, 20);

    for view in [View::ColumnView, View::TableView] {
        group.bench_function(view.as_str(), |b| {
            b.iter(|| {
                let result = engine
                    .lineage(&graph, Scope::UltimateSource, view, &last)
                    .map(|s| s.vertex_count());
                black_box(result)
            });
        });
    }

    group.finish();
}

fn bench_merge_context(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_context");

    for size in [10, 100, 1000] {
        let mut context = AssetContext::new();
        for i in 0..size {
            context.add_vertex(LineageEntity::new(column_guid(i), RELATIONAL_COLUMN));
            if i > 0 {
                context.add_edge(Edge::new(column_guid(i - 1), column_guid(i), LINEAGE_MAPPING));
            }
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut graph = LineageGraph::new();
                black_box(graph.merge(&context).map(|stats| stats.edges_inserted))
            });
        });
    }

    group.finish();
}

fn bench_graphson_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("graphson_export");

    for (nodes, edges) in [(1000, 5000), (5000, 20000)] {
        let (graph, _) = generate_random_graph(nodes, edges, 7);

        group.throughput(Throughput::Elements(graph.edge_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &nodes, |b, _| {
            b.iter(|| black_box(to_graphson(&graph).map(|doc| doc.len())));
        });
    }

    group.finish();
}

fn bench_memory_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory");
    let (graph, _) = generate_random_graph(5000, 20000, 42);

    let report = memory::graph_size(&graph);
    println!(
        "\nrandom 5000/20000: {} total, {:.1} bytes/vertex",
        memory::format_bytes(report.total_bytes),
        memory::bytes_per_vertex(&graph)
    );

    group.bench_function("graph_size_5000_nodes", |b| {
        b.iter(|| black_box(memory::graph_size(&graph).total_bytes));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ultimate_source_chain,
    bench_source_and_destination_fan_in,
    bench_end_to_end_random,
    bench_view_collapsing,
    bench_merge_context,
    bench_graphson_export,
    bench_memory_report,
);

criterion_main!(benches);
