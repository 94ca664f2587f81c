//! Benchmark for removal-order planning and percolation scoring
//!
//! Measures the adaptive degree-bucket planner and the union-find scorer on
//! scale-free networks of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use robustnet::graph::Graph;
use robustnet::{attack, percolation, AttackStrategy};

/// Barabási-Albert scale-free network via preferential attachment.
fn create_ba_graph(n: usize, m: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    let mut degrees = vec![0usize; n];

    for i in 0..m {
        for j in (i + 1)..m {
            edges.push((i, j));
            degrees[i] += 1;
            degrees[j] += 1;
        }
    }

    for i in m..n {
        let total: usize = degrees.iter().take(i).sum();
        let mut targets = std::collections::HashSet::new();
        while targets.len() < m {
            let r = rng.gen::<f64>() * total as f64;
            let mut cumsum = 0.0;
            for j in 0..i {
                cumsum += degrees[j] as f64;
                if cumsum >= r {
                    targets.insert(j);
                    break;
                }
            }
        }
        for &j in &targets {
            edges.push((i, j));
            degrees[i] += 1;
            degrees[j] += 1;
        }
    }

    Graph::from_edges(n, &edges)
}

fn bench_adaptive_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive_planning");
    for &n in &[1_000usize, 5_000, 20_000] {
        let graph = create_ba_graph(n, 3, 42);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(7);
                black_box(attack::plan(
                    graph,
                    AttackStrategy::AdaptiveTargeted,
                    &mut rng,
                ))
            })
        });
    }
    group.finish();
}

fn bench_percolation_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("percolation_scoring");
    for &n in &[1_000usize, 5_000, 20_000] {
        let graph = create_ba_graph(n, 3, 42);
        let mut rng = StdRng::seed_from_u64(7);
        let order = attack::plan(&graph, AttackStrategy::RandomFailure, &mut rng);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(graph, order),
            |b, (graph, order)| b.iter(|| black_box(percolation::score(graph, order).unwrap())),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_adaptive_planning, bench_percolation_scoring);
criterion_main!(benches);
