//! Property-based tests for the robustness scoring engine
//!
//! Uses proptest to verify structural invariants across randomly generated
//! graphs, seeds and baselines: removal orders are permutations, percolation
//! trajectories are monotone and bounded, unranked edges are simple, and the
//! baseline statistic matches its closed form.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use robustnet::graph::Graph;
use robustnet::{attack, gnm, percolation, stats, ALL_STRATEGIES, CURVE_POINTS};

// ============================================================================
// Strategies for random graphs
// ============================================================================

/// A connected graph: random tree plus extra random edges, deduplicated.
fn connected_graph_strategy() -> impl Strategy<Value = Graph> {
    (2usize..40, any::<u64>(), 0usize..60).prop_map(|(n, seed, extra)| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut edges: std::collections::HashSet<(usize, usize)> = std::collections::HashSet::new();
        for v in 1..n {
            let u = (rng.next_u64() % v as u64) as usize;
            edges.insert((u.min(v), u.max(v)));
        }
        for _ in 0..extra {
            let u = (rng.next_u64() % n as u64) as usize;
            let v = (rng.next_u64() % n as u64) as usize;
            if u != v {
                edges.insert((u.min(v), u.max(v)));
            }
        }
        let edges: Vec<(usize, usize)> = edges.into_iter().collect();
        Graph::from_edges(n, &edges)
    })
}

proptest! {
    // ========================================================================
    // Removal-order invariants
    // ========================================================================

    /// Every strategy returns a permutation of the vertex set.
    #[test]
    fn removal_orders_are_permutations(graph in connected_graph_strategy(), seed in any::<u64>()) {
        for strategy in ALL_STRATEGIES {
            let mut rng = StdRng::seed_from_u64(seed);
            let order = attack::plan(&graph, strategy, &mut rng);
            prop_assert_eq!(order.len(), graph.vertex_count());
            let mut seen = vec![false; graph.vertex_count()];
            for &v in &order {
                prop_assert!(v < graph.vertex_count());
                prop_assert!(!seen[v]);
                seen[v] = true;
            }
        }
    }

    // ========================================================================
    // Percolation invariants
    // ========================================================================

    /// The raw trajectory is non-increasing and ends at zero.
    #[test]
    fn trajectory_is_monotone(graph in connected_graph_strategy(), seed in any::<u64>()) {
        for strategy in ALL_STRATEGIES {
            let mut rng = StdRng::seed_from_u64(seed);
            let order = attack::plan(&graph, strategy, &mut rng);
            let f = percolation::trajectory(&graph, &order).unwrap();
            prop_assert_eq!(f.len(), graph.vertex_count());
            for pair in f.windows(2) {
                prop_assert!(pair[0] >= pair[1] - 1e-12);
            }
            prop_assert_eq!(*f.last().unwrap(), 0.0);
        }
    }

    /// Curves hold 100 values in [0, 1], and the final checkpoint is the
    /// mean of the full trajectory.
    #[test]
    fn curves_are_bounded(graph in connected_graph_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let order = attack::plan(&graph, robustnet::AttackStrategy::RandomFailure, &mut rng);
        let f = percolation::trajectory(&graph, &order).unwrap();
        let curve = percolation::score(&graph, &order).unwrap();
        prop_assert_eq!(curve.points().len(), CURVE_POINTS);
        for &p in curve.points() {
            prop_assert!((0.0..=1.0).contains(&p));
        }
        let mean: f64 = f.iter().sum::<f64>() / f.len() as f64;
        prop_assert!((curve.at_checkpoint(CURVE_POINTS) - mean).abs() < 1e-9);
    }

    // ========================================================================
    // Synthesizer invariants
    // ========================================================================

    /// Distinct ranks unrank to distinct, loop-free edges regardless of the
    /// connectivity filter.
    #[test]
    fn unranked_edges_are_simple(ranks in prop::collection::hash_set(1u64..500_000, 1..200)) {
        let mut seen = std::collections::HashSet::new();
        for &x in &ranks {
            let (row, col) = gnm::unrank_pair(x);
            prop_assert!(row > col);
            prop_assert!(seen.insert((row, col)));
        }
    }

    /// Unranking is the inverse of the triangular enumeration.
    #[test]
    fn unranking_inverts_ranking(x in 1u64..2_000_000) {
        let (row, col) = gnm::unrank_pair(x);
        let rank = row as u64 * (row as u64 - 1) / 2 + col as u64;
        prop_assert_eq!(rank, x);
    }

    // ========================================================================
    // Baseline statistic
    // ========================================================================

    /// The statistic matches its closed form on non-degenerate baselines.
    #[test]
    fn zscore_matches_closed_form(
        value in -10.0f64..10.0,
        baseline in prop::collection::vec(-10.0f64..10.0, 2..30),
    ) {
        let k = baseline.len() as f64;
        let mean: f64 = baseline.iter().sum::<f64>() / k;
        let variance: f64 = baseline.iter().map(|b| (b - mean).powi(2)).sum::<f64>() / k;
        prop_assume!(variance > 1e-12);

        let z = stats::zscore(value, &baseline).unwrap();
        let expected = k.sqrt() * (value - mean) / variance.sqrt();
        prop_assert!((z - expected).abs() < 1e-9);
    }

    /// The statistic is invariant under shifting both value and baseline.
    #[test]
    fn zscore_is_shift_invariant(
        value in -5.0f64..5.0,
        shift in -5.0f64..5.0,
        baseline in prop::collection::vec(-5.0f64..5.0, 2..20),
    ) {
        let k = baseline.len() as f64;
        let mean: f64 = baseline.iter().sum::<f64>() / k;
        let variance: f64 = baseline.iter().map(|b| (b - mean).powi(2)).sum::<f64>() / k;
        prop_assume!(variance > 1e-3);

        let shifted: Vec<f64> = baseline.iter().map(|b| b + shift).collect();
        let z = stats::zscore(value, &baseline).unwrap();
        let z_shifted = stats::zscore(value + shift, &shifted).unwrap();
        prop_assert!((z - z_shifted).abs() < 1e-6);
    }
}
