//! Uniform G(n,m) random-graph synthesis
//!
//! Generates size-matched random controls without duplicate-edge rejection:
//! the set of unordered vertex pairs is ranked `1..n(n-1)/2` under a
//! triangular enumeration, m distinct ranks are drawn without replacement,
//! and each rank is unranked to its pair in closed form. Acceptance requires
//! the largest connected component to cover at least 96% of the requested
//! vertex count, retried up to 100 times on the same seed stream.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::Graph;

/// Maximum synthesis attempts before giving up on a spec.
pub const MAX_ATTEMPTS: usize = 100;

/// Minimum fraction of `n` the largest component must cover for acceptance.
pub const CONNECTIVITY_BOUND: f64 = 0.96;

/// Parameters for one size-matched random control.
///
/// Constructed by the orchestration layer before dispatch, with the seed
/// pre-drawn, so results are reproducible regardless of execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomGraphSpec {
    /// Target vertex count.
    pub n: usize,
    /// Target edge count.
    pub m: usize,
    /// Seed for the unit's generator.
    pub seed: u64,
}

/// Errors from random-graph synthesis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// The spec violates `0 <= m <= n(n-1)/2`.
    #[error("invalid random graph spec: m = {m} exceeds the {max_edges} possible edges on {n} vertices")]
    InvalidSpec { n: usize, m: usize, max_edges: u64 },
    /// No attempt met the connectivity bound.
    #[error("no graph met the 96% connectivity bound within {attempts} attempts")]
    ConnectivityFailure { attempts: usize },
}

/// Unrank a 1-indexed pair rank to its `(row, col)` edge.
///
/// Closed-form inverse of the triangular enumeration:
/// `row = 1 + floor(-0.5 + sqrt(0.25 + 2x))`, `col = x - row(row-1)/2`,
/// so `row > col >= 0` for every `x >= 1`. The integer clamp only repairs
/// float rounding at triangular-number boundaries for very large ranks.
pub fn unrank_pair(x: u64) -> (usize, usize) {
    debug_assert!(x >= 1);
    let mut row = (-0.5 + (0.25 + 2.0 * x as f64).sqrt()).floor() as u64 + 1;
    while row * (row - 1) / 2 > x {
        row -= 1;
    }
    while row * (row + 1) / 2 <= x {
        row += 1;
    }
    let col = x - row * (row - 1) / 2;
    (row as usize, col as usize)
}

/// Synthesize a random control graph for `spec`.
///
/// Returns the largest connected component of an accepted draw; the result
/// keeps at least 96% of `spec.n` vertices but is not required to preserve
/// `n` exactly. All attempts consume the same seeded stream, advanced in
/// order, so a given spec always synthesizes the same graph.
pub fn synthesize(spec: &RandomGraphSpec) -> Result<Graph, SynthesisError> {
    let max_edges = spec.n as u64 * (spec.n.saturating_sub(1)) as u64 / 2;
    if spec.m as u64 > max_edges {
        return Err(SynthesisError::InvalidSpec {
            n: spec.n,
            m: spec.m,
            max_edges,
        });
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    for _ in 0..MAX_ATTEMPTS {
        let ranks = rand::seq::index::sample(&mut rng, max_edges as usize, spec.m);
        let edges: Vec<(usize, usize)> = ranks
            .iter()
            .map(|rank| unrank_pair(rank as u64 + 1))
            .collect();

        let graph = Graph::from_edges(spec.n, &edges);
        let reduced = graph.largest_component();
        if reduced.vertex_count() as f64 / spec.n as f64 >= CONNECTIVITY_BOUND {
            return Ok(reduced);
        }
    }
    Err(SynthesisError::ConnectivityFailure {
        attempts: MAX_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrank_worked_examples() {
        // Fixed ranks with known pairs under the triangular enumeration.
        assert_eq!(unrank_pair(1), (2, 0));
        assert_eq!(unrank_pair(2), (2, 1));
        assert_eq!(unrank_pair(3), (3, 0));
        assert_eq!(unrank_pair(4), (3, 1));
        assert_eq!(unrank_pair(5), (3, 2));
        assert_eq!(unrank_pair(6), (4, 0));
    }

    #[test]
    fn test_unrank_is_simple_and_injective() {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for x in 1..=5050 {
            let (row, col) = unrank_pair(x);
            assert!(row > col, "self-loop or inverted pair at rank {}", x);
            assert!(seen.insert((row, col)), "duplicate pair at rank {}", x);
        }
    }

    #[test]
    fn test_unrank_large_rank_boundaries() {
        // Triangular boundaries where float rounding is most likely to slip.
        for row in [1_000u64, 100_000, 3_000_000] {
            let first = row * (row - 1) / 2;
            let last = row * (row + 1) / 2 - 1;
            assert_eq!(unrank_pair(first), (row as usize, 0));
            assert_eq!(unrank_pair(last), (row as usize, row as usize - 1));
        }
    }

    #[test]
    fn test_invalid_spec_is_rejected() {
        let spec = RandomGraphSpec { n: 4, m: 7, seed: 0 };
        match synthesize(&spec) {
            Err(SynthesisError::InvalidSpec { max_edges: 6, .. }) => {}
            other => panic!("expected InvalidSpec, got {:?}", other),
        }
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let spec = RandomGraphSpec { n: 50, m: 120, seed: 42 };
        let a = synthesize(&spec).unwrap();
        let b = synthesize(&spec).unwrap();
        assert_eq!(a.vertex_count(), b.vertex_count());
        assert_eq!(a.edge_count(), b.edge_count());
        assert_eq!(a.degrees(), b.degrees());
    }

    #[test]
    fn test_dense_spec_meets_connectivity_bound() {
        let spec = RandomGraphSpec { n: 60, m: 200, seed: 7 };
        let graph = synthesize(&spec).unwrap();
        assert!(graph.vertex_count() as f64 >= CONNECTIVITY_BOUND * 60.0);
        assert!(graph.edge_count() <= 200);
        // Accepted graphs are a single component by construction.
        let (_, components) = graph.connected_components();
        assert_eq!(components, 1);
    }

    #[test]
    fn test_sparse_spec_fails_connectivity() {
        // 100 vertices with 5 edges can never keep 96% of vertices connected.
        let spec = RandomGraphSpec { n: 100, m: 5, seed: 3 };
        assert_eq!(
            synthesize(&spec),
            Err(SynthesisError::ConnectivityFailure { attempts: MAX_ATTEMPTS })
        );
    }

    #[test]
    fn test_empty_spec() {
        let spec = RandomGraphSpec { n: 1, m: 0, seed: 9 };
        let graph = synthesize(&spec).unwrap();
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }
}
