//! Percolation scoring
//!
//! Converts a reverse removal order into a 100-point robustness curve.
//! Instead of deleting vertices (which would need decremental connectivity),
//! the graph is rebuilt one vertex at a time in reverse removal order while
//! a union-find structure tracks the largest component after each insertion.
//! Reading that trajectory backwards gives the remaining-giant-component
//! fraction after each removal step.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::Graph;
use crate::CURVE_POINTS;

/// Errors from the percolation scorer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PercolationError {
    /// The removal order is not a permutation of the graph's vertex set.
    #[error("removal order is not a permutation of the graph's {expected} vertices")]
    InvalidOrder {
        /// Vertex count of the scored graph.
        expected: usize,
    },
}

/// A 100-point robustness curve.
///
/// Entry `i` (1-indexed) is the mean fraction of vertices remaining in the
/// largest connected component, averaged over the first `ceil(i/100 * n)`
/// removal steps. Values lie in [0, 1]; the curve is immutable once scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobustnessCurve {
    points: Vec<f64>,
}

impl RobustnessCurve {
    pub(crate) fn from_points(points: Vec<f64>) -> Self {
        debug_assert_eq!(points.len(), CURVE_POINTS);
        Self { points }
    }

    /// All 100 checkpoint values, index 0 holding checkpoint 1.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Curve value at checkpoint `i` in `1..=100`.
    pub fn at_checkpoint(&self, i: usize) -> f64 {
        self.points[i - 1]
    }

    /// Curve value at an attack-size fraction in `(0, 1]`.
    ///
    /// The fraction maps to checkpoint `ceil(100 * fraction)`, clamped to
    /// the valid checkpoint range.
    pub fn at_fraction(&self, fraction: f64) -> f64 {
        let checkpoint = (fraction * CURVE_POINTS as f64).ceil() as usize;
        self.at_checkpoint(checkpoint.clamp(1, CURVE_POINTS))
    }
}

/// Union-find over `0..n` with union by size and path halving.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }

    fn component_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }
}

/// Raw removal trajectory `f(1) .. f(n)`.
///
/// `f(j)` is the fraction of vertices in the largest connected component
/// after the first `j` removals; `f(n) = 0`. The sequence is non-increasing.
pub fn trajectory(graph: &Graph, reverse_removal_order: &[usize]) -> Result<Vec<f64>, PercolationError> {
    let n = graph.vertex_count();
    validate_order(reverse_removal_order, n)?;

    // Largest component size after each insertion, k = 1..n.
    let mut dsu = DisjointSet::new(n);
    let mut present = vec![false; n];
    let mut largest = vec![0usize; n];
    let mut running_max = 0;
    for (k, &v) in reverse_removal_order.iter().enumerate() {
        present[v] = true;
        for &u in graph.neighbors(v) {
            if present[u] {
                dsu.union(v, u);
            }
        }
        running_max = running_max.max(dsu.component_size(v));
        largest[k] = running_max;
    }

    // The first j removals leave exactly the vertices of the last n - j
    // insertions, so f(j) reads the insertion trajectory backwards.
    let mut fractions = Vec::with_capacity(n);
    for j in 1..n {
        fractions.push(largest[n - j - 1] as f64 / n as f64);
    }
    if n > 0 {
        fractions.push(0.0);
    }
    Ok(fractions)
}

/// Score a reverse removal order into a robustness curve.
///
/// Checkpoint `i` averages `f(1) .. f(ceil(i/100 * n))`, smoothing the
/// step-like raw trajectory into a bounded [0, 1] sequence even for small n.
pub fn score(graph: &Graph, reverse_removal_order: &[usize]) -> Result<RobustnessCurve, PercolationError> {
    let n = graph.vertex_count();
    let fractions = trajectory(graph, reverse_removal_order)?;
    if n == 0 {
        return Ok(RobustnessCurve::from_points(vec![0.0; CURVE_POINTS]));
    }

    let mut prefix = 0.0;
    let mut prefix_means = Vec::with_capacity(n);
    for (j, &f) in fractions.iter().enumerate() {
        prefix += f;
        prefix_means.push(prefix / (j + 1) as f64);
    }

    let mut points = Vec::with_capacity(CURVE_POINTS);
    for i in 1..=CURVE_POINTS {
        // ceil(i/100 * n) without going through floats.
        let k = (i * n).div_ceil(CURVE_POINTS);
        points.push(prefix_means[k - 1]);
    }
    Ok(RobustnessCurve::from_points(points))
}

fn validate_order(order: &[usize], n: usize) -> Result<(), PercolationError> {
    if order.len() != n {
        return Err(PercolationError::InvalidOrder { expected: n });
    }
    let mut seen = vec![false; n];
    for &v in order {
        if v >= n || seen[v] {
            return Err(PercolationError::InvalidOrder { expected: n });
        }
        seen[v] = true;
    }
    Ok(())
}
