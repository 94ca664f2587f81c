//! Removal-order planning
//!
//! Produces the reverse removal order of a graph's vertices under one of
//! three attack strategies:
//! - Static targeted: order by initial degree, tie-broken with uniform noise
//! - Adaptive targeted: repeatedly delete the highest-current-degree vertex
//! - Random failure: uniform random permutation
//!
//! The adaptive strategy runs in O(n + m) on a degree-bucket arena: every
//! edge moves each endpoint down at most one bucket level.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::graph::Graph;
use crate::AttackStrategy;

/// Plan a reverse removal order for `graph` under `strategy`.
///
/// The returned sequence is a permutation of `0..n` read as "last entry is
/// removed first"; it feeds directly into the percolation scorer's
/// incremental reconstruction. All randomness (permutation, shuffles,
/// tie-break noise) is drawn from the supplied generator, so equal seeds
/// give equal orders regardless of scheduling.
pub fn plan<R: Rng>(graph: &Graph, strategy: AttackStrategy, rng: &mut R) -> Vec<usize> {
    match strategy {
        AttackStrategy::StaticTargeted => static_targeted_order(graph, rng),
        AttackStrategy::AdaptiveTargeted => adaptive_targeted_order(graph, rng),
        AttackStrategy::RandomFailure => random_failure_order(graph, rng),
    }
}

/// Reverse removal order under uniform random failures.
fn random_failure_order<R: Rng>(graph: &Graph, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..graph.vertex_count()).collect();
    order.shuffle(rng);
    order
}

/// Reverse removal order under a static targeted attack.
///
/// Degrees are computed once. Sorting ascending on degree plus per-vertex
/// noise in [0, 1) yields lowest-degree-first, which is already the reverse
/// of the highest-degree-first removal sequence. The noise only breaks
/// integer ties; it never reorders distinct degrees.
fn static_targeted_order<R: Rng>(graph: &Graph, rng: &mut R) -> Vec<usize> {
    let keys: Vec<f64> = graph
        .degrees()
        .iter()
        .map(|&d| d as f64 + rng.gen::<f64>())
        .collect();
    let mut order: Vec<usize> = (0..graph.vertex_count()).collect();
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
    order
}

/// Reverse removal order under an adaptive targeted attack.
///
/// Simulates deleting the vertex with the highest current degree until the
/// graph is empty, then reverses the removal sequence. Vertices enter the
/// bucket arena in a random permutation and neighbor visitation is shuffled
/// per vertex, so no particular graph layout biases tie resolution.
fn adaptive_targeted_order<R: Rng>(graph: &Graph, rng: &mut R) -> Vec<usize> {
    let n = graph.vertex_count();
    let mut buckets = DegreeBuckets::new(graph, rng);
    let mut removal_order = Vec::with_capacity(n);
    let mut neighbors = Vec::new();

    for level in (0..buckets.levels()).rev() {
        while let Some(v) = buckets.pop(level) {
            neighbors.clear();
            neighbors.extend_from_slice(graph.neighbors(v));
            neighbors.shuffle(rng);
            for &u in &neighbors {
                if buckets.degree(u) > 0 {
                    buckets.demote(u);
                }
            }
            buckets.mark_removed(v);
            removal_order.push(v);
        }
    }

    removal_order.reverse();
    removal_order
}

/// Degree-indexed bucket arena for adaptive attack simulation.
///
/// `bins[k]` holds the vertices currently at degree `k` in insertion order;
/// `pos[v]` is v's slot within its bucket and `deg[v]` its current degree.
/// Moving a vertex down one level is O(1): swap with the bucket's last
/// element, pop, push onto the bucket below.
struct DegreeBuckets {
    bins: Vec<Vec<usize>>,
    pos: Vec<usize>,
    deg: Vec<usize>,
}

impl DegreeBuckets {
    /// Fill the arena, visiting vertices in a random permutation.
    fn new<R: Rng>(graph: &Graph, rng: &mut R) -> Self {
        let n = graph.vertex_count();
        let mut bins: Vec<Vec<usize>> = Vec::new();
        let mut pos = vec![0usize; n];
        let mut deg = vec![0usize; n];

        let mut visit: Vec<usize> = (0..n).collect();
        visit.shuffle(rng);
        for &v in &visit {
            let k = graph.out_degree(v);
            while bins.len() <= k {
                bins.push(Vec::new());
            }
            bins[k].push(v);
            pos[v] = bins[k].len() - 1;
            deg[v] = k;
        }

        Self { bins, pos, deg }
    }

    /// Number of bucket levels (max initial degree + 1).
    fn levels(&self) -> usize {
        self.bins.len()
    }

    /// Current degree of a vertex; 0 once removed.
    fn degree(&self, v: usize) -> usize {
        self.deg[v]
    }

    /// Pop the most recently inserted vertex at `level`, if any.
    fn pop(&mut self, level: usize) -> Option<usize> {
        self.bins[level].pop()
    }

    /// Move a vertex down one bucket level, decrementing its degree.
    fn demote(&mut self, u: usize) {
        let level = self.deg[u];
        let slot = self.pos[u];
        let last = self.bins[level][self.bins[level].len() - 1];
        self.pos[last] = slot;
        self.bins[level].swap_remove(slot);
        self.bins[level - 1].push(u);
        self.pos[u] = self.bins[level - 1].len() - 1;
        self.deg[u] -= 1;
    }

    /// Tombstone a removed vertex so later neighbor sweeps skip it.
    fn mark_removed(&mut self, v: usize) {
        self.deg[v] = 0;
    }
}
