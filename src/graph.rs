//! Adjacency-list graph structure
//!
//! Simple undirected graphs over vertex ids `0..n`, as consumed by the
//! planners and the percolation scorer. Inputs are expected to be loop-free
//! with no parallel edges; empirical networks are additionally reduced to
//! their largest connected component before scoring.

use serde::{Deserialize, Serialize};

/// An undirected graph stored as per-vertex neighbor lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Graph {
    /// Create a graph with `n` vertices and no edges.
    pub fn with_vertices(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
            edge_count: 0,
        }
    }

    /// Build a graph from an edge list.
    ///
    /// The vertex set is `0..n`, grown to cover any endpoint beyond `n`.
    /// Edges are taken as given: callers are responsible for supplying a
    /// simple edge list (no self-loops, no duplicates).
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let size = edges
            .iter()
            .map(|&(u, v)| u.max(v) + 1)
            .max()
            .unwrap_or(0)
            .max(n);
        let mut graph = Self::with_vertices(size);
        for &(u, v) in edges {
            graph.add_edge(u, v);
        }
        graph
    }

    /// Insert an undirected edge between two existing vertices.
    pub fn add_edge(&mut self, u: usize, v: usize) {
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
        self.edge_count += 1;
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Current degree of a vertex.
    pub fn out_degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    /// Neighbors of a vertex.
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.adjacency[v]
    }

    /// Degrees of all vertices, indexed by vertex id.
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(|adj| adj.len()).collect()
    }

    /// Component label for every vertex plus the number of components.
    pub fn connected_components(&self) -> (Vec<usize>, usize) {
        let n = self.vertex_count();
        let mut label = vec![usize::MAX; n];
        let mut count = 0;
        let mut queue = Vec::new();

        for start in 0..n {
            if label[start] != usize::MAX {
                continue;
            }
            label[start] = count;
            queue.push(start);
            while let Some(v) = queue.pop() {
                for &u in &self.adjacency[v] {
                    if label[u] == usize::MAX {
                        label[u] = count;
                        queue.push(u);
                    }
                }
            }
            count += 1;
        }

        (label, count)
    }

    /// Extract the largest connected component as a new graph.
    ///
    /// Vertices are relabeled to `0..size`, preserving their relative order.
    /// Ties between equally sized components resolve to the lowest label.
    pub fn largest_component(&self) -> Graph {
        let n = self.vertex_count();
        if n == 0 {
            return Self::with_vertices(0);
        }

        let (label, count) = self.connected_components();
        let mut sizes = vec![0usize; count];
        for &l in &label {
            sizes[l] += 1;
        }
        let mut giant = 0;
        for (l, &size) in sizes.iter().enumerate() {
            if size > sizes[giant] {
                giant = l;
            }
        }

        // Relabel the surviving vertices in ascending id order.
        let mut remap = vec![usize::MAX; n];
        let mut next = 0;
        for v in 0..n {
            if label[v] == giant {
                remap[v] = next;
                next += 1;
            }
        }

        let mut reduced = Self::with_vertices(sizes[giant]);
        for v in 0..n {
            if label[v] != giant {
                continue;
            }
            for &u in &self.adjacency[v] {
                // Each undirected edge appears in two neighbor lists; keep it once.
                if v < u {
                    reduced.add_edge(remap[v], remap[u]);
                }
            }
        }
        reduced
    }
}
