//! Directed graph with forward and reverse adjacency.
//!
//! Every vertex keeps both its outgoing and incoming edge sets so queries run
//! equally fast in either direction:
//! - `reachable_from` / `distances_from`: follow outgoing edges
//! - `can_reach` / `distances_to`: follow incoming edges

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

#[derive(Debug, Clone)]
struct Vertex<T> {
    outgoing: FxHashSet<T>,
    incoming: FxHashSet<T>,
}

impl<T> Default for Vertex<T> {
    fn default() -> Self {
        Self {
            outgoing: FxHashSet::default(),
            incoming: FxHashSet::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone)]
pub struct DirectedGraph<T> {
    vertices: FxHashMap<T, Vertex<T>>,
    edge_count: usize,
}

impl<T: Copy + Eq + Hash> Default for DirectedGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Hash> DirectedGraph<T> {
    pub fn new() -> Self {
        Self {
            vertices: FxHashMap::default(),
            edge_count: 0,
        }
    }

    /// Adds the edge `from -> to`, creating both vertices if needed.
    ///
    /// # Returns
    ///
    /// `true` if the edge was not already present.
    pub fn add_edge(&mut self, from: T, to: T) -> bool {
        let added = self.vertices.entry(from).or_default().outgoing.insert(to);
        if added {
            self.vertices.entry(to).or_default().incoming.insert(from);
            self.edge_count += 1;
        }
        added
    }

    /// Adds an edge only when both endpoints are present.
    pub fn add_optional_edge(&mut self, from: Option<T>, to: Option<T>) -> bool {
        match (from, to) {
            (Some(from), Some(to)) => self.add_edge(from, to),
            _ => false,
        }
    }

    pub fn contains_vertex(&self, vertex: T) -> bool {
        self.vertices.contains_key(&vertex)
    }

    pub fn contains_edge(&self, from: T, to: T) -> bool {
        self.vertices
            .get(&from)
            .is_some_and(|v| v.outgoing.contains(&to))
    }

    /// Outgoing neighbours; empty for unknown vertices.
    pub fn out_edges(&self, vertex: T) -> impl Iterator<Item = T> + '_ {
        self.vertices
            .get(&vertex)
            .into_iter()
            .flat_map(|v| v.outgoing.iter().copied())
    }

    /// Incoming neighbours; empty for unknown vertices.
    pub fn in_edges(&self, vertex: T) -> impl Iterator<Item = T> + '_ {
        self.vertices
            .get(&vertex)
            .into_iter()
            .flat_map(|v| v.incoming.iter().copied())
    }

    pub fn vertices(&self) -> impl Iterator<Item = T> + '_ {
        self.vertices.keys().copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Every vertex reachable from `roots` along outgoing edges, roots included.
    pub fn reachable_from(&self, roots: impl IntoIterator<Item = T>) -> FxHashSet<T> {
        self.layers(roots, &FxHashSet::default(), Direction::Forward)
            .into_iter()
            .flatten()
            .collect()
    }

    /// Every vertex that can reach one of `sinks`, sinks included.
    pub fn can_reach(&self, sinks: impl IntoIterator<Item = T>) -> FxHashSet<T> {
        self.layers(sinks, &FxHashSet::default(), Direction::Backward)
            .into_iter()
            .flatten()
            .collect()
    }

    /// Groups the vertices reachable from `roots` by shortest distance.
    ///
    /// Layer `n` holds the vertices exactly `n` edges away; layer 0 is the
    /// (deduplicated) roots. When `sinks` is non-empty, expansion stops after
    /// the first layer that contains a sink.
    pub fn distances_from(
        &self,
        roots: impl IntoIterator<Item = T>,
        sinks: &FxHashSet<T>,
    ) -> Vec<Vec<T>> {
        self.layers(roots, sinks, Direction::Forward)
    }

    /// Groups the vertices that can reach `sinks` by shortest distance to them,
    /// bounded by the first layer containing one of `roots` when given.
    pub fn distances_to(
        &self,
        sinks: impl IntoIterator<Item = T>,
        roots: &FxHashSet<T>,
    ) -> Vec<Vec<T>> {
        self.layers(sinks, roots, Direction::Backward)
    }

    /// Breadth-first expansion, one layer per distance.
    fn layers(
        &self,
        start: impl IntoIterator<Item = T>,
        stop_at: &FxHashSet<T>,
        direction: Direction,
    ) -> Vec<Vec<T>> {
        let mut seen = FxHashSet::default();
        let first: Vec<T> = start.into_iter().filter(|v| seen.insert(*v)).collect();
        if first.is_empty() {
            return Vec::new();
        }

        let reached = |layer: &[T]| layer.iter().any(|v| stop_at.contains(v));
        let mut done = reached(&first);
        let mut layers = vec![first];

        while !done {
            let mut next = Vec::new();
            if let Some(frontier) = layers.last() {
                for vertex in frontier {
                    let Some(v) = self.vertices.get(vertex) else {
                        continue;
                    };
                    let edges = match direction {
                        Direction::Forward => &v.outgoing,
                        Direction::Backward => &v.incoming,
                    };
                    next.extend(edges.iter().copied().filter(|n| seen.insert(*n)));
                }
            }
            if next.is_empty() {
                break;
            }
            done = reached(&next);
            layers.push(next);
        }

        trace!(
            "[GRAPH] {:?} expansion: {} layers, {} vertices",
            direction,
            layers.len(),
            seen.len()
        );
        layers
    }
}
