//! Reference maximum flow for matching verification
//!
//! Edmonds–Karp over the classical unit-capacity reduction
//! source → Left → Right → sink. The value of a maximum flow equals the size
//! of a maximum matching, which gives an independent cross-check of the
//! augmenting-path matcher.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::data_structures::graph::BipartiteGraph;

/// Flow capacity type; signed so reverse edges can carry negative flow
pub type Capacity = i64;

/// Flow edge representation with residual capacity tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: usize,
    pub to: usize,
    pub capacity: Capacity,
    pub flow: Capacity,
    /// Index of the paired residual edge
    pub reverse_edge_index: usize,
}

impl FlowEdge {
    #[inline]
    pub fn residual_capacity(&self) -> Capacity {
        self.capacity - self.flow
    }
}

/// Flow network with paired residual edges
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowNetwork {
    adjacency: Vec<Vec<usize>>,
    edges: Vec<FlowEdge>,
}

impl FlowNetwork {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
            edges: Vec::new(),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Adds a forward edge and its zero-capacity reverse twin
    pub fn add_edge(&mut self, from: usize, to: usize, capacity: Capacity) {
        let forward = self.edges.len();
        let reverse = forward + 1;

        self.edges.push(FlowEdge {
            from,
            to,
            capacity,
            flow: 0,
            reverse_edge_index: reverse,
        });
        self.edges.push(FlowEdge {
            from: to,
            to: from,
            capacity: 0,
            flow: 0,
            reverse_edge_index: forward,
        });

        self.adjacency[from].push(forward);
        self.adjacency[to].push(reverse);
    }

    /// Pushes flow along shortest residual paths until none remain
    pub fn edmonds_karp(&mut self, source: usize, sink: usize) -> Capacity {
        let mut total = 0;

        while let Some(parents) = self.shortest_residual_path(source, sink) {
            let mut bottleneck = Capacity::MAX;
            let mut v = sink;
            while v != source {
                let e = &self.edges[parents[v]];
                bottleneck = bottleneck.min(e.residual_capacity());
                v = e.from;
            }

            let mut v = sink;
            while v != source {
                let index = parents[v];
                let reverse = self.edges[index].reverse_edge_index;
                self.edges[index].flow += bottleneck;
                self.edges[reverse].flow -= bottleneck;
                v = self.edges[index].from;
            }

            total += bottleneck;
        }

        total
    }

    /// BFS over residual edges; returns the incoming edge index per vertex
    fn shortest_residual_path(&self, source: usize, sink: usize) -> Option<Vec<usize>> {
        let mut parents = vec![usize::MAX; self.vertex_count()];
        let mut seen = vec![false; self.vertex_count()];
        let mut queue = VecDeque::new();
        seen[source] = true;
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            for &index in &self.adjacency[u] {
                let edge = &self.edges[index];
                if edge.residual_capacity() > 0 && !seen[edge.to] {
                    seen[edge.to] = true;
                    parents[edge.to] = index;
                    if edge.to == sink {
                        return Some(parents);
                    }
                    queue.push_back(edge.to);
                }
            }
        }

        None
    }
}

/// Maximum matching size computed through the flow reduction
pub fn maximum_matching_size<V>(graph: &BipartiteGraph<V>) -> usize {
    let n = graph.node_count();
    let (source, sink) = (n, n + 1);
    let mut network = FlowNetwork::new(n + 2);

    for &l in graph.left() {
        network.add_edge(source, l.0, 1);
    }
    for &(l, r) in graph.edges() {
        network.add_edge(l.0, r.0, 1);
    }
    for &r in graph.right() {
        network.add_edge(r.0, sink, 1);
    }

    network.edmonds_karp(source, sink) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::{build_graph, Side};

    #[test]
    fn test_edmonds_karp_classic_network() {
        let mut network = FlowNetwork::new(4);
        network.add_edge(0, 1, 3);
        network.add_edge(0, 2, 2);
        network.add_edge(1, 2, 1);
        network.add_edge(1, 3, 2);
        network.add_edge(2, 3, 3);
        assert_eq!(network.edmonds_karp(0, 3), 5);
    }

    #[test]
    fn test_flow_needs_reverse_edge() {
        // Diamond with a cross edge; the cross edge must stay unused
        let mut network = FlowNetwork::new(4);
        network.add_edge(0, 1, 1);
        network.add_edge(0, 2, 1);
        network.add_edge(1, 2, 1);
        network.add_edge(1, 3, 1);
        network.add_edge(2, 3, 1);
        assert_eq!(network.edmonds_karp(0, 3), 2);
    }

    #[test]
    fn test_matching_size_via_flow() {
        let vertices = [(1, Side::Left), (2, Side::Left), (3, Side::Left)]
            .into_iter()
            .chain([(4, Side::Right), (5, Side::Right), (6, Side::Right)]);
        let g = build_graph(vertices, vec![(1, 4), (1, 5), (2, 5), (3, 6)]).unwrap();
        assert_eq!(maximum_matching_size(&g), 3);

        let star = build_graph(
            vec![(1, Side::Left), (2, Side::Left), (3, Side::Right)],
            vec![(1, 3), (2, 3)],
        )
        .unwrap();
        assert_eq!(maximum_matching_size(&star), 1);
    }
}
