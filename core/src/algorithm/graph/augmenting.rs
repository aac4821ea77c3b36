//! Augmenting-path discovery over the alternating graph
//!
//! Depth-first search is started from each free Left vertex in turn, in
//! declaration order. Each start owns a fresh visited set; the search uses an
//! explicit stack whose contents are the current path, so no state is shared
//! between start vertices and nothing needs to be snapshotted on recursion.
//! The first path that reaches a free Right vertex is returned as is: no
//! attempt is made to find a shortest one.

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::alternating::AlternatingGraph;
use crate::algorithm::traits::NodeId;
use crate::data_structures::graph::{BipartiteGraph, Vertex};

/// Vertex sequence from a free Left vertex to a free Right vertex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentingPath {
    vertices: Vec<NodeId>,
}

impl AugmentingPath {
    pub fn new(vertices: Vec<NodeId>) -> Self {
        Self { vertices }
    }

    /// Vertices in visit order
    #[inline]
    pub fn vertices(&self) -> &[NodeId] {
        &self.vertices
    }

    /// Number of edges on the path (always odd for a found path)
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    #[inline]
    pub fn start(&self) -> Option<NodeId> {
        self.vertices.first().copied()
    }

    #[inline]
    pub fn end(&self) -> Option<NodeId> {
        self.vertices.last().copied()
    }

    /// Consecutive vertex pairs along the path
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.vertices.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn labels<V: Vertex>(&self, graph: &BipartiteGraph<V>) -> Vec<V> {
        self.vertices.iter().map(|&v| graph.label(v).clone()).collect()
    }
}

/// Work done by one search round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStatistics {
    /// Free Left vertices a search was started from
    pub starts_tried: usize,

    /// Vertices pushed onto the stack across all starts
    pub vertices_explored: usize,
}

/// Result of one search round
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub path: Option<AugmentingPath>,
    pub statistics: SearchStatistics,
}

/// Finds the first augmenting path, trying free Left vertices in order
pub fn find_augmenting_path(alternating: &AlternatingGraph) -> SearchOutcome {
    let mut statistics = SearchStatistics::default();

    for &start in alternating.sources() {
        statistics.starts_tried += 1;
        if let Some(vertices) = search_from(alternating, start, &mut statistics) {
            log::trace!("augmenting path from {start}: {} vertices", vertices.len());
            return SearchOutcome {
                path: Some(AugmentingPath::new(vertices)),
                statistics,
            };
        }
        log::trace!("no free Right vertex reachable from {start}");
    }

    SearchOutcome {
        path: None,
        statistics,
    }
}

/// Depth-first search from one start vertex.
///
/// Stack entries carry the index of the next successor to try; the stack
/// itself is the path from `start` to the vertex on top.
fn search_from(
    alternating: &AlternatingGraph,
    start: NodeId,
    statistics: &mut SearchStatistics,
) -> Option<Vec<NodeId>> {
    let mut visited = vec![false; alternating.node_count()];
    let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];
    visited[start.0] = true;
    statistics.vertices_explored += 1;

    if alternating.is_target(start) {
        return Some(vec![start]);
    }

    while let Some(top) = stack.last_mut() {
        let (v, next) = *top;
        match alternating.successors(v).get(next) {
            Some(&w) => {
                top.1 += 1;
                if visited[w.0] {
                    continue;
                }
                visited[w.0] = true;
                statistics.vertices_explored += 1;
                stack.push((w, 0));

                if alternating.is_target(w) {
                    return Some(stack.iter().map(|&(u, _)| u).collect());
                }
            }
            None => {
                stack.pop();
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::{build_graph, Side};
    use crate::data_structures::matching::Matching;

    fn graph(left: &[u32], right: &[u32], edges: &[(u32, u32)]) -> BipartiteGraph<u32> {
        let vertices = left
            .iter()
            .map(|&v| (v, Side::Left))
            .chain(right.iter().map(|&v| (v, Side::Right)));
        build_graph(vertices, edges.iter().copied()).unwrap()
    }

    fn search(g: &BipartiteGraph<u32>, m: &Matching) -> SearchOutcome {
        find_augmenting_path(&AlternatingGraph::build(g, m))
    }

    #[test]
    fn test_single_free_edge_is_found() {
        let g = graph(&[1], &[2], &[(1, 2)]);
        let outcome = search(&g, &Matching::empty(&g));
        let path = outcome.path.unwrap();
        assert_eq!(path.labels(&g), vec![1, 2]);
        assert_eq!(path.edge_count(), 1);
    }

    #[test]
    fn test_path_through_matched_edge() {
        let g = graph(&[1, 2], &[3, 4], &[(1, 3), (1, 4), (2, 3)]);
        let m = Matching::from_pairs(&g, vec![(1, 3)]).unwrap();
        let path = search(&g, &m).path.unwrap();

        assert_eq!(path.labels(&g), vec![2, 3, 1, 4]);
        assert_eq!(path.edge_count(), 3);
        assert!(m.check_augmenting(&g, path.vertices()).is_ok());
    }

    #[test]
    fn test_first_found_not_shortest() {
        // From 1 the search follows 1 -> 3 -> 2 -> 5 before trying 1 -> 4
        let g = graph(&[1, 2], &[3, 4, 5], &[(1, 3), (1, 4), (2, 3), (2, 5)]);
        let m = Matching::from_pairs(&g, vec![(2, 3)]).unwrap();
        let path = search(&g, &m).path.unwrap();
        assert_eq!(path.labels(&g), vec![1, 3, 2, 5]);
    }

    #[test]
    fn test_dead_end_start_is_abandoned() {
        // 1 only reaches matched 3, whose partner 2 has no other way out
        let g = graph(&[1, 2, 5], &[3, 6], &[(1, 3), (2, 3), (5, 6)]);
        let m = Matching::from_pairs(&g, vec![(2, 3)]).unwrap();
        let outcome = search(&g, &m);

        assert_eq!(outcome.path.unwrap().labels(&g), vec![5, 6]);
        assert_eq!(outcome.statistics.starts_tried, 2);
        assert_eq!(outcome.statistics.vertices_explored, 5);
    }

    #[test]
    fn test_no_path_when_maximum() {
        let g = graph(&[1, 2], &[3], &[(1, 3), (2, 3)]);
        let m = Matching::from_pairs(&g, vec![(1, 3)]).unwrap();
        let outcome = search(&g, &m);
        assert!(outcome.path.is_none());
        assert_eq!(outcome.statistics.starts_tried, 1);
    }

    #[test]
    fn test_cycle_in_alternating_graph_terminates() {
        // Perfect matching on a 4-cycle except one free pair hanging off it
        let g = graph(
            &[1, 2, 5],
            &[3, 4],
            &[(1, 3), (1, 4), (2, 3), (2, 4), (5, 3)],
        );
        let m = Matching::from_pairs(&g, vec![(1, 3), (2, 4)]).unwrap();
        let outcome = search(&g, &m);
        assert!(outcome.path.is_none());
    }

    #[test]
    fn test_empty_graph_has_no_path() {
        let g = graph(&[1, 2], &[3], &[]);
        let outcome = search(&g, &Matching::empty(&g));
        assert!(outcome.path.is_none());
        assert_eq!(outcome.statistics.vertices_explored, 2);
    }
}
