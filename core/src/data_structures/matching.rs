//! Matching state over a bipartite graph
//!
//! A matching is stored as a mate table indexed by [`NodeId`], so both
//! "is v matched" and "is (u, v) in M" are O(1). The table is symmetric:
//! `mate[u] == Some(v)` iff `mate[v] == Some(u)`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashSet;

use thiserror::Error;

use crate::algorithm::traits::NodeId;
use crate::data_structures::graph::{BipartiteGraph, Side, Vertex};

/// Errors raised when a matching is supplied or updated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchingError {
    #[error("Inconsistent matching: {0}")]
    InconsistentMatching(String),

    #[error("Invalid augmenting path: {0}")]
    InvalidAugmentingPath(String),
}

/// Current set of matched edges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    mate: Vec<Option<NodeId>>,
    size: usize,
}

impl Matching {
    /// Empty matching sized for `node_count` vertices
    pub fn new(node_count: usize) -> Self {
        Self {
            mate: vec![None; node_count],
            size: 0,
        }
    }

    /// Empty matching for a graph
    pub fn empty<V>(graph: &BipartiteGraph<V>) -> Self {
        Self::new(graph.node_count())
    }

    /// Validates and loads a labelled initial matching.
    ///
    /// Every pair must be an edge of the graph (either orientation) and no
    /// vertex may appear in two different pairs. Repeating the same pair is
    /// tolerated.
    pub fn from_pairs<V, I>(graph: &BipartiteGraph<V>, pairs: I) -> Result<Self, MatchingError>
    where
        V: Vertex,
        I: IntoIterator<Item = (V, V)>,
    {
        let mut matching = Self::empty(graph);

        for (u, v) in pairs {
            let (l, r) = graph.edge_between(&u, &v).ok_or_else(|| {
                MatchingError::InconsistentMatching(format!(
                    "({u:?}, {v:?}) is not an edge of the graph"
                ))
            })?;

            if matching.contains(l, r) {
                continue;
            }
            for end in [l, r] {
                if let Some(other) = matching.mate(end) {
                    return Err(MatchingError::InconsistentMatching(format!(
                        "vertex {:?} is incident to both ({u:?}, {v:?}) and an edge to {:?}",
                        graph.label(end),
                        graph.label(other),
                    )));
                }
            }
            matching.link(l, r);
        }

        Ok(matching)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn is_matched(&self, v: NodeId) -> bool {
        self.mate[v.0].is_some()
    }

    #[inline]
    pub fn mate(&self, v: NodeId) -> Option<NodeId> {
        self.mate[v.0]
    }

    /// Orientation-agnostic membership test
    #[inline]
    pub fn contains(&self, u: NodeId, v: NodeId) -> bool {
        self.mate[u.0] == Some(v)
    }

    /// Matched edges as (left, right) in Left declaration order
    pub fn pairs<V>(&self, graph: &BipartiteGraph<V>) -> Vec<(NodeId, NodeId)> {
        graph
            .left()
            .iter()
            .filter_map(|&l| self.mate(l).map(|r| (l, r)))
            .collect()
    }

    /// Matched edges resolved to labels, in Left declaration order
    pub fn labelled_pairs<V: Vertex>(&self, graph: &BipartiteGraph<V>) -> Vec<(V, V)> {
        self.pairs(graph)
            .into_iter()
            .map(|(l, r)| (graph.label(l).clone(), graph.label(r).clone()))
            .collect()
    }

    fn link(&mut self, u: NodeId, v: NodeId) {
        self.mate[u.0] = Some(v);
        self.mate[v.0] = Some(u);
        self.size += 1;
    }

    fn unlink(&mut self, u: NodeId, v: NodeId) {
        debug_assert!(self.contains(u, v));
        self.mate[u.0] = None;
        self.mate[v.0] = None;
        self.size -= 1;
    }

    /// Checks that `path` is augmenting with respect to this matching.
    ///
    /// The path must start at a free Left vertex, end at a free Right vertex,
    /// visit each vertex once, follow graph edges, and alternate between
    /// edges outside and inside the matching.
    pub fn check_augmenting<V>(
        &self,
        graph: &BipartiteGraph<V>,
        path: &[NodeId],
    ) -> Result<(), MatchingError> {
        let invalid = |reason: String| Err(MatchingError::InvalidAugmentingPath(reason));

        let (first, last) = match (path.first(), path.last()) {
            (Some(&first), Some(&last)) if path.len() >= 2 => (first, last),
            _ => return invalid(format!("a path needs at least one edge, got {} vertices", path.len())),
        };
        if let Some(v) = path.iter().find(|v| v.0 >= self.mate.len()) {
            return invalid(format!("vertex {v} is not part of the graph"));
        }
        if graph.side(first) != Side::Left || self.is_matched(first) {
            return invalid(format!("path must start at a free Left vertex, starts at {first}"));
        }
        if graph.side(last) != Side::Right || self.is_matched(last) {
            return invalid(format!("path must end at a free Right vertex, ends at {last}"));
        }

        let mut seen = HashSet::with_capacity(path.len());
        if let Some(v) = path.iter().find(|v| !seen.insert(**v)) {
            return invalid(format!("vertex {v} is visited twice"));
        }

        for (i, pair) in path.windows(2).enumerate() {
            let (u, v) = (pair[0], pair[1]);
            if !graph.has_edge(u, v) {
                return invalid(format!("({u}, {v}) is not an edge of the graph"));
            }
            let should_be_matched = i % 2 == 1;
            if self.contains(u, v) != should_be_matched {
                return invalid(format!(
                    "edge {i} ({u}, {v}) breaks alternation: expected {}",
                    if should_be_matched { "a matched edge" } else { "an unmatched edge" }
                ));
            }
        }

        Ok(())
    }

    /// Applies an augmenting path by toggling every edge on it.
    ///
    /// Matched edges on the path leave the matching, unmatched ones enter
    /// it; the matching grows by exactly one edge. The path is checked
    /// first and the matching is left untouched if it is not augmenting.
    pub fn augment<V>(
        &mut self,
        graph: &BipartiteGraph<V>,
        path: &[NodeId],
    ) -> Result<(), MatchingError> {
        self.check_augmenting(graph, path)?;

        let before = self.size;
        for pair in path.windows(2).skip(1).step_by(2) {
            self.unlink(pair[0], pair[1]);
        }
        for pair in path.windows(2).step_by(2) {
            self.link(pair[0], pair[1]);
        }
        debug_assert_eq!(self.size, before + 1);

        Ok(())
    }

    /// Greedily matches each free Left vertex to its first free neighbor.
    ///
    /// Returns the number of edges added.
    pub fn seed_greedy<V>(&mut self, graph: &BipartiteGraph<V>) -> usize {
        let before = self.size;
        for &l in graph.left() {
            if self.is_matched(l) {
                continue;
            }
            if let Some(&r) = graph.neighbors(l).iter().find(|&&r| !self.is_matched(r)) {
                self.link(l, r);
            }
        }
        self.size - before
    }

    /// Re-checks the matching invariant against a graph
    pub fn validate<V>(&self, graph: &BipartiteGraph<V>) -> Result<(), MatchingError> {
        if self.mate.len() != graph.node_count() {
            return Err(MatchingError::InconsistentMatching(format!(
                "matching covers {} vertices, graph has {}",
                self.mate.len(),
                graph.node_count()
            )));
        }

        let mut edges = 0;
        for (i, mate) in self.mate.iter().enumerate() {
            let u = NodeId(i);
            let Some(v) = *mate else { continue };
            if self.mate[v.0] != Some(u) {
                return Err(MatchingError::InconsistentMatching(format!(
                    "{u} points at {v} which does not point back"
                )));
            }
            if !graph.has_edge(u, v) {
                return Err(MatchingError::InconsistentMatching(format!(
                    "({u}, {v}) is not an edge of the graph"
                )));
            }
            if graph.side(u) == Side::Left {
                edges += 1;
            }
        }

        if edges != self.size {
            return Err(MatchingError::InconsistentMatching(format!(
                "recorded size {} but {} matched edges present",
                self.size, edges
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::build_graph;

    fn graph(left: &[u32], right: &[u32], edges: &[(u32, u32)]) -> BipartiteGraph<u32> {
        let vertices = left
            .iter()
            .map(|&v| (v, Side::Left))
            .chain(right.iter().map(|&v| (v, Side::Right)));
        build_graph(vertices, edges.iter().copied()).unwrap()
    }

    fn ids(graph: &BipartiteGraph<u32>, labels: &[u32]) -> Vec<NodeId> {
        labels.iter().map(|l| graph.node_id(l).unwrap()).collect()
    }

    #[test]
    fn test_from_pairs_accepts_valid_matching() {
        let g = graph(&[1, 2], &[3, 4], &[(1, 3), (2, 4), (2, 3)]);
        let m = Matching::from_pairs(&g, vec![(4, 2), (1, 3), (1, 3)]).unwrap();

        assert_eq!(m.len(), 2);
        assert_eq!(m.labelled_pairs(&g), vec![(1, 3), (2, 4)]);
        assert!(m.validate(&g).is_ok());
    }

    #[test]
    fn test_from_pairs_rejects_shared_vertex() {
        let g = graph(&[1, 2], &[3], &[(1, 3), (2, 3)]);
        let err = Matching::from_pairs(&g, vec![(1, 3), (2, 3)]).unwrap_err();
        assert!(matches!(err, MatchingError::InconsistentMatching(_)));
    }

    #[test]
    fn test_from_pairs_rejects_non_edge() {
        let g = graph(&[1, 2], &[3], &[(1, 3)]);
        let err = Matching::from_pairs(&g, vec![(2, 3)]).unwrap_err();
        assert!(err.to_string().contains("not an edge"));

        let err = Matching::from_pairs(&g, vec![(1, 99)]).unwrap_err();
        assert!(matches!(err, MatchingError::InconsistentMatching(_)));
    }

    #[test]
    fn test_augment_toggles_path_edges() {
        // 1-3 matched; path 2 -> 3 -> 1 -> 4 flips it into 2-3, 1-4
        let g = graph(&[1, 2], &[3, 4], &[(1, 3), (1, 4), (2, 3)]);
        let mut m = Matching::from_pairs(&g, vec![(1, 3)]).unwrap();

        m.augment(&g, &ids(&g, &[2, 3, 1, 4])).unwrap();

        assert_eq!(m.len(), 2);
        assert_eq!(m.labelled_pairs(&g), vec![(1, 4), (2, 3)]);
        assert!(m.validate(&g).is_ok());
    }

    #[test]
    fn test_single_edge_augment() {
        let g = graph(&[1], &[2], &[(1, 2)]);
        let mut m = Matching::empty(&g);
        m.augment(&g, &ids(&g, &[1, 2])).unwrap();
        assert!(m.contains(NodeId(0), NodeId(1)));
        assert!(m.contains(NodeId(1), NodeId(0)));
    }

    #[test]
    fn test_augment_rejects_non_alternating_path() {
        let g = graph(&[1, 2], &[3, 4], &[(1, 3), (1, 4), (2, 3)]);
        let mut m = Matching::empty(&g);
        let before = m.clone();

        // second edge should be matched but is not
        let err = m.augment(&g, &ids(&g, &[2, 3, 1, 4])).unwrap_err();
        assert!(matches!(err, MatchingError::InvalidAugmentingPath(_)));
        assert_eq!(m, before);
    }

    #[test]
    fn test_augment_rejects_bad_endpoints() {
        let g = graph(&[1, 2], &[3, 4], &[(1, 3), (2, 4)]);
        let mut m = Matching::from_pairs(&g, vec![(1, 3)]).unwrap();

        assert!(m.augment(&g, &ids(&g, &[1, 3])).is_err());
        assert!(m.augment(&g, &ids(&g, &[4, 2])).is_err());
        assert!(m.augment(&g, &ids(&g, &[2])).is_err());
        assert!(m.augment(&g, &[]).is_err());
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_augment_rejects_repeated_vertex() {
        let g = graph(&[1, 2], &[3, 4], &[(1, 3), (2, 3), (2, 4)]);
        let m = Matching::from_pairs(&g, vec![(2, 3)]).unwrap();
        let err = m.check_augmenting(&g, &ids(&g, &[1, 3, 2, 3, 2, 4])).unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn test_seed_greedy_takes_first_free_neighbor() {
        let g = graph(&[1, 2, 3], &[4, 5], &[(1, 4), (1, 5), (2, 4), (3, 5)]);
        let mut m = Matching::empty(&g);

        assert_eq!(m.seed_greedy(&g), 2);
        assert_eq!(m.labelled_pairs(&g), vec![(1, 4), (3, 5)]);
        assert_eq!(m.seed_greedy(&g), 0);
        assert!(m.validate(&g).is_ok());
    }
}
