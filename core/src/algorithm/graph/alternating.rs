//! Alternating auxiliary graph
//!
//! Orients every edge of the bipartite graph with respect to the current
//! matching: edges outside the matching point Left→Right, matched edges point
//! Right→Left. A directed path from a free Left vertex to a free Right vertex
//! is then exactly an augmenting path, so augmenting-path search reduces to
//! ordinary directed reachability.
//!
//! The structure is derived state: it is rebuilt from scratch each iteration
//! and never updated in place.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::NodeId;
use crate::data_structures::graph::BipartiteGraph;
use crate::data_structures::matching::Matching;

/// The four vertex groups induced by a matching
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexGroups {
    pub left_free: Vec<NodeId>,
    pub left_matched: Vec<NodeId>,
    pub right_free: Vec<NodeId>,
    pub right_matched: Vec<NodeId>,
}

impl VertexGroups {
    pub fn split<V>(graph: &BipartiteGraph<V>, matching: &Matching) -> Self {
        let (left_matched, left_free) = graph
            .left()
            .iter()
            .partition(|&&v| matching.is_matched(v));
        let (right_matched, right_free) = graph
            .right()
            .iter()
            .partition(|&&v| matching.is_matched(v));

        Self {
            left_free,
            left_matched,
            right_free,
            right_matched,
        }
    }
}

/// Directed alternating graph over the vertex set of a bipartite graph
#[derive(Debug, Clone)]
pub struct AlternatingGraph {
    /// Successor lists indexed by `NodeId`
    successors: Vec<Vec<NodeId>>,

    /// Free Right vertices, indexed by `NodeId`
    targets: Vec<bool>,

    groups: VertexGroups,
    arc_count: usize,
}

impl AlternatingGraph {
    /// Orients every graph edge against the matching.
    ///
    /// Edges joining two free vertices are kept: they are one-edge
    /// augmenting paths.
    pub fn build<V>(graph: &BipartiteGraph<V>, matching: &Matching) -> Self {
        let mut successors = vec![Vec::new(); graph.node_count()];

        for &(l, r) in graph.edges() {
            if matching.contains(l, r) {
                successors[r.0].push(l);
            } else {
                successors[l.0].push(r);
            }
        }

        let groups = VertexGroups::split(graph, matching);
        let mut targets = vec![false; graph.node_count()];
        for &r in &groups.right_free {
            targets[r.0] = true;
        }

        Self {
            successors,
            targets,
            groups,
            arc_count: graph.edge_count(),
        }
    }

    #[inline]
    pub fn successors(&self, v: NodeId) -> &[NodeId] {
        &self.successors[v.0]
    }

    /// True for free Right vertices
    #[inline]
    pub fn is_target(&self, v: NodeId) -> bool {
        self.targets[v.0]
    }

    /// Search origins: free Left vertices in declaration order
    #[inline]
    pub fn sources(&self) -> &[NodeId] {
        &self.groups.left_free
    }

    #[inline]
    pub fn targets(&self) -> &[NodeId] {
        &self.groups.right_free
    }

    #[inline]
    pub fn groups(&self) -> &VertexGroups {
        &self.groups
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.successors.len()
    }

    #[inline]
    pub fn arc_count(&self) -> usize {
        self.arc_count
    }

    /// Marks every vertex reachable from some free Left vertex
    pub fn reachable_from_sources(&self) -> Vec<bool> {
        let mut reached = vec![false; self.node_count()];
        let mut queue: VecDeque<NodeId> = self.sources().iter().copied().collect();
        for &s in self.sources() {
            reached[s.0] = true;
        }

        while let Some(v) = queue.pop_front() {
            for &w in self.successors(v) {
                if !reached[w.0] {
                    reached[w.0] = true;
                    queue.push_back(w);
                }
            }
        }

        reached
    }
}
