//! Bipartite graph store
//!
//! Immutable representation of a simple undirected bipartite graph. Vertex
//! labels are opaque (integers, strings, anything hashable); every declared
//! label receives a dense [`NodeId`] in declaration order, and all algorithms
//! work on those indices. Declaration order is the deterministic iteration
//! order for partitions and neighbor lists alike.
//!
//! Construction validates the bipartition: an edge must join a Left vertex to
//! a Right vertex, both of which were declared beforehand.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::algorithm::traits::NodeId;

/// Bound shared by every vertex label type
pub trait Vertex: Clone + Eq + Hash + Debug {}

impl<T> Vertex for T where T: Clone + Eq + Hash + Debug {}

/// Partition a vertex belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Construction errors for the graph store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Invalid bipartition: edge ({u}, {v}) joins two {side:?} vertices")]
    InvalidBipartition { u: String, v: String, side: Side },

    #[error("Unknown vertex: {0} is used by an edge but was never declared")]
    UnknownVertex(String),

    #[error("Conflicting partition: vertex {0} is declared as both Left and Right")]
    ConflictingPartition(String),
}

/// Simple undirected bipartite graph with dense vertex indices
#[derive(Debug, Clone)]
pub struct BipartiteGraph<V> {
    /// Label for each node, indexed by `NodeId`
    labels: Vec<V>,

    /// Partition of each node, indexed by `NodeId`
    sides: Vec<Side>,

    /// Reverse lookup from label to index
    index: HashMap<V, NodeId>,

    /// Left partition in declaration order
    left: Vec<NodeId>,

    /// Right partition in declaration order
    right: Vec<NodeId>,

    /// Symmetric adjacency in edge insertion order
    adjacency: Vec<Vec<NodeId>>,

    /// Edges oriented (left, right) in insertion order
    edges: Vec<(NodeId, NodeId)>,

    /// Membership set over oriented edges
    edge_set: HashSet<(NodeId, NodeId)>,
}

impl<V: Vertex> BipartiteGraph<V> {
    /// Builds a graph from declared vertices and edges.
    ///
    /// Edges may be given in either orientation; they are stored Left→Right.
    /// A repeated edge is kept once. Declaring the same label twice on the
    /// same side is a no-op.
    pub fn build<I, E>(vertices: I, edges: E) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (V, Side)>,
        E: IntoIterator<Item = (V, V)>,
    {
        let mut graph = Self {
            labels: Vec::new(),
            sides: Vec::new(),
            index: HashMap::new(),
            left: Vec::new(),
            right: Vec::new(),
            adjacency: Vec::new(),
            edges: Vec::new(),
            edge_set: HashSet::new(),
        };

        for (label, side) in vertices {
            graph.declare(label, side)?;
        }

        for (u, v) in edges {
            graph.connect(&u, &v)?;
        }

        Ok(graph)
    }

    fn declare(&mut self, label: V, side: Side) -> Result<(), GraphError> {
        if let Some(&existing) = self.index.get(&label) {
            if self.sides[existing.0] != side {
                return Err(GraphError::ConflictingPartition(format!("{label:?}")));
            }
            return Ok(());
        }

        let id = NodeId(self.labels.len());
        self.index.insert(label.clone(), id);
        self.labels.push(label);
        self.sides.push(side);
        self.adjacency.push(Vec::new());
        match side {
            Side::Left => self.left.push(id),
            Side::Right => self.right.push(id),
        }
        Ok(())
    }

    fn connect(&mut self, u: &V, v: &V) -> Result<(), GraphError> {
        let a = self.lookup(u)?;
        let b = self.lookup(v)?;

        let (l, r) = match (self.sides[a.0], self.sides[b.0]) {
            (Side::Left, Side::Right) => (a, b),
            (Side::Right, Side::Left) => (b, a),
            (side, _) => {
                return Err(GraphError::InvalidBipartition {
                    u: format!("{u:?}"),
                    v: format!("{v:?}"),
                    side,
                })
            }
        };

        if self.edge_set.insert((l, r)) {
            self.edges.push((l, r));
            self.adjacency[l.0].push(r);
            self.adjacency[r.0].push(l);
        }
        Ok(())
    }

    fn lookup(&self, label: &V) -> Result<NodeId, GraphError> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| GraphError::UnknownVertex(format!("{label:?}")))
    }

    /// Returns the node index of a label, if declared
    #[inline]
    pub fn node_id(&self, label: &V) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    /// Returns the label of a node index
    #[inline]
    pub fn label(&self, id: NodeId) -> &V {
        &self.labels[id.0]
    }

    /// Returns the oriented (left, right) edge joining two labels, if any
    pub fn edge_between(&self, u: &V, v: &V) -> Option<(NodeId, NodeId)> {
        let a = self.node_id(u)?;
        let b = self.node_id(v)?;
        if self.has_edge(a, b) {
            Some(self.orient(a, b))
        } else {
            None
        }
    }

    /// Converts a labelled structure back into a serializable description
    pub fn to_spec(&self) -> GraphSpec<V> {
        GraphSpec {
            left: self.left.iter().map(|&id| self.label(id).clone()).collect(),
            right: self.right.iter().map(|&id| self.label(id).clone()).collect(),
            edges: self
                .edges
                .iter()
                .map(|&(l, r)| (self.label(l).clone(), self.label(r).clone()))
                .collect(),
        }
    }
}

impl<V> BipartiteGraph<V> {
    #[inline]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Left partition in declaration order
    #[inline]
    pub fn left(&self) -> &[NodeId] {
        &self.left
    }

    /// Right partition in declaration order
    #[inline]
    pub fn right(&self) -> &[NodeId] {
        &self.right
    }

    #[inline]
    pub fn side(&self, id: NodeId) -> Side {
        self.sides[id.0]
    }

    /// Neighbors of a node in edge insertion order
    #[inline]
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        &self.adjacency[id.0]
    }

    /// All edges oriented (left, right) in insertion order
    #[inline]
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// Orientation-agnostic edge membership
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        if a.0 >= self.node_count() || b.0 >= self.node_count() {
            return false;
        }
        self.edge_set.contains(&self.orient(a, b))
    }

    /// Orders a pair so that the Left endpoint comes first
    #[inline]
    pub fn orient(&self, a: NodeId, b: NodeId) -> (NodeId, NodeId) {
        if self.sides[a.0] == Side::Left {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Build a graph from declared `(label, side)` pairs and `(left, right)` edges
pub fn build_graph<V, I, E>(vertices: I, edges: E) -> Result<BipartiteGraph<V>, GraphError>
where
    V: Vertex,
    I: IntoIterator<Item = (V, Side)>,
    E: IntoIterator<Item = (V, V)>,
{
    BipartiteGraph::build(vertices, edges)
}

/// Serializable description of a bipartite graph
///
/// ```json
/// { "left": [1, 2], "right": [3], "edges": [[1, 3], [2, 3]] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSpec<V> {
    pub left: Vec<V>,
    pub right: Vec<V>,
    #[serde(default = "Vec::new")]
    pub edges: Vec<(V, V)>,
}

impl<V: Vertex> TryFrom<GraphSpec<V>> for BipartiteGraph<V> {
    type Error = GraphError;

    fn try_from(spec: GraphSpec<V>) -> Result<Self, Self::Error> {
        let vertices = spec
            .left
            .into_iter()
            .map(|v| (v, Side::Left))
            .chain(spec.right.into_iter().map(|v| (v, Side::Right)));
        BipartiteGraph::build(vertices, spec.edges)
    }
}

impl<V: Vertex + Serialize> Serialize for BipartiteGraph<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_spec().serialize(serializer)
    }
}

impl<'de, V> Deserialize<'de> for BipartiteGraph<V>
where
    V: Vertex + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let spec = GraphSpec::<V>::deserialize(deserializer)?;
        BipartiteGraph::try_from(spec).map_err(serde::de::Error::custom)
    }
}
