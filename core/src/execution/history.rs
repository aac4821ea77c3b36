//! Execution history for matching runs
//!
//! [`ExecutionHistory`] is a [`MatchingObserver`] that records one
//! [`TracePoint`] per iteration: the matching after the update, the path
//! that was applied and the vertex groups the search started from. The
//! history is plain serializable data, which is what external visualizers
//! consume.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::matching::{IterationEvent, MatchingObserver, MatchingPhase};
use crate::algorithm::traits::{Algorithm, NodeId};
use crate::data_structures::graph::{BipartiteGraph, Vertex};

/// Metadata for an execution history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Algorithm name
    pub algorithm_name: String,

    /// Algorithm parameters at the time of the run
    pub parameters: HashMap<String, String>,

    /// Vertex and edge counts of the input graph
    pub node_count: usize,
    pub edge_count: usize,

    /// Matching size the first search started from
    #[serde(default)]
    pub starting_size: usize,
}

/// One recorded iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracePoint<V> {
    pub step: usize,
    pub phase: MatchingPhase,

    /// Matching after the iteration, as (left, right) pairs
    pub matching: Vec<(V, V)>,

    /// Path flipped in this iteration
    #[serde(skip_serializing_if = "Option::is_none", default = "Option::default")]
    pub augmenting_path: Option<Vec<V>>,

    /// Free Left vertices the search started from
    pub left_free: Vec<V>,

    /// Free Right vertices the search was aiming for
    pub right_free: Vec<V>,
}

impl<V> TracePoint<V> {
    #[inline]
    pub fn matching_size(&self) -> usize {
        self.matching.len()
    }
}

/// Ordered record of every iteration of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionHistory<V> {
    metadata: ExecutionMetadata,
    trace_points: Vec<TracePoint<V>>,
}

impl<V: Vertex> ExecutionHistory<V> {
    pub fn new(metadata: ExecutionMetadata) -> Self {
        Self {
            metadata,
            trace_points: Vec::new(),
        }
    }

    /// History pre-filled with an algorithm's name and parameters
    pub fn for_algorithm(algorithm: &dyn Algorithm, graph: &BipartiteGraph<V>) -> Self {
        let parameters = algorithm
            .parameters()
            .into_iter()
            .map(|p| (p.name, p.value))
            .collect();

        Self::new(ExecutionMetadata {
            algorithm_name: algorithm.name().to_string(),
            parameters,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            starting_size: 0,
        })
    }

    pub fn metadata(&self) -> &ExecutionMetadata {
        &self.metadata
    }

    pub fn trace_points(&self) -> &[TracePoint<V>] {
        &self.trace_points
    }

    pub fn len(&self) -> usize {
        self.trace_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace_points.is_empty()
    }

    /// Trace point recorded on termination, if the run finished
    pub fn final_point(&self) -> Option<&TracePoint<V>> {
        self.trace_points
            .last()
            .filter(|p| p.phase == MatchingPhase::Done)
    }

    /// Matching size after each iteration
    pub fn sizes(&self) -> Vec<usize> {
        self.trace_points.iter().map(TracePoint::matching_size).collect()
    }

    /// Number of iterations that applied a path
    pub fn augmentations(&self) -> usize {
        self.trace_points
            .iter()
            .filter(|p| p.augmenting_path.is_some())
            .count()
    }
}

impl<V: Vertex + Serialize> ExecutionHistory<V> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<V: Vertex> MatchingObserver<V> for ExecutionHistory<V> {
    fn on_iteration(&mut self, event: &IterationEvent<'_, V>) {
        let graph = event.graph;
        let labels = |ids: &[NodeId]| -> Vec<V> {
            ids.iter().map(|&id| graph.label(id).clone()).collect()
        };
        let groups = event.groups();
        if event.step == 0 {
            self.metadata.starting_size = event.starting_size;
        }

        self.trace_points.push(TracePoint {
            step: event.step,
            phase: event.phase(),
            matching: event.matching.labelled_pairs(graph),
            augmenting_path: event.path.map(|p| p.labels(graph)),
            left_free: labels(&groups.left_free),
            right_free: labels(&groups.right_free),
        });
    }
}
