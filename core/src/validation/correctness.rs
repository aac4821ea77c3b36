//! Correctness verification for matchings
//!
//! Independent checks that do not trust the matcher: the matching invariant
//! is re-derived from the labelled pairs, maximality is compared against the
//! reference max-flow, vertex covers are checked edge by edge, and recorded
//! execution histories are checked for the termination measure (matching
//! size strictly increases on every applied path and is bounded by
//! min(|Left|, |Right|)).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::graph::matching::MatchingPhase;
use crate::algorithm::graph::max_flow::maximum_matching_size;
use crate::data_structures::graph::{BipartiteGraph, Vertex};
use crate::data_structures::matching::Matching;
use crate::execution::history::ExecutionHistory;

/// Violations found while checking a recorded run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("Invariant violation at step {step}: {reason}")]
    InvariantViolation { step: usize, reason: String },

    #[error("Termination measure violated at step {step}: size went from {before} to {after}")]
    TerminationMeasure {
        step: usize,
        before: usize,
        after: usize,
    },

    #[error("Run performed {augmentations} augmentations, bound is {bound}")]
    IterationBound { augmentations: usize, bound: usize },

    #[error("Run did not terminate")]
    Unterminated,
}

/// Outcome of validating a matching against its graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectnessReport {
    pub matching_size: usize,
    /// Maximum matching size from the flow reduction
    pub reference_size: usize,
    pub violations: Vec<String>,
}

impl CorrectnessReport {
    pub fn is_valid_matching(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn is_maximum(&self) -> bool {
        self.is_valid_matching() && self.matching_size == self.reference_size
    }

    pub fn passed(&self) -> bool {
        self.is_maximum()
    }
}

/// Checks labelled pairs for the matching invariant and for maximality
pub fn validate_matching<V: Vertex>(
    graph: &BipartiteGraph<V>,
    pairs: &[(V, V)],
) -> CorrectnessReport {
    let reference_size = maximum_matching_size(graph);

    match Matching::from_pairs(graph, pairs.iter().cloned()) {
        Ok(matching) => {
            let mut violations = Vec::new();
            if matching.len() != pairs.len() {
                violations.push(format!(
                    "{} pairs given but only {} distinct edges",
                    pairs.len(),
                    matching.len()
                ));
            }
            CorrectnessReport {
                matching_size: matching.len(),
                reference_size,
                violations,
            }
        }
        Err(e) => CorrectnessReport {
            matching_size: pairs.len(),
            reference_size,
            violations: vec![e.to_string()],
        },
    }
}

/// True when every edge has at least one endpoint in `cover`
pub fn verify_vertex_cover<V: Vertex>(graph: &BipartiteGraph<V>, cover: &[V]) -> bool {
    let mut in_cover = vec![false; graph.node_count()];
    for label in cover {
        match graph.node_id(label) {
            Some(id) => in_cover[id.0] = true,
            None => return false,
        }
    }
    graph
        .edges()
        .iter()
        .all(|&(l, r)| in_cover[l.0] || in_cover[r.0])
}

/// Checks a recorded run against the matching invariant and termination measure
pub fn verify_history<V: Vertex>(
    graph: &BipartiteGraph<V>,
    history: &ExecutionHistory<V>,
) -> Result<(), VerificationError> {
    let bound = graph.left().len().min(graph.right().len());
    let mut before = history.metadata().starting_size;

    for point in history.trace_points() {
        let matching = Matching::from_pairs(graph, point.matching.iter().cloned()).map_err(|e| {
            VerificationError::InvariantViolation {
                step: point.step,
                reason: e.to_string(),
            }
        })?;

        let after = matching.len();
        let expected = if point.augmenting_path.is_some() { before + 1 } else { before };
        if after != expected {
            return Err(VerificationError::TerminationMeasure {
                step: point.step,
                before,
                after,
            });
        }
        before = after;
    }

    let augmentations = history.augmentations();
    if augmentations > bound {
        return Err(VerificationError::IterationBound { augmentations, bound });
    }

    match history.trace_points().last() {
        Some(point) if point.phase == MatchingPhase::Done => Ok(()),
        _ => Err(VerificationError::Unterminated),
    }
}
