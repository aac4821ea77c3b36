//! Berge: maximum bipartite matching by alternating-path augmentation
//!
//! The crate is organised the way the matcher's data flows:
//!
//! - [`data_structures`] holds the immutable [`BipartiteGraph`] and the
//!   mutable [`Matching`] state.
//! - [`algorithm::graph`] derives the alternating graph, searches it for an
//!   augmenting path and drives the augment-until-stuck loop
//!   ([`compute_maximum_matching`], [`BergeMatching`]).
//! - [`execution`] records runs for tracing and visualization.
//! - [`validation`] checks results independently, against a max-flow
//!   reference.
//!
//! ```
//! use berge_core::{build_graph, compute_maximum_matching, Side};
//!
//! let vertices = [(1, Side::Left), (2, Side::Left), (3, Side::Right)];
//! let graph = build_graph(vertices, [(1, 3), (2, 3)]).unwrap();
//! let result = compute_maximum_matching(&graph, []).unwrap();
//! assert_eq!(result.pairs, vec![(1, 3)]);
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod execution;
pub mod validation;

pub use crate::algorithm::graph::{
    compute_maximum_matching, AugmentingPath, BergeMatching, IterationEvent, MatcherConfig,
    MatchingObserver, MatchingPhase, MatchingStatistics, MaximumMatching, OptimalityCertificate,
    SeedStrategy,
};
pub use crate::algorithm::traits::{Algorithm, AlgorithmError, NodeId};
pub use crate::data_structures::{
    build_graph, BipartiteGraph, GraphError, GraphSpec, Matching, MatchingError, Side, Vertex,
};
pub use crate::execution::{ExecutionHistory, TracePoint};
