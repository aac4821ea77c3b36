//! Graph store and matching state
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod graph;
pub mod matching;

pub use self::graph::{build_graph, BipartiteGraph, GraphError, GraphSpec, Side, Vertex};
pub use self::matching::{Matching, MatchingError};
