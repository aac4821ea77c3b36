//! Graph algorithms: alternating-path matching and its flow-based reference
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod alternating;
pub mod augmenting;
pub mod matching;
pub mod max_flow;

pub use self::alternating::{AlternatingGraph, VertexGroups};
pub use self::augmenting::{find_augmenting_path, AugmentingPath, SearchOutcome, SearchStatistics};
pub use self::matching::{
    compute_maximum_matching, BergeMatching, IterationEvent, MatcherConfig, MatchingObserver,
    MatchingPhase, MatchingStatistics, MaximumMatching, OptimalityCertificate, SeedStrategy,
};
pub use self::max_flow::{maximum_matching_size, FlowNetwork};
