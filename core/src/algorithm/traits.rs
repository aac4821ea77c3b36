//! Core algorithm trait definitions for the Berge matching observatory
//!
//! Every algorithm exposes the same metadata surface: an identifier, a
//! human-readable description, its asymptotic complexity and a set of
//! string-typed parameters validated on assignment. Drivers (the `berge`
//! binary, tests, visualizers) configure algorithms through this surface
//! without knowing the concrete type.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Universal algorithm identifier for type-safe dispatch
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Dense vertex index assigned by the graph store in declaration order
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Algorithm parameter with strongly typed values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub value_type: ParameterType,
    pub description: String,
}

/// Parameter type enumeration for type-safe parameter handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    Boolean,
    Enum(Vec<String>),
}

impl ParameterType {
    /// Checks a raw value against the type, returning the reason on mismatch
    pub fn check(&self, value: &str) -> Result<(), String> {
        match self {
            ParameterType::Boolean => match value {
                "true" | "false" => Ok(()),
                _ => Err(format!("expected true or false, got {value:?}")),
            },
            ParameterType::Enum(options) => {
                if options.iter().any(|o| o == value) {
                    Ok(())
                } else {
                    Err(format!(
                        "expected one of {}, got {value:?}",
                        options.join(", ")
                    ))
                }
            }
        }
    }
}

/// Errors raised by the algorithm configuration surface
#[derive(Debug, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
}

/// Algorithm complexity information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
    pub best_case: String,
    pub worst_case: String,
}

/// Algorithm execution metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    pub steps_executed: usize,
    pub nodes_explored: usize,
    pub execution_time: Duration,
    pub custom_metrics: HashMap<String, f64>,
}

/// Metadata and configuration surface shared by all algorithms
///
/// Execution itself is type-specific (matching runs are generic over the
/// vertex label type), so the trait only covers what a driver needs to
/// describe and configure an algorithm.
pub trait Algorithm: Debug {
    /// Returns the algorithm's unique identifier
    fn id(&self) -> AlgorithmId;

    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g. graph_matching)
    fn category(&self) -> &'static str;

    /// Returns a prose description of the algorithm
    fn description(&self) -> String;

    /// Returns the algorithm's asymptotic complexity
    fn complexity(&self) -> AlgorithmComplexity;

    /// Returns supported parameters with their current values
    fn parameters(&self) -> Vec<AlgorithmParameter>;

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError>;

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String> {
        self.parameters()
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
    }
}

/// Lightweight step and timing recorder used while an algorithm runs
#[derive(Debug)]
pub struct AlgorithmProfiler {
    metrics: AlgorithmMetrics,
    start_time: Option<Instant>,
}

impl AlgorithmProfiler {
    pub fn new() -> Self {
        Self {
            metrics: AlgorithmMetrics::default(),
            start_time: None,
        }
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.metrics.execution_time = start.elapsed();
        }
    }

    pub fn record_nodes_explored(&mut self, count: usize) {
        self.metrics.nodes_explored += count;
    }

    pub fn record_step(&mut self) {
        self.metrics.steps_executed += 1;
    }

    pub fn record_custom(&mut self, name: &str, value: f64) {
        self.metrics.custom_metrics.insert(name.to_owned(), value);
    }

    pub fn get_metrics(&self) -> AlgorithmMetrics {
        self.metrics.clone()
    }
}

impl Default for AlgorithmProfiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_id_uniqueness() {
        let id1 = AlgorithmId::new("berge");
        let id2 = AlgorithmId::new("hopcroft_karp");
        let id3 = AlgorithmId::new("berge");

        assert_ne!(id1, id2);
        assert_eq!(id1, id3);
        assert_eq!(id1.as_str(), "berge");
    }

    #[test]
    fn test_node_id_type_safety() {
        let node1 = NodeId(42);
        let node2 = NodeId(42);
        let node3 = NodeId(43);

        assert_eq!(node1, node2);
        assert_ne!(node1, node3);
        assert_eq!(node1.as_usize(), 42);
        assert_eq!(node3.to_string(), "#43");
    }

    #[test]
    fn test_parameter_type_check() {
        let flag = ParameterType::Boolean;
        assert!(flag.check("true").is_ok());
        assert!(flag.check("yes").is_err());

        let choice = ParameterType::Enum(vec!["empty".into(), "greedy".into()]);
        assert!(choice.check("greedy").is_ok());
        let reason = choice.check("random").unwrap_err();
        assert!(reason.contains("empty, greedy"));
    }

    #[test]
    fn test_profiler_counts() {
        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        profiler.record_step();
        profiler.record_step();
        profiler.record_nodes_explored(5);
        profiler.record_custom("augmentations", 2.0);
        profiler.stop();

        let metrics = profiler.get_metrics();
        assert_eq!(metrics.steps_executed, 2);
        assert_eq!(metrics.nodes_explored, 5);
        assert_eq!(metrics.custom_metrics.get("augmentations"), Some(&2.0));
    }
}
