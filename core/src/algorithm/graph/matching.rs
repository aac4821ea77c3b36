//! Maximum bipartite matching by repeated augmentation
//!
//! The matcher is a two-state machine. While SEARCHING it rebuilds the
//! alternating graph from the current matching, looks for an augmenting path
//! and, if one exists, flips it into the matching. When no free Left vertex
//! reaches a free Right vertex the machine moves to DONE; by Berge's theorem
//! the matching is then maximum.
//!
//! Each augmentation grows the matching by one edge, so a run performs at
//! most min(|Left|, |Right|) augmentations. On termination the vertices
//! reachable from free Left vertices also yield a König vertex cover of the
//! same size as the matching, which certifies optimality.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::alternating::{AlternatingGraph, VertexGroups};
use crate::algorithm::graph::augmenting::{find_augmenting_path, AugmentingPath};
use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmId, AlgorithmMetrics,
    AlgorithmParameter, AlgorithmProfiler, NodeId, ParameterType,
};
use crate::data_structures::graph::{BipartiteGraph, Vertex};
use crate::data_structures::matching::{Matching, MatchingError};

/// How the matching is prepared before the first search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedStrategy {
    /// Start from the supplied initial matching only
    #[default]
    Empty,
    /// Extend the initial matching greedily before searching
    Greedy,
}

impl SeedStrategy {
    fn as_str(self) -> &'static str {
        match self {
            SeedStrategy::Empty => "empty",
            SeedStrategy::Greedy => "greedy",
        }
    }
}

/// Matcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub seed: SeedStrategy,
    /// Derive a König vertex cover on termination
    pub certify: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            seed: SeedStrategy::Empty,
            certify: true,
        }
    }
}

/// Matcher state machine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchingPhase {
    Searching,
    Done,
}

/// Snapshot handed to observers once per iteration
#[derive(Debug)]
pub struct IterationEvent<'a, V> {
    /// Zero-based iteration number
    pub step: usize,
    /// Matching size before the first search, after any seeding
    pub starting_size: usize,
    pub graph: &'a BipartiteGraph<V>,
    /// Alternating graph the search ran on
    pub alternating: &'a AlternatingGraph,
    /// Matching after this iteration's update
    pub matching: &'a Matching,
    /// Path applied in this iteration, `None` on the final iteration
    pub path: Option<&'a AugmentingPath>,
}

impl<V> IterationEvent<'_, V> {
    /// Vertex groups the search started from
    pub fn groups(&self) -> &VertexGroups {
        self.alternating.groups()
    }

    pub fn phase(&self) -> MatchingPhase {
        if self.path.is_some() {
            MatchingPhase::Searching
        } else {
            MatchingPhase::Done
        }
    }
}

/// Per-iteration hook for tracing and visualization
pub trait MatchingObserver<V> {
    fn on_iteration(&mut self, event: &IterationEvent<'_, V>);
}

impl<V, F> MatchingObserver<V> for F
where
    F: FnMut(&IterationEvent<'_, V>),
{
    fn on_iteration(&mut self, event: &IterationEvent<'_, V>) {
        self(event)
    }
}

/// Counters collected over a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingStatistics {
    /// Size of the supplied initial matching
    pub initial_size: usize,
    /// Edges added by greedy seeding
    pub seeded: usize,
    /// Search rounds, including the final unsuccessful one
    pub iterations: usize,
    pub augmentations: usize,
    /// Free Left vertices a DFS was started from, summed over rounds
    pub path_searches: usize,
    pub vertices_explored: usize,
    pub execution_time_ms: f64,
}

/// König vertex cover proving the matching maximum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalityCertificate<V> {
    /// Left vertices not reachable from a free Left vertex, then Right
    /// vertices that are reachable
    pub cover: Vec<V>,
    pub cover_size: usize,
    pub matching_size: usize,
    /// Cover touches every edge and has the matching's size
    pub is_tight: bool,
}

/// Result of a matching run
#[derive(Debug, Clone, Serialize)]
pub struct MaximumMatching<V> {
    /// Matched pairs (left, right) in Left declaration order
    pub pairs: Vec<(V, V)>,
    pub size: usize,
    pub statistics: MatchingStatistics,
    /// Profiler output: one step per search round, explored vertices, timing
    pub metrics: AlgorithmMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<OptimalityCertificate<V>>,
    #[serde(skip)]
    matching: Matching,
}

impl<V> MaximumMatching<V> {
    /// Index-level matching state
    pub fn matching(&self) -> &Matching {
        &self.matching
    }

    pub fn into_matching(self) -> Matching {
        self.matching
    }
}

/// Berge augmenting-path matcher
#[derive(Debug, Clone, Default)]
pub struct BergeMatching {
    config: MatcherConfig,
}

impl BergeMatching {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Runs from a labelled initial matching
    pub fn run<V, I>(
        &self,
        graph: &BipartiteGraph<V>,
        initial: I,
    ) -> Result<MaximumMatching<V>, MatchingError>
    where
        V: Vertex,
        I: IntoIterator<Item = (V, V)>,
    {
        let matching = Matching::from_pairs(graph, initial)?;
        self.execute(graph, matching, None)
    }

    /// Runs from a labelled initial matching, notifying `observer` every iteration
    pub fn run_with_observer<V, I>(
        &self,
        graph: &BipartiteGraph<V>,
        initial: I,
        observer: &mut dyn MatchingObserver<V>,
    ) -> Result<MaximumMatching<V>, MatchingError>
    where
        V: Vertex,
        I: IntoIterator<Item = (V, V)>,
    {
        let matching = Matching::from_pairs(graph, initial)?;
        self.execute(graph, matching, Some(observer))
    }

    /// Runs from an index-level matching, which is validated first
    pub fn run_from<V: Vertex>(
        &self,
        graph: &BipartiteGraph<V>,
        matching: Matching,
        observer: Option<&mut dyn MatchingObserver<V>>,
    ) -> Result<MaximumMatching<V>, MatchingError> {
        matching.validate(graph)?;
        self.execute(graph, matching, observer)
    }

    fn execute<V: Vertex>(
        &self,
        graph: &BipartiteGraph<V>,
        mut matching: Matching,
        mut observer: Option<&mut dyn MatchingObserver<V>>,
    ) -> Result<MaximumMatching<V>, MatchingError> {
        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        let mut statistics = MatchingStatistics {
            initial_size: matching.len(),
            ..MatchingStatistics::default()
        };

        if self.config.seed == SeedStrategy::Greedy {
            statistics.seeded = matching.seed_greedy(graph);
            debug!("greedy seeding added {} edges", statistics.seeded);
        }

        let starting_size = matching.len();
        let bound = graph.left().len().min(graph.right().len());
        let mut phase = MatchingPhase::Searching;
        let mut alternating = AlternatingGraph::build(graph, &matching);

        while phase == MatchingPhase::Searching {
            let outcome = find_augmenting_path(&alternating);
            profiler.record_step();
            profiler.record_nodes_explored(outcome.statistics.vertices_explored);
            statistics.iterations += 1;
            statistics.path_searches += outcome.statistics.starts_tried;
            statistics.vertices_explored += outcome.statistics.vertices_explored;

            match &outcome.path {
                Some(path) => {
                    trace!("augmenting along {:?}", path.labels(graph));
                    matching.augment(graph, path.vertices())?;
                    statistics.augmentations += 1;
                    debug!(
                        "iteration {}: path of {} edges, matching size {}",
                        statistics.iterations - 1,
                        path.edge_count(),
                        matching.len()
                    );
                }
                None => {
                    debug!(
                        "iteration {}: no augmenting path, matching size {}",
                        statistics.iterations - 1,
                        matching.len()
                    );
                    phase = MatchingPhase::Done;
                }
            }

            if let Some(observer) = observer.as_deref_mut() {
                observer.on_iteration(&IterationEvent {
                    step: statistics.iterations - 1,
                    starting_size,
                    graph,
                    alternating: &alternating,
                    matching: &matching,
                    path: outcome.path.as_ref(),
                });
            }

            if phase == MatchingPhase::Searching {
                alternating = AlternatingGraph::build(graph, &matching);
            }
        }

        debug_assert!(statistics.augmentations <= bound);
        debug_assert!(matching.validate(graph).is_ok());

        // `alternating` was built from the final matching
        let certificate = self
            .config
            .certify
            .then(|| konig_certificate(graph, &alternating, &matching));

        profiler.record_custom("augmentations", statistics.augmentations as f64);
        profiler.record_custom("matching_size", matching.len() as f64);
        profiler.stop();
        let metrics = profiler.get_metrics();
        statistics.execution_time_ms = metrics.execution_time.as_secs_f64() * 1000.0;
        info!(
            "maximum matching of size {} after {} augmentations ({} vertices, {} edges)",
            matching.len(),
            statistics.augmentations,
            graph.node_count(),
            graph.edge_count()
        );

        Ok(MaximumMatching {
            pairs: matching.labelled_pairs(graph),
            size: matching.len(),
            statistics,
            metrics,
            certificate,
            matching,
        })
    }
}

/// Builds the König cover (Left \ Z) ∪ (Right ∩ Z) from alternating reachability
fn konig_certificate<V: Vertex>(
    graph: &BipartiteGraph<V>,
    alternating: &AlternatingGraph,
    matching: &Matching,
) -> OptimalityCertificate<V> {
    let reached = alternating.reachable_from_sources();
    let cover: Vec<NodeId> = graph
        .left()
        .iter()
        .filter(|l| !reached[l.0])
        .chain(graph.right().iter().filter(|r| reached[r.0]))
        .copied()
        .collect();

    let mut in_cover = vec![false; graph.node_count()];
    for v in &cover {
        in_cover[v.0] = true;
    }
    let covers_all = graph
        .edges()
        .iter()
        .all(|&(l, r)| in_cover[l.0] || in_cover[r.0]);

    OptimalityCertificate {
        cover_size: cover.len(),
        matching_size: matching.len(),
        is_tight: covers_all && cover.len() == matching.len(),
        cover: cover.into_iter().map(|v| graph.label(v).clone()).collect(),
    }
}

/// Computes a maximum matching with the default configuration
pub fn compute_maximum_matching<V, I>(
    graph: &BipartiteGraph<V>,
    initial: I,
) -> Result<MaximumMatching<V>, MatchingError>
where
    V: Vertex,
    I: IntoIterator<Item = (V, V)>,
{
    BergeMatching::new().run(graph, initial)
}

impl Algorithm for BergeMatching {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("berge_matching")
    }

    fn name(&self) -> &'static str {
        "Berge Augmenting-Path Maximum Bipartite Matching"
    }

    fn category(&self) -> &'static str {
        "graph_matching"
    }

    fn description(&self) -> String {
        "Grows a bipartite matching one edge at a time: each round orients unmatched \
         edges Left to Right and matched edges Right to Left, runs depth-first search \
         from every free Left vertex to any free Right vertex, and flips the first \
         path found. Stops when no augmenting path remains."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(V * (V + E))".to_string(),
            space_complexity: "O(V + E)".to_string(),
            best_case: "O(V + E) when the initial matching is already maximum".to_string(),
            worst_case: "O(min(|L|, |R|) * |L| * (V + E))".to_string(),
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![
            AlgorithmParameter {
                name: "seed_strategy".to_string(),
                value: self.config.seed.as_str().to_string(),
                value_type: ParameterType::Enum(vec!["empty".to_string(), "greedy".to_string()]),
                description: "Greedy pre-matching before the first search".to_string(),
            },
            AlgorithmParameter {
                name: "certify".to_string(),
                value: self.config.certify.to_string(),
                value_type: ParameterType::Boolean,
                description: "Compute a König vertex cover on termination".to_string(),
            },
        ]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        let parameter = self
            .parameters()
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| AlgorithmError::UnknownParameter(name.to_string()))?;

        parameter
            .value_type
            .check(value)
            .map_err(|reason| AlgorithmError::InvalidParameter {
                name: name.to_string(),
                reason,
            })?;

        match name {
            "seed_strategy" => {
                self.config.seed = if value == "greedy" {
                    SeedStrategy::Greedy
                } else {
                    SeedStrategy::Empty
                };
            }
            "certify" => self.config.certify = value == "true",
            _ => return Err(AlgorithmError::UnknownParameter(name.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::{build_graph, Side};

    fn graph(left: &[u32], right: &[u32], edges: &[(u32, u32)]) -> BipartiteGraph<u32> {
        let vertices = left
            .iter()
            .map(|&v| (v, Side::Left))
            .chain(right.iter().map(|&v| (v, Side::Right)));
        build_graph(vertices, edges.iter().copied()).unwrap()
    }

    #[test]
    fn test_scenario_three_by_three() {
        let g = graph(&[1, 2, 3], &[4, 5, 6], &[(1, 4), (1, 5), (2, 5), (3, 6)]);
        let result = compute_maximum_matching(&g, vec![]).unwrap();

        assert_eq!(result.size, 3);
        assert_eq!(result.pairs, vec![(1, 4), (2, 5), (3, 6)]);
        assert_eq!(result.statistics.augmentations, 3);
        assert_eq!(result.statistics.iterations, 4);
    }

    #[test]
    fn test_scenario_star() {
        let g = graph(&[1, 2], &[3], &[(1, 3), (2, 3)]);
        let result = compute_maximum_matching(&g, vec![]).unwrap();
        assert_eq!(result.size, 1);
        assert_eq!(result.pairs, vec![(1, 3)]);
    }

    #[test]
    fn test_empty_edge_set_terminates_immediately() {
        let g = graph(&[1, 2], &[3, 4], &[]);
        let result = compute_maximum_matching(&g, vec![]).unwrap();

        assert!(result.pairs.is_empty());
        assert_eq!(result.statistics.augmentations, 0);
        assert_eq!(result.statistics.iterations, 1);
        let certificate = result.certificate.unwrap();
        assert!(certificate.is_tight);
        assert!(certificate.cover.is_empty());
    }

    #[test]
    fn test_path_rewires_existing_match() {
        // Seeding 1-3 forces the second round to reroute 1 onto 4
        let g = graph(&[1, 2], &[3, 4], &[(1, 3), (1, 4), (2, 3)]);
        let result = compute_maximum_matching(&g, vec![(1, 3)]).unwrap();

        assert_eq!(result.statistics.initial_size, 1);
        assert_eq!(result.statistics.augmentations, 1);
        assert_eq!(result.pairs, vec![(1, 4), (2, 3)]);
    }

    #[test]
    fn test_invalid_initial_matching_is_rejected() {
        let g = graph(&[1, 2], &[3], &[(1, 3), (2, 3)]);
        let err = compute_maximum_matching(&g, vec![(1, 3), (2, 3)]).unwrap_err();
        assert!(matches!(err, MatchingError::InconsistentMatching(_)));
    }

    #[test]
    fn test_greedy_seed_reduces_augmentations() {
        let g = graph(&[1, 2, 3], &[4, 5, 6], &[(1, 4), (2, 5), (3, 6)]);
        let matcher = BergeMatching::with_config(MatcherConfig {
            seed: SeedStrategy::Greedy,
            certify: true,
        });
        let result = matcher.run(&g, vec![]).unwrap();

        assert_eq!(result.statistics.seeded, 3);
        assert_eq!(result.statistics.augmentations, 0);
        assert_eq!(result.size, 3);
    }

    #[test]
    fn test_observer_sees_every_iteration() {
        let g = graph(&[1, 2, 3], &[4, 5, 6], &[(1, 4), (1, 5), (2, 5), (3, 6)]);
        let mut sizes = Vec::new();
        let mut phases = Vec::new();
        let mut observer = |event: &IterationEvent<'_, u32>| {
            sizes.push(event.matching.len());
            phases.push(event.phase());
        };

        let result = BergeMatching::new()
            .run_with_observer(&g, vec![], &mut observer)
            .unwrap();

        assert_eq!(result.size, 3);
        assert_eq!(sizes, vec![1, 2, 3, 3]);
        assert_eq!(phases.last(), Some(&MatchingPhase::Done));
        assert!(phases[..3].iter().all(|p| *p == MatchingPhase::Searching));
    }

    #[test]
    fn test_certificate_is_tight() {
        let g = graph(&[1, 2, 3], &[4, 5], &[(1, 4), (2, 4), (3, 4), (3, 5)]);
        let result = compute_maximum_matching(&g, vec![]).unwrap();
        let certificate = result.certificate.unwrap();

        assert_eq!(result.size, 2);
        assert_eq!(certificate.cover_size, 2);
        assert!(certificate.is_tight);
    }

    #[test]
    fn test_certify_can_be_disabled() {
        let g = graph(&[1], &[2], &[(1, 2)]);
        let mut matcher = BergeMatching::new();
        matcher.set_parameter("certify", "false").unwrap();
        let result = matcher.run(&g, vec![]).unwrap();
        assert!(result.certificate.is_none());
    }

    #[test]
    fn test_run_from_validates_matching() {
        let g = graph(&[1], &[2], &[(1, 2)]);
        let wrong_size = Matching::new(5);
        let err = BergeMatching::new().run_from(&g, wrong_size, None).unwrap_err();
        assert!(matches!(err, MatchingError::InconsistentMatching(_)));
    }

    #[test]
    fn test_parameters_round_trip() {
        let mut matcher = BergeMatching::new();
        assert_eq!(matcher.get_parameter("seed_strategy").as_deref(), Some("empty"));

        matcher.set_parameter("seed_strategy", "greedy").unwrap();
        assert_eq!(matcher.config().seed, SeedStrategy::Greedy);
        assert_eq!(matcher.get_parameter("seed_strategy").as_deref(), Some("greedy"));

        let err = matcher.set_parameter("seed_strategy", "random").unwrap_err();
        assert!(matches!(err, AlgorithmError::InvalidParameter { .. }));

        let err = matcher.set_parameter("max_iterations", "3").unwrap_err();
        assert!(matches!(err, AlgorithmError::UnknownParameter(_)));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: MatcherConfig = serde_json::from_str(r#"{"seed": "greedy"}"#).unwrap();
        assert_eq!(config.seed, SeedStrategy::Greedy);
        assert!(config.certify);
    }

    #[test]
    fn test_run_is_profiled() {
        let g = graph(&[1, 2], &[3, 4], &[(1, 3), (2, 4)]);
        let result = compute_maximum_matching(&g, vec![]).unwrap();
        let metrics = &result.metrics;

        assert_eq!(metrics.steps_executed, result.statistics.iterations);
        assert_eq!(metrics.steps_executed, 3);
        assert_eq!(metrics.nodes_explored, result.statistics.vertices_explored);
        assert_eq!(metrics.custom_metrics.get("augmentations"), Some(&2.0));
        assert_eq!(metrics.custom_metrics.get("matching_size"), Some(&2.0));
        assert_eq!(
            result.statistics.execution_time_ms,
            metrics.execution_time.as_secs_f64() * 1000.0
        );
    }
}
