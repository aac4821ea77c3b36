use std::error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{error, info};
use serde::{Deserialize, Serialize};

use berge_core::validation::{validate_matching, verify_history};
use berge_core::{
    Algorithm, BergeMatching, BipartiteGraph, ExecutionHistory, IterationEvent, MatchingObserver,
    Side,
};

type Error = Box<dyn error::Error>;

/// Computes a maximum bipartite matching by repeated augmenting-path search
#[derive(Debug, Parser)]
#[command(name = "berge", version)]
struct Berge {
    /// Graph as JSON: {"left": [...], "right": [...], "edges": [[l, r], ...]};
    /// runs the built-in twelve-cycle demo when omitted
    graph: Option<PathBuf>,

    /// Initial matching as a JSON list of [left, right] pairs
    #[arg(short, long)]
    initial: Option<PathBuf>,

    /// Algorithm parameter as key=value (seed_strategy, certify)
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Print the per-iteration execution history instead of the result
    #[arg(long)]
    trace: bool,

    /// Cross-check the result against a max-flow reference
    #[arg(long)]
    verify: bool,
}

/// Vertex label as it appears in JSON input: a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
enum Label {
    Number(i64),
    Name(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Number(n) => write!(f, "{n}"),
            Label::Name(s) => write!(f, "{s}"),
        }
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

fn read_json<T>(path: &Path) -> Result<T, Error>
where
    T: for<'de> Deserialize<'de>,
{
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))?)
}

/// Twelve-cycle 1-7-2-8-...-6-12-1 with (3, 9) pre-matched
fn demo() -> Result<(BipartiteGraph<Label>, Vec<(Label, Label)>), Error> {
    let vertices = (1..=6)
        .map(|v| (Label::Number(v), Side::Left))
        .chain((7..=12).map(|v| (Label::Number(v), Side::Right)));
    let edges = [
        (1, 7),
        (1, 8),
        (2, 8),
        (2, 9),
        (3, 9),
        (3, 10),
        (4, 10),
        (4, 11),
        (5, 11),
        (5, 12),
        (6, 12),
        (6, 7),
    ]
    .into_iter()
    .map(|(l, r)| (Label::Number(l), Label::Number(r)));

    let graph = berge_core::build_graph(vertices, edges)?;
    Ok((graph, vec![(Label::Number(3), Label::Number(9))]))
}

fn describe(labels: &[Label]) -> String {
    labels
        .iter()
        .map(Label::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl Berge {
    fn execute(&self) -> Result<(), Error> {
        if self.graph.is_none() && self.initial.is_some() {
            return Err("--initial needs a graph file; the demo graph brings its own seed".into());
        }

        let (graph, initial) = match &self.graph {
            Some(path) => {
                let graph: BipartiteGraph<Label> = read_json(path)?;
                let initial = match &self.initial {
                    Some(path) => read_json(path)?,
                    None => Vec::new(),
                };
                (graph, initial)
            }
            None => {
                info!("no graph given, running the twelve-cycle demo");
                demo()?
            }
        };
        info!(
            "graph: {} left, {} right, {} edges",
            graph.left().len(),
            graph.right().len(),
            graph.edge_count()
        );

        let mut matcher = BergeMatching::new();
        for (name, value) in &self.params {
            matcher.set_parameter(name, value)?;
        }

        let mut history = ExecutionHistory::for_algorithm(&matcher, &graph);
        let mut observer = |event: &IterationEvent<'_, Label>| {
            match event.path {
                Some(path) => info!(
                    "step {}: augmenting path {}",
                    event.step,
                    describe(&path.labels(event.graph))
                ),
                None => info!("step {}: no augmenting path", event.step),
            }
            info!(
                "step {}: matching {:?}",
                event.step,
                event.matching.labelled_pairs(event.graph)
            );
            history.on_iteration(event);
        };

        let result = matcher.run_with_observer(&graph, initial, &mut observer)?;
        info!("final matching has {} edges", result.size);

        if self.trace {
            println!("{}", history.to_json()?);
        } else {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        if self.verify {
            let report = validate_matching(&graph, &result.pairs);
            verify_history(&graph, &history)?;
            if !report.passed() {
                error!("verification failed: {report:?}");
                return Err(format!(
                    "matching of size {} is not maximum (reference {})",
                    report.matching_size, report.reference_size
                )
                .into());
            }
            info!("verified against max-flow reference ({})", report.reference_size);
        }

        Ok(())
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();
    Berge::parse().execute()
}
