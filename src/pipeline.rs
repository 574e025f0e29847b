use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::{Result, TopographError};
use crate::graph::GraphError;
use crate::parse::{parse_graph, parse_graph_reader, ParsedGraph};

/// Where the graph text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphSource {
    Path(PathBuf),
    Inline(String),
    Stdin,
}

impl fmt::Display for GraphSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphSource::Path(path) => write!(f, "{}", path.display()),
            GraphSource::Inline(_) => write!(f, "<inline>"),
            GraphSource::Stdin => write!(f, "<stdin>"),
        }
    }
}

impl GraphSource {
    pub fn parse(&self) -> Result<ParsedGraph> {
        let parsed = match self {
            GraphSource::Path(path) => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                parse_graph_reader(BufReader::new(file))?
            }
            GraphSource::Inline(content) => parse_graph(content)?,
            GraphSource::Stdin => parse_graph_reader(io::stdin().lock())?,
        };
        Ok(parsed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    Ordered { order: Vec<String> },
    Cycle { unresolved: usize },
}

/// `{"order": [...]}` on success, `{"cycle": true, "unresolved": n}` otherwise.
impl Serialize for SortOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            SortOutcome::Ordered { order } => {
                let mut state = serializer.serialize_struct("SortOutcome", 1)?;
                state.serialize_field("order", order)?;
                state.end()
            }
            SortOutcome::Cycle { unresolved } => {
                let mut state = serializer.serialize_struct("SortOutcome", 2)?;
                state.serialize_field("cycle", &true)?;
                state.serialize_field("unresolved", unresolved)?;
                state.end()
            }
        }
    }
}

impl SortOutcome {
    pub fn is_cycle(&self) -> bool {
        matches!(self, SortOutcome::Cycle { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Run {
    pub parsed: ParsedGraph,
    pub outcome: SortOutcome,
}

pub fn run(source: &GraphSource) -> Result<Run> {
    let parsed = source.parse()?;
    sort(parsed)
}

/// Sorts a parsed graph. A cycle is a normal outcome, not an error.
pub fn sort(parsed: ParsedGraph) -> Result<Run> {
    let outcome = match parsed.graph.top_sort() {
        Ok(order) => SortOutcome::Ordered { order },
        Err(GraphError::CycleDetected { unresolved }) => SortOutcome::Cycle { unresolved },
        Err(err) => return Err(TopographError::Graph(err)),
    };
    Ok(Run { parsed, outcome })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::error::TopographError;
    use crate::parse::ParseError;
    use crate::pipeline::{run, GraphSource, SortOutcome};

    #[test]
    fn inline_chain_sorts_in_order() {
        let source = GraphSource::Inline("[Vertex]\nA,B,C\n[Edges]\nA:B,B:C\n".to_string());
        let result = run(&source).expect("run pipeline");
        assert_eq!(
            result.outcome,
            SortOutcome::Ordered {
                order: vec!["A".to_string(), "B".to_string(), "C".to_string()]
            }
        );
        assert_eq!(result.parsed.vertices, vec!["A", "B", "C"]);
    }

    #[test]
    fn cycle_is_an_outcome_not_an_error() {
        let source =
            GraphSource::Inline("[Vertex]\nA,B,C\n[Edges]\nA:B,B:C,C:A\n".to_string());
        let result = run(&source).expect("run pipeline");
        assert!(result.outcome.is_cycle());
        assert_eq!(result.outcome, SortOutcome::Cycle { unresolved: 3 });
    }

    #[test]
    fn outcomes_serialize_to_distinct_json_shapes() {
        let ordered = SortOutcome::Ordered {
            order: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&ordered).expect("serialize order"),
            serde_json::json!({"order": ["A", "B"]})
        );
        let cycle = SortOutcome::Cycle { unresolved: 2 };
        assert_eq!(
            serde_json::to_value(&cycle).expect("serialize cycle"),
            serde_json::json!({"cycle": true, "unresolved": 2})
        );
    }

    #[test]
    fn malformed_input_is_an_error() {
        let source = GraphSource::Inline("nothing here\n".to_string());
        let err = run(&source).expect_err("malformed input");
        assert!(matches!(
            err,
            TopographError::Parse(ParseError::MissingVertexSection)
        ));
    }

    #[test]
    fn reads_graph_from_file() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "topograph-pipeline-{}-{nanos}.txt",
            std::process::id()
        ));
        fs::write(&path, "[Vertex]\nB,A\n[Edges]\nA:B\n").expect("write graph file");

        let result = run(&GraphSource::Path(path.clone())).expect("run pipeline");
        assert_eq!(
            result.outcome,
            SortOutcome::Ordered {
                order: vec!["A".to_string(), "B".to_string()]
            }
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let source = GraphSource::Path(std::env::temp_dir().join("topograph-no-such-graph.txt"));
        let err = run(&source).expect_err("missing file");
        assert!(matches!(err, TopographError::Other(_)));
    }
}
