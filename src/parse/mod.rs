//! Reader for the two-section graph file format.
//!
//! ```text
//! any comment lines
//! [Vertex]
//! A, B, C
//! [Edges]
//! A:B, B:C
//! ```
//!
//! Section markers match case-insensitively and blank lines are ignored.

use std::io::BufRead;

use thiserror::Error;

use crate::graph::{Graph, GraphError};

const VERTEX_MARKER: &str = "[Vertex]";
const EDGES_MARKER: &str = "[Edges]";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no [Vertex] section found")]
    MissingVertexSection,
    #[error("no [Edges] section found")]
    MissingEdgesSection,
    #[error("line {line}: error in vertex definitions: {source}")]
    Vertex {
        line: usize,
        #[source]
        source: GraphError,
    },
    #[error("line {line}: malformed edge '{entry}', expected source:target")]
    MalformedEdge { line: usize, entry: String },
    #[error("line {line}: error in edge definition: {source}")]
    Edge {
        line: usize,
        #[source]
        source: GraphError,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// A graph together with the definitions exactly as they appeared in the input.
#[derive(Debug, Clone, Default)]
pub struct ParsedGraph {
    pub graph: Graph,
    pub vertices: Vec<String>,
    pub edges: Vec<(String, String)>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Vertices,
    Edges,
}

pub fn parse_graph(content: &str) -> Result<ParsedGraph> {
    parse_graph_reader(content.as_bytes())
}

pub fn parse_graph_reader(reader: impl BufRead) -> Result<ParsedGraph> {
    let mut parsed = ParsedGraph::default();
    let mut section = Section::Preamble;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();

        match section {
            Section::Preamble => {
                if trimmed.eq_ignore_ascii_case(VERTEX_MARKER) {
                    section = Section::Vertices;
                }
            }
            Section::Vertices => {
                if trimmed.eq_ignore_ascii_case(EDGES_MARKER) {
                    section = Section::Edges;
                } else if !trimmed.is_empty() {
                    parse_vertex_line(trimmed, line_no, &mut parsed)?;
                }
            }
            Section::Edges => {
                if !trimmed.is_empty() {
                    parse_edge_line(trimmed, line_no, &mut parsed)?;
                }
            }
        }
    }

    match section {
        Section::Preamble => Err(ParseError::MissingVertexSection),
        Section::Vertices => Err(ParseError::MissingEdgesSection),
        Section::Edges => Ok(parsed),
    }
}

/// Comma-separated entries of a line. Trailing empty entries are dropped so
/// `A,B,` reads as `A,B`; empty entries in the middle are kept.
fn entries(line: &str) -> Vec<&str> {
    let mut entries: Vec<&str> = line.split(',').collect();
    while entries.last().is_some_and(|entry| entry.trim().is_empty()) {
        entries.pop();
    }
    entries
}

fn parse_vertex_line(line: &str, line_no: usize, parsed: &mut ParsedGraph) -> Result<()> {
    for entry in entries(line) {
        let name = entry.trim();
        parsed
            .graph
            .add_vertex(name)
            .map_err(|source| ParseError::Vertex {
                line: line_no,
                source,
            })?;
        parsed.vertices.push(name.to_string());
    }
    Ok(())
}

fn parse_edge_line(line: &str, line_no: usize, parsed: &mut ParsedGraph) -> Result<()> {
    for entry in entries(line) {
        let (source, target) =
            split_edge(entry).ok_or_else(|| ParseError::MalformedEdge {
                line: line_no,
                entry: entry.trim().to_string(),
            })?;
        parsed
            .graph
            .add_edge(source, target)
            .map_err(|source| ParseError::Edge {
                line: line_no,
                source,
            })?;
        parsed.edges.push((source.to_string(), target.to_string()));
    }
    Ok(())
}

fn split_edge(entry: &str) -> Option<(&str, &str)> {
    let mut parts = entry.trim().split(':');
    let source = parts.next()?.trim();
    let target = parts.next()?.trim();
    if parts.next().is_some() {
        return None;
    }
    Some((source, target))
}
