use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

pub mod ops;
pub mod viz;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex name must not be empty")]
    InvalidArgument,
    #[error("vertex '{name}' is already defined")]
    DuplicateVertex { name: String },
    #[error("unknown vertex '{name}'")]
    UnknownVertex { name: String },
    #[error("cycle detected in graph ({unresolved} vertices unresolved)")]
    CycleDetected { unresolved: usize },
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Clone)]
struct Vertex {
    name: String,
    successors: Vec<usize>,
    in_degree: usize,
}

/// Directed graph over named vertices with in-degrees maintained on insert.
///
/// Vertices and each vertex's successors keep insertion order, which is also
/// the tie-break order used by [`Graph::top_sort`]. Repeating an edge that
/// already exists is a no-op, so in-degrees always match the stored arcs.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    index: HashMap<String, usize>,
    arcs: HashSet<(usize, usize)>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(GraphError::InvalidArgument);
        }
        if self.index.contains_key(name) {
            return Err(GraphError::DuplicateVertex {
                name: name.to_string(),
            });
        }

        self.index.insert(name.to_string(), self.vertices.len());
        self.vertices.push(Vertex {
            name: name.to_string(),
            successors: Vec::new(),
            in_degree: 0,
        });
        Ok(())
    }

    /// Adds the arc `source -> target`.
    ///
    /// Returns `false` when the arc was already present; the graph is left
    /// untouched in that case.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<bool> {
        if source.trim().is_empty() || target.trim().is_empty() {
            return Err(GraphError::InvalidArgument);
        }
        let from = self.lookup(source)?;
        let to = self.lookup(target)?;

        if !self.arcs.insert((from, to)) {
            return Ok(false);
        }
        self.vertices[from].successors.push(to);
        self.vertices[to].in_degree += 1;
        Ok(true)
    }

    /// Kahn's algorithm over a snapshot of the in-degrees.
    ///
    /// Fails with [`GraphError::CycleDetected`] without returning any partial
    /// order when some vertex never reaches in-degree zero.
    pub fn top_sort(&self) -> Result<Vec<String>> {
        let mut indegree: Vec<usize> = self.vertices.iter().map(|v| v.in_degree).collect();
        let mut queue: VecDeque<usize> = indegree
            .iter()
            .enumerate()
            .filter_map(|(idx, &count)| if count == 0 { Some(idx) } else { None })
            .collect();
        let mut order = Vec::with_capacity(self.vertices.len());

        while let Some(idx) = queue.pop_front() {
            let vertex = &self.vertices[idx];
            order.push(vertex.name.clone());
            for &next in &vertex.successors {
                let count = &mut indegree[next];
                *count -= 1;
                if *count == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() != self.vertices.len() {
            return Err(GraphError::CycleDetected {
                unresolved: self.vertices.len() - order.len(),
            });
        }

        Ok(order)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn in_degree(&self, name: &str) -> Result<usize> {
        let idx = self.lookup(name)?;
        Ok(self.vertices[idx].in_degree)
    }

    pub fn neighbors(&self, name: &str) -> Result<impl Iterator<Item = &str> + '_> {
        let idx = self.lookup(name)?;
        Ok(self.vertices[idx]
            .successors
            .iter()
            .map(move |&next| self.vertices[next].name.as_str()))
    }

    pub fn vertices(&self) -> impl Iterator<Item = &str> + '_ {
        self.vertices.iter().map(|v| v.name.as_str())
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.vertices.iter().flat_map(move |v| {
            v.successors
                .iter()
                .map(move |&next| (v.name.as_str(), self.vertices[next].name.as_str()))
        })
    }

    fn lookup(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownVertex {
                name: name.to_string(),
            })
    }
}
