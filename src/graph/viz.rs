use std::collections::HashSet;

use serde::Serialize;

use crate::graph::ops::roots;
use crate::graph::Graph;

#[derive(Debug, Serialize)]
pub struct GraphJson {
    pub vertices: Vec<String>,
    pub edges: Vec<EdgeJson>,
}

#[derive(Debug, Serialize)]
pub struct EdgeJson {
    pub source: String,
    pub target: String,
}

/// Renders every vertex as a tree hanging off the graph's roots.
///
/// Vertices only reachable through a cycle have no root above them, so they
/// are started as roots of their own once the real roots are exhausted. A
/// vertex is expanded once; later occurrences are marked `(see above)`.
pub fn render_tree(graph: &Graph) -> String {
    let root_names = roots(graph);
    let is_root: HashSet<&str> = root_names.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = String::new();
    let starts = root_names
        .iter()
        .map(String::as_str)
        .chain(graph.vertices().filter(|name| !is_root.contains(name)));

    let mut first = true;
    for root in starts {
        if seen.contains(root) {
            continue;
        }
        if !first {
            out.push('\n');
        }
        first = false;
        out.push_str(root);
        out.push('\n');
        render_subtree(root, graph, &mut seen, &mut out);
    }
    out
}

pub fn render_dot(graph: &Graph) -> String {
    let mut out = String::from("digraph topograph {\n");
    for name in graph.vertices() {
        out.push_str(&format!("  \"{}\";\n", escape_dot_label(name)));
    }
    for (from, to) in graph.edges() {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            escape_dot_label(from),
            escape_dot_label(to)
        ));
    }
    out.push_str("}\n");
    out
}

pub fn to_json(graph: &Graph) -> GraphJson {
    GraphJson {
        vertices: graph.vertices().map(str::to_string).collect(),
        edges: graph
            .edges()
            .map(|(source, target)| EdgeJson {
                source: source.to_string(),
                target: target.to_string(),
            })
            .collect(),
    }
}

struct TreeFrame<'g> {
    node: &'g str,
    children: Vec<&'g str>,
    next: usize,
    prefix: String,
}

impl<'g> TreeFrame<'g> {
    fn enter(node: &'g str, graph: &'g Graph, prefix: String) -> Self {
        let children = graph
            .neighbors(node)
            .map(|next| next.collect())
            .unwrap_or_default();
        Self {
            node,
            children,
            next: 0,
            prefix,
        }
    }
}

fn render_subtree<'g>(
    root: &'g str,
    graph: &'g Graph,
    seen: &mut HashSet<&'g str>,
    out: &mut String,
) {
    seen.insert(root);
    let mut frames = vec![TreeFrame::enter(root, graph, String::new())];

    while let Some(frame) = frames.last_mut() {
        let Some(&child) = frame.children.get(frame.next) else {
            frames.pop();
            continue;
        };
        frame.next += 1;
        let is_last = frame.next == frame.children.len();
        out.push_str(&frame.prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        out.push_str(child);

        let mut next_prefix = frame.prefix.clone();
        next_prefix.push_str(if is_last { "    " } else { "|   " });

        if frames.iter().any(|f| f.node == child) {
            out.push_str(" (cycle)\n");
        } else if !seen.insert(child) {
            out.push_str(" (see above)\n");
        } else {
            out.push('\n');
            frames.push(TreeFrame::enter(child, graph, next_prefix));
        }
    }
}

fn escape_dot_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
