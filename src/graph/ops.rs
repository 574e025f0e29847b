use std::collections::HashMap;

use crate::graph::Graph;

pub fn roots(graph: &Graph) -> Vec<String> {
    graph
        .vertices()
        .filter(|name| matches!(graph.in_degree(name), Ok(0)))
        .map(str::to_string)
        .collect()
}

/// Depth-first search for back edges. Each cycle is reported as the path
/// segment from the revisited vertex down to the vertex that closes it.
pub fn find_cycles(graph: &Graph) -> Vec<Vec<String>> {
    let mut state: HashMap<&str, VisitState> = HashMap::new();
    let mut cycles = Vec::new();

    for root in graph.vertices() {
        if state.contains_key(root) {
            continue;
        }
        visit_from(root, graph, &mut state, &mut cycles);
    }

    cycles
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Visited,
}

struct Frame<'g> {
    node: &'g str,
    successors: Vec<&'g str>,
    next: usize,
}

impl<'g> Frame<'g> {
    fn enter(node: &'g str, graph: &'g Graph) -> Self {
        let successors = graph
            .neighbors(node)
            .map(|next| next.collect())
            .unwrap_or_default();
        Self {
            node,
            successors,
            next: 0,
        }
    }
}

fn visit_from<'g>(
    root: &'g str,
    graph: &'g Graph,
    state: &mut HashMap<&'g str, VisitState>,
    cycles: &mut Vec<Vec<String>>,
) {
    state.insert(root, VisitState::Visiting);
    let mut frames = vec![Frame::enter(root, graph)];

    while let Some(frame) = frames.last_mut() {
        let Some(&child) = frame.successors.get(frame.next) else {
            state.insert(frame.node, VisitState::Visited);
            frames.pop();
            continue;
        };
        frame.next += 1;

        match state.get(child) {
            Some(VisitState::Visiting) => {
                if let Some(pos) = frames.iter().position(|f| f.node == child) {
                    cycles.push(frames[pos..].iter().map(|f| f.node.to_string()).collect());
                }
            }
            Some(VisitState::Visited) => {}
            None => {
                state.insert(child, VisitState::Visiting);
                frames.push(Frame::enter(child, graph));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::ops::{find_cycles, roots};
    use crate::graph::Graph;

    fn graph_with(vertices: &[&str], edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::new();
        for name in vertices {
            graph.add_vertex(name).expect("add vertex");
        }
        for (from, to) in edges {
            graph.add_edge(from, to).expect("add edge");
        }
        graph
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let graph = graph_with(&["A", "B", "C"], &[("A", "B"), ("A", "C"), ("B", "C")]);
        assert!(find_cycles(&graph).is_empty());
    }

    #[test]
    fn reports_cycle_path_from_revisited_vertex() {
        let graph = graph_with(
            &["start", "A", "B", "C"],
            &[("start", "A"), ("A", "B"), ("B", "C"), ("C", "A")],
        );
        assert_eq!(find_cycles(&graph), vec![vec!["A", "B", "C"]]);
    }

    #[test]
    fn self_loop_is_a_single_vertex_cycle() {
        let graph = graph_with(&["A"], &[("A", "A")]);
        assert_eq!(find_cycles(&graph), vec![vec!["A"]]);
    }

    #[test]
    fn long_chain_is_searched_without_recursion() {
        let names: Vec<String> = (0..150_000).map(|idx| format!("v{idx}")).collect();
        let mut graph = Graph::new();
        for name in &names {
            graph.add_vertex(name).expect("add vertex");
        }
        for pair in names.windows(2) {
            graph.add_edge(&pair[0], &pair[1]).expect("add edge");
        }
        assert!(find_cycles(&graph).is_empty());

        graph
            .add_edge(&names[names.len() - 1], &names[1])
            .expect("close the chain");
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), names.len() - 1);
        assert_eq!(cycles[0][0], "v1");
    }

    #[test]
    fn roots_are_zero_in_degree_vertices_in_insertion_order() {
        let graph = graph_with(&["C", "B", "A"], &[("A", "B")]);
        assert_eq!(roots(&graph), vec!["C", "A"]);
    }
}
