//! Structural validation of shader graphs.

use assetforge_spec::material::GraphFault;
use assetforge_spec::shader::ShaderGraph;
use std::collections::{BTreeMap, BTreeSet};

/// Checks that a graph is a well-formed DAG with a single output node.
///
/// Faults are reported in a fixed order: duplicate ids, missing output,
/// dangling links, multiply-linked sockets, then cycles.
pub fn validate_graph(graph: &ShaderGraph) -> Vec<GraphFault> {
    let mut faults = Vec::new();

    let mut ids = BTreeSet::new();
    let mut reported = BTreeSet::new();
    for node in &graph.nodes {
        if !ids.insert(node.id.as_str()) && reported.insert(node.id.as_str()) {
            faults.push(GraphFault::DuplicateNode {
                node: node.id.clone(),
            });
        }
    }

    if !ids.contains(graph.output.as_str()) {
        faults.push(GraphFault::MissingOutput {
            output: graph.output.clone(),
        });
    }

    for link in &graph.links {
        if !ids.contains(link.from_node.as_str()) || !ids.contains(link.to_node.as_str()) {
            faults.push(GraphFault::DanglingLink {
                from_node: link.from_node.clone(),
                to_node: link.to_node.clone(),
            });
        }
    }

    let mut per_socket: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for link in &graph.links {
        *per_socket
            .entry((link.to_node.as_str(), link.to_socket.as_str()))
            .or_insert(0) += 1;
    }
    for ((node, socket), count) in per_socket {
        if count > 1 {
            faults.push(GraphFault::MultipleLinks {
                node: node.to_string(),
                socket: socket.to_string(),
            });
        }
    }

    faults.extend(
        cycle_nodes(graph)
            .into_iter()
            .map(|node| GraphFault::Cycle { node }),
    );

    faults
}

/// Returns one node per cycle found by depth-first search, in node order.
pub(crate) fn cycle_nodes(graph: &ShaderGraph) -> Vec<String> {
    let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for link in &graph.links {
        adjacency
            .entry(link.from_node.as_str())
            .or_default()
            .push(link.to_node.as_str());
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
    let mut found = Vec::new();

    // Iterative DFS: (node, index of next successor to visit).
    for start in graph.nodes.iter().map(|n| n.id.as_str()) {
        if marks.get(start).copied().unwrap_or(Mark::Unvisited) != Mark::Unvisited {
            continue;
        }
        let mut stack = vec![(start, 0usize)];
        marks.insert(start, Mark::InProgress);

        while let Some(&(node, next)) = stack.last() {
            let successors = adjacency.get(node).map(Vec::as_slice).unwrap_or(&[]);
            if let Some(&succ) = successors.get(next) {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                match marks.get(succ).copied().unwrap_or(Mark::Unvisited) {
                    Mark::Unvisited => {
                        marks.insert(succ, Mark::InProgress);
                        stack.push((succ, 0));
                    }
                    Mark::InProgress => {
                        if !found.iter().any(|n: &String| n == succ) {
                            found.push(succ.to_string());
                        }
                    }
                    Mark::Done => {}
                }
            } else {
                marks.insert(node, Mark::Done);
                stack.pop();
            }
        }
    }

    found
}
