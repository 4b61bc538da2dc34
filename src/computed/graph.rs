// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cycle detection over the computed property dependency graph.
//!
//! Uses depth-first search with a recursion stack ("three colors"):
//! reaching a node that is still on the stack means a back edge, and the
//! stack segment from that node onwards is the cycle.
//!
//! **Time Complexity**: O(V + E)
//! **Space Complexity**: O(V)

use std::collections::{HashMap, HashSet};

/// Find one cycle in a graph given as `(node, dependents)` pairs.
///
/// Nodes are explored in the given order so the reported cycle is
/// deterministic. The cycle is closed: its first and last entries match.
pub(crate) fn find_cycle(graph: &[(String, Vec<String>)]) -> Option<Vec<String>> {
    let adjacency: HashMap<&str, &Vec<String>> = graph
        .iter()
        .map(|(node, dependents)| (node.as_str(), dependents))
        .collect();

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for (node, _) in graph {
        if !visited.contains(node.as_str()) {
            if let Some(cycle) =
                dfs_cycle_detection(node, &adjacency, &mut visited, &mut rec_stack, &mut path)
            {
                return Some(cycle);
            }
        }
    }
    None
}

fn dfs_cycle_detection<'a>(
    node: &'a str,
    graph: &HashMap<&'a str, &'a Vec<String>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(&neighbors) = graph.get(node) {
        for neighbor in neighbors.iter() {
            let neighbor = neighbor.as_str();
            if rec_stack.contains(neighbor) {
                let start = path.iter().position(|n| *n == neighbor).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(neighbor.to_string());
                return Some(cycle);
            }
            if !visited.contains(neighbor) {
                if let Some(cycle) = dfs_cycle_detection(neighbor, graph, visited, rec_stack, path) {
                    return Some(cycle);
                }
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
        edges
            .iter()
            .map(|(node, deps)| (node.to_string(), deps.iter().map(|d| d.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_acyclic_chain() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        assert_eq!(find_cycle(&g), None);
    }

    #[test]
    fn test_diamond_is_acyclic() {
        let g = graph(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"]), ("d", &[])]);
        assert_eq!(find_cycle(&g), None);
    }

    #[test]
    fn test_self_dependency() {
        let g = graph(&[("a", &["a"])]);
        assert_eq!(find_cycle(&g), Some(vec!["a".to_string(), "a".to_string()]));
    }

    #[test]
    fn test_complex_cycle_reports_only_the_loop() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["d"]), ("d", &["b"])]);
        assert_eq!(
            find_cycle(&g),
            Some(vec!["b".into(), "c".into(), "d".into(), "b".into()])
        );
    }
}
