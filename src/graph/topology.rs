//! Topological analysis of recommendation graphs.
//!
//! Provides algorithms for:
//! - Cycle detection with full cycle paths (three-colour DFS)
//! - Topological sorting (execution order)
//! - Phase layering (suggested implementation sequence)

use crate::graph::structure::RecommendationGraph;
use std::collections::{HashMap, VecDeque};

/// Visit state of a node during depth-first traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited.
    White,
    /// On the current traversal path.
    Gray,
    /// Fully explored.
    Black,
}

/// Component index of every node.
struct Components {
    of: Vec<usize>,
    count: usize,
}

/// Analyzer for graph topology.
pub struct TopologyAnalyzer<'a> {
    graph: &'a RecommendationGraph,
}

impl<'a> TopologyAnalyzer<'a> {
    /// Create a new analyzer for the given graph.
    pub fn new(graph: &'a RecommendationGraph) -> Self {
        Self { graph }
    }

    /// Find one cycle in every strongly connected component that has one.
    ///
    /// Each cycle is the path from the revisited gray node to the node that
    /// closed the loop, in traversal order. Later back edges into an already
    /// reported component are skipped. Runs in O(V + E) with an explicit
    /// stack so deep chains cannot overflow the call stack.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let n = self.graph.node_count();
        let components = self.components();
        let mut reported = vec![false; components.count];
        let mut color = vec![Color::White; n];
        // Position of each gray node on the traversal stack
        let mut depth = vec![0usize; n];
        let mut cycles = Vec::new();

        for root in 0..n {
            if color[root] != Color::White {
                continue;
            }

            // (node index, next child position)
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            color[root] = Color::Gray;

            while let Some(top) = stack.last_mut() {
                let (node, next) = *top;
                let children = self.successors(node);

                if next < children.len() {
                    top.1 += 1;
                    let Some(child) = self.graph.index_of(&children[next]) else {
                        continue;
                    };
                    match color[child] {
                        Color::White => {
                            color[child] = Color::Gray;
                            depth[child] = stack.len();
                            stack.push((child, 0));
                        }
                        Color::Gray => {
                            let component = components.of[child];
                            if reported[component] {
                                continue;
                            }
                            reported[component] = true;
                            let path = stack[depth[child]..]
                                .iter()
                                .filter_map(|&(n, _)| self.graph.id_at(n))
                                .map(str::to_string)
                                .collect();
                            cycles.push(path);
                        }
                        Color::Black => {}
                    }
                } else {
                    color[node] = Color::Black;
                    stack.pop();
                }
            }
        }

        cycles
    }

    /// Every id that lies on at least one cycle, in insertion order.
    pub fn cycle_members(&self) -> Vec<String> {
        let components = self.components();
        let mut sizes = vec![0usize; components.count];
        for &c in &components.of {
            sizes[c] += 1;
        }

        (0..self.graph.node_count())
            .filter(|&node| {
                sizes[components.of[node]] > 1
                    || self
                        .successors(node)
                        .iter()
                        .any(|child| self.graph.index_of(child) == Some(node))
            })
            .filter_map(|node| self.graph.id_at(node))
            .map(str::to_string)
            .collect()
    }

    fn successors(&self, node: usize) -> &'a [String] {
        let graph = self.graph;
        graph.id_at(node).map(|id| graph.dependents_of(id)).unwrap_or_default()
    }

    /// Strongly connected components (iterative Tarjan).
    fn components(&self) -> Components {
        let n = self.graph.node_count();
        let mut index: Vec<Option<usize>> = vec![None; n];
        let mut low = vec![0usize; n];
        let mut on_stack = vec![false; n];
        let mut members: Vec<usize> = Vec::new();
        let mut of = vec![0usize; n];
        let mut count = 0;
        let mut counter = 0;

        for root in 0..n {
            if index[root].is_some() {
                continue;
            }

            index[root] = Some(counter);
            low[root] = counter;
            counter += 1;
            members.push(root);
            on_stack[root] = true;
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

            while let Some(top) = stack.last_mut() {
                let (node, next) = *top;
                let children = self.successors(node);

                if next < children.len() {
                    top.1 += 1;
                    let Some(child) = self.graph.index_of(&children[next]) else {
                        continue;
                    };
                    match index[child] {
                        None => {
                            index[child] = Some(counter);
                            low[child] = counter;
                            counter += 1;
                            members.push(child);
                            on_stack[child] = true;
                            stack.push((child, 0));
                        }
                        Some(child_index) if on_stack[child] => {
                            low[node] = low[node].min(child_index);
                        }
                        Some(_) => {}
                    }
                } else {
                    stack.pop();
                    if let Some(&(parent, _)) = stack.last() {
                        low[parent] = low[parent].min(low[node]);
                    }
                    if Some(low[node]) == index[node] {
                        while let Some(member) = members.pop() {
                            on_stack[member] = false;
                            of[member] = count;
                            if member == node {
                                break;
                            }
                        }
                        count += 1;
                    }
                }
            }
        }

        Components { of, count }
    }

    /// Check if the graph has any cycles.
    pub fn has_cycle(&self) -> bool {
        !self.find_cycles().is_empty()
    }

    /// Get the topological sort order (Kahn's algorithm).
    ///
    /// Returns ids in an order where dependencies come before dependents, or
    /// the ids left unsorted because they sit on or behind a cycle.
    pub fn topological_sort(&self) -> Result<Vec<String>, Vec<String>> {
        let mut in_degree: HashMap<&str, usize> = self
            .graph
            .node_ids()
            .map(|id| (id, self.graph.dependencies_of(id).len()))
            .collect();

        // Seed in insertion order so the result is deterministic
        let mut queue: VecDeque<&str> = self
            .graph
            .node_ids()
            .filter(|id| in_degree.get(id).copied() == Some(0))
            .collect();

        let mut result = Vec::with_capacity(self.graph.node_count());

        while let Some(node) = queue.pop_front() {
            result.push(node.to_string());

            for next in self.graph.dependents_of(node) {
                if let Some(degree) = in_degree.get_mut(next.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(next.as_str());
                    }
                }
            }
        }

        if result.len() != self.graph.node_count() {
            let remaining = self
                .graph
                .node_ids()
                .filter(|id| in_degree.get(id).copied().unwrap_or(0) > 0)
                .map(str::to_string)
                .collect();
            return Err(remaining);
        }

        Ok(result)
    }

    /// Group ids into phases by longest dependency chain.
    ///
    /// Phase 0 holds recommendations with no dependencies; every other
    /// recommendation sits one phase after its deepest dependency.
    pub fn phase_layers(&self) -> Result<Vec<Vec<String>>, Vec<String>> {
        let sorted = self.topological_sort()?;
        let mut depth: HashMap<&str, usize> = HashMap::new();

        for id in &sorted {
            let d = self
                .graph
                .dependencies_of(id)
                .iter()
                .filter_map(|dep| depth.get(dep.as_str()))
                .max()
                .map_or(0, |d| d + 1);
            depth.insert(id.as_str(), d);
        }

        let max_depth = depth.values().max().copied().unwrap_or(0);
        let mut layers: Vec<Vec<String>> = vec![Vec::new(); max_depth + 1];
        for id in self.graph.node_ids() {
            if let Some(&d) = depth.get(id) {
                layers[d].push(id.to_string());
            }
        }
        layers.retain(|layer| !layer.is_empty());

        Ok(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)], nodes: &[&str]) -> RecommendationGraph {
        let mut g = RecommendationGraph::new();
        for n in nodes {
            g.add_node(n);
        }
        for (from, to) in edges {
            g.add_edge(from, to);
        }
        g
    }

    #[test]
    fn test_two_node_cycle_reported_with_both_ids() {
        let g = graph(&[("A", "B"), ("B", "A")], &["A", "B"]);
        let cycles = TopologyAnalyzer::new(&g).find_cycles();
        assert_eq!(cycles, vec![vec!["A".to_string(), "B".to_string()]]);
    }

    #[test]
    fn test_self_loop() {
        let g = graph(&[("A", "A")], &["A"]);
        let cycles = TopologyAnalyzer::new(&g).find_cycles();
        assert_eq!(cycles, vec![vec!["A".to_string()]]);
    }

    #[test]
    fn test_cycle_path_in_traversal_order() {
        let g = graph(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "B")], &["A", "B", "C", "D"]);
        let cycles = TopologyAnalyzer::new(&g).find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["B", "C", "D"]);
    }

    #[test]
    fn test_one_cycle_per_component() {
        let g = graph(
            &[("A", "B"), ("B", "A"), ("B", "C"), ("C", "B"), ("D", "E"), ("E", "D")],
            &["A", "B", "C", "D", "E", "F"],
        );
        let analyzer = TopologyAnalyzer::new(&g);
        assert_eq!(analyzer.find_cycles(), vec![vec!["A", "B"], vec!["D", "E"]]);
        assert_eq!(analyzer.cycle_members(), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_dense_tangle_reports_once() {
        let ids: Vec<String> = (0..200).map(|i| format!("R{}", i)).collect();
        let mut g = RecommendationGraph::new();
        for from in &ids {
            for to in &ids {
                if from != to {
                    g.add_edge(from, to);
                }
            }
        }
        let analyzer = TopologyAnalyzer::new(&g);
        assert_eq!(analyzer.find_cycles().len(), 1);
        assert_eq!(analyzer.cycle_members().len(), 200);
    }

    #[test]
    fn test_cycle_members_exclude_downstream_ids() {
        let g = graph(&[("A", "A"), ("A", "B")], &["A", "B"]);
        assert_eq!(TopologyAnalyzer::new(&g).cycle_members(), vec!["A"]);
    }

    #[test]
    fn test_diamond_is_acyclic() {
        let g = graph(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")], &["A", "B", "C", "D"]);
        let analyzer = TopologyAnalyzer::new(&g);
        assert!(!analyzer.has_cycle());

        let layers = analyzer.phase_layers().unwrap();
        assert_eq!(layers, vec![vec!["A"], vec!["B", "C"], vec!["D"]]);
    }

    #[test]
    fn test_topological_sort() {
        let g = graph(&[("A", "B"), ("B", "C")], &["C", "B", "A"]);
        let sorted = TopologyAnalyzer::new(&g).topological_sort().unwrap();
        let pos = |id: &str| sorted.iter().position(|n| n == id).unwrap();
        assert!(pos("A") < pos("B"));
        assert!(pos("B") < pos("C"));
    }

    #[test]
    fn test_topological_sort_reports_cycle_members() {
        let g = graph(&[("A", "B"), ("B", "A"), ("B", "C")], &["A", "B", "C", "D"]);
        let remaining = TopologyAnalyzer::new(&g).topological_sort().unwrap_err();
        assert!(remaining.contains(&"A".to_string()));
        assert!(remaining.contains(&"B".to_string()));
        assert!(!remaining.contains(&"D".to_string()));
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let mut g = RecommendationGraph::new();
        for i in 0..50_000 {
            g.add_edge(&format!("R{}", i), &format!("R{}", i + 1));
        }
        assert!(!TopologyAnalyzer::new(&g).has_cycle());
    }
}
