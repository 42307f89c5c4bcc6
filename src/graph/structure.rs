//! Recommendation dependency graph.
//!
//! Nodes are recommendation ids. An edge runs from each declared dependency
//! to the recommendation that declares it, so following edges walks in
//! execution order.

use crate::model::Recommendation;
use indexmap::IndexMap;

/// Directed graph over recommendation ids.
///
/// Uses IndexMap so traversal follows the order recommendations were listed,
/// which keeps cycle reports deterministic.
#[derive(Debug, Clone, Default)]
pub struct RecommendationGraph {
    /// Outgoing edges: dependency id -> dependent ids.
    dependents: IndexMap<String, Vec<String>>,
    /// Incoming edges: dependent id -> dependency ids.
    dependencies: IndexMap<String, Vec<String>>,
    edge_count: usize,
}

impl RecommendationGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a plan's recommendations.
    ///
    /// Duplicate ids collapse onto the first occurrence and dependencies on
    /// unknown ids are left out; both are reported by the dependency validator.
    pub fn from_recommendations(recommendations: &[Recommendation]) -> Self {
        let mut graph = Self::new();
        for rec in recommendations {
            graph.add_node(&rec.id);
        }
        for rec in recommendations {
            for dep in &rec.dependencies {
                if graph.has_node(dep) {
                    graph.add_edge(dep, &rec.id);
                }
            }
        }
        graph
    }

    /// Add a node; returns false if it already existed.
    pub fn add_node(&mut self, id: &str) -> bool {
        if self.has_node(id) {
            return false;
        }
        self.dependents.insert(id.to_string(), Vec::new());
        self.dependencies.insert(id.to_string(), Vec::new());
        true
    }

    /// Add an edge from `dependency` to `dependent`, creating nodes as needed.
    pub fn add_edge(&mut self, dependency: &str, dependent: &str) {
        self.add_node(dependency);
        self.add_node(dependent);
        if let Some(out) = self.dependents.get_mut(dependency) {
            if out.iter().any(|d| d == dependent) {
                return;
            }
            out.push(dependent.to_string());
        }
        if let Some(inc) = self.dependencies.get_mut(dependent) {
            inc.push(dependency.to_string());
        }
        self.edge_count += 1;
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.dependents.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.dependents.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.dependents.keys().map(|s| s.as_str())
    }

    /// Position of a node in insertion order.
    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.dependents.get_index_of(id)
    }

    /// Node id at an insertion-order position.
    pub(crate) fn id_at(&self, index: usize) -> Option<&str> {
        self.dependents.get_index(index).map(|(k, _)| k.as_str())
    }

    /// Recommendations that depend on `id`.
    pub fn dependents_of(&self, id: &str) -> &[String] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Recommendations `id` depends on.
    pub fn dependencies_of(&self, id: &str) -> &[String] {
        self.dependencies.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Effort;

    fn rec(id: &str, deps: &[&str]) -> Recommendation {
        Recommendation {
            id: id.to_string(),
            title: format!("Recommendation {}", id),
            description: "Do the needful thing.".to_string(),
            effort: Effort::LowEffort,
            timeframe: "30 days".to_string(),
            flags_addressed: Vec::new(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn test_edges_run_from_dependency() {
        let graph = RecommendationGraph::from_recommendations(&[rec("A", &[]), rec("B", &["A"])]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.dependents_of("A"), &["B".to_string()]);
        assert_eq!(graph.dependencies_of("B"), &["A".to_string()]);
    }

    #[test]
    fn test_unknown_dependency_skipped() {
        let graph = RecommendationGraph::from_recommendations(&[rec("A", &["Z"])]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.has_node("Z"));
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let graph = RecommendationGraph::from_recommendations(&[rec("A", &[]), rec("B", &["A", "A"])]);
        assert_eq!(graph.edge_count(), 1);
    }
}
