//! Recommendation dependency graphs.
//!
//! A remediation plan's recommendations form a directed graph where an edge
//! runs from a dependency to the recommendation that needs it. The graph must
//! be acyclic and its implementation phases must respect edge direction.

pub mod dependency;
pub mod structure;
pub mod topology;

pub use dependency::DependencyGraphValidator;
pub use structure::RecommendationGraph;
pub use topology::TopologyAnalyzer;
