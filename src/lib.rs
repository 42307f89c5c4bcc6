//! # Riskboard - Validated AI Risk Reporting
//!
//! Riskboard turns the output of an untrusted text generator into AI-tool risk
//! artifacts that are guaranteed to satisfy both their structural shape and
//! the business invariants linking them together.
//!
//! ## Features
//!
//! - **Five-stage chain**: tool profile, risk classification, risk flags,
//!   remediation plan and board summary, each checked against the artifacts
//!   accepted before it
//! - **Schema validation**: first offending field reported by path
//! - **Business rules**: every violation collected and fed back for regeneration
//! - **Dependency graphs**: cycle detection and phase ordering for remediation plans
//! - **Parallel portfolios**: independent tool chains run concurrently
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use riskboard::prelude::*;
//!
//! let generator = |system: &str, request: &str| -> GenerationResult<String> {
//!     my_model.complete(system, request)
//! };
//!
//! let upstream = UpstreamArtifacts {
//!     intake: Some(ToolIntake::new("CodePilot").with_notes("Code completion for engineering")),
//!     ..Default::default()
//! };
//!
//! match run_stage(&generator, StageId::ToolProfile, &upstream, 3)? {
//!     StageOutcome::Accepted(artifact) => println!("accepted on attempt {}", artifact.attempt()),
//!     StageOutcome::Failed(diagnostics) => println!("{:?}", diagnostics.violations.detailed()),
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Closed value domains, the artifact envelope, errors and configuration
//! - [`model`]: Typed artifacts for every stage and the inputs that feed them
//! - [`schema`]: Per-stage shapes and the structural validator
//! - [`validation`]: Business rule sets behind the [`validation::RuleCheck`] trait
//! - [`graph`]: Recommendation dependency graphs and their validator
//! - [`generation`]: The generate-validate-retry orchestrator and stage runners

#![warn(clippy::all)]

pub mod core;
pub mod generation;
pub mod graph;
pub mod model;
pub mod schema;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use riskboard::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{Confidence, Effort, GovernanceStatus, RiskTier, Severity, StageId};
    pub use crate::core::artifact::{Artifact, ArtifactId};
    pub use crate::core::config::OrchestratorConfig;

    // Errors
    pub use crate::core::error::{
        ConfigError, GenerationError, GenerationResult, PipelineError, PipelineResult,
        StructuralError, StructuralErrorKind, Violation, ViolationReport,
    };

    // Model
    pub use crate::model::*;

    // Validation
    pub use crate::schema::{SchemaValidator, StageSchema};
    pub use crate::validation::{
        BoardSummaryRules, ClassificationRules, FlagRules, ProfileRules, RemediationRules, RuleCheck,
    };
    pub use crate::graph::{DependencyGraphValidator, RecommendationGraph, TopologyAnalyzer};

    // Generation
    pub use crate::generation::{
        run_portfolio, run_stage, run_tool, Diagnostics, Orchestrator, ScriptedGenerator,
        StageArtifact, StageOutcome, StageRegistry, TextGenerator, ToolRun, UpstreamArtifacts,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
