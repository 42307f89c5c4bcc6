//! Core types shared by every part of the engine.
//!
//! This module contains:
//! - Closed value domains (tiers, severities, governance statuses, efforts)
//! - The accepted artifact envelope
//! - Error types and the violation report
//! - Orchestrator configuration

pub mod artifact;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use artifact::{Artifact, ArtifactId};
pub use config::OrchestratorConfig;
pub use error::{
    ConfigError, GenerationError, PipelineError, StructuralError, StructuralErrorKind, Violation,
    ViolationReport,
};
pub use types::{Confidence, Effort, GovernanceStatus, RiskTier, Severity, StageId};
