//! Error types for Riskboard.
//!
//! Uses thiserror for structured errors with context. Two families exist:
//! - Hard failures (`PipelineError`, `GenerationError`, `ConfigError`) that
//!   propagate with `?` and abort a stage run.
//! - Expected-invalid results (`StructuralError`, `Violation`) that validators
//!   return as values and the orchestrator feeds back into regeneration.

use crate::core::types::StageId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Top-level error type for Riskboard.
///
/// Only genuinely unexpected conditions end up here; an artifact that fails
/// validation is reported through a stage outcome, never as an error.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Stage {stage} requires upstream artifact '{artifact}'")]
    MissingUpstream {
        stage: StageId,
        artifact: &'static str,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures of the external text-generation capability.
///
/// These are never retried by the validation loop.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("authentication rejected: {0}")]
    Authentication(String),

    #[error("quota exhausted: {0}")]
    QuotaExceeded(String),

    #[error("generator returned no output")]
    Exhausted,

    #[error("{0}")]
    Other(String),
}

/// Errors loading orchestrator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// What kind of structural failure was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralErrorKind {
    /// Output was not well-formed JSON.
    Parse,
    MissingField,
    TypeMismatch,
    InvalidEnum,
    OutOfRange,
    TooShort,
    /// The tree passed the walk but did not map onto the typed model.
    Deserialize,
}

/// The first structural problem found in a generated artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralError {
    pub kind: StructuralErrorKind,
    /// Field path such as `recommendations[2].effort`, or `$` for the root.
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl StructuralError {
    pub fn new(
        kind: StructuralErrorKind,
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Output could not be parsed as structured data at all.
    pub fn parse(detail: impl Into<String>) -> Self {
        Self::new(StructuralErrorKind::Parse, "$", "well-formed JSON object", detail)
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> String {
        match self.kind {
            StructuralErrorKind::Parse => {
                "Respond with a single JSON object and no surrounding prose".to_string()
            }
            StructuralErrorKind::MissingField => format!("Add the required field '{}'", self.path),
            StructuralErrorKind::InvalidEnum => {
                format!("Use exactly one of the allowed values for '{}'", self.path)
            }
            _ => format!("Set '{}' to {}", self.path, self.expected),
        }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.path, self.expected, self.actual
        )
    }
}

impl std::error::Error for StructuralError {}

/// A single business-rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Stable rule code, e.g. `classification.score_arithmetic`.
    pub rule: String,
    pub message: String,
}

impl Violation {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type alias for generator calls.
pub type GenerationResult<T> = Result<T, GenerationError>;

// ============================================================================
// Violation Report
// ============================================================================

/// Ordered, complete list of violations from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViolationReport {
    pub violations: Vec<Violation>,
}

impl ViolationReport {
    /// Create a new empty report (valid).
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn push(&mut self, rule: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(rule, message));
    }

    /// Append every violation of another report, preserving order.
    pub fn merge(&mut self, other: ViolationReport) {
        self.violations.extend(other.violations);
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violation messages in report order.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }

    /// Whether any violation message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.violations.iter().any(|v| v.message.contains(needle))
    }

    /// Whether any violation was raised by `rule`.
    pub fn has_rule(&self, rule: &str) -> bool {
        self.violations.iter().any(|v| v.rule == rule)
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        if self.is_valid() {
            "✓ Artifact satisfies all business rules".to_string()
        } else {
            format!("✗ {} business rule violation(s)", self.violations.len())
        }
    }

    /// Numbered messages, one per line.
    pub fn detailed(&self) -> Vec<String> {
        self.violations
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{}. [{}] {}", i + 1, v.rule, v.message))
            .collect()
    }
}

impl From<Vec<Violation>> for ViolationReport {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_display() {
        let error = StructuralError::new(
            StructuralErrorKind::InvalidEnum,
            "recommendations[2].effort",
            "one of [Quick Win, Low Effort]",
            "\"Trivial\"",
        );
        let text = error.to_string();
        assert!(text.starts_with("recommendations[2].effort: expected"));
        assert!(error.suggested_fix().contains("recommendations[2].effort"));
    }

    #[test]
    fn test_violation_report() {
        let mut report = ViolationReport::new();
        assert!(report.is_valid());

        report.push("flags.unique_ids", "duplicate flag id 'F1'");
        report.push("flags.summary", "summary.total_flags (3) does not equal 2 flags");
        assert!(!report.is_valid());
        assert_eq!(report.len(), 2);
        assert!(report.mentions("duplicate flag id"));
        assert!(report.has_rule("flags.summary"));
        assert_eq!(report.detailed()[0], "1. [flags.unique_ids] duplicate flag id 'F1'");
    }

    #[test]
    fn test_generation_error_serializes() {
        let error = GenerationError::QuotaExceeded("daily limit".to_string());
        let json = serde_json::to_string(&error).unwrap();
        let back: GenerationError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, error);
    }
}
