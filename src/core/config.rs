//! Orchestrator configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! attempt_budget = 3
//! schema_version = "1.0.0"
//!
//! [stages.board_summary]
//! attempt_budget = 5
//! ```

use crate::core::error::ConfigError;
use crate::core::types::StageId;
use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of generation attempts per stage run.
pub const DEFAULT_ATTEMPT_BUDGET: u32 = 3;

/// Per-stage overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageOverrides {
    pub attempt_budget: Option<u32>,
}

/// Settings shared by every orchestrator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Attempts allowed before a stage run is reported as exhausted.
    pub attempt_budget: u32,
    /// Schema version stamped on accepted artifacts.
    pub schema_version: Version,
    /// Overrides keyed by stage id.
    pub stages: IndexMap<StageId, StageOverrides>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            attempt_budget: DEFAULT_ATTEMPT_BUDGET,
            schema_version: Version::new(1, 0, 0),
            stages: IndexMap::new(),
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default attempt budget.
    pub fn with_attempt_budget(mut self, budget: u32) -> Self {
        self.attempt_budget = budget;
        self
    }

    /// Override the attempt budget for one stage.
    pub fn with_stage_budget(mut self, stage: StageId, budget: u32) -> Self {
        self.stages.entry(stage).or_default().attempt_budget = Some(budget);
        self
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: OrchestratorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Attempt budget effective for `stage`.
    pub fn budget_for(&self, stage: StageId) -> u32 {
        self.stages
            .get(&stage)
            .and_then(|o| o.attempt_budget)
            .unwrap_or(self.attempt_budget)
    }

    /// Reject budgets that would never call the generator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attempt_budget == 0 {
            return Err(ConfigError::InvalidValue {
                key: "attempt_budget".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        for (stage, overrides) in &self.stages {
            if overrides.attempt_budget == Some(0) {
                return Err(ConfigError::InvalidValue {
                    key: format!("stages.{}.attempt_budget", stage),
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.attempt_budget, 3);
        assert_eq!(config.budget_for(StageId::BoardSummary), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_with_overrides() {
        let config = OrchestratorConfig::from_toml_str(
            r#"
            attempt_budget = 2
            schema_version = "1.1.0"

            [stages.board_summary]
            attempt_budget = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.budget_for(StageId::ToolProfile), 2);
        assert_eq!(config.budget_for(StageId::BoardSummary), 5);
        assert_eq!(config.schema_version, Version::new(1, 1, 0));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let result = OrchestratorConfig::from_toml_str("attempt_budget = 0");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        let result = OrchestratorConfig::from_toml_str("[stages.risk_flags]\nattempt_budget = 0");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            OrchestratorConfig::from_toml_str("retries = 4"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "attempt_budget = 4").unwrap();

        let config = OrchestratorConfig::load(file.path()).unwrap();
        assert_eq!(config.attempt_budget, 4);

        let missing = OrchestratorConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
