//! The generate-validate-retry loop.
//!
//! One [`Orchestrator`] drives any [`Stage`]: it requests a candidate, parses
//! it, checks its structure, checks its business rules and either accepts it
//! or retries with every diagnostic gathered so far. Generator failures abort
//! the run at once; only invalid output is retried.

use crate::core::artifact::Artifact;
use crate::core::config::OrchestratorConfig;
use crate::core::error::{
    ConfigError, PipelineResult, StructuralError, ViolationReport,
};
use crate::core::types::StageId;
use crate::generation::client::TextGenerator;
use crate::generation::parse::parse_output;
use crate::generation::progress::{EventCallback, OrchestratorState, StageEvent};
use crate::generation::prompt;
use crate::generation::stage::Stage;
use crate::schema::SchemaValidator;
use crate::validation::RuleCheck;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Why one attempt was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AttemptFailure {
    /// Unparseable output or the first schema mismatch.
    Structural(StructuralError),
    /// Every business rule the candidate broke.
    Rules(ViolationReport),
}

/// Diagnostics of one rejected attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt: u32,
    pub failure: AttemptFailure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Why a stage run ended without an accepted artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub stage: StageId,
    /// Structural error of the final attempt, if that is what failed.
    pub structural_error: Option<StructuralError>,
    /// Violations of the final attempt, if it got as far as the rules.
    pub violations: ViolationReport,
    pub attempts_consumed: u32,
    /// Every rejected attempt, oldest first.
    pub history: Vec<AttemptRecord>,
}

impl Diagnostics {
    fn from_history(stage: StageId, history: Vec<AttemptRecord>) -> Self {
        let (structural_error, violations) = match history.last().map(|r| &r.failure) {
            Some(AttemptFailure::Structural(error)) => (Some(error.clone()), ViolationReport::new()),
            Some(AttemptFailure::Rules(report)) => (None, report.clone()),
            None => (None, ViolationReport::new()),
        };
        Self {
            stage,
            structural_error,
            violations,
            attempts_consumed: history.len() as u32,
            history,
        }
    }
}

/// Result of one stage run.
#[derive(Debug, Clone)]
pub enum StageOutcome<T> {
    Accepted(Artifact<T>),
    Failed(Diagnostics),
}

impl<T> StageOutcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, StageOutcome::Accepted(_))
    }

    pub fn artifact(&self) -> Option<&Artifact<T>> {
        match self {
            StageOutcome::Accepted(artifact) => Some(artifact),
            StageOutcome::Failed(_) => None,
        }
    }

    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            StageOutcome::Accepted(_) => None,
            StageOutcome::Failed(diagnostics) => Some(diagnostics),
        }
    }

    /// Accepted payload, discarding the envelope.
    pub fn into_payload(self) -> Option<T> {
        match self {
            StageOutcome::Accepted(artifact) => Some(artifact.into_payload()),
            StageOutcome::Failed(_) => None,
        }
    }

    pub(crate) fn map<U>(self, f: impl FnOnce(T) -> U) -> StageOutcome<U> {
        match self {
            StageOutcome::Accepted(artifact) => StageOutcome::Accepted(artifact.map(f)),
            StageOutcome::Failed(diagnostics) => StageOutcome::Failed(diagnostics),
        }
    }
}

/// Drives stages against a text generator.
///
/// Holds no per-run state, so one orchestrator may serve many runs and
/// several orchestrators may share a generator.
pub struct Orchestrator<'g> {
    generator: &'g dyn TextGenerator,
    config: OrchestratorConfig,
    on_event: Option<EventCallback>,
}

impl<'g> Orchestrator<'g> {
    pub fn new(generator: &'g dyn TextGenerator) -> Self {
        Self::with_config(generator, OrchestratorConfig::default())
    }

    pub fn with_config(generator: &'g dyn TextGenerator, config: OrchestratorConfig) -> Self {
        Self {
            generator,
            config,
            on_event: None,
        }
    }

    /// Use `budget` attempts for every stage.
    pub fn with_attempt_budget(mut self, budget: u32) -> Self {
        self.config.attempt_budget = budget;
        self.config.stages.clear();
        self
    }

    /// Observe progress events.
    pub fn with_events(mut self, callback: EventCallback) -> Self {
        self.on_event = Some(callback);
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    fn emit(&self, event: StageEvent) {
        if let Some(callback) = &self.on_event {
            callback(&event);
        }
    }

    fn transition(&self, stage: StageId, attempt: u32, state: OrchestratorState) {
        debug!("{} attempt {}: {}", stage, attempt, state);
        self.emit(StageEvent::Transition {
            stage,
            attempt,
            state,
        });
    }

    /// Run one stage to acceptance or exhaustion.
    ///
    /// Returns `Err` only when the generator itself fails or the budget is
    /// invalid; invalid output always ends in a [`StageOutcome`].
    pub fn run<R>(&self, stage: &Stage<R>, upstream: &R::Upstream) -> PipelineResult<StageOutcome<R::Artifact>>
    where
        R: RuleCheck,
        R::Artifact: DeserializeOwned,
        R::Upstream: Serialize,
    {
        let stage_id = stage.id();
        let budget = self.config.budget_for(stage_id);
        if budget == 0 {
            return Err(ConfigError::InvalidValue {
                key: "attempt_budget".to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }

        let system = prompt::system_instructions(stage.instructions(), stage.schema());
        let mut history: Vec<AttemptRecord> = Vec::new();
        self.transition(stage_id, 0, OrchestratorState::Idle);

        for attempt in 1..=budget {
            self.transition(stage_id, attempt, OrchestratorState::Requesting);
            let request = prompt::build_request(stage_id, upstream, &history)?;
            let raw = match self.generator.generate(&system, &request) {
                Ok(raw) => raw,
                Err(error) => {
                    warn!("{} attempt {}: generator failed: {}", stage_id, attempt, error);
                    self.emit(StageEvent::Aborted {
                        stage: stage_id,
                        attempt,
                        message: error.to_string(),
                    });
                    return Err(error.into());
                }
            };

            match self.evaluate(stage, upstream, &raw, attempt) {
                Ok(candidate) => {
                    self.transition(stage_id, attempt, OrchestratorState::Accepted);
                    info!("{} accepted on attempt {} of {}", stage_id, attempt, budget);
                    self.emit(StageEvent::Accepted {
                        stage: stage_id,
                        attempt,
                    });
                    let artifact =
                        Artifact::new(stage_id, self.config.schema_version.clone(), attempt, candidate);
                    return Ok(StageOutcome::Accepted(artifact));
                }
                Err(record) => {
                    let reason = match &record.failure {
                        AttemptFailure::Structural(error) => error.to_string(),
                        AttemptFailure::Rules(report) => report.summary(),
                    };
                    warn!("{} attempt {} rejected: {}", stage_id, attempt, reason);
                    self.emit(StageEvent::AttemptRejected {
                        stage: stage_id,
                        attempt,
                        reason,
                    });
                    history.push(record);
                    if attempt < budget {
                        self.transition(stage_id, attempt, OrchestratorState::Retrying);
                    }
                }
            }
        }

        self.transition(stage_id, budget, OrchestratorState::ExhaustedFailure);
        info!("{} exhausted {} attempts", stage_id, budget);
        self.emit(StageEvent::Exhausted {
            stage: stage_id,
            attempts: budget,
        });
        Ok(StageOutcome::Failed(Diagnostics::from_history(stage_id, history)))
    }

    /// Parse and validate one raw response.
    fn evaluate<R>(
        &self,
        stage: &Stage<R>,
        upstream: &R::Upstream,
        raw: &str,
        attempt: u32,
    ) -> Result<R::Artifact, AttemptRecord>
    where
        R: RuleCheck,
        R::Artifact: DeserializeOwned,
    {
        let stage_id = stage.id();
        let structural = |error: StructuralError| AttemptRecord {
            attempt,
            failure: AttemptFailure::Structural(error),
            hint: None,
        };

        self.transition(stage_id, attempt, OrchestratorState::Parsing);
        let value = parse_output(raw).map_err(structural)?;

        self.transition(stage_id, attempt, OrchestratorState::SchemaValidating);
        let candidate: R::Artifact = SchemaValidator::check(&value, stage.schema()).map_err(structural)?;

        self.transition(stage_id, attempt, OrchestratorState::BusinessValidating);
        let report = stage.check(&candidate, upstream);
        if report.is_valid() {
            return Ok(candidate);
        }
        Err(AttemptRecord {
            attempt,
            hint: stage.hint(&candidate),
            failure: AttemptFailure::Rules(report),
        })
    }
}
