//! Running stages by id and whole tool chains.
//!
//! [`run_stage`] is the dynamic entry point used when the stage is only known
//! at runtime. [`run_tool`] chains the four per-tool stages and
//! [`run_portfolio`] runs many tool chains in parallel before the board
//! summary is generated from the accepted results.

use crate::core::artifact::Artifact;
use crate::core::config::OrchestratorConfig;
use crate::core::error::{PipelineError, PipelineResult};
use crate::core::types::StageId;
use crate::generation::client::TextGenerator;
use crate::generation::orchestrator::{Diagnostics, Orchestrator, StageOutcome};
use crate::generation::stage;
use crate::model::{
    BoardSummary, ClassificationInputs, FlagInputs, FlagReport, Portfolio, RemediationInputs,
    RemediationPlan, RiskClassification, ToolAssessment, ToolIntake, ToolProfile,
};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Upstream artifacts available to a dynamically selected stage.
///
/// Each stage reads only the fields it needs; a missing one is reported as
/// [`PipelineError::MissingUpstream`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamArtifacts {
    pub intake: Option<ToolIntake>,
    pub profile: Option<ToolProfile>,
    pub classification: Option<RiskClassification>,
    pub flags: Option<FlagReport>,
    pub portfolio: Option<Portfolio>,
}

fn require<T: Clone>(value: &Option<T>, stage: StageId, artifact: &'static str) -> PipelineResult<T> {
    value
        .clone()
        .ok_or(PipelineError::MissingUpstream { stage, artifact })
}

/// An accepted payload of any stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StageArtifact {
    ToolProfile(ToolProfile),
    RiskClassification(RiskClassification),
    RiskFlags(FlagReport),
    RemediationPlan(RemediationPlan),
    BoardSummary(BoardSummary),
}

impl StageArtifact {
    pub fn stage(&self) -> StageId {
        match self {
            StageArtifact::ToolProfile(_) => StageId::ToolProfile,
            StageArtifact::RiskClassification(_) => StageId::RiskClassification,
            StageArtifact::RiskFlags(_) => StageId::RiskFlags,
            StageArtifact::RemediationPlan(_) => StageId::RemediationPlan,
            StageArtifact::BoardSummary(_) => StageId::BoardSummary,
        }
    }
}

/// Run one stage, selected at runtime, to acceptance or exhaustion.
pub fn run_stage(
    generator: &dyn TextGenerator,
    stage_id: StageId,
    upstream: &UpstreamArtifacts,
    attempt_budget: u32,
) -> PipelineResult<StageOutcome<StageArtifact>> {
    let orchestrator = Orchestrator::new(generator).with_attempt_budget(attempt_budget);

    let outcome = match stage_id {
        StageId::ToolProfile => {
            let intake = require(&upstream.intake, stage_id, "intake")?;
            orchestrator
                .run(&stage::tool_profile(), &intake)?
                .map(StageArtifact::ToolProfile)
        }
        StageId::RiskClassification => {
            let inputs = ClassificationInputs {
                intake: require(&upstream.intake, stage_id, "intake")?,
                profile: require(&upstream.profile, stage_id, "profile")?,
            };
            orchestrator
                .run(&stage::risk_classification(), &inputs)?
                .map(StageArtifact::RiskClassification)
        }
        StageId::RiskFlags => {
            let inputs = FlagInputs {
                profile: require(&upstream.profile, stage_id, "profile")?,
                classification: require(&upstream.classification, stage_id, "classification")?,
            };
            orchestrator
                .run(&stage::risk_flags(), &inputs)?
                .map(StageArtifact::RiskFlags)
        }
        StageId::RemediationPlan => {
            let inputs = RemediationInputs {
                profile: require(&upstream.profile, stage_id, "profile")?,
                classification: require(&upstream.classification, stage_id, "classification")?,
                flags: require(&upstream.flags, stage_id, "flags")?,
            };
            orchestrator
                .run(&stage::remediation_plan(), &inputs)?
                .map(StageArtifact::RemediationPlan)
        }
        StageId::BoardSummary => {
            let portfolio = require(&upstream.portfolio, stage_id, "portfolio")?;
            orchestrator
                .run(&stage::board_summary(), &portfolio)?
                .map(StageArtifact::BoardSummary)
        }
    };

    Ok(outcome)
}

/// Accepted artifacts for one tool, up to the first stage that failed.
#[derive(Debug, Clone)]
pub struct ToolRun {
    pub tool_name: String,
    pub profile: Option<Artifact<ToolProfile>>,
    pub classification: Option<Artifact<RiskClassification>>,
    pub flags: Option<Artifact<FlagReport>>,
    pub remediation: Option<Artifact<RemediationPlan>>,
    /// Diagnostics of the stage that exhausted its budget, if any.
    pub failure: Option<Diagnostics>,
}

impl ToolRun {
    fn new(tool_name: &str) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            profile: None,
            classification: None,
            flags: None,
            remediation: None,
            failure: None,
        }
    }

    fn failed(mut self, diagnostics: Diagnostics) -> Self {
        self.failure = Some(diagnostics);
        self
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.remediation.is_some()
    }

    /// The tool's assessment, if classification and flags were accepted.
    pub fn assessment(&self) -> Option<ToolAssessment> {
        Some(ToolAssessment {
            profile: self.profile.as_ref()?.payload().clone(),
            classification: self.classification.as_ref()?.payload().clone(),
            flags: self.flags.as_ref()?.payload().clone(),
            remediation: self.remediation.as_ref().map(|a| a.payload().clone()),
        })
    }
}

/// Run profile, classification, flags and remediation for one tool.
///
/// Stops at the first stage that exhausts its budget; generator failures
/// propagate as errors.
pub fn run_tool(orchestrator: &Orchestrator<'_>, intake: &ToolIntake) -> PipelineResult<ToolRun> {
    let mut run = ToolRun::new(&intake.tool_name);

    let profile = match orchestrator.run(&stage::tool_profile(), intake)? {
        StageOutcome::Accepted(artifact) => artifact,
        StageOutcome::Failed(diagnostics) => return Ok(run.failed(diagnostics)),
    };
    let classification_inputs = ClassificationInputs {
        intake: intake.clone(),
        profile: profile.payload().clone(),
    };
    run.profile = Some(profile);

    let classification = match orchestrator.run(&stage::risk_classification(), &classification_inputs)? {
        StageOutcome::Accepted(artifact) => artifact,
        StageOutcome::Failed(diagnostics) => return Ok(run.failed(diagnostics)),
    };
    let flag_inputs = FlagInputs {
        profile: classification_inputs.profile,
        classification: classification.payload().clone(),
    };
    run.classification = Some(classification);

    let flags = match orchestrator.run(&stage::risk_flags(), &flag_inputs)? {
        StageOutcome::Accepted(artifact) => artifact,
        StageOutcome::Failed(diagnostics) => return Ok(run.failed(diagnostics)),
    };
    let remediation_inputs = RemediationInputs {
        profile: flag_inputs.profile,
        classification: flag_inputs.classification,
        flags: flags.payload().clone(),
    };
    run.flags = Some(flags);

    match orchestrator.run(&stage::remediation_plan(), &remediation_inputs)? {
        StageOutcome::Accepted(artifact) => run.remediation = Some(artifact),
        StageOutcome::Failed(diagnostics) => return Ok(run.failed(diagnostics)),
    }

    info!("{}: all tool stages accepted", run.tool_name);
    Ok(run)
}

/// Run the per-tool chain for every intake in parallel.
///
/// Results keep the order of `intakes`. Each chain gets its own
/// orchestrator; only the generator is shared.
pub fn run_portfolio(
    generator: &dyn TextGenerator,
    intakes: &[ToolIntake],
    config: &OrchestratorConfig,
) -> Vec<PipelineResult<ToolRun>> {
    intakes
        .par_iter()
        .map(|intake| {
            let orchestrator = Orchestrator::with_config(generator, config.clone());
            run_tool(&orchestrator, intake)
        })
        .collect()
}

/// Collect the assessments of finished tool runs into a board portfolio.
///
/// Tools whose classification or flags were never accepted are left out.
pub fn assemble_portfolio(report_period: &str, is_first_report: bool, runs: &[ToolRun]) -> Portfolio {
    let assessments = runs
        .iter()
        .filter_map(|run| {
            let assessment = run.assessment();
            if assessment.is_none() {
                warn!("{}: left out of the portfolio, assessment incomplete", run.tool_name);
            }
            assessment
        })
        .collect();

    Portfolio {
        report_period: report_period.to_string(),
        is_first_report,
        assessments,
    }
}
