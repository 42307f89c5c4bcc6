//! Inputs supplied by the surrounding application.
//!
//! None of these are generated; they are either raw intake material or
//! bundles of artifacts already accepted by earlier stages.

use crate::model::{FlagReport, RemediationPlan, RiskClassification, ToolProfile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireItem {
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
}

impl QuestionnaireItem {
    /// Blank answers count as unanswered.
    pub fn is_answered(&self) -> bool {
        self.answer.as_deref().map_or(false, |a| !a.trim().is_empty())
    }
}

/// Raw registration of a tool, the profile stage's only upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolIntake {
    pub tool_name: String,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub questionnaire: Vec<QuestionnaireItem>,
}

impl ToolIntake {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            submitted_by: None,
            notes: String::new(),
            questionnaire: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_question(mut self, question: impl Into<String>, answer: Option<&str>) -> Self {
        self.questionnaire.push(QuestionnaireItem {
            question: question.into(),
            answer: answer.map(str::to_string),
        });
        self
    }

    pub fn answered_count(&self) -> u64 {
        self.questionnaire.iter().filter(|q| q.is_answered()).count() as u64
    }
}

/// Accepted per-tool artifacts feeding the board summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolAssessment {
    pub profile: ToolProfile,
    pub classification: RiskClassification,
    pub flags: FlagReport,
    #[serde(default)]
    pub remediation: Option<RemediationPlan>,
}

impl ToolAssessment {
    pub fn tool_name(&self) -> &str {
        &self.profile.tool_name
    }
}

/// Upstream for the board summary stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub report_period: String,
    pub is_first_report: bool,
    pub assessments: Vec<ToolAssessment>,
}

/// Upstream for the classification stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationInputs {
    pub intake: ToolIntake,
    pub profile: ToolProfile,
}

/// Upstream for the risk flag stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagInputs {
    pub profile: ToolProfile,
    pub classification: RiskClassification,
}

/// Upstream for the remediation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationInputs {
    pub profile: ToolProfile,
    pub classification: RiskClassification,
    pub flags: FlagReport,
}
