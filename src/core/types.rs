//! Closed value domains shared by every pipeline stage.
//!
//! These enums cross the public boundary of the engine, so their serialized
//! spellings are fixed and match the labels used in generated documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Overall categorical risk level of a tool.
///
/// Variants are declared in ascending order so `Ord` gives
/// `Low < Moderate < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskTier {
    /// All tiers in ascending order.
    pub const ALL: [RiskTier; 4] = [
        RiskTier::Low,
        RiskTier::Moderate,
        RiskTier::High,
        RiskTier::Critical,
    ];

    /// Serialized labels, in ascending order.
    pub const LABELS: [&'static str; 4] = ["Low", "Moderate", "High", "Critical"];

    /// Bucket a mean dimension score into a tier.
    ///
    /// `<= 2.0` is Low, `<= 3.0` Moderate, `<= 4.0` High, anything above is
    /// Critical. Averages of four integer scores land on quarter steps, so the
    /// boundaries are inclusive on the upper end.
    pub fn from_average(average: f64) -> Self {
        if average <= 2.0 {
            RiskTier::Low
        } else if average <= 3.0 {
            RiskTier::Moderate
        } else if average <= 4.0 {
            RiskTier::High
        } else {
            RiskTier::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
            RiskTier::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a single risk flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const LABELS: [&'static str; 4] = ["Critical", "High", "Medium", "Low"];

    /// Critical and High flags must surface in board findings.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Organizational oversight maturity for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GovernanceStatus {
    Managed,
    #[serde(rename = "Partially Managed")]
    PartiallyManaged,
    Unmanaged,
    #[serde(rename = "Shadow AI")]
    ShadowAi,
}

impl GovernanceStatus {
    pub const LABELS: [&'static str; 4] = ["Managed", "Partially Managed", "Unmanaged", "Shadow AI"];

    pub fn as_str(&self) -> &'static str {
        match self {
            GovernanceStatus::Managed => "Managed",
            GovernanceStatus::PartiallyManaged => "Partially Managed",
            GovernanceStatus::Unmanaged => "Unmanaged",
            GovernanceStatus::ShadowAi => "Shadow AI",
        }
    }
}

impl fmt::Display for GovernanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effort class of a remediation recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effort {
    #[serde(rename = "Quick Win")]
    QuickWin,
    #[serde(rename = "Low Effort")]
    LowEffort,
    #[serde(rename = "Medium Effort")]
    MediumEffort,
    #[serde(rename = "High Effort")]
    HighEffort,
    #[serde(rename = "Strategic Initiative")]
    StrategicInitiative,
}

impl Effort {
    pub const LABELS: [&'static str; 5] = [
        "Quick Win",
        "Low Effort",
        "Medium Effort",
        "High Effort",
        "Strategic Initiative",
    ];
}

/// Confidence the generator declares for a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub const LABELS: [&'static str; 3] = ["High", "Medium", "Low"];
}

/// Identifier of a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    ToolProfile,
    RiskClassification,
    RiskFlags,
    RemediationPlan,
    BoardSummary,
}

impl StageId {
    /// Stages in dependency order.
    pub const ALL: [StageId; 5] = [
        StageId::ToolProfile,
        StageId::RiskClassification,
        StageId::RiskFlags,
        StageId::RemediationPlan,
        StageId::BoardSummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::ToolProfile => "tool_profile",
            StageId::RiskClassification => "risk_classification",
            StageId::RiskFlags => "risk_flags",
            StageId::RemediationPlan => "remediation_plan",
            StageId::BoardSummary => "board_summary",
        }
    }

    /// Human-readable stage name.
    pub fn display_name(&self) -> &'static str {
        match self {
            StageId::ToolProfile => "Tool Profile",
            StageId::RiskClassification => "Risk Classification",
            StageId::RiskFlags => "Risk Flags",
            StageId::RemediationPlan => "Remediation Plan",
            StageId::BoardSummary => "Board Summary",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageId::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown stage '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(RiskTier::Low < RiskTier::Moderate);
        assert!(RiskTier::Moderate < RiskTier::High);
        assert!(RiskTier::High < RiskTier::Critical);
        assert_eq!(RiskTier::High.max(RiskTier::Moderate), RiskTier::High);
    }

    #[test]
    fn test_tier_bucketing() {
        assert_eq!(RiskTier::from_average(1.0), RiskTier::Low);
        assert_eq!(RiskTier::from_average(2.0), RiskTier::Low);
        assert_eq!(RiskTier::from_average(2.25), RiskTier::Moderate);
        assert_eq!(RiskTier::from_average(3.0), RiskTier::Moderate);
        assert_eq!(RiskTier::from_average(3.25), RiskTier::High);
        assert_eq!(RiskTier::from_average(4.0), RiskTier::High);
        assert_eq!(RiskTier::from_average(4.25), RiskTier::Critical);
    }

    #[test]
    fn test_serialized_labels() {
        let json = serde_json::to_string(&GovernanceStatus::ShadowAi).unwrap();
        assert_eq!(json, "\"Shadow AI\"");
        let effort: Effort = serde_json::from_str("\"Strategic Initiative\"").unwrap();
        assert_eq!(effort, Effort::StrategicInitiative);
        let stage: StageId = serde_json::from_str("\"board_summary\"").unwrap();
        assert_eq!(stage, StageId::BoardSummary);
    }

    #[test]
    fn test_stage_from_str() {
        assert_eq!("risk_flags".parse::<StageId>(), Ok(StageId::RiskFlags));
        assert!("unknown".parse::<StageId>().is_err());
    }
}
