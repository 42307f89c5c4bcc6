//! Remediation plan artifact.

use crate::core::types::{Effort, RiskTier};
use serde::{Deserialize, Serialize};

/// A discrete actionable remediation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub effort: Effort,
    pub timeframe: String,
    #[serde(default)]
    pub flags_addressed: Vec<String>,
    /// Ids of recommendations that must be completed first.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A prioritized grouping of recommendations sharing a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: String,
    pub name: String,
    pub priority: u64,
    #[serde(default)]
    pub recommendation_ids: Vec<String>,
    #[serde(default)]
    pub flags_resolved: Vec<String>,
}

/// One scheduling bucket of the implementation sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseEntry {
    pub phase: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub recommendation_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_recommendations: u64,
    pub total_strategies: u64,
    pub total_flags: u64,
    pub flags_addressed: u64,
    pub quick_wins: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationPlan {
    pub tool_name: String,
    pub current_tier: RiskTier,
    pub projected_tier_after_quick_wins: RiskTier,
    pub projected_tier_after_full_remediation: RiskTier,
    pub recommendations: Vec<Recommendation>,
    pub strategies: Vec<Strategy>,
    pub implementation_sequence: Vec<PhaseEntry>,
    pub summary: PlanSummary,
}
