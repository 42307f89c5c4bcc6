//! Board summary artifact.

use crate::core::types::{GovernanceStatus, RiskTier, Severity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBuckets {
    pub critical: u64,
    pub high: u64,
    pub moderate: u64,
    pub low: u64,
}

impl TierBuckets {
    /// Widened so that four counts never overflow.
    pub fn sum(&self) -> u128 {
        self.ordered().iter().map(|&n| u128::from(n)).sum()
    }

    /// Values in chart label order: Critical, High, Moderate, Low.
    pub fn ordered(&self) -> [u64; 4] {
        [self.critical, self.high, self.moderate, self.low]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceBuckets {
    pub managed: u64,
    pub partially_managed: u64,
    pub unmanaged: u64,
    pub shadow_ai: u64,
}

impl GovernanceBuckets {
    pub fn sum(&self) -> u128 {
        self.ordered().iter().map(|&n| u128::from(n)).sum()
    }

    /// Values in chart label order: Managed, Partially Managed, Unmanaged, Shadow AI.
    pub fn ordered(&self) -> [u64; 4] {
        [self.managed, self.partially_managed, self.unmanaged, self.shadow_ai]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationStatusBuckets {
    pub completed: u64,
    pub in_progress: u64,
    pub not_started: u64,
    pub blocked: u64,
}

impl RecommendationStatusBuckets {
    pub fn sum(&self) -> u128 {
        self.ordered().iter().map(|&n| u128::from(n)).sum()
    }

    /// Values in chart label order: Completed, In Progress, Not Started, Blocked.
    pub fn ordered(&self) -> [u64; 4] {
        [self.completed, self.in_progress, self.not_started, self.blocked]
    }
}

/// Aggregate counts across the whole tool portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub total_tools_registered: u64,
    pub tools_by_risk_tier: TierBuckets,
    pub tools_by_governance_status: GovernanceBuckets,
    pub total_recommendations: u64,
    pub recommendations_by_status: RecommendationStatusBuckets,
    pub remediation_completion_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingEntry {
    pub tool_name: String,
    pub title: String,
    pub severity: Severity,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolTableRow {
    pub tool_name: String,
    pub risk_tier: RiskTier,
    pub governance_status: GovernanceStatus,
    pub open_flags: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub risk_distribution: ChartSeries,
    pub governance_distribution: ChartSeries,
    pub remediation_progress: ChartSeries,
}

/// A report section that may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionalSection {
    pub included: bool,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadershipActions {
    pub no_action_needed: bool,
    #[serde(default)]
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub report_period: String,
    pub is_first_report: bool,
    pub executive_summary: String,
    pub portfolio_snapshot: PortfolioSnapshot,
    pub key_findings: Vec<FindingEntry>,
    pub appendix_tool_table: Vec<ToolTableRow>,
    pub chart_data: ChartData,
    pub changes_since_last_report: OptionalSection,
    pub risk_trend: OptionalSection,
    pub leadership_actions: LeadershipActions,
}

impl BoardSummary {
    /// Every free-text passage written for the board, in document order.
    pub fn narrative_passages(&self) -> Vec<(String, &str)> {
        let mut passages = vec![("executive_summary".to_string(), self.executive_summary.as_str())];
        for (i, finding) in self.key_findings.iter().enumerate() {
            passages.push((format!("key_findings[{}].detail", i), finding.detail.as_str()));
        }
        for section in [
            ("changes_since_last_report", &self.changes_since_last_report),
            ("risk_trend", &self.risk_trend),
        ] {
            if let Some(content) = section.1.content.as_deref() {
                passages.push((format!("{}.content", section.0), content));
            }
        }
        for (i, item) in self.leadership_actions.action_items.iter().enumerate() {
            passages.push((format!("leadership_actions.action_items[{}]", i), item.as_str()));
        }
        passages
    }
}
