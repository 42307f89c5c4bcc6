//! A consistent set of accepted artifacts for one tool, used across tests.
//!
//! Every artifact here passes both schema and rule validation against the
//! ones before it, so tests can break exactly one thing at a time.

use crate::core::types::{Confidence, Effort, GovernanceStatus, RiskTier, Severity};
use crate::model::*;

pub(crate) const TOOL: &str = "CodePilot";

pub(crate) fn intake() -> ToolIntake {
    ToolIntake::new(TOOL)
        .with_notes("Engineering uses CodePilot for code completion across product teams.")
        .with_question("Does the tool receive customer data?", Some("Yes, snippets may contain PII"))
        .with_question("Is output reviewed before use?", Some("Only informally"))
        .with_question("Is there a signed vendor agreement?", Some("Yes"))
        .with_question("Who can approve new integrations?", None)
}

pub(crate) fn profile() -> ToolProfile {
    ToolProfile {
        tool_name: TOOL.to_string(),
        vendor: "Pilot Labs".to_string(),
        category: "Code Assistant".to_string(),
        description: "AI code completion embedded in developer IDEs.".to_string(),
        governance_status: GovernanceStatus::PartiallyManaged,
        data_types_processed: vec!["Source code".to_string(), "Customer PII".to_string()],
        departments: vec!["Engineering".to_string()],
        user_count: 120,
    }
}

fn score(score: i64, base: i64, modifiers: Vec<Modifier>, justification: &str) -> DimensionScore {
    DimensionScore {
        score,
        base_score: base,
        modifiers,
        justification: justification.to_string(),
    }
}

pub(crate) fn classification() -> RiskClassification {
    RiskClassification {
        tool_name: TOOL.to_string(),
        dimensions: Dimensions {
            data_sensitivity: score(
                4,
                3,
                vec![Modifier {
                    factor: "Customer PII in prompts".to_string(),
                    adjustment: 1,
                }],
                "Code snippets can carry customer records.",
            ),
            decision_impact: score(3, 3, Vec::new(), "Suggestions ship to production code."),
            vendor_risk: score(2, 2, Vec::new(), "Established vendor with a signed agreement."),
            human_oversight: score(
                3,
                4,
                vec![Modifier {
                    factor: "Mandatory code review".to_string(),
                    adjustment: -1,
                }],
                "Pull requests are reviewed before merge.",
            ),
        },
        overall_average: 3.0,
        risk_tier: RiskTier::Moderate,
        enrichment: Enrichment {
            total_questions: 4,
            answered: 3,
            unanswered: 1,
        },
        confidence: Confidence::Medium,
        rationale: "Moderate overall exposure driven by data sensitivity.".to_string(),
    }
}

pub(crate) fn flags() -> FlagReport {
    FlagReport {
        tool_name: TOOL.to_string(),
        flags: vec![
            Flag {
                id: "F1".to_string(),
                title: "Customer PII sent to external model".to_string(),
                severity: Severity::High,
                category: "Data Protection".to_string(),
                description: "Prompts may include customer records from production.".to_string(),
            },
            Flag {
                id: "F2".to_string(),
                title: "No output review process".to_string(),
                severity: Severity::Medium,
                category: "Oversight".to_string(),
                description: "Generated code is accepted without a defined review step.".to_string(),
            },
        ],
        summary: FlagSummary {
            total_flags: 2,
            critical: 0,
            high: 1,
            medium: 1,
            low: 0,
        },
    }
}

pub(crate) fn remediation() -> RemediationPlan {
    RemediationPlan {
        tool_name: TOOL.to_string(),
        current_tier: RiskTier::Moderate,
        projected_tier_after_quick_wins: RiskTier::Moderate,
        projected_tier_after_full_remediation: RiskTier::Low,
        recommendations: vec![
            Recommendation {
                id: "R1".to_string(),
                title: "Enable prompt redaction".to_string(),
                description: "Turn on the vendor's PII redaction filter for all seats.".to_string(),
                effort: Effort::QuickWin,
                timeframe: "2 weeks".to_string(),
                flags_addressed: vec!["F1".to_string()],
                dependencies: Vec::new(),
            },
            Recommendation {
                id: "R2".to_string(),
                title: "Define output review policy".to_string(),
                description: "Require reviewer sign-off on AI-generated changes.".to_string(),
                effort: Effort::MediumEffort,
                timeframe: "60 days".to_string(),
                flags_addressed: vec!["F2".to_string()],
                dependencies: vec!["R1".to_string()],
            },
        ],
        strategies: vec![
            Strategy {
                id: "S1".to_string(),
                name: "Protect customer data".to_string(),
                priority: 1,
                recommendation_ids: vec!["R1".to_string()],
                flags_resolved: vec!["F1".to_string()],
            },
            Strategy {
                id: "S2".to_string(),
                name: "Strengthen oversight".to_string(),
                priority: 2,
                recommendation_ids: vec!["R2".to_string()],
                flags_resolved: vec!["F2".to_string()],
            },
        ],
        implementation_sequence: vec![
            PhaseEntry {
                phase: 1,
                name: Some("Immediate".to_string()),
                recommendation_ids: vec!["R1".to_string()],
            },
            PhaseEntry {
                phase: 2,
                name: None,
                recommendation_ids: vec!["R2".to_string()],
            },
        ],
        summary: PlanSummary {
            total_recommendations: 2,
            total_strategies: 2,
            total_flags: 2,
            flags_addressed: 2,
            quick_wins: 1,
        },
    }
}

pub(crate) fn classification_inputs() -> ClassificationInputs {
    ClassificationInputs {
        intake: intake(),
        profile: profile(),
    }
}

pub(crate) fn flag_inputs() -> FlagInputs {
    FlagInputs {
        profile: profile(),
        classification: classification(),
    }
}

pub(crate) fn remediation_inputs() -> RemediationInputs {
    RemediationInputs {
        profile: profile(),
        classification: classification(),
        flags: flags(),
    }
}

pub(crate) fn assessment() -> ToolAssessment {
    ToolAssessment {
        profile: profile(),
        classification: classification(),
        flags: flags(),
        remediation: Some(remediation()),
    }
}

pub(crate) fn portfolio() -> Portfolio {
    Portfolio {
        report_period: "2026-Q3".to_string(),
        is_first_report: true,
        assessments: vec![assessment()],
    }
}

fn series(labels: &[&str], values: [u64; 4]) -> ChartSeries {
    ChartSeries {
        labels: labels.iter().map(|l| l.to_string()).collect(),
        values: values.iter().map(|&v| v as f64).collect(),
    }
}

pub(crate) fn board_summary() -> BoardSummary {
    let tiers = TierBuckets {
        critical: 0,
        high: 0,
        moderate: 1,
        low: 0,
    };
    let governance = GovernanceBuckets {
        managed: 0,
        partially_managed: 1,
        unmanaged: 0,
        shadow_ai: 0,
    };
    let status = RecommendationStatusBuckets {
        completed: 1,
        in_progress: 0,
        not_started: 1,
        blocked: 0,
    };

    BoardSummary {
        report_period: "2026-Q3".to_string(),
        is_first_report: true,
        executive_summary: "One AI tool is registered this quarter. CodePilot carries moderate risk \
            and half of its remediation work is already complete."
            .to_string(),
        chart_data: ChartData {
            risk_distribution: series(&["Critical", "High", "Moderate", "Low"], tiers.ordered()),
            governance_distribution: series(&GovernanceStatus::LABELS, governance.ordered()),
            remediation_progress: series(
                &["Completed", "In Progress", "Not Started", "Blocked"],
                status.ordered(),
            ),
        },
        portfolio_snapshot: PortfolioSnapshot {
            total_tools_registered: 1,
            tools_by_risk_tier: tiers,
            tools_by_governance_status: governance,
            total_recommendations: 2,
            recommendations_by_status: status,
            remediation_completion_percentage: 50.0,
        },
        key_findings: vec![FindingEntry {
            tool_name: TOOL.to_string(),
            title: "Customer PII sent to external model".to_string(),
            severity: Severity::High,
            detail: "Prompts can include customer records; redaction is now enabled.".to_string(),
        }],
        appendix_tool_table: vec![ToolTableRow {
            tool_name: TOOL.to_string(),
            risk_tier: RiskTier::Moderate,
            governance_status: GovernanceStatus::PartiallyManaged,
            open_flags: 1,
        }],
        changes_since_last_report: OptionalSection {
            included: false,
            content: None,
        },
        risk_trend: OptionalSection {
            included: false,
            content: None,
        },
        leadership_actions: LeadershipActions {
            no_action_needed: false,
            action_items: vec!["Approve the output review policy for engineering".to_string()],
        },
    }
}
