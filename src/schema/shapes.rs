//! Fixed per-stage artifact shapes.

use crate::core::types::{Confidence, Effort, GovernanceStatus, RiskTier, Severity, StageId};
use crate::schema::constraint::Constraint;
use crate::schema::field::FieldSpec;

/// Minimum length for text that must carry substantive content.
pub const MIN_JUSTIFICATION_CHARS: usize = 10;

/// Minimum length of the board executive summary.
pub const MIN_EXECUTIVE_SUMMARY_CHARS: usize = 50;

/// Structural shape of one stage's artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSchema {
    pub stage: StageId,
    pub fields: Vec<FieldSpec>,
}

impl StageSchema {
    /// The fixed schema for `stage`.
    pub fn for_stage(stage: StageId) -> Self {
        let fields = match stage {
            StageId::ToolProfile => tool_profile(),
            StageId::RiskClassification => risk_classification(),
            StageId::RiskFlags => risk_flags(),
            StageId::RemediationPlan => remediation_plan(),
            StageId::BoardSummary => board_summary(),
        };
        Self { stage, fields }
    }

    /// Indented outline of every field, used in generator instructions.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for field in &self.fields {
            field.outline(0, &mut out);
        }
        out
    }
}

fn name() -> FieldSpec {
    FieldSpec::string("tool_name").with_constraint(Constraint::NotEmpty)
}

fn text(field: &str) -> FieldSpec {
    FieldSpec::string(field).min_length(MIN_JUSTIFICATION_CHARS)
}

fn count(field: &str) -> FieldSpec {
    FieldSpec::integer(field).non_negative()
}

fn tier(field: &str) -> FieldSpec {
    FieldSpec::enumeration(field, &RiskTier::LABELS)
}

fn tool_profile() -> Vec<FieldSpec> {
    vec![
        name(),
        FieldSpec::string("vendor").with_constraint(Constraint::NotEmpty),
        FieldSpec::string("category").with_constraint(Constraint::NotEmpty),
        text("description"),
        FieldSpec::enumeration("governance_status", &GovernanceStatus::LABELS),
        FieldSpec::string_list("data_types_processed"),
        FieldSpec::string_list("departments"),
        count("user_count"),
    ]
}

fn dimension(field: &str) -> FieldSpec {
    FieldSpec::object(
        field,
        vec![
            FieldSpec::integer("score").with_range(1.0, 5.0),
            FieldSpec::integer("base_score").with_range(1.0, 5.0),
            FieldSpec::array(
                "modifiers",
                FieldSpec::object(
                    "modifier",
                    vec![
                        FieldSpec::string("factor").min_length(3),
                        FieldSpec::integer("adjustment").with_range(-4.0, 4.0),
                    ],
                ),
            ),
            text("justification"),
        ],
    )
}

fn risk_classification() -> Vec<FieldSpec> {
    vec![
        name(),
        FieldSpec::object(
            "dimensions",
            vec![
                dimension("data_sensitivity"),
                dimension("decision_impact"),
                dimension("vendor_risk"),
                dimension("human_oversight"),
            ],
        ),
        FieldSpec::number("overall_average").with_range(1.0, 5.0),
        tier("risk_tier"),
        FieldSpec::object(
            "enrichment",
            vec![count("total_questions"), count("answered"), count("unanswered")],
        ),
        FieldSpec::enumeration("confidence", &Confidence::LABELS),
        text("rationale"),
    ]
}

fn risk_flags() -> Vec<FieldSpec> {
    vec![
        name(),
        FieldSpec::array(
            "flags",
            FieldSpec::object(
                "flag",
                vec![
                    FieldSpec::string("id").with_constraint(Constraint::NotEmpty),
                    FieldSpec::string("title").min_length(5),
                    FieldSpec::enumeration("severity", &Severity::LABELS),
                    FieldSpec::string("category").with_constraint(Constraint::NotEmpty),
                    text("description"),
                ],
            ),
        ),
        FieldSpec::object(
            "summary",
            vec![
                count("total_flags"),
                count("critical"),
                count("high"),
                count("medium"),
                count("low"),
            ],
        ),
    ]
}

fn remediation_plan() -> Vec<FieldSpec> {
    vec![
        name(),
        tier("current_tier"),
        tier("projected_tier_after_quick_wins"),
        tier("projected_tier_after_full_remediation"),
        FieldSpec::array(
            "recommendations",
            FieldSpec::object(
                "recommendation",
                vec![
                    FieldSpec::string("id").with_constraint(Constraint::NotEmpty),
                    FieldSpec::string("title").min_length(5),
                    text("description"),
                    FieldSpec::enumeration("effort", &Effort::LABELS),
                    FieldSpec::string("timeframe").with_constraint(Constraint::NotEmpty),
                    FieldSpec::string_list("flags_addressed"),
                    FieldSpec::string_list("dependencies"),
                ],
            ),
        )
        .with_constraint(Constraint::MinItems(1)),
        FieldSpec::array(
            "strategies",
            FieldSpec::object(
                "strategy",
                vec![
                    FieldSpec::string("id").with_constraint(Constraint::NotEmpty),
                    FieldSpec::string("name").with_constraint(Constraint::NotEmpty),
                    FieldSpec::integer("priority").with_min(1.0),
                    FieldSpec::string_list("recommendation_ids"),
                    FieldSpec::string_list("flags_resolved"),
                ],
            ),
        ),
        FieldSpec::array(
            "implementation_sequence",
            FieldSpec::object(
                "phase",
                vec![
                    FieldSpec::integer("phase").with_min(1.0),
                    FieldSpec::string("name").optional(),
                    FieldSpec::string_list("recommendation_ids"),
                ],
            ),
        ),
        FieldSpec::object(
            "summary",
            vec![
                count("total_recommendations"),
                count("total_strategies"),
                count("total_flags"),
                count("flags_addressed"),
                count("quick_wins"),
            ],
        ),
    ]
}

fn series(field: &str) -> FieldSpec {
    FieldSpec::object(
        field,
        vec![
            FieldSpec::string_list("labels"),
            FieldSpec::array("values", FieldSpec::number("value").non_negative()),
        ],
    )
}

fn section(field: &str) -> FieldSpec {
    FieldSpec::object(
        field,
        vec![FieldSpec::boolean("included"), FieldSpec::string("content").optional()],
    )
}

fn board_summary() -> Vec<FieldSpec> {
    vec![
        FieldSpec::string("report_period").with_constraint(Constraint::NotEmpty),
        FieldSpec::boolean("is_first_report"),
        FieldSpec::string("executive_summary").min_length(MIN_EXECUTIVE_SUMMARY_CHARS),
        FieldSpec::object(
            "portfolio_snapshot",
            vec![
                count("total_tools_registered"),
                FieldSpec::object(
                    "tools_by_risk_tier",
                    vec![count("critical"), count("high"), count("moderate"), count("low")],
                ),
                FieldSpec::object(
                    "tools_by_governance_status",
                    vec![
                        count("managed"),
                        count("partially_managed"),
                        count("unmanaged"),
                        count("shadow_ai"),
                    ],
                ),
                count("total_recommendations"),
                FieldSpec::object(
                    "recommendations_by_status",
                    vec![
                        count("completed"),
                        count("in_progress"),
                        count("not_started"),
                        count("blocked"),
                    ],
                ),
                FieldSpec::number("remediation_completion_percentage").with_range(0.0, 100.0),
            ],
        ),
        FieldSpec::array(
            "key_findings",
            FieldSpec::object(
                "finding",
                vec![
                    name(),
                    FieldSpec::string("title").with_constraint(Constraint::NotEmpty),
                    FieldSpec::enumeration("severity", &Severity::LABELS),
                    text("detail"),
                ],
            ),
        ),
        FieldSpec::array(
            "appendix_tool_table",
            FieldSpec::object(
                "row",
                vec![
                    name(),
                    tier("risk_tier"),
                    FieldSpec::enumeration("governance_status", &GovernanceStatus::LABELS),
                    count("open_flags"),
                ],
            ),
        ),
        FieldSpec::object(
            "chart_data",
            vec![
                series("risk_distribution"),
                series("governance_distribution"),
                series("remediation_progress"),
            ],
        ),
        section("changes_since_last_report"),
        section("risk_trend"),
        FieldSpec::object(
            "leadership_actions",
            vec![
                FieldSpec::boolean("no_action_needed"),
                FieldSpec::string_list("action_items"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_has_a_schema() {
        for stage in StageId::ALL {
            let schema = StageSchema::for_stage(stage);
            assert_eq!(schema.stage, stage);
            assert!(!schema.fields.is_empty());
        }
    }

    #[test]
    fn test_outline_mentions_closed_sets() {
        let outline = StageSchema::for_stage(StageId::RemediationPlan).outline();
        assert!(outline.contains("Strategic Initiative"));
        assert!(outline.contains("recommendations: array of object"));
    }
}
