//! Business rules for the remediation plan stage.
//!
//! Structural checks over the recommendation graph live in
//! [`crate::graph::dependency`]; this rule set adds the echoes of upstream
//! facts and merges the graph report in.

use crate::core::error::ViolationReport;
use crate::graph::DependencyGraphValidator;
use crate::model::{RemediationInputs, RemediationPlan};
use crate::validation::rules::{check_tool_name, RuleCheck};

pub mod rules {
    pub const TOOL_NAME: &str = "remediation.tool_name";
    pub const CURRENT_TIER: &str = "remediation.current_tier";
}

/// Cross-field rules for a remediation plan.
pub struct RemediationRules;

impl RuleCheck for RemediationRules {
    type Artifact = RemediationPlan;
    type Upstream = RemediationInputs;

    fn name(&self) -> &str {
        "Remediation Plan Rules"
    }

    fn check(&self, candidate: &RemediationPlan, upstream: &RemediationInputs) -> ViolationReport {
        let mut report = ViolationReport::new();

        check_tool_name(
            &mut report,
            rules::TOOL_NAME,
            &candidate.tool_name,
            &upstream.profile.tool_name,
        );

        let classified = upstream.classification.risk_tier;
        if candidate.current_tier != classified {
            report.push(
                rules::CURRENT_TIER,
                format!(
                    "current_tier {} does not match the classified risk tier {}",
                    candidate.current_tier, classified
                ),
            );
        }

        report.merge(DependencyGraphValidator::validate(candidate, &upstream.flags));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RiskTier;
    use crate::fixtures;
    use crate::graph::dependency::rules as graph_rules;

    #[test]
    fn test_fixture_is_valid() {
        let report = RemediationRules.check(&fixtures::remediation(), &fixtures::remediation_inputs());
        assert!(report.is_valid(), "{:?}", report.detailed());
    }

    #[test]
    fn test_current_tier_echo() {
        let mut plan = fixtures::remediation();
        plan.current_tier = RiskTier::High;
        plan.projected_tier_after_quick_wins = RiskTier::High;

        let report = RemediationRules.check(&plan, &fixtures::remediation_inputs());
        assert!(report.mentions("current_tier High does not match the classified risk tier Moderate"));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_graph_violations_are_merged() {
        let mut plan = fixtures::remediation();
        plan.recommendations[0].dependencies = vec!["R2".to_string()];
        plan.tool_name = "Elsewhere".to_string();

        let report = RemediationRules.check(&plan, &fixtures::remediation_inputs());
        assert!(report.has_rule(rules::TOOL_NAME));
        assert!(report.has_rule(graph_rules::CYCLE));
        assert!(report.mentions("dependency cycle detected: R1 -> R2 -> R1"));
    }
}
