//! Business rules for the risk flag stage.

use crate::core::error::ViolationReport;
use crate::core::types::{RiskTier, Severity};
use crate::model::{FlagInputs, FlagReport};
use crate::validation::rules::{check_tool_name, RuleCheck};
use std::collections::HashSet;

pub mod rules {
    pub const TOOL_NAME: &str = "flags.tool_name";
    pub const UNIQUE_IDS: &str = "flags.unique_ids";
    pub const SUMMARY: &str = "flags.summary";
    pub const TIER_CONSISTENCY: &str = "flags.tier_consistency";
}

/// Cross-field rules for a risk flag report.
pub struct FlagRules;

impl RuleCheck for FlagRules {
    type Artifact = FlagReport;
    type Upstream = FlagInputs;

    fn name(&self) -> &str {
        "Risk Flag Rules"
    }

    fn check(&self, candidate: &FlagReport, upstream: &FlagInputs) -> ViolationReport {
        let mut report = ViolationReport::new();

        check_tool_name(
            &mut report,
            rules::TOOL_NAME,
            &candidate.tool_name,
            &upstream.profile.tool_name,
        );

        let mut seen = HashSet::new();
        for flag in &candidate.flags {
            if !seen.insert(flag.id.as_str()) {
                report.push(rules::UNIQUE_IDS, format!("duplicate flag id '{}'", flag.id));
            }
        }

        let total = candidate.flags.len() as u64;
        if candidate.summary.total_flags != total {
            report.push(
                rules::SUMMARY,
                format!(
                    "summary.total_flags is {} but the report lists {} flags",
                    candidate.summary.total_flags, total
                ),
            );
        }
        for severity in [Severity::Critical, Severity::High, Severity::Medium, Severity::Low] {
            let actual = candidate.flags.iter().filter(|f| f.severity == severity).count() as u64;
            let declared = candidate.summary.count(severity);
            if declared != actual {
                report.push(
                    rules::SUMMARY,
                    format!(
                        "summary.{} is {} but the report lists {} {} flags",
                        severity.as_str().to_lowercase(),
                        declared,
                        actual,
                        severity
                    ),
                );
            }
        }

        let tier = upstream.classification.risk_tier;
        if tier >= RiskTier::High && candidate.elevated().next().is_none() {
            report.push(
                rules::TIER_CONSISTENCY,
                format!(
                    "a {} risk tier requires at least one Critical or High flag",
                    tier
                ),
            );
        }
        if tier > RiskTier::Low && candidate.flags.is_empty() {
            report.push(
                rules::TIER_CONSISTENCY,
                format!("a {} risk tier requires at least one flag", tier),
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_fixture_is_valid() {
        let report = FlagRules.check(&fixtures::flags(), &fixtures::flag_inputs());
        assert!(report.is_valid(), "{:?}", report.detailed());
    }

    #[test]
    fn test_summary_counts() {
        let mut flags = fixtures::flags();
        flags.summary.high = 0;
        flags.summary.low = 1;
        flags.summary.total_flags = 3;

        let report = FlagRules.check(&flags, &fixtures::flag_inputs());
        assert!(report.mentions("summary.total_flags is 3 but the report lists 2 flags"));
        assert!(report.mentions("summary.high is 0 but the report lists 1 High flags"));
        assert!(report.mentions("summary.low is 1 but the report lists 0 Low flags"));
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn test_duplicate_ids() {
        let mut flags = fixtures::flags();
        flags.flags[1].id = "F1".to_string();
        let report = FlagRules.check(&flags, &fixtures::flag_inputs());
        assert!(report.mentions("duplicate flag id 'F1'"));
    }

    #[test]
    fn test_high_tier_needs_elevated_flag() {
        let mut inputs = fixtures::flag_inputs();
        inputs.classification.risk_tier = RiskTier::High;
        let mut flags = fixtures::flags();
        flags.flags[0].severity = Severity::Medium;
        flags.summary.high = 0;
        flags.summary.medium = 2;

        let report = FlagRules.check(&flags, &inputs);
        assert!(report.mentions("a High risk tier requires at least one Critical or High flag"));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_non_low_tier_needs_a_flag() {
        let mut flags = fixtures::flags();
        flags.flags.clear();
        flags.summary.total_flags = 0;
        flags.summary.high = 0;
        flags.summary.medium = 0;

        let report = FlagRules.check(&flags, &fixtures::flag_inputs());
        assert!(report.mentions("a Moderate risk tier requires at least one flag"));

        let mut inputs = fixtures::flag_inputs();
        inputs.classification.risk_tier = RiskTier::Low;
        assert!(FlagRules.check(&flags, &inputs).is_valid());
    }

    #[test]
    fn test_tool_name_echo() {
        let mut flags = fixtures::flags();
        flags.tool_name = "Someone Else".to_string();
        let report = FlagRules.check(&flags, &fixtures::flag_inputs());
        assert!(report.has_rule(rules::TOOL_NAME));
    }
}
