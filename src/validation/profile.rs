//! Business rules for the tool profile stage.

use crate::core::error::ViolationReport;
use crate::model::{ToolIntake, ToolProfile};
use crate::validation::rules::{check_tool_name, RuleCheck};
use std::collections::HashSet;

pub mod rules {
    pub const TOOL_NAME: &str = "profile.tool_name";
    pub const DISTINCT_ENTRIES: &str = "profile.distinct_entries";
}

/// Cross-field rules for a tool profile.
pub struct ProfileRules;

impl RuleCheck for ProfileRules {
    type Artifact = ToolProfile;
    type Upstream = ToolIntake;

    fn name(&self) -> &str {
        "Tool Profile Rules"
    }

    fn check(&self, candidate: &ToolProfile, upstream: &ToolIntake) -> ViolationReport {
        let mut report = ViolationReport::new();
        check_tool_name(&mut report, rules::TOOL_NAME, &candidate.tool_name, &upstream.tool_name);

        for (field, entries) in [
            ("data_types_processed", &candidate.data_types_processed),
            ("departments", &candidate.departments),
        ] {
            let mut seen = HashSet::new();
            for entry in entries {
                if !seen.insert(entry.trim().to_lowercase()) {
                    report.push(
                        rules::DISTINCT_ENTRIES,
                        format!("{} lists '{}' more than once", field, entry),
                    );
                }
            }
        }

        report
    }
}
