//! The business-rule contract shared by every stage.

use crate::core::error::ViolationReport;

/// Absolute tolerance for a declared mean dimension score.
pub const AVERAGE_TOLERANCE: f64 = 0.005;

/// Absolute tolerance, in percentage points, for derived percentages.
pub const PERCENTAGE_TOLERANCE: f64 = 0.5;

/// Cross-field checks for one stage's artifact.
///
/// Implementations must evaluate every rule and return the complete list of
/// violations; the list is fed back to the generator verbatim, so stopping at
/// the first problem would only cost another round trip.
pub trait RuleCheck: Send + Sync {
    /// The schema-valid candidate being checked.
    type Artifact;
    /// Accepted upstream artifacts the candidate is checked against.
    type Upstream;

    /// Name of this rule set.
    fn name(&self) -> &str;

    /// Check a candidate against its upstream chain.
    fn check(&self, candidate: &Self::Artifact, upstream: &Self::Upstream) -> ViolationReport;
}

/// Compare an echoed tool name against the upstream one.
pub(crate) fn check_tool_name(
    report: &mut ViolationReport,
    rule: &str,
    declared: &str,
    expected: &str,
) {
    if declared.trim() != expected.trim() {
        report.push(
            rule,
            format!("tool_name '{}' does not match upstream tool '{}'", declared, expected),
        );
    }
}

/// `part / total * 100` rounded to one decimal place; zero for an empty total.
pub fn expected_percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Whether a declared percentage matches the expected one within tolerance.
///
/// An empty total requires exactly zero.
pub fn percentage_matches(declared: f64, part: u64, total: u64) -> bool {
    if total == 0 {
        return declared == 0.0;
    }
    (declared - expected_percentage(part, total)).abs() <= PERCENTAGE_TOLERANCE + 1e-9
}
