//! Business rules for the board summary stage.
//!
//! The board summary is checked twice over: once for internal consistency
//! (bucket sums, chart series, optional sections) and once against the
//! portfolio of accepted per-tool assessments it claims to summarise.

use crate::core::error::ViolationReport;
use crate::core::types::{GovernanceStatus, RiskTier};
use crate::model::{
    BoardSummary, ChartSeries, GovernanceBuckets, Portfolio, PortfolioSnapshot, TierBuckets,
};
use crate::validation::rules::{expected_percentage, percentage_matches, RuleCheck};

pub mod rules {
    pub const ECHO: &str = "board.echo";
    pub const BUCKET_SUM: &str = "board.bucket_sum";
    pub const PORTFOLIO_COUNTS: &str = "board.portfolio_counts";
    pub const COMPLETION: &str = "board.completion_percentage";
    pub const FINDINGS: &str = "board.findings";
    pub const APPENDIX: &str = "board.appendix";
    pub const CHARTS: &str = "board.charts";
    pub const FIRST_REPORT: &str = "board.first_report";
    pub const BLOCKED_TERMS: &str = "board.blocked_terms";
    pub const ACTIONS: &str = "board.leadership_actions";
}

/// Regulatory framework names that must not appear in board narrative.
///
/// Matching is a case-sensitive substring test.
pub const BLOCKED_TERMS: [&str; 9] = [
    "GDPR",
    "HIPAA",
    "CCPA",
    "SOC 2",
    "ISO 27001",
    "ISO 42001",
    "EU AI Act",
    "NIST AI RMF",
    "PCI DSS",
];

pub const RISK_LABELS: [&str; 4] = ["Critical", "High", "Moderate", "Low"];
pub const GOVERNANCE_LABELS: [&str; 4] = GovernanceStatus::LABELS;
pub const PROGRESS_LABELS: [&str; 4] = ["Completed", "In Progress", "Not Started", "Blocked"];

/// Cross-field rules for a board summary.
pub struct BoardSummaryRules;

impl RuleCheck for BoardSummaryRules {
    type Artifact = BoardSummary;
    type Upstream = Portfolio;

    fn name(&self) -> &str {
        "Board Summary Rules"
    }

    fn check(&self, candidate: &BoardSummary, upstream: &Portfolio) -> ViolationReport {
        let mut report = ViolationReport::new();

        check_echo(candidate, upstream, &mut report);
        check_bucket_sums(&candidate.portfolio_snapshot, &mut report);
        check_portfolio_counts(&candidate.portfolio_snapshot, upstream, &mut report);
        check_completion(&candidate.portfolio_snapshot, &mut report);
        check_findings(candidate, upstream, &mut report);
        check_appendix(candidate, upstream, &mut report);
        check_charts(candidate, &mut report);
        check_first_report(candidate, &mut report);
        check_blocked_terms(candidate, &mut report);
        check_actions(candidate, &mut report);

        report
    }
}

fn check_echo(candidate: &BoardSummary, upstream: &Portfolio, report: &mut ViolationReport) {
    if candidate.report_period.trim() != upstream.report_period.trim() {
        report.push(
            rules::ECHO,
            format!(
                "report_period '{}' does not match the requested period '{}'",
                candidate.report_period, upstream.report_period
            ),
        );
    }
    if candidate.is_first_report != upstream.is_first_report {
        report.push(
            rules::ECHO,
            format!(
                "is_first_report is {} but the portfolio says {}",
                candidate.is_first_report, upstream.is_first_report
            ),
        );
    }
}

fn check_bucket_sums(snapshot: &PortfolioSnapshot, report: &mut ViolationReport) {
    let tools = u128::from(snapshot.total_tools_registered);
    let sums = [
        ("tools_by_risk_tier", snapshot.tools_by_risk_tier.sum(), "total_tools_registered", tools),
        (
            "tools_by_governance_status",
            snapshot.tools_by_governance_status.sum(),
            "total_tools_registered",
            tools,
        ),
        (
            "recommendations_by_status",
            snapshot.recommendations_by_status.sum(),
            "total_recommendations",
            u128::from(snapshot.total_recommendations),
        ),
    ];
    for (buckets, sum, total_field, total) in sums {
        if sum != total {
            report.push(
                rules::BUCKET_SUM,
                format!(
                    "portfolio_snapshot.{} sum is {} but {} is {}",
                    buckets, sum, total_field, total
                ),
            );
        }
    }
}

fn derived_tiers(portfolio: &Portfolio) -> TierBuckets {
    let mut buckets = TierBuckets {
        critical: 0,
        high: 0,
        moderate: 0,
        low: 0,
    };
    for assessment in &portfolio.assessments {
        match assessment.classification.risk_tier {
            RiskTier::Critical => buckets.critical += 1,
            RiskTier::High => buckets.high += 1,
            RiskTier::Moderate => buckets.moderate += 1,
            RiskTier::Low => buckets.low += 1,
        }
    }
    buckets
}

fn derived_governance(portfolio: &Portfolio) -> GovernanceBuckets {
    let mut buckets = GovernanceBuckets {
        managed: 0,
        partially_managed: 0,
        unmanaged: 0,
        shadow_ai: 0,
    };
    for assessment in &portfolio.assessments {
        match assessment.profile.governance_status {
            GovernanceStatus::Managed => buckets.managed += 1,
            GovernanceStatus::PartiallyManaged => buckets.partially_managed += 1,
            GovernanceStatus::Unmanaged => buckets.unmanaged += 1,
            GovernanceStatus::ShadowAi => buckets.shadow_ai += 1,
        }
    }
    buckets
}

fn check_portfolio_counts(snapshot: &PortfolioSnapshot, portfolio: &Portfolio, report: &mut ViolationReport) {
    let assessed = portfolio.assessments.len() as u64;
    if snapshot.total_tools_registered != assessed {
        report.push(
            rules::PORTFOLIO_COUNTS,
            format!(
                "portfolio_snapshot.total_tools_registered is {} but {} tools were assessed",
                snapshot.total_tools_registered, assessed
            ),
        );
    }

    let tiers = derived_tiers(portfolio);
    for ((label, declared), actual) in RISK_LABELS
        .iter()
        .zip(snapshot.tools_by_risk_tier.ordered())
        .zip(tiers.ordered())
    {
        if declared != actual {
            report.push(
                rules::PORTFOLIO_COUNTS,
                format!(
                    "portfolio_snapshot.tools_by_risk_tier counts {} {} tools but the assessments contain {}",
                    declared, label, actual
                ),
            );
        }
    }

    let governance = derived_governance(portfolio);
    for ((label, declared), actual) in GOVERNANCE_LABELS
        .iter()
        .zip(snapshot.tools_by_governance_status.ordered())
        .zip(governance.ordered())
    {
        if declared != actual {
            report.push(
                rules::PORTFOLIO_COUNTS,
                format!(
                    "portfolio_snapshot.tools_by_governance_status counts {} {} tools but the assessments contain {}",
                    declared, label, actual
                ),
            );
        }
    }

    let planned: u64 = portfolio
        .assessments
        .iter()
        .filter_map(|a| a.remediation.as_ref())
        .map(|plan| plan.recommendations.len() as u64)
        .sum();
    if snapshot.total_recommendations != planned {
        report.push(
            rules::PORTFOLIO_COUNTS,
            format!(
                "portfolio_snapshot.total_recommendations is {} but the remediation plans contain {}",
                snapshot.total_recommendations, planned
            ),
        );
    }
}

fn check_completion(snapshot: &PortfolioSnapshot, report: &mut ViolationReport) {
    let completed = snapshot.recommendations_by_status.completed;
    let total = snapshot.total_recommendations;
    let declared = snapshot.remediation_completion_percentage;
    if !percentage_matches(declared, completed, total) {
        let message = if total == 0 {
            format!(
                "remediation_completion_percentage must be 0 when there are no recommendations, got {}",
                declared
            )
        } else {
            format!(
                "remediation_completion_percentage {} does not match {} of {} completed ({})",
                declared,
                completed,
                total,
                expected_percentage(completed, total)
            )
        };
        report.push(rules::COMPLETION, message);
    }
}

fn check_findings(candidate: &BoardSummary, portfolio: &Portfolio, report: &mut ViolationReport) {
    for assessment in &portfolio.assessments {
        for flag in assessment.flags.elevated() {
            let surfaced = candidate
                .key_findings
                .iter()
                .any(|f| f.title.contains(&flag.title) || f.detail.contains(&flag.title));
            if !surfaced {
                report.push(
                    rules::FINDINGS,
                    format!(
                        "key_findings omit the {} flag '{}' raised for {}",
                        flag.severity,
                        flag.title,
                        assessment.tool_name()
                    ),
                );
            }
        }
    }
}

fn check_appendix(candidate: &BoardSummary, portfolio: &Portfolio, report: &mut ViolationReport) {
    for assessment in &portfolio.assessments {
        let name = assessment.tool_name();
        let Some(row) = candidate
            .appendix_tool_table
            .iter()
            .find(|row| row.tool_name.trim() == name.trim())
        else {
            report.push(
                rules::APPENDIX,
                format!("appendix_tool_table is missing the tool '{}'", name),
            );
            continue;
        };

        let tier = assessment.classification.risk_tier;
        if row.risk_tier != tier {
            report.push(
                rules::APPENDIX,
                format!(
                    "appendix_tool_table lists '{}' as {} but it was classified {}",
                    name, row.risk_tier, tier
                ),
            );
        }
        let status = assessment.profile.governance_status;
        if row.governance_status != status {
            report.push(
                rules::APPENDIX,
                format!(
                    "appendix_tool_table lists '{}' as {} but its governance status is {}",
                    name, row.governance_status, status
                ),
            );
        }
    }
}

fn check_series(
    name: &str,
    series: &ChartSeries,
    labels: &[&str; 4],
    expected: [u64; 4],
    report: &mut ViolationReport,
) {
    if series.labels.len() != labels.len()
        || series.labels.iter().zip(labels.iter()).any(|(got, want)| got != want)
    {
        report.push(
            rules::CHARTS,
            format!(
                "chart_data.{}.labels must be [{}] in that order, got [{}]",
                name,
                labels.join(", "),
                series.labels.join(", ")
            ),
        );
    }

    if series.values.len() != 4 {
        report.push(
            rules::CHARTS,
            format!(
                "chart_data.{}.values must have exactly 4 values, got {}",
                name,
                series.values.len()
            ),
        );
        return;
    }

    for ((label, value), want) in labels.iter().zip(&series.values).zip(expected) {
        if (*value - want as f64).abs() > f64::EPSILON {
            report.push(
                rules::CHARTS,
                format!(
                    "chart_data.{} value for {} is {} but the snapshot says {}",
                    name, label, value, want
                ),
            );
        }
    }
}

fn check_charts(candidate: &BoardSummary, report: &mut ViolationReport) {
    let snapshot = &candidate.portfolio_snapshot;
    let charts = &candidate.chart_data;
    check_series(
        "risk_distribution",
        &charts.risk_distribution,
        &RISK_LABELS,
        snapshot.tools_by_risk_tier.ordered(),
        report,
    );
    check_series(
        "governance_distribution",
        &charts.governance_distribution,
        &GOVERNANCE_LABELS,
        snapshot.tools_by_governance_status.ordered(),
        report,
    );
    check_series(
        "remediation_progress",
        &charts.remediation_progress,
        &PROGRESS_LABELS,
        snapshot.recommendations_by_status.ordered(),
        report,
    );
}

fn check_first_report(candidate: &BoardSummary, report: &mut ViolationReport) {
    if !candidate.is_first_report {
        return;
    }
    for (name, section) in [
        ("changes_since_last_report", &candidate.changes_since_last_report),
        ("risk_trend", &candidate.risk_trend),
    ] {
        if section.included {
            report.push(
                rules::FIRST_REPORT,
                format!("{}.included must be false on a first report", name),
            );
        }
    }
}

fn check_blocked_terms(candidate: &BoardSummary, report: &mut ViolationReport) {
    for (path, text) in candidate.narrative_passages() {
        for term in BLOCKED_TERMS {
            if text.contains(term) {
                report.push(
                    rules::BLOCKED_TERMS,
                    format!("{} names the regulatory framework '{}'", path, term),
                );
            }
        }
    }
}

fn check_actions(candidate: &BoardSummary, report: &mut ViolationReport) {
    let actions = &candidate.leadership_actions;
    let has_items = actions.action_items.iter().any(|item| !item.trim().is_empty());
    if actions.no_action_needed && has_items {
        report.push(
            rules::ACTIONS,
            "leadership_actions.action_items must be empty when no_action_needed is true",
        );
    }
    if !actions.no_action_needed && !has_items {
        report.push(
            rules::ACTIONS,
            "leadership_actions.action_items must list at least one action when no_action_needed is false",
        );
    }
}
