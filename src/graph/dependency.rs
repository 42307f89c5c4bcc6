//! Structural checks over a remediation plan's recommendation graph.
//!
//! Every check runs on every call; violations accumulate into one report and
//! the plan itself is never modified.

use crate::core::error::ViolationReport;
use crate::core::types::Effort;
use crate::graph::structure::RecommendationGraph;
use crate::graph::topology::TopologyAnalyzer;
use crate::model::{FlagReport, RemediationPlan};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

/// Rule codes raised by the dependency graph validator.
pub mod rules {
    pub const UNIQUE_IDS: &str = "remediation.unique_ids";
    pub const REFERENCES: &str = "remediation.references";
    pub const CYCLE: &str = "remediation.cycle";
    pub const PHASE_COVERAGE: &str = "remediation.phase_coverage";
    pub const PHASE_ORDER: &str = "remediation.phase_order";
    pub const AGGREGATES: &str = "remediation.aggregates";
    pub const PROJECTION: &str = "remediation.projection";
    pub const PRIORITY: &str = "remediation.priority";
    pub const FLAG_COVERAGE: &str = "remediation.flag_coverage";
}

/// Validates a remediation plan against its upstream flag report.
pub struct DependencyGraphValidator;

impl DependencyGraphValidator {
    /// Run every check and collect all violations.
    pub fn validate(plan: &RemediationPlan, flags: &FlagReport) -> ViolationReport {
        let mut report = ViolationReport::new();
        let flag_ids: IndexSet<&str> = flags.flag_ids().collect();
        let graph = RecommendationGraph::from_recommendations(&plan.recommendations);

        check_uniqueness(plan, &mut report);
        check_references(plan, &flag_ids, &graph, &mut report);
        let cyclic = check_cycles(&graph, &mut report);
        let placement = check_phase_coverage(plan, &graph, &mut report);
        check_phase_order(plan, &graph, &placement, &cyclic, &mut report);
        check_aggregates(plan, &flag_ids, &mut report);
        check_projection(plan, &mut report);
        check_priorities(plan, &mut report);
        check_flag_coverage(plan, &flag_ids, &mut report);

        report
    }
}

fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut dups = IndexSet::new();
    for id in ids {
        if !seen.insert(id) {
            dups.insert(id);
        }
    }
    dups.into_iter().collect()
}

fn check_uniqueness(plan: &RemediationPlan, report: &mut ViolationReport) {
    for id in duplicates(plan.recommendations.iter().map(|r| r.id.as_str())) {
        report.push(rules::UNIQUE_IDS, format!("duplicate recommendation id '{}'", id));
    }
    for id in duplicates(plan.strategies.iter().map(|s| s.id.as_str())) {
        report.push(rules::UNIQUE_IDS, format!("duplicate strategy id '{}'", id));
    }
}

fn check_references(
    plan: &RemediationPlan,
    flag_ids: &IndexSet<&str>,
    graph: &RecommendationGraph,
    report: &mut ViolationReport,
) {
    for rec in &plan.recommendations {
        for flag in &rec.flags_addressed {
            if !flag_ids.contains(flag.as_str()) {
                report.push(
                    rules::REFERENCES,
                    format!("recommendation '{}' addresses unknown flag '{}'", rec.id, flag),
                );
            }
        }
        for dep in &rec.dependencies {
            if !graph.has_node(dep) {
                report.push(
                    rules::REFERENCES,
                    format!("recommendation '{}' depends on unknown recommendation '{}'", rec.id, dep),
                );
            }
        }
    }

    for strategy in &plan.strategies {
        for flag in &strategy.flags_resolved {
            if !flag_ids.contains(flag.as_str()) {
                report.push(
                    rules::REFERENCES,
                    format!("strategy '{}' resolves unknown flag '{}'", strategy.id, flag),
                );
            }
        }
        for rec in &strategy.recommendation_ids {
            if !graph.has_node(rec) {
                report.push(
                    rules::REFERENCES,
                    format!("strategy '{}' groups unknown recommendation '{}'", strategy.id, rec),
                );
            }
        }
    }

    for phase in &plan.implementation_sequence {
        for rec in &phase.recommendation_ids {
            if !graph.has_node(rec) {
                report.push(
                    rules::REFERENCES,
                    format!("phase {} schedules unknown recommendation '{}'", phase.phase, rec),
                );
            }
        }
    }
}

/// Report one cycle per tangle and return every id that sits on a cycle.
fn check_cycles(graph: &RecommendationGraph, report: &mut ViolationReport) -> HashSet<String> {
    let analyzer = TopologyAnalyzer::new(graph);
    for mut path in analyzer.find_cycles() {
        if let Some(first) = path.first().cloned() {
            path.push(first);
        }
        report.push(
            rules::CYCLE,
            format!("dependency cycle detected: {}", path.join(" -> ")),
        );
    }
    analyzer.cycle_members().into_iter().collect()
}

/// Check the phase partition and return each id's phase when it is placed exactly once.
fn check_phase_coverage<'a>(
    plan: &'a RemediationPlan,
    graph: &RecommendationGraph,
    report: &mut ViolationReport,
) -> IndexMap<&'a str, u64> {
    let mut assignments: IndexMap<&str, Vec<u64>> = IndexMap::new();
    let mut previous: Option<u64> = None;

    for phase in &plan.implementation_sequence {
        if let Some(prev) = previous {
            if phase.phase <= prev {
                report.push(
                    rules::PHASE_COVERAGE,
                    format!(
                        "implementation phases must be strictly increasing: phase {} follows phase {}",
                        phase.phase, prev
                    ),
                );
            }
        }
        previous = Some(phase.phase);

        let mut listed = HashSet::new();
        for id in &phase.recommendation_ids {
            if !listed.insert(id.as_str()) {
                report.push(
                    rules::PHASE_COVERAGE,
                    format!("phase {} lists recommendation '{}' more than once", phase.phase, id),
                );
                continue;
            }
            assignments.entry(id.as_str()).or_default().push(phase.phase);
        }
    }

    for id in graph.node_ids() {
        if !assignments.contains_key(id) {
            report.push(
                rules::PHASE_COVERAGE,
                format!("recommendation '{}' is not assigned to any implementation phase", id),
            );
        }
    }

    let mut placement = IndexMap::new();
    for (id, phases) in assignments {
        if phases.len() > 1 {
            let listed: Vec<String> = phases.iter().map(u64::to_string).collect();
            report.push(
                rules::PHASE_COVERAGE,
                format!(
                    "recommendation '{}' is assigned to more than one phase (phases {})",
                    id,
                    listed.join(", ")
                ),
            );
        } else if graph.has_node(id) {
            placement.insert(id, phases[0]);
        }
    }
    placement
}

fn check_phase_order(
    plan: &RemediationPlan,
    graph: &RecommendationGraph,
    placement: &IndexMap<&str, u64>,
    cyclic: &HashSet<String>,
    report: &mut ViolationReport,
) {
    let mut checked = HashSet::new();
    for rec in &plan.recommendations {
        if cyclic.contains(&rec.id) || !checked.insert(rec.id.as_str()) {
            continue;
        }
        let Some(&phase) = placement.get(rec.id.as_str()) else {
            continue;
        };
        for dep in graph.dependencies_of(&rec.id) {
            if let Some(&dep_phase) = placement.get(dep.as_str()) {
                if dep_phase >= phase {
                    report.push(
                        rules::PHASE_ORDER,
                        format!(
                            "recommendation '{}' in phase {} depends on '{}' which is not scheduled before it (phase {})",
                            rec.id, phase, dep, dep_phase
                        ),
                    );
                }
            }
        }
    }
}

fn check_aggregates(plan: &RemediationPlan, flag_ids: &IndexSet<&str>, report: &mut ViolationReport) {
    let summary = &plan.summary;
    let addressed: HashSet<&str> = plan
        .recommendations
        .iter()
        .flat_map(|r| r.flags_addressed.iter().map(String::as_str))
        .filter(|f| flag_ids.contains(f))
        .collect();
    let quick_wins = plan
        .recommendations
        .iter()
        .filter(|r| r.effort == Effort::QuickWin)
        .count();

    let checks = [
        ("total_recommendations", summary.total_recommendations, plan.recommendations.len()),
        ("total_strategies", summary.total_strategies, plan.strategies.len()),
        ("total_flags", summary.total_flags, flag_ids.len()),
        ("flags_addressed", summary.flags_addressed, addressed.len()),
        ("quick_wins", summary.quick_wins, quick_wins),
    ];
    for (field, declared, actual) in checks {
        if declared != actual as u64 {
            report.push(
                rules::AGGREGATES,
                format!("summary.{} is {} but the plan contains {}", field, declared, actual),
            );
        }
    }
}

fn check_projection(plan: &RemediationPlan, report: &mut ViolationReport) {
    let current = plan.current_tier;
    let quick = plan.projected_tier_after_quick_wins;
    let full = plan.projected_tier_after_full_remediation;

    if quick > current {
        report.push(
            rules::PROJECTION,
            format!(
                "projected_tier_after_quick_wins ({}) is above current_tier ({})",
                quick, current
            ),
        );
    }
    if full > quick {
        report.push(
            rules::PROJECTION,
            format!(
                "projected_tier_after_full_remediation ({}) is above projected_tier_after_quick_wins ({})",
                full, quick
            ),
        );
    }
    if full > current {
        report.push(
            rules::PROJECTION,
            format!(
                "projected_tier_after_full_remediation ({}) is above current_tier ({})",
                full, current
            ),
        );
    }
}

fn check_priorities(plan: &RemediationPlan, report: &mut ViolationReport) {
    for (i, pair) in plan.strategies.windows(2).enumerate() {
        if pair[1].priority <= pair[0].priority {
            report.push(
                rules::PRIORITY,
                format!(
                    "strategies must be listed in strictly increasing priority: strategies[{}] '{}' has priority {} after priority {}",
                    i + 1,
                    pair[1].id,
                    pair[1].priority,
                    pair[0].priority
                ),
            );
        }
    }
}

fn check_flag_coverage(plan: &RemediationPlan, flag_ids: &IndexSet<&str>, report: &mut ViolationReport) {
    let addressed: HashSet<&str> = plan
        .recommendations
        .iter()
        .flat_map(|r| r.flags_addressed.iter().map(String::as_str))
        .collect();
    for flag in flag_ids {
        if !addressed.contains(flag) {
            report.push(
                rules::FLAG_COVERAGE,
                format!("flag '{}' is not addressed by any recommendation", flag),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{RiskTier, Severity};
    use crate::model::{Flag, FlagSummary, PhaseEntry, PlanSummary, Recommendation, Strategy};
    use proptest::prelude::*;

    fn flags(ids: &[&str]) -> FlagReport {
        FlagReport {
            tool_name: "CodePilot".to_string(),
            flags: ids
                .iter()
                .map(|id| Flag {
                    id: id.to_string(),
                    title: format!("Flag {}", id),
                    severity: Severity::High,
                    category: "Data".to_string(),
                    description: "Something risky happens here.".to_string(),
                })
                .collect(),
            summary: FlagSummary {
                total_flags: ids.len() as u64,
                critical: 0,
                high: ids.len() as u64,
                medium: 0,
                low: 0,
            },
        }
    }

    fn rec(id: &str, deps: &[&str], addressed: &[&str]) -> Recommendation {
        Recommendation {
            id: id.to_string(),
            title: format!("Recommendation {}", id),
            description: "Apply the corrective control.".to_string(),
            effort: Effort::MediumEffort,
            timeframe: "60 days".to_string(),
            flags_addressed: addressed.iter().map(|s| s.to_string()).collect(),
            dependencies: deps.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn phase(n: u64, ids: &[&str]) -> PhaseEntry {
        PhaseEntry {
            phase: n,
            name: None,
            recommendation_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// B depends on A, C depends on B, phases {1:[A], 2:[B], 3:[C]}.
    fn chain_plan() -> RemediationPlan {
        RemediationPlan {
            tool_name: "CodePilot".to_string(),
            current_tier: RiskTier::High,
            projected_tier_after_quick_wins: RiskTier::High,
            projected_tier_after_full_remediation: RiskTier::Moderate,
            recommendations: vec![
                rec("A", &[], &["F1"]),
                rec("B", &["A"], &["F2"]),
                rec("C", &["B"], &[]),
            ],
            strategies: vec![Strategy {
                id: "S1".to_string(),
                name: "Lock down data".to_string(),
                priority: 1,
                recommendation_ids: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                flags_resolved: vec!["F1".to_string(), "F2".to_string()],
            }],
            implementation_sequence: vec![phase(1, &["A"]), phase(2, &["B"]), phase(3, &["C"])],
            summary: PlanSummary {
                total_recommendations: 3,
                total_strategies: 1,
                total_flags: 2,
                flags_addressed: 2,
                quick_wins: 0,
            },
        }
    }

    #[test]
    fn test_acyclic_chain_is_valid() {
        let report = DependencyGraphValidator::validate(&chain_plan(), &flags(&["F1", "F2"]));
        assert!(report.is_valid(), "{:?}", report.detailed());
    }

    #[test]
    fn test_omitted_phase_rejected() {
        let mut plan = chain_plan();
        plan.implementation_sequence.pop();

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        assert!(report.mentions("recommendation 'C' is not assigned to any implementation phase"));
    }

    #[test]
    fn test_zero_and_two_phases_have_distinct_messages() {
        let mut plan = chain_plan();
        plan.implementation_sequence = vec![phase(1, &["A", "B"]), phase(2, &["B"])];

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        let missing: Vec<_> = report
            .messages()
            .into_iter()
            .filter(|m| m.contains("'C' is not assigned"))
            .collect();
        let doubled: Vec<_> = report
            .messages()
            .into_iter()
            .filter(|m| m.contains("'B' is assigned to more than one phase"))
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(doubled.len(), 1);
        assert_ne!(missing[0], doubled[0]);
    }

    #[test]
    fn test_two_node_cycle() {
        let mut plan = chain_plan();
        plan.recommendations[0].dependencies = vec!["B".to_string()];

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        assert!(report.has_rule(rules::CYCLE));
        assert!(report.mentions("dependency cycle detected: A -> B -> A"));
    }

    #[test]
    fn test_unknown_references() {
        let mut plan = chain_plan();
        plan.recommendations[2].flags_addressed = vec!["F9".to_string()];
        plan.recommendations[2].dependencies = vec!["Z".to_string()];
        plan.strategies[0].flags_resolved.push("F8".to_string());

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        assert!(report.mentions("recommendation 'C' addresses unknown flag 'F9'"));
        assert!(report.mentions("recommendation 'C' depends on unknown recommendation 'Z'"));
        assert!(report.mentions("strategy 'S1' resolves unknown flag 'F8'"));

        let mut plan = chain_plan();
        plan.strategies[0].recommendation_ids.push("Q".to_string());
        plan.implementation_sequence[2].recommendation_ids.push("W".to_string());

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        assert!(report.mentions("strategy 'S1' groups unknown recommendation 'Q'"));
        assert!(report.mentions("phase 3 schedules unknown recommendation 'W'"));
        assert!(report.has_rule(rules::REFERENCES));
    }

    #[test]
    fn test_repeat_within_one_phase() {
        let mut plan = chain_plan();
        plan.implementation_sequence[1].recommendation_ids.push("B".to_string());

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        assert!(report.mentions("phase 2 lists recommendation 'B' more than once"));
        assert!(!report.mentions("more than one phase"));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_overlapping_cycles_reported_once() {
        let mut plan = chain_plan();
        plan.recommendations[0].dependencies = vec!["B".to_string()];
        plan.recommendations[1].dependencies = vec!["A".to_string(), "C".to_string()];

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        let cycles = report
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("dependency cycle detected"))
            .count();
        assert_eq!(cycles, 1);
        assert!(!report.has_rule(rules::PHASE_ORDER));
    }

    #[test]
    fn test_duplicate_ids() {
        let mut plan = chain_plan();
        plan.recommendations.push(rec("A", &[], &[]));
        plan.strategies.push(plan.strategies[0].clone());
        plan.strategies[1].priority = 2;

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        assert!(report.mentions("duplicate recommendation id 'A'"));
        assert!(report.mentions("duplicate strategy id 'S1'"));
    }

    #[test]
    fn test_aggregates_and_coverage() {
        let mut plan = chain_plan();
        plan.summary.total_recommendations = 4;
        plan.summary.quick_wins = 1;

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2", "F3"]));
        assert!(report.mentions("summary.total_recommendations is 4 but the plan contains 3"));
        assert!(report.mentions("summary.quick_wins is 1 but the plan contains 0"));
        assert!(report.mentions("summary.total_flags is 2 but the plan contains 3"));
        assert!(report.mentions("flag 'F3' is not addressed by any recommendation"));
    }

    #[test]
    fn test_projection_monotonicity() {
        let mut plan = chain_plan();
        plan.projected_tier_after_quick_wins = RiskTier::Critical;
        plan.projected_tier_after_full_remediation = RiskTier::Critical;

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        assert!(report.mentions("projected_tier_after_quick_wins (Critical) is above current_tier (High)"));
        assert!(report.mentions("projected_tier_after_full_remediation (Critical) is above current_tier (High)"));
    }

    #[test]
    fn test_priorities_strictly_increasing() {
        let mut plan = chain_plan();
        let mut second = plan.strategies[0].clone();
        second.id = "S2".to_string();
        second.priority = 1;
        plan.strategies.push(second);
        plan.summary.total_strategies = 2;

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        assert!(report.has_rule(rules::PRIORITY));
    }

    #[test]
    fn test_dependency_scheduled_too_late() {
        let mut plan = chain_plan();
        plan.implementation_sequence = vec![phase(1, &["A", "B"]), phase(2, &["C"])];

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        assert!(report.has_rule(rules::PHASE_ORDER));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_all_checks_run_together() {
        let mut plan = chain_plan();
        plan.recommendations[0].dependencies = vec!["C".to_string()];
        plan.implementation_sequence.pop();
        plan.summary.total_strategies = 9;
        plan.projected_tier_after_quick_wins = RiskTier::Critical;

        let report = DependencyGraphValidator::validate(&plan, &flags(&["F1", "F2"]));
        assert!(report.has_rule(rules::CYCLE));
        assert!(report.has_rule(rules::PHASE_COVERAGE));
        assert!(report.has_rule(rules::AGGREGATES));
        assert!(report.has_rule(rules::PROJECTION));
    }

    proptest! {
        #[test]
        fn prop_validation_is_idempotent(omit_last in any::<bool>(), extra in 0u64..3) {
            let mut plan = chain_plan();
            if omit_last {
                plan.implementation_sequence.pop();
            }
            plan.summary.quick_wins = extra;
            let upstream = flags(&["F1", "F2"]);

            let first = DependencyGraphValidator::validate(&plan, &upstream);
            let second = DependencyGraphValidator::validate(&plan, &upstream);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_back_edge_always_reported(len in 2usize..12) {
            let ids: Vec<String> = (0..len).map(|i| format!("R{}", i)).collect();
            let mut recs: Vec<Recommendation> = ids
                .iter()
                .enumerate()
                .map(|(i, id)| {
                    let deps: Vec<&str> = if i == 0 { vec![] } else { vec![ids[i - 1].as_str()] };
                    rec(id, &deps, &["F1"])
                })
                .collect();
            recs[0].dependencies = vec![ids[len - 1].clone()];

            let mut plan = chain_plan();
            plan.recommendations = recs;
            let report = DependencyGraphValidator::validate(&plan, &flags(&["F1"]));
            prop_assert!(report.has_rule(rules::CYCLE));
            for id in &ids {
                let needle = format!("{} ->", id);
                prop_assert!(report.mentions(&needle));
            }
        }
    }
}
