//! Stage definitions: what each stage generates and how it is checked.

use crate::core::error::ViolationReport;
use crate::core::types::StageId;
use crate::graph::{RecommendationGraph, TopologyAnalyzer};
use crate::model::RemediationPlan;
use crate::schema::StageSchema;
use crate::validation::{
    BoardSummaryRules, ClassificationRules, FlagRules, ProfileRules, RemediationRules, RuleCheck,
};
use indexmap::IndexMap;

const PROFILE_INSTRUCTIONS: &str = "You normalise raw AI tool registrations into a tool profile. \
Use the tool name exactly as registered and classify its governance status.";

const CLASSIFICATION_INSTRUCTIONS: &str = "You score an AI tool on four risk dimensions from 1 to 5. \
Each score is its base score plus the listed modifier adjustments. The overall average is the mean \
of the four scores and the risk tier follows from it: 2.0 or less is Low, 3.0 or less is Moderate, \
4.0 or less is High, anything above is Critical. A tool with any dimension at 5, or in Shadow AI \
governance, is at least High; data sensitivity 5 with human oversight 4 or more is Critical.";

const FLAGS_INSTRUCTIONS: &str = "You identify discrete risk flags for a classified AI tool. \
Flag ids must be unique and the summary counts must match the flags listed.";

const REMEDIATION_INSTRUCTIONS: &str = "You write a remediation plan for the flagged risks. \
Every recommendation belongs to exactly one implementation phase, dependencies come in earlier \
phases, dependencies never form a cycle, and strategies are listed in increasing priority.";

const BOARD_INSTRUCTIONS: &str = "You write a board-level AI risk summary from the assessed \
portfolio. All counts must be derived from the assessments. Surface every Critical and High flag \
by its exact title. Do not name regulatory frameworks.";

/// Produces an extra corrective suggestion from a rejected candidate.
pub type HintFn<T> = fn(&T) -> Option<String>;

/// One stage of the pipeline: its shape, its rules and its instructions.
pub struct Stage<R: RuleCheck> {
    id: StageId,
    schema: StageSchema,
    rules: R,
    instructions: &'static str,
    hint: Option<HintFn<R::Artifact>>,
}

impl<R: RuleCheck> Stage<R> {
    pub fn new(id: StageId, rules: R, instructions: &'static str) -> Self {
        Self {
            id,
            schema: StageSchema::for_stage(id),
            rules,
            instructions,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: HintFn<R::Artifact>) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn id(&self) -> StageId {
        self.id
    }

    pub fn schema(&self) -> &StageSchema {
        &self.schema
    }

    pub fn instructions(&self) -> &'static str {
        self.instructions
    }

    pub fn check(&self, candidate: &R::Artifact, upstream: &R::Upstream) -> ViolationReport {
        self.rules.check(candidate, upstream)
    }

    /// Extra corrective suggestion for a rejected candidate, if the stage has one.
    pub fn hint(&self, candidate: &R::Artifact) -> Option<String> {
        self.hint.and_then(|hint| hint(candidate))
    }
}

pub fn tool_profile() -> Stage<ProfileRules> {
    Stage::new(StageId::ToolProfile, ProfileRules, PROFILE_INSTRUCTIONS)
}

pub fn risk_classification() -> Stage<ClassificationRules> {
    Stage::new(StageId::RiskClassification, ClassificationRules, CLASSIFICATION_INSTRUCTIONS)
}

pub fn risk_flags() -> Stage<FlagRules> {
    Stage::new(StageId::RiskFlags, FlagRules, FLAGS_INSTRUCTIONS)
}

pub fn remediation_plan() -> Stage<RemediationRules> {
    Stage::new(StageId::RemediationPlan, RemediationRules, REMEDIATION_INSTRUCTIONS)
        .with_hint(suggest_phases)
}

pub fn board_summary() -> Stage<BoardSummaryRules> {
    Stage::new(StageId::BoardSummary, BoardSummaryRules, BOARD_INSTRUCTIONS)
}

/// Suggest a dependency-consistent phase layout for a rejected plan.
fn suggest_phases(plan: &RemediationPlan) -> Option<String> {
    let graph = RecommendationGraph::from_recommendations(&plan.recommendations);
    if graph.is_empty() {
        return None;
    }
    match TopologyAnalyzer::new(&graph).phase_layers() {
        Ok(layers) => {
            let phases: Vec<String> = layers
                .iter()
                .enumerate()
                .map(|(i, ids)| format!("phase {}: {}", i + 1, ids.join(", ")))
                .collect();
            Some(format!(
                "A phase layout consistent with the declared dependencies is {}.",
                phases.join("; ")
            ))
        }
        Err(stuck) => Some(format!(
            "Recommendations {} are on or behind a dependency cycle; remove a dependency to break it.",
            stuck.join(", ")
        )),
    }
}

/// Static description of a registered stage.
#[derive(Debug, Clone)]
pub struct StageDescriptor {
    pub id: StageId,
    /// Upstream artifacts the stage consumes, in order.
    pub upstream: &'static [&'static str],
    pub instructions: &'static str,
    pub schema: StageSchema,
}

/// Every pipeline stage, in chain order.
pub struct StageRegistry {
    stages: IndexMap<StageId, StageDescriptor>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self {
            stages: IndexMap::new(),
        }
    }

    /// Registry holding the five built-in stages.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(StageId::ToolProfile, &["intake"], PROFILE_INSTRUCTIONS);
        registry.register(
            StageId::RiskClassification,
            &["intake", "profile"],
            CLASSIFICATION_INSTRUCTIONS,
        );
        registry.register(StageId::RiskFlags, &["profile", "classification"], FLAGS_INSTRUCTIONS);
        registry.register(
            StageId::RemediationPlan,
            &["profile", "classification", "flags"],
            REMEDIATION_INSTRUCTIONS,
        );
        registry.register(StageId::BoardSummary, &["portfolio"], BOARD_INSTRUCTIONS);
        registry
    }

    pub fn register(
        &mut self,
        id: StageId,
        upstream: &'static [&'static str],
        instructions: &'static str,
    ) {
        self.stages.insert(
            id,
            StageDescriptor {
                id,
                upstream,
                instructions,
                schema: StageSchema::for_stage(id),
            },
        );
    }

    pub fn get(&self, id: StageId) -> Option<&StageDescriptor> {
        self.stages.get(&id)
    }

    pub fn contains(&self, id: StageId) -> bool {
        self.stages.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &StageDescriptor> {
        self.stages.values()
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_registry_in_chain_order() {
        let registry = StageRegistry::with_builtins();
        assert_eq!(registry.len(), 5);
        let ids: Vec<StageId> = registry.descriptors().map(|d| d.id).collect();
        assert_eq!(ids, StageId::ALL.to_vec());
        assert_eq!(
            registry.get(StageId::RemediationPlan).map(|d| d.upstream.len()),
            Some(3)
        );
    }

    #[test]
    fn test_stage_bundles_schema_and_rules() {
        let stage = risk_flags();
        assert_eq!(stage.id(), StageId::RiskFlags);
        assert_eq!(stage.schema().stage, StageId::RiskFlags);
        assert!(stage.check(&fixtures::flags(), &fixtures::flag_inputs()).is_valid());
        assert!(stage.hint(&fixtures::flags()).is_none());
    }

    #[test]
    fn test_phase_hint() {
        let stage = remediation_plan();
        let hint = stage.hint(&fixtures::remediation()).unwrap();
        assert!(hint.contains("phase 1: R1; phase 2: R2"));

        let mut plan = fixtures::remediation();
        plan.recommendations[0].dependencies = vec!["R2".to_string()];
        let hint = stage.hint(&plan).unwrap();
        assert!(hint.contains("R1, R2"));
    }
}
