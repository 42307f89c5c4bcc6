//! Business rules for the risk classification stage.

use crate::core::error::ViolationReport;
use crate::core::types::{Confidence, GovernanceStatus, RiskTier};
use crate::model::{ClassificationInputs, Dimensions, RiskClassification};
use crate::validation::rules::{check_tool_name, RuleCheck, AVERAGE_TOLERANCE};

/// Rule codes raised by [`ClassificationRules`].
pub mod rules {
    pub const TOOL_NAME: &str = "classification.tool_name";
    pub const SCORE_ARITHMETIC: &str = "classification.score_arithmetic";
    pub const AVERAGE: &str = "classification.average";
    pub const TIER_FLOOR: &str = "classification.tier_floor";
    pub const TIER: &str = "classification.tier";
    pub const ENRICHMENT: &str = "classification.enrichment";
    pub const CONFIDENCE: &str = "classification.confidence";
}

/// A minimum tier forced regardless of the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierFloor {
    pub reason: &'static str,
    pub tier: RiskTier,
}

/// The tier a set of dimension scores must produce.
#[derive(Debug, Clone, PartialEq)]
pub struct TierAssessment {
    pub average: f64,
    /// Tier from bucketing the average alone.
    pub bucket: RiskTier,
    /// Every override floor that applies.
    pub floors: Vec<TierFloor>,
}

impl TierAssessment {
    /// Compute the bucket and applicable floors.
    ///
    /// When several floors apply the highest one wins.
    pub fn compute(dimensions: &Dimensions, governance: GovernanceStatus) -> Self {
        let average = dimensions.mean();
        let mut floors = Vec::new();

        if dimensions.iter().any(|(_, s)| s.score == 5) {
            floors.push(TierFloor {
                reason: "a dimension scored 5",
                tier: RiskTier::High,
            });
        }
        if governance == GovernanceStatus::ShadowAi {
            floors.push(TierFloor {
                reason: "the tool is Shadow AI",
                tier: RiskTier::High,
            });
        }
        if dimensions.data_sensitivity.score == 5 && dimensions.human_oversight.score >= 4 {
            floors.push(TierFloor {
                reason: "data_sensitivity is 5 with human_oversight of 4 or more",
                tier: RiskTier::Critical,
            });
        }

        Self {
            average,
            bucket: RiskTier::from_average(average),
            floors,
        }
    }

    /// Highest applicable floor, if any.
    pub fn floor(&self) -> Option<TierFloor> {
        self.floors.iter().copied().max_by_key(|f| f.tier)
    }

    /// The tier the classification must declare.
    pub fn expected(&self) -> RiskTier {
        self.floor().map_or(self.bucket, |f| f.tier.max(self.bucket))
    }
}

/// Cross-field rules for a risk classification.
pub struct ClassificationRules;

impl RuleCheck for ClassificationRules {
    type Artifact = RiskClassification;
    type Upstream = ClassificationInputs;

    fn name(&self) -> &str {
        "Classification Rules"
    }

    fn check(&self, candidate: &RiskClassification, upstream: &ClassificationInputs) -> ViolationReport {
        let mut report = ViolationReport::new();

        check_tool_name(
            &mut report,
            rules::TOOL_NAME,
            &candidate.tool_name,
            &upstream.profile.tool_name,
        );

        for (dimension, score) in candidate.dimensions.iter() {
            let expected = score.expected_score();
            if i128::from(score.score) != expected {
                report.push(
                    rules::SCORE_ARITHMETIC,
                    format!(
                        "dimensions.{}.score is {} but base_score {} plus modifiers gives {}",
                        dimension.key(),
                        score.score,
                        score.base_score,
                        expected
                    ),
                );
            }
        }

        let assessment = TierAssessment::compute(&candidate.dimensions, upstream.profile.governance_status);
        if (candidate.overall_average - assessment.average).abs() > AVERAGE_TOLERANCE {
            report.push(
                rules::AVERAGE,
                format!(
                    "overall_average {} does not equal the mean of the four dimension scores ({:.2})",
                    candidate.overall_average, assessment.average
                ),
            );
        }

        let expected = assessment.expected();
        match assessment.floor() {
            Some(floor) if candidate.risk_tier < floor.tier => {
                report.push(
                    rules::TIER_FLOOR,
                    format!(
                        "risk_tier {} is below the minimum tier {} because {}",
                        candidate.risk_tier, floor.tier, floor.reason
                    ),
                );
            }
            _ => {
                if candidate.risk_tier != expected {
                    report.push(
                        rules::TIER,
                        format!(
                            "risk_tier {} does not match the expected tier {} (average {:.2} buckets to {})",
                            candidate.risk_tier, expected, assessment.average, assessment.bucket
                        ),
                    );
                }
            }
        }

        check_enrichment(candidate, upstream, &mut report);

        report
    }
}

fn check_enrichment(
    candidate: &RiskClassification,
    upstream: &ClassificationInputs,
    report: &mut ViolationReport,
) {
    let e = &candidate.enrichment;
    if u128::from(e.answered) + u128::from(e.unanswered) != u128::from(e.total_questions) {
        report.push(
            rules::ENRICHMENT,
            format!(
                "enrichment answered ({}) + unanswered ({}) does not equal total_questions ({})",
                e.answered, e.unanswered, e.total_questions
            ),
        );
    }

    let asked = upstream.intake.questionnaire.len() as u64;
    if e.total_questions != asked {
        report.push(
            rules::ENRICHMENT,
            format!(
                "enrichment.total_questions is {} but the intake questionnaire has {} questions",
                e.total_questions, asked
            ),
        );
    }
    let answered = upstream.intake.answered_count();
    if e.answered != answered {
        report.push(
            rules::ENRICHMENT,
            format!(
                "enrichment.answered is {} but the intake has {} answered questions",
                e.answered, answered
            ),
        );
    }

    let majority_answered = u128::from(e.answered) * 2 >= u128::from(e.total_questions);
    let all_answered = e.total_questions > 0 && e.answered == e.total_questions;
    if candidate.confidence == Confidence::High && !majority_answered {
        report.push(
            rules::CONFIDENCE,
            format!(
                "confidence High requires at least half of the questions answered ({} of {})",
                e.answered, e.total_questions
            ),
        );
    }
    if all_answered && candidate.confidence != Confidence::High {
        report.push(
            rules::CONFIDENCE,
            format!(
                "confidence must be High when all {} questions were answered",
                e.total_questions
            ),
        );
    }
}
