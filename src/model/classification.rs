//! Risk classification artifact.

use crate::core::types::{Confidence, RiskTier};
use serde::{Deserialize, Serialize};

/// Adjustment applied on top of a base dimension score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub factor: String,
    pub adjustment: i64,
}

/// One of the four 1–5 risk sub-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: i64,
    pub base_score: i64,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub justification: String,
}

impl DimensionScore {
    /// `base_score` plus every modifier adjustment.
    pub fn expected_score(&self) -> i128 {
        let adjustments: i128 = self.modifiers.iter().map(|m| i128::from(m.adjustment)).sum();
        i128::from(self.base_score) + adjustments
    }
}

/// Names of the four scored dimensions, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    DataSensitivity,
    DecisionImpact,
    VendorRisk,
    HumanOversight,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::DataSensitivity,
        Dimension::DecisionImpact,
        Dimension::VendorRisk,
        Dimension::HumanOversight,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Dimension::DataSensitivity => "data_sensitivity",
            Dimension::DecisionImpact => "decision_impact",
            Dimension::VendorRisk => "vendor_risk",
            Dimension::HumanOversight => "human_oversight",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub data_sensitivity: DimensionScore,
    pub decision_impact: DimensionScore,
    pub vendor_risk: DimensionScore,
    /// Higher means weaker human oversight.
    pub human_oversight: DimensionScore,
}

impl Dimensions {
    pub fn get(&self, dimension: Dimension) -> &DimensionScore {
        match dimension {
            Dimension::DataSensitivity => &self.data_sensitivity,
            Dimension::DecisionImpact => &self.decision_impact,
            Dimension::VendorRisk => &self.vendor_risk,
            Dimension::HumanOversight => &self.human_oversight,
        }
    }

    /// Dimensions paired with their scores, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &DimensionScore)> {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Mean of the four final scores.
    pub fn mean(&self) -> f64 {
        self.iter().map(|(_, s)| s.score as f64).sum::<f64>() / Dimension::ALL.len() as f64
    }
}

/// How much of the intake questionnaire informed the classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub total_questions: u64,
    pub answered: u64,
    pub unanswered: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskClassification {
    pub tool_name: String,
    pub dimensions: Dimensions,
    pub overall_average: f64,
    pub risk_tier: RiskTier,
    pub enrichment: Enrichment,
    pub confidence: Confidence,
    pub rationale: String,
}
