//! Typed artifacts for every pipeline stage and the inputs that feed them.
//!
//! Field names are the JSON keys the generator must produce. Shapes here are
//! permissive: ranges, enums and minimum lengths are enforced by
//! the schema validator before a tree is ever mapped onto these types.

pub mod board;
pub mod classification;
pub mod flags;
pub mod inputs;
pub mod profile;
pub mod remediation;

pub use board::{
    BoardSummary, ChartData, ChartSeries, FindingEntry, GovernanceBuckets, LeadershipActions,
    OptionalSection, PortfolioSnapshot, RecommendationStatusBuckets, TierBuckets, ToolTableRow,
};
pub use classification::{Dimension, DimensionScore, Dimensions, Enrichment, Modifier, RiskClassification};
pub use flags::{Flag, FlagReport, FlagSummary};
pub use inputs::{
    ClassificationInputs, FlagInputs, Portfolio, QuestionnaireItem, RemediationInputs, ToolAssessment,
    ToolIntake,
};
pub use profile::ToolProfile;
pub use remediation::{PhaseEntry, PlanSummary, Recommendation, RemediationPlan, Strategy};
