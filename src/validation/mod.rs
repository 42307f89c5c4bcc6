//! Business rule validation for schema-valid artifacts.
//!
//! Each stage has one rule set implementing [`RuleCheck`]. Rule sets compare a
//! candidate with the accepted upstream artifacts and return every violation
//! found, in a stable order.

pub mod board;
pub mod classification;
pub mod flags;
pub mod profile;
pub mod remediation;
pub mod rules;

pub use board::BoardSummaryRules;
pub use classification::{ClassificationRules, TierAssessment, TierFloor};
pub use flags::FlagRules;
pub use profile::ProfileRules;
pub use remediation::RemediationRules;
pub use rules::{expected_percentage, percentage_matches, RuleCheck};
