//! Value constraints for schema fields.
//!
//! Constraints are checked after the field's type has been confirmed, so each
//! variant only needs to handle the JSON kinds it applies to.

use crate::core::error::StructuralErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A constraint that a field value must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Constraint {
    /// Numeric value must be within range [min, max]
    Range { min: f64, max: f64 },
    /// Numeric value must be >= min
    MinValue(f64),
    /// String length (in characters) must be >= min
    MinLength(usize),
    /// String must contain something other than whitespace
    NotEmpty,
    /// Array must hold at least this many items
    MinItems(usize),
}

/// Why a value failed a constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintFailure {
    pub kind: StructuralErrorKind,
    pub expected: String,
    pub actual: String,
}

impl ConstraintFailure {
    fn new(kind: StructuralErrorKind, expected: String, actual: String) -> Self {
        Self {
            kind,
            expected,
            actual,
        }
    }
}

impl Constraint {
    /// Check a value against this constraint.
    pub fn validate(&self, value: &Value) -> Result<(), ConstraintFailure> {
        match self {
            Constraint::Range { min, max } => {
                if let Some(n) = value.as_f64() {
                    if n < *min || n > *max {
                        return Err(ConstraintFailure::new(
                            StructuralErrorKind::OutOfRange,
                            format!("a number in [{}, {}]", min, max),
                            n.to_string(),
                        ));
                    }
                }
            }
            Constraint::MinValue(min) => {
                if let Some(n) = value.as_f64() {
                    if n < *min {
                        return Err(ConstraintFailure::new(
                            StructuralErrorKind::OutOfRange,
                            format!("a number >= {}", min),
                            n.to_string(),
                        ));
                    }
                }
            }
            Constraint::MinLength(min) => {
                if let Some(s) = value.as_str() {
                    let len = s.chars().count();
                    if len < *min {
                        return Err(ConstraintFailure::new(
                            StructuralErrorKind::TooShort,
                            format!("a string of at least {} characters", min),
                            format!("{} characters", len),
                        ));
                    }
                }
            }
            Constraint::NotEmpty => {
                if let Some(s) = value.as_str() {
                    if s.trim().is_empty() {
                        return Err(ConstraintFailure::new(
                            StructuralErrorKind::TooShort,
                            "a non-empty string".to_string(),
                            "an empty string".to_string(),
                        ));
                    }
                }
            }
            Constraint::MinItems(min) => {
                if let Some(items) = value.as_array() {
                    if items.len() < *min {
                        return Err(ConstraintFailure::new(
                            StructuralErrorKind::TooShort,
                            format!("at least {} item(s)", min),
                            format!("{} item(s)", items.len()),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_range_constraint() {
        let c = Constraint::Range { min: 1.0, max: 5.0 };
        assert!(c.validate(&json!(1)).is_ok());
        assert!(c.validate(&json!(5)).is_ok());
        let err = c.validate(&json!(6)).unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::OutOfRange);
        assert_eq!(err.actual, "6");
    }

    #[test]
    fn test_min_length_counts_characters() {
        let c = Constraint::MinLength(10);
        assert!(c.validate(&json!("ten chars!")).is_ok());
        let err = c.validate(&json!("TBD")).unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::TooShort);
        assert!(c.validate(&json!("überprüfen")).is_ok());
    }

    #[test]
    fn test_not_empty_rejects_whitespace() {
        assert!(Constraint::NotEmpty.validate(&json!("   ")).is_err());
        assert!(Constraint::NotEmpty.validate(&json!("x")).is_ok());
    }

    #[test]
    fn test_constraints_ignore_other_kinds() {
        assert!(Constraint::MinLength(3).validate(&json!(1)).is_ok());
        assert!(Constraint::MinValue(0.0).validate(&json!("a")).is_ok());
    }
}
