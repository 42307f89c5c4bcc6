//! Field descriptors that make up a stage schema.

use crate::schema::constraint::Constraint;
use std::fmt;

/// Expected JSON kind of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    /// Whole number.
    Integer,
    /// Any JSON number.
    Number,
    Boolean,
    /// String restricted to a closed set of labels.
    Enum(&'static [&'static str]),
    Object(Vec<FieldSpec>),
    /// Array whose elements all match the inner spec (its name is unused).
    Array(Box<FieldSpec>),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::Enum(options) => write!(f, "one of [{}]", options.join(", ")),
            FieldKind::Object(_) => write!(f, "object"),
            FieldKind::Array(_) => write!(f, "array"),
        }
    }
}

/// Definition of a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// Whether the field must be present and non-null.
    pub required: bool,
    pub constraints: Vec<Constraint>,
}

// ============================================================================
// FieldSpec Builder Pattern
// ============================================================================

impl FieldSpec {
    /// Create a required field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            constraints: Vec::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn enumeration(name: impl Into<String>, options: &'static [&'static str]) -> Self {
        Self::new(name, FieldKind::Enum(options))
    }

    pub fn object(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self::new(name, FieldKind::Object(fields))
    }

    /// Array of elements described by `item`.
    pub fn array(name: impl Into<String>, item: FieldSpec) -> Self {
        Self::new(name, FieldKind::Array(Box::new(item)))
    }

    /// Array of strings, each at least one character long.
    pub fn string_list(name: impl Into<String>) -> Self {
        Self::array(name, FieldSpec::string("item").with_constraint(Constraint::NotEmpty))
    }

    /// Mark this field as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Add a range constraint.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.constraints.push(Constraint::Range { min, max });
        self
    }

    /// Add a minimum value constraint.
    pub fn with_min(mut self, min: f64) -> Self {
        self.constraints.push(Constraint::MinValue(min));
        self
    }

    /// Require a non-negative count.
    pub fn non_negative(self) -> Self {
        self.with_min(0.0)
    }

    /// Add a minimum string length constraint.
    pub fn min_length(mut self, min: usize) -> Self {
        self.constraints.push(Constraint::MinLength(min));
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// One-line outline of this field for generator instructions.
    pub fn outline(&self, indent: usize, out: &mut String) {
        let pad = "  ".repeat(indent);
        let optional = if self.required { "" } else { " (optional)" };
        let mut notes: Vec<String> = self
            .constraints
            .iter()
            .map(|c| match c {
                Constraint::Range { min, max } => format!("{}..={}", min, max),
                Constraint::MinValue(min) => format!(">= {}", min),
                Constraint::MinLength(n) => format!("min {} chars", n),
                Constraint::NotEmpty => "non-empty".to_string(),
                Constraint::MinItems(n) => format!("min {} items", n),
            })
            .collect();
        match &self.kind {
            FieldKind::Object(fields) => {
                out.push_str(&format!("{}{}: object{}\n", pad, self.name, optional));
                for field in fields {
                    field.outline(indent + 1, out);
                }
            }
            FieldKind::Array(item) => {
                notes.extend(item.constraints.iter().map(|c| format!("items {:?}", c)));
                let suffix = note_suffix(&notes);
                match &item.kind {
                    FieldKind::Object(fields) => {
                        out.push_str(&format!("{}{}: array of object{}{}\n", pad, self.name, optional, suffix));
                        for field in fields {
                            field.outline(indent + 1, out);
                        }
                    }
                    kind => {
                        out.push_str(&format!("{}{}: array of {}{}{}\n", pad, self.name, kind, optional, suffix));
                    }
                }
            }
            kind => {
                out.push_str(&format!("{}{}: {}{}{}\n", pad, self.name, kind, optional, note_suffix(&notes)));
            }
        }
    }
}

fn note_suffix(notes: &[String]) -> String {
    if notes.is_empty() {
        String::new()
    } else {
        format!(" [{}]", notes.join(", "))
    }
}
