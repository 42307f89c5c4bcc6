//! Schema validation for generated artifacts.
//!
//! Every stage has a fixed shape. A candidate either matches it completely
//! and is mapped onto the typed model, or the first offending field is
//! reported.

pub mod constraint;
pub mod field;
pub mod shapes;
pub mod validator;

pub use constraint::Constraint;
pub use field::{FieldKind, FieldSpec};
pub use shapes::StageSchema;
pub use validator::SchemaValidator;
