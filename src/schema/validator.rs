//! Structural validation of generated value trees.

use crate::core::error::{StructuralError, StructuralErrorKind};
use crate::schema::field::{FieldKind, FieldSpec};
use crate::schema::shapes::StageSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Walks a value tree against a stage schema and stops at the first problem.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Check the tree without mapping it onto a type.
    pub fn validate(value: &Value, schema: &StageSchema) -> Result<(), StructuralError> {
        match value {
            Value::Object(_) => check_fields(value, &schema.fields, ""),
            other => Err(StructuralError::new(
                StructuralErrorKind::TypeMismatch,
                "$",
                "object",
                kind_name(other),
            )),
        }
    }

    /// Check the tree and, if it conforms, deserialize it into `T`.
    pub fn check<T: DeserializeOwned>(value: &Value, schema: &StageSchema) -> Result<T, StructuralError> {
        Self::validate(value, schema)?;
        serde_json::from_value(value.clone()).map_err(|e| {
            StructuralError::new(
                StructuralErrorKind::Deserialize,
                "$",
                format!("a {} artifact", schema.stage),
                e.to_string(),
            )
        })
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn check_fields(object: &Value, fields: &[FieldSpec], path: &str) -> Result<(), StructuralError> {
    for field in fields {
        let field_path = join(path, &field.name);
        match object.get(&field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    return Err(StructuralError::new(
                        StructuralErrorKind::MissingField,
                        field_path,
                        format!("required {}", field.kind),
                        "nothing",
                    ));
                }
            }
            Some(value) => check_value(value, field, &field_path)?,
        }
    }
    Ok(())
}

fn check_value(value: &Value, field: &FieldSpec, path: &str) -> Result<(), StructuralError> {
    let type_ok = match &field.kind {
        FieldKind::String | FieldKind::Enum(_) => value.is_string(),
        FieldKind::Integer => value.is_i64() || value.is_u64(),
        FieldKind::Number => value.is_number(),
        FieldKind::Boolean => value.is_boolean(),
        FieldKind::Object(_) => value.is_object(),
        FieldKind::Array(_) => value.is_array(),
    };
    if !type_ok {
        return Err(StructuralError::new(
            StructuralErrorKind::TypeMismatch,
            path,
            field.kind.to_string(),
            describe(value),
        ));
    }

    if let FieldKind::Enum(options) = &field.kind {
        let label = value.as_str().unwrap_or_default();
        if !options.contains(&label) {
            return Err(StructuralError::new(
                StructuralErrorKind::InvalidEnum,
                path,
                field.kind.to_string(),
                format!("\"{}\"", label),
            ));
        }
    }

    for constraint in &field.constraints {
        constraint
            .validate(value)
            .map_err(|f| StructuralError::new(f.kind, path, f.expected, f.actual))?;
    }

    match &field.kind {
        FieldKind::Object(fields) => check_fields(value, fields, path),
        FieldKind::Array(item) => {
            if let Some(items) = value.as_array() {
                for (i, element) in items.iter().enumerate() {
                    let element_path = format!("{}[{}]", path, i);
                    if element.is_null() {
                        return Err(StructuralError::new(
                            StructuralErrorKind::TypeMismatch,
                            element_path,
                            item.kind.to_string(),
                            "null",
                        ));
                    }
                    check_value(element, item, &element_path)?;
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Kind plus a short rendering of scalar values.
fn describe(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) | Value::Null => kind_name(value).to_string(),
        scalar => format!("{} {}", kind_name(value), scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::StageId;
    use crate::model::ToolProfile;
    use serde_json::json;

    fn profile_json() -> Value {
        json!({
            "tool_name": "CodePilot",
            "vendor": "Acme AI",
            "category": "Code Assistant",
            "description": "AI pair programmer used by the platform team.",
            "governance_status": "Partially Managed",
            "data_types_processed": ["source code"],
            "departments": ["Engineering"],
            "user_count": 120
        })
    }

    #[test]
    fn test_valid_profile_deserializes() {
        let schema = StageSchema::for_stage(StageId::ToolProfile);
        let profile: ToolProfile = SchemaValidator::check(&profile_json(), &schema).unwrap();
        assert_eq!(profile.tool_name, "CodePilot");
        assert_eq!(profile.user_count, 120);
    }

    #[test]
    fn test_missing_field_names_path() {
        let schema = StageSchema::for_stage(StageId::ToolProfile);
        let mut value = profile_json();
        value.as_object_mut().unwrap().remove("vendor");

        let err = SchemaValidator::validate(&value, &schema).unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::MissingField);
        assert_eq!(err.path, "vendor");
    }

    #[test]
    fn test_invalid_enum() {
        let schema = StageSchema::for_stage(StageId::ToolProfile);
        let mut value = profile_json();
        value["governance_status"] = json!("Sort of Managed");

        let err = SchemaValidator::validate(&value, &schema).unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::InvalidEnum);
        assert_eq!(err.actual, "\"Sort of Managed\"");
        assert!(err.expected.contains("Shadow AI"));
    }

    #[test]
    fn test_placeholder_text_rejected() {
        let schema = StageSchema::for_stage(StageId::ToolProfile);
        let mut value = profile_json();
        value["description"] = json!("TBD");

        let err = SchemaValidator::validate(&value, &schema).unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::TooShort);
        assert_eq!(err.path, "description");
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let schema = StageSchema::for_stage(StageId::ToolProfile);
        let mut value = profile_json();
        value["user_count"] = json!(12.5);

        let err = SchemaValidator::validate(&value, &schema).unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::TypeMismatch);
        assert_eq!(err.actual, "number 12.5");
    }

    #[test]
    fn test_nested_array_path() {
        let schema = StageSchema::for_stage(StageId::ToolProfile);
        let mut value = profile_json();
        value["departments"] = json!(["Engineering", 7]);

        let err = SchemaValidator::validate(&value, &schema).unwrap_err();
        assert_eq!(err.path, "departments[1]");
    }

    #[test]
    fn test_non_object_root() {
        let schema = StageSchema::for_stage(StageId::ToolProfile);
        let err = SchemaValidator::validate(&json!([1, 2]), &schema).unwrap_err();
        assert_eq!(err.path, "$");
        assert_eq!(err.actual, "array");
    }

    #[test]
    fn test_first_offending_field_only() {
        let schema = StageSchema::for_stage(StageId::ToolProfile);
        let mut value = profile_json();
        value["vendor"] = json!(3);
        value["user_count"] = json!(-1);

        let err = SchemaValidator::validate(&value, &schema).unwrap_err();
        assert_eq!(err.path, "vendor");
    }
}
