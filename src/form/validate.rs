//! Value validation against derived field metadata

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::fields::{FieldMetadata, FormField, InputKind};

use super::state::FieldError;

/// Validate the active value set against the active field metadata.
///
/// Required fields must be present and non-null; cleared (`null`) values are
/// accepted for every non-required field. Errors come back in field
/// declaration order.
pub(crate) fn validate_values(
    metadata: &FieldMetadata,
    values: &Map<String, Value>,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for (name, field) in metadata.iter() {
        match values.get(name) {
            None | Some(Value::Null) if field.required => {
                errors.push(FieldError::new(name, "this field is required"));
            }
            None | Some(Value::Null) => {}
            Some(value) => {
                if let Some(message) = check_kind(field, value) {
                    errors.push(FieldError::new(name, message));
                }
            }
        }
    }

    errors
}

fn check_kind(field: &FormField, value: &Value) -> Option<String> {
    match field.kind {
        InputKind::String => (!value.is_string())
            .then(|| format!("expected a string, got {}", json_type(value))),
        InputKind::Number => (!value.is_number())
            .then(|| format!("expected a number, got {}", json_type(value))),
        InputKind::Boolean => (!value.is_boolean())
            .then(|| format!("expected a boolean, got {}", json_type(value))),
        InputKind::Select => match value.as_str() {
            Some(chosen) if field.options.iter().any(|o| o.value == chosen) => None,
            Some(chosen) => Some(format!("'{}' is not one of the allowed options", chosen)),
            None => Some(format!(
                "expected one of the allowed options, got {}",
                json_type(value)
            )),
        },
        InputKind::Datetime => match value.as_str() {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .err()
                .map(|e| format!("invalid datetime: {}", e)),
            None => Some(format!(
                "expected an RFC 3339 datetime string, got {}",
                json_type(value)
            )),
        },
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
