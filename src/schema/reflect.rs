//! Reflection from field schemas to abstract input kinds
//!
//! Unwraps modifier layers to reach the base type, classifies it into
//! exactly one input kind and extracts enum options. Derivation is a pure
//! function of the schema: the same node always yields the same field.

use serde_json::Value;

use crate::fields::{FormField, InputKind, SelectOption};

use super::error::SchemaError;
use super::node::SchemaNode;

/// A field schema with its wrapper layers peeled off
#[derive(Debug, Clone, PartialEq)]
pub struct Unwrapped<'a> {
    /// The base node underneath all wrappers
    pub base: &'a SchemaNode,
    /// False when an optional or nullable marker appears anywhere in the
    /// wrapper chain; wrapping order is irrelevant
    pub required: bool,
    /// Outermost schema-level default, when one is declared
    pub default: Option<&'a Value>,
}

/// Peel optional/nullable/default/effects wrappers off a field schema.
pub fn unwrap_field(node: &SchemaNode) -> Unwrapped<'_> {
    let mut current = node;
    let mut required = true;
    let mut default = None;

    loop {
        match current {
            SchemaNode::Optional(inner) | SchemaNode::Nullable(inner) => {
                required = false;
                current = inner;
            }
            SchemaNode::WithDefault { inner, value } => {
                if default.is_none() {
                    default = Some(value);
                }
                current = inner;
            }
            SchemaNode::Effects(inner) => current = inner,
            _ => break,
        }
    }

    Unwrapped {
        base: current,
        required,
        default,
    }
}

/// Classify an unwrapped base node into its input kind.
///
/// Returns `None` for composites and anything else that has no single form
/// control.
pub fn classify(base: &SchemaNode) -> Option<InputKind> {
    match base {
        SchemaNode::String => Some(InputKind::String),
        SchemaNode::Number => Some(InputKind::Number),
        SchemaNode::Boolean => Some(InputKind::Boolean),
        SchemaNode::Date => Some(InputKind::Datetime),
        SchemaNode::Enum { .. } => Some(InputKind::Select),
        _ => None,
    }
}

/// Reflect a single field schema into its derived form field.
///
/// Enum options preserve declaration order with label == value. Nested
/// objects and unions are rejected; there is no recursive form generation.
pub fn reflect_field(name: &str, node: &SchemaNode) -> Result<FormField, SchemaError> {
    let unwrapped = unwrap_field(node);

    let kind = classify(unwrapped.base).ok_or_else(|| SchemaError::UnsupportedFieldType {
        field: name.to_string(),
        reason: format!(
            "base type '{}' has no form control",
            unwrapped.base.type_name()
        ),
    })?;

    let options = match unwrapped.base {
        SchemaNode::Enum { values } => values
            .iter()
            .map(|value| SelectOption {
                label: value.clone(),
                value: value.clone(),
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(FormField {
        kind,
        required: unwrapped.required,
        options,
        default: unwrapped.default.cloned(),
    })
}
