//! Derived form-field metadata
//!
//! The reflection output consumed by both the form and table runtimes: a
//! deterministic, order-preserving mapping from field name to its derived
//! editable shape. Computed once per schema; never persisted.

pub mod builder;
pub mod union;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use union::DiscriminatedFieldMap;

/// Abstract input kind for one editable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    String,
    Number,
    Boolean,
    Select,
    Datetime,
}

impl InputKind {
    /// Lowercase name of the kind, for messages and payloads
    pub fn kind_name(&self) -> &'static str {
        match self {
            InputKind::String => "string",
            InputKind::Number => "number",
            InputKind::Boolean => "boolean",
            InputKind::Select => "select",
            InputKind::Datetime => "datetime",
        }
    }
}

/// One option of a select control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// Derived, UI-agnostic description of one schema field's editable shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub kind: InputKind,
    pub required: bool,
    /// Ordered options for select kinds; empty otherwise
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Schema-level default value, when one is declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Ordered field-name → [`FormField`] mapping for one object shape.
///
/// Iteration follows the shape's declaration order. Lookups are linear; the
/// field count of an admin form is small.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FieldMetadata {
    pub(crate) entries: Vec<(String, FormField)>,
}

impl FieldMetadata {
    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, form_field)| form_field)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormField)> {
        self.entries
            .iter()
            .map(|(name, field)| (name.as_str(), field))
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static ERROR_ID_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static pattern"));

/// Stable identifier for a field's inline error message.
///
/// Lowercases the field name, collapses non-alphanumeric runs to `-` and
/// appends `-error`; the result is usable as a DOM id and addressable from
/// tests.
///
/// # Examples
///
/// ```rust
/// use schema_forms_sdk::field_error_id;
///
/// assert_eq!(field_error_id("brand_name"), "brand-name-error");
/// assert_eq!(field_error_id("Created At"), "created-at-error");
/// ```
pub fn field_error_id(field: &str) -> String {
    let lowered = field.to_lowercase();
    let slug = ERROR_ID_SEPARATORS.replace_all(&lowered, "-");
    format!("{}-error", slug.trim_matches('-'))
}
