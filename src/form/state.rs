//! Form state machine primitives

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::field_error_id;
use crate::schema::VariantTag;

/// Lifecycle phase of one form render.
///
/// `Idle` until mounted, then `Editing`; `Submitting` while validation and
/// the submit callback run; terminal `Submitted`, or back to `Editing` with
/// validation errors attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormPhase {
    #[default]
    Idle,
    Editing,
    Submitting,
    Submitted,
}

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    /// Stable identifier derived from the field name, for UI and tests
    pub id: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            id: field_error_id(&field),
            field,
            message: message.into(),
        }
    }
}

/// Mutable state of one mounted form.
///
/// The value map distinguishes *unset* (key absent) from *cleared*
/// (`Value::Null`). Lifecycle is bound to one render: created on mount,
/// discarded on unmount or submit.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub phase: FormPhase,
    pub values: Map<String, Value>,
    pub errors: Vec<FieldError>,
    pub selected_variant: Option<VariantTag>,
}
