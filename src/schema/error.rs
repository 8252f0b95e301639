//! Error types for schema reflection

use thiserror::Error;

/// Errors raised while reflecting a schema into form metadata.
///
/// These are programmer errors in the schema declaration itself; they fail
/// fast and are not recoverable at runtime.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The metadata builder received something other than an
    /// (possibly effects-wrapped) object schema
    #[error("unsupported schema type: expected an object schema, found {0}")]
    UnsupportedSchemaType(String),

    /// A field's base type, after unwrapping, is not a recognized
    /// primitive or enum kind
    #[error("unsupported field type for '{field}': {reason}")]
    UnsupportedFieldType { field: String, reason: String },

    /// Two union variants declare the same discriminator value
    #[error("duplicate discriminator value '{value}' in union schema")]
    DuplicateVariant { value: String },
}
