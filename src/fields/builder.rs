//! Field metadata derivation for object schemas

use tracing::debug;

use crate::schema::error::SchemaError;
use crate::schema::node::{ObjectSchema, SchemaNode};
use crate::schema::reflect::reflect_field;

use super::FieldMetadata;

impl FieldMetadata {
    /// Derive metadata for every declared field of an object schema.
    ///
    /// Effects wrappers around the object itself are transparent; any other
    /// root (primitives, unions, optional-wrapped objects) is rejected with
    /// [`SchemaError::UnsupportedSchemaType`]. Nested object fields fail with
    /// [`SchemaError::UnsupportedFieldType`].
    pub fn of_object(schema: &SchemaNode) -> Result<Self, SchemaError> {
        let shape = unwrap_object(schema)?;
        Self::of_shape(shape)
    }

    /// Derive metadata for an already-resolved object shape.
    pub fn of_shape(shape: &ObjectSchema) -> Result<Self, SchemaError> {
        let mut entries = Vec::with_capacity(shape.len());
        for (name, node) in shape.fields() {
            let field = reflect_field(name, node)?;
            entries.push((name.to_string(), field));
        }
        debug!(fields = entries.len(), "derived field metadata");
        Ok(Self { entries })
    }
}

/// Peel effects wrappers and require an object shape underneath.
fn unwrap_object(schema: &SchemaNode) -> Result<&ObjectSchema, SchemaError> {
    let mut current = schema;
    loop {
        match current {
            SchemaNode::Object(shape) => return Ok(shape),
            SchemaNode::Effects(inner) => current = inner,
            other => {
                return Err(SchemaError::UnsupportedSchemaType(
                    other.type_name().to_string(),
                ));
            }
        }
    }
}
