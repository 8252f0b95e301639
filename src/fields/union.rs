//! Per-variant field metadata for discriminated unions

use tracing::debug;

use crate::schema::error::SchemaError;
use crate::schema::node::{SchemaNode, UnionSchema, VariantTag};
use crate::schema::reflect::reflect_field;

use super::FieldMetadata;

/// Field metadata for every variant of a tagged union schema.
///
/// Keys are the literal discriminator values declared per variant; each is
/// unique across the union. The discriminator field itself stays part of the
/// declared shape but is excluded from every per-variant mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatedFieldMap {
    discriminator: String,
    variants: Vec<(VariantTag, FieldMetadata)>,
}

impl DiscriminatedFieldMap {
    /// Build per-variant metadata from a union schema node.
    pub fn of_union(schema: &SchemaNode) -> Result<Self, SchemaError> {
        match schema {
            SchemaNode::Union(union) => Self::of_schema(union),
            other => Err(SchemaError::UnsupportedSchemaType(
                other.type_name().to_string(),
            )),
        }
    }

    /// Build per-variant metadata from an already-resolved union.
    pub fn of_schema(union: &UnionSchema) -> Result<Self, SchemaError> {
        let mut variants: Vec<(VariantTag, FieldMetadata)> = Vec::with_capacity(union.len());

        for (tag, shape) in union.variants() {
            if variants.iter().any(|(existing, _)| existing == tag) {
                return Err(SchemaError::DuplicateVariant {
                    value: tag.to_string(),
                });
            }

            let mut entries = Vec::with_capacity(shape.len());
            for (name, node) in shape.fields() {
                if name == union.discriminator() {
                    continue;
                }
                entries.push((name.to_string(), reflect_field(name, node)?));
            }
            variants.push((tag.clone(), FieldMetadata { entries }));
        }

        debug!(
            discriminator = union.discriminator(),
            variants = variants.len(),
            "derived discriminated field map"
        );

        Ok(Self {
            discriminator: union.discriminator().to_string(),
            variants,
        })
    }

    /// Name of the field whose literal value selects the active variant
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    pub fn get(&self, tag: &VariantTag) -> Option<&FieldMetadata> {
        self.variants
            .iter()
            .find(|(candidate, _)| candidate == tag)
            .map(|(_, metadata)| metadata)
    }

    /// Variant tags in declaration order
    pub fn tags(&self) -> impl Iterator<Item = &VariantTag> {
        self.variants.iter().map(|(tag, _)| tag)
    }

    /// Per-variant metadata in declaration order
    pub fn variants(&self) -> impl Iterator<Item = (&VariantTag, &FieldMetadata)> {
        self.variants
            .iter()
            .map(|(tag, metadata)| (tag, metadata))
    }

    /// Find the declared tag matching a raw discriminator value
    pub fn tag_matching(&self, value: &serde_json::Value) -> Option<&VariantTag> {
        self.tags().find(|tag| tag.matches(value))
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
