//! Schema tree for entity attributes
//!
//! Declares the tagged-variant schema node and the object/union composites
//! built from it. Nodes are immutable once defined and carry no UI concerns.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One node in a declarative field schema.
///
/// Wrappers nest around a base leaf; reflection peels them off to find the
/// primitive underneath.
///
/// # Example
///
/// ```rust
/// use schema_forms_sdk::SchemaNode;
///
/// let age = SchemaNode::number().optional();
/// let role = SchemaNode::enumeration(["admin", "user"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaNode {
    /// Free-form text
    String,
    /// Numeric value (integer or float)
    Number,
    /// Boolean flag
    Boolean,
    /// Point in time, carried as an RFC 3339 string
    Date,
    /// Enumerated string values, in declaration order
    Enum { values: Vec<String> },
    /// Field may be left unset
    Optional(Box<SchemaNode>),
    /// Field accepts an explicit null
    Nullable(Box<SchemaNode>),
    /// Field carries a schema-level default value
    WithDefault { inner: Box<SchemaNode>, value: Value },
    /// Refinement/transform wrapper that leaves the base type unchanged
    Effects(Box<SchemaNode>),
    /// Nested object shape
    Object(ObjectSchema),
    /// Tagged union of object variants
    Union(UnionSchema),
}

impl SchemaNode {
    pub fn string() -> Self {
        Self::String
    }

    pub fn number() -> Self {
        Self::Number
    }

    pub fn boolean() -> Self {
        Self::Boolean
    }

    pub fn date() -> Self {
        Self::Date
    }

    /// Enumerated values, preserving declaration order
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Wrap this node so the field may be left unset
    pub fn optional(self) -> Self {
        Self::Optional(Box::new(self))
    }

    /// Wrap this node so the field accepts an explicit null
    pub fn nullable(self) -> Self {
        Self::Nullable(Box::new(self))
    }

    /// Attach a schema-level default value
    pub fn with_default(self, value: impl Into<Value>) -> Self {
        Self::WithDefault {
            inner: Box::new(self),
            value: value.into(),
        }
    }

    /// Wrap this node in a refinement/transform marker
    pub fn effects(self) -> Self {
        Self::Effects(Box::new(self))
    }

    /// Name of the node variant, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaNode::String => "string",
            SchemaNode::Number => "number",
            SchemaNode::Boolean => "boolean",
            SchemaNode::Date => "date",
            SchemaNode::Enum { .. } => "enum",
            SchemaNode::Optional(_) => "optional",
            SchemaNode::Nullable(_) => "nullable",
            SchemaNode::WithDefault { .. } => "default",
            SchemaNode::Effects(_) => "effects",
            SchemaNode::Object(_) => "object",
            SchemaNode::Union(_) => "union",
        }
    }
}

/// Ordered field shape of one object schema.
///
/// Declaration order is preserved; reflection iterates fields in the order
/// they were added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ObjectSchema {
    fields: Vec<(String, SchemaNode)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field to the shape
    pub fn field(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.fields.push((name.into(), node));
        self
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Promote this shape to a schema node
    pub fn into_node(self) -> SchemaNode {
        SchemaNode::Object(self)
    }
}

/// Literal discriminator value selecting one union variant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantTag {
    Str(String),
    Int(i64),
}

impl VariantTag {
    /// The tag as a JSON value, for discriminator fields in payloads
    pub fn as_value(&self) -> Value {
        match self {
            VariantTag::Str(s) => Value::String(s.clone()),
            VariantTag::Int(n) => Value::Number((*n).into()),
        }
    }

    /// Match a JSON value against this tag
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            VariantTag::Str(s) => value.as_str() == Some(s.as_str()),
            VariantTag::Int(n) => value.as_i64() == Some(*n),
        }
    }
}

impl fmt::Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantTag::Str(s) => write!(f, "{}", s),
            VariantTag::Int(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for VariantTag {
    fn from(value: &str) -> Self {
        VariantTag::Str(value.to_string())
    }
}

impl From<String> for VariantTag {
    fn from(value: String) -> Self {
        VariantTag::Str(value)
    }
}

impl From<i64> for VariantTag {
    fn from(value: i64) -> Self {
        VariantTag::Int(value)
    }
}

/// Tagged union of object variants with a named discriminator field.
///
/// The discriminator field may appear in each variant's declared shape; the
/// derived per-variant metadata excludes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionSchema {
    discriminator: String,
    variants: Vec<(VariantTag, ObjectSchema)>,
}

impl UnionSchema {
    pub fn new(discriminator: impl Into<String>) -> Self {
        Self {
            discriminator: discriminator.into(),
            variants: Vec::new(),
        }
    }

    /// Append a variant keyed by its literal discriminator value
    pub fn variant(mut self, tag: impl Into<VariantTag>, shape: ObjectSchema) -> Self {
        self.variants.push((tag.into(), shape));
        self
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Variants in declaration order
    pub fn variants(&self) -> impl Iterator<Item = (&VariantTag, &ObjectSchema)> {
        self.variants.iter().map(|(tag, shape)| (tag, shape))
    }

    pub fn get(&self, tag: &VariantTag) -> Option<&ObjectSchema> {
        self.variants
            .iter()
            .find(|(candidate, _)| candidate == tag)
            .map(|(_, shape)| shape)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Promote this union to a schema node
    pub fn into_node(self) -> SchemaNode {
        SchemaNode::Union(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_preserves_declaration_order() {
        let schema = ObjectSchema::new()
            .field("name", SchemaNode::string())
            .field("age", SchemaNode::number())
            .field("active", SchemaNode::boolean());

        let names: Vec<&str> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["name", "age", "active"]);
    }

    #[test]
    fn test_wrapper_builders_nest() {
        let node = SchemaNode::string().nullable().optional();
        match node {
            SchemaNode::Optional(inner) => match *inner {
                SchemaNode::Nullable(base) => assert_eq!(*base, SchemaNode::String),
                other => panic!("expected nullable, got {}", other.type_name()),
            },
            other => panic!("expected optional, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_variant_tag_matches_json_values() {
        let truck = VariantTag::from("truck");
        assert!(truck.matches(&json!("truck")));
        assert!(!truck.matches(&json!("car")));

        let two = VariantTag::from(2);
        assert!(two.matches(&json!(2)));
        assert!(!two.matches(&json!("2")));
    }

    #[test]
    fn test_union_lookup_by_tag() {
        let union = UnionSchema::new("type")
            .variant("car", ObjectSchema::new().field("brand_name", SchemaNode::string()))
            .variant("truck", ObjectSchema::new().field("capacity_count", SchemaNode::number()));

        assert_eq!(union.discriminator(), "type");
        assert!(union.get(&"car".into()).is_some());
        assert!(union.get(&"bike".into()).is_none());
    }
}
