//! Declarative entity schemas
//!
//! A schema is an explicit tree of [`SchemaNode`] values: primitive leaves,
//! modifier wrappers (optional, nullable, default, effects) and the two
//! composites an admin panel edits — object shapes and discriminated unions.
//! Reflection walks this tree to derive UI-agnostic field metadata; nothing
//! here depends on how a host renders controls.

pub mod error;
pub mod node;
pub mod reflect;

pub use error::SchemaError;
pub use node::{ObjectSchema, SchemaNode, UnionSchema, VariantTag};
pub use reflect::{Unwrapped, classify, reflect_field, unwrap_field};
