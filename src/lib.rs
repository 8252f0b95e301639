//! Schema Forms SDK - Schema-driven form and table runtime for admin panels
//!
//! Provides unified building blocks for:
//! - Declarative entity schemas (objects and discriminated unions)
//! - Reflection of schemas into form-field metadata
//! - Form runtime (defaults, clear-to-null, variant switching, submit)
//! - Table runtime (derived columns, selection, sorting, persisted layout)
//! - Layout persistence backends

pub mod config;
pub mod fields;
pub mod form;
pub mod schema;
pub mod storage;
pub mod table;

// Re-export commonly used types
pub use schema::{ObjectSchema, SchemaError, SchemaNode, UnionSchema, VariantTag};

pub use fields::{
    DiscriminatedFieldMap, FieldMetadata, FormField, InputKind, SelectOption, field_error_id,
};

pub use config::{Control, DisplayKind, FieldConfig, FieldRenderer, FormConfig, LabelMapper};

pub use form::{
    FieldError, FormError, FormPhase, FormRuntime, MutationError, ResolvedField, SubmitHandler,
    SubmitOutcome,
};

pub use storage::{LayoutError, LayoutStore, MemoryLayoutStore};
#[cfg(feature = "fs-layout")]
pub use storage::FileLayoutStore;

pub use table::{
    CellContent, ColumnLayout, Row, SelectionState, SortDirection, SortSpec, TableBuilder,
    TableColumn, TableRuntime,
};
pub use table::actions::{
    ActionContext, ActionController, ActionError, ActionKind, EntityActions, Notification,
    NotificationLevel,
};
