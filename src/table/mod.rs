//! Table runtime
//!
//! Derives read-only column definitions from the same field metadata the
//! form runtime uses, and manages the tabular UI state around them: row
//! selection, client-side sorting, column reordering/visibility and the
//! layout persisted per technical table name.

pub mod actions;
pub mod column;
pub mod layout;
pub mod runtime;

pub use column::{CellContent, CellRenderer, HeaderMapper, TableColumn};
pub use layout::ColumnLayout;
pub use runtime::{Row, SelectionState, SortDirection, SortSpec, TableBuilder, TableRuntime};
