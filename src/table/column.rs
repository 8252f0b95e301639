//! Column derivation and cell formatting

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::DateTime;
use serde_json::Value;

use crate::fields::{FieldMetadata, InputKind};

/// Header-text mapping function applied to field names.
pub type HeaderMapper = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Custom cell renderer for one column.
pub type CellRenderer = Arc<dyn Fn(&Value) -> CellContent + Send + Sync>;

/// Placeholder shown for null or missing values
pub const EMPTY_CELL: &str = "N/A";

/// Renderable content of one table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// Plain text
    Text(String),
    /// Status badge
    Badge(String),
    /// Markup produced by a custom renderer
    Custom(String),
}

/// One derived table column
#[derive(Clone)]
pub struct TableColumn {
    pub field: String,
    pub header: String,
    pub kind: InputKind,
    renderer: Option<CellRenderer>,
}

impl fmt::Debug for TableColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableColumn")
            .field("field", &self.field)
            .field("header", &self.header)
            .field("kind", &self.kind)
            .field("renderer", &self.renderer.as_ref().map(|_| "<renderer>"))
            .finish()
    }
}

impl TableColumn {
    /// Derive one column per non-omitted metadata field, in declaration
    /// order.
    pub(crate) fn derive(
        metadata: &FieldMetadata,
        header_mapper: Option<&HeaderMapper>,
        omitted: &[String],
        renderers: &HashMap<String, CellRenderer>,
    ) -> Vec<TableColumn> {
        metadata
            .iter()
            .filter(|(name, _)| !omitted.iter().any(|o| o == name))
            .map(|(name, field)| TableColumn {
                field: name.to_string(),
                header: header_mapper.map_or_else(|| name.to_string(), |mapper| mapper(name)),
                kind: field.kind,
                renderer: renderers.get(name).cloned(),
            })
            .collect()
    }

    /// Format one cell of this column.
    ///
    /// A custom renderer, when configured, sees every value including nulls;
    /// otherwise default formatting applies.
    pub fn cell(&self, value: Option<&Value>) -> CellContent {
        if let Some(renderer) = &self.renderer {
            return renderer(value.unwrap_or(&Value::Null));
        }
        default_cell(self.kind, value)
    }
}

/// Default cell formatting: datetimes as `YYYY-MM-DD HH:MM`, booleans as
/// badges, null and missing values as the "N/A" sentinel, everything else
/// as raw text.
pub(crate) fn default_cell(kind: InputKind, value: Option<&Value>) -> CellContent {
    let Some(value) = value else {
        return CellContent::Text(EMPTY_CELL.to_string());
    };
    if value.is_null() {
        return CellContent::Text(EMPTY_CELL.to_string());
    }

    match kind {
        InputKind::Datetime => match value
            .as_str()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        {
            Some(parsed) => CellContent::Text(parsed.format("%Y-%m-%d %H:%M").to_string()),
            None => CellContent::Text(raw_text(value)),
        },
        InputKind::Boolean => match value.as_bool() {
            Some(true) => CellContent::Badge("Yes".to_string()),
            Some(false) => CellContent::Badge("No".to_string()),
            None => CellContent::Text(raw_text(value)),
        },
        _ => CellContent::Text(raw_text(value)),
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
