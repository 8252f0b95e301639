//! Tabular UI state over derived columns

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::fields::FieldMetadata;
use crate::storage::LayoutStore;

use super::column::{CellContent, CellRenderer, HeaderMapper, TableColumn};
use super::layout::ColumnLayout;

/// One table row: a JSON object keyed by an `id` field
pub type Row = Map<String, Value>;

/// Field identifying a row across selection and mutations
pub const ID_FIELD: &str = "id";

/// Tri-state of the select-all checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Some,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The single active sort column and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Builder for a [`TableRuntime`]: metadata plus caller configuration.
pub struct TableBuilder {
    table: String,
    metadata: FieldMetadata,
    header_mapper: Option<HeaderMapper>,
    omitted: Vec<String>,
    renderers: HashMap<String, CellRenderer>,
}

impl fmt::Debug for TableBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableBuilder")
            .field("table", &self.table)
            .field("metadata", &self.metadata)
            .field("omitted", &self.omitted)
            .finish_non_exhaustive()
    }
}

impl TableBuilder {
    /// Start a table over derived field metadata.
    ///
    /// The technical table name keys the persisted layout; pick a stable
    /// identifier, not a display string.
    pub fn new(table: impl Into<String>, metadata: FieldMetadata) -> Self {
        Self {
            table: table.into(),
            metadata,
            header_mapper: None,
            omitted: Vec::new(),
            renderers: HashMap::new(),
        }
    }

    /// Map raw field names to header text
    pub fn header_mapper(mut self, mapper: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.header_mapper = Some(Arc::new(mapper));
        self
    }

    /// Leave a field out of the derived column set entirely
    pub fn omit(mut self, field: impl Into<String>) -> Self {
        self.omitted.push(field.into());
        self
    }

    /// Replace the default cell formatting for one field
    pub fn cell_renderer(
        mut self,
        field: impl Into<String>,
        renderer: impl Fn(&Value) -> CellContent + Send + Sync + 'static,
    ) -> Self {
        self.renderers.insert(field.into(), Arc::new(renderer));
        self
    }

    /// Derive the columns and restore the persisted layout from the
    /// injected store.
    pub fn build<S: LayoutStore>(self, store: S) -> TableRuntime<S> {
        let columns = TableColumn::derive(
            &self.metadata,
            self.header_mapper.as_ref(),
            &self.omitted,
            &self.renderers,
        );
        let declared: Vec<String> = columns.iter().map(|c| c.field.clone()).collect();
        let layout = ColumnLayout::restore(&store, &self.table, &declared);

        info!(table = %self.table, columns = columns.len(), "table built");
        TableRuntime {
            table: self.table,
            columns,
            layout,
            store,
            rows: Vec::new(),
            selected: Vec::new(),
            sort: None,
        }
    }
}

/// Read-only tabular view over one entity's rows.
///
/// Generic over the injected [`LayoutStore`]; column order and visibility
/// changes persist through it under the technical table name. Rows are plain
/// JSON objects; sorting and selection are client-side.
#[derive(Debug)]
pub struct TableRuntime<S: LayoutStore> {
    table: String,
    columns: Vec<TableColumn>,
    layout: ColumnLayout,
    store: S,
    rows: Vec<Row>,
    selected: Vec<Value>,
    sort: Option<SortSpec>,
}

impl<S: LayoutStore> TableRuntime<S> {
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// All derived columns in the effective (restored or reordered) order
    pub fn ordered_columns(&self) -> Vec<&TableColumn> {
        self.layout
            .order
            .iter()
            .filter_map(|field| self.columns.iter().find(|c| &c.field == field))
            .collect()
    }

    /// Columns currently shown, hidden ones excluded
    pub fn visible_columns(&self) -> Vec<&TableColumn> {
        self.ordered_columns()
            .into_iter()
            .filter(|column| !self.layout.is_hidden(&column.field))
            .collect()
    }

    pub fn column(&self, field: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn is_column_hidden(&self, field: &str) -> bool {
        self.layout.is_hidden(field)
    }

    /// Toggle a column's visibility and persist the layout.
    pub fn set_column_hidden(&mut self, field: &str, hidden: bool) {
        if self.column(field).is_none() {
            warn!(table = %self.table, field, "cannot toggle unknown column");
            return;
        }
        if hidden {
            if !self.layout.is_hidden(field) {
                self.layout.hidden.push(field.to_string());
            }
        } else {
            self.layout.hidden.retain(|name| name != field);
        }
        self.layout.persist(&mut self.store, &self.table);
    }

    /// Move a column to a new position and persist the layout.
    pub fn move_column(&mut self, field: &str, to: usize) {
        let Some(from) = self.layout.order.iter().position(|name| name == field) else {
            warn!(table = %self.table, field, "cannot reorder unknown column");
            return;
        };
        let entry = self.layout.order.remove(from);
        let to = to.min(self.layout.order.len());
        self.layout.order.insert(to, entry);
        self.layout.persist(&mut self.store, &self.table);
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Give the injected store back, e.g. to rebuild the table over it
    pub fn into_store(self) -> S {
        self.store
    }

    /// Replace the row set.
    ///
    /// Selected ids that no longer resolve to a row are dropped.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        let rows = &self.rows;
        self.selected
            .retain(|id| rows.iter().any(|row| row.get(ID_FIELD) == Some(id)));
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows in display order, the active sort applied.
    ///
    /// Null and missing values order last regardless of direction; when a
    /// column mixes kinds, numbers order before strings before booleans.
    pub fn rows(&self) -> Vec<&Row> {
        let mut rows: Vec<&Row> = self.rows.iter().collect();
        if let Some(spec) = &self.sort {
            rows.sort_by(|a, b| {
                compare_cells(a.get(&spec.field), b.get(&spec.field), spec.direction)
            });
        }
        rows
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn sort_by(&mut self, field: impl Into<String>, direction: SortDirection) {
        self.sort = Some(SortSpec {
            field: field.into(),
            direction,
        });
    }

    /// Cycle the sort on a column: a new column starts ascending, the
    /// active column flips direction.
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort = Some(match &self.sort {
            Some(spec) if spec.field == field => SortSpec {
                field: spec.field.clone(),
                direction: spec.direction.flipped(),
            },
            _ => SortSpec {
                field: field.to_string(),
                direction: SortDirection::Ascending,
            },
        });
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn is_selected(&self, id: &Value) -> bool {
        self.selected.iter().any(|selected| selected == id)
    }

    /// Toggle one row's checkbox by its id
    pub fn toggle_row(&mut self, id: &Value) {
        if let Some(position) = self.selected.iter().position(|selected| selected == id) {
            self.selected.remove(position);
        } else if self.rows.iter().any(|row| row.get(ID_FIELD) == Some(id)) {
            self.selected.push(id.clone());
        } else {
            warn!(table = %self.table, "cannot select unknown row");
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self
            .rows
            .iter()
            .filter_map(|row| row.get(ID_FIELD).cloned())
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Select-all checkbox behavior: everything off when all rows are
    /// selected, everything on otherwise.
    pub fn toggle_all(&mut self) {
        match self.selection_state() {
            SelectionState::All => self.clear_selection(),
            _ => self.select_all(),
        }
    }

    pub fn selected_ids(&self) -> &[Value] {
        &self.selected
    }

    pub fn selection_state(&self) -> SelectionState {
        if self.selected.is_empty() || self.rows.is_empty() {
            return SelectionState::None;
        }
        let all = self.rows.iter().all(|row| {
            row.get(ID_FIELD)
                .is_some_and(|id| self.selected.contains(id))
        });
        if all {
            SelectionState::All
        } else {
            SelectionState::Some
        }
    }
}

fn compare_cells(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    match (non_null(a), non_null(b)) {
        (None, None) => Ordering::Equal,
        // nulls last regardless of direction
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = compare_values(a, b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ObjectSchema, SchemaNode};
    use crate::storage::MemoryLayoutStore;
    use serde_json::json;

    fn product_metadata() -> FieldMetadata {
        let schema = ObjectSchema::new()
            .field("id", SchemaNode::number())
            .field("name", SchemaNode::string())
            .field("price", SchemaNode::number().optional())
            .into_node();
        FieldMetadata::of_object(&schema).unwrap()
    }

    fn row(id: i64, name: &str, price: Option<f64>) -> Row {
        let mut row = Row::new();
        row.insert("id".to_string(), json!(id));
        row.insert("name".to_string(), json!(name));
        row.insert(
            "price".to_string(),
            price.map_or(Value::Null, |p| json!(p)),
        );
        row
    }

    fn table() -> TableRuntime<MemoryLayoutStore> {
        let mut table =
            TableBuilder::new("products", product_metadata()).build(MemoryLayoutStore::new());
        table.set_rows(vec![
            row(1, "bolt", Some(2.5)),
            row(2, "nut", None),
            row(3, "washer", Some(0.5)),
        ]);
        table
    }

    #[test]
    fn test_sorting_flips_direction_and_orders_nulls_last() {
        let mut table = table();
        table.toggle_sort("price");

        let names: Vec<&Value> = table.rows().iter().map(|r| &r["name"]).collect();
        assert_eq!(names, vec![&json!("washer"), &json!("bolt"), &json!("nut")]);

        table.toggle_sort("price");
        let names: Vec<&Value> = table.rows().iter().map(|r| &r["name"]).collect();
        // descending still keeps the null price last
        assert_eq!(names, vec![&json!("bolt"), &json!("washer"), &json!("nut")]);
    }

    #[test]
    fn test_selection_tri_state() {
        let mut table = table();
        assert_eq!(table.selection_state(), SelectionState::None);

        table.toggle_row(&json!(1));
        assert_eq!(table.selection_state(), SelectionState::Some);

        table.select_all();
        assert_eq!(table.selection_state(), SelectionState::All);

        table.toggle_all();
        assert_eq!(table.selection_state(), SelectionState::None);
    }

    #[test]
    fn test_set_rows_drops_selection_of_removed_rows() {
        let mut table = table();
        table.toggle_row(&json!(1));
        table.toggle_row(&json!(3));

        table.set_rows(vec![row(1, "bolt", Some(2.5))]);
        assert_eq!(table.selected_ids(), &[json!(1)]);
    }

    #[test]
    fn test_reorder_and_hide_persist_through_the_store() {
        let mut table = table();
        table.move_column("price", 0);
        table.set_column_hidden("id", true);

        let visible: Vec<&str> = table
            .visible_columns()
            .iter()
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(visible, vec!["price", "name"]);

        // a fresh table over the same store restores the layout
        let rebuilt = TableBuilder::new("products", product_metadata()).build(table.into_store());
        let ordered: Vec<&str> = rebuilt
            .ordered_columns()
            .iter()
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(ordered, vec!["price", "id", "name"]);
        assert!(rebuilt.is_column_hidden("id"));
    }
}
