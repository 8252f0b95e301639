//! Persisted per-table column layout

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::LayoutStore;

/// Column order and visibility for one table, keyed by its technical name.
///
/// Restoring a persisted layout reconciles it against the currently declared
/// columns: restored columns come first in their persisted order, columns
/// missing from the persisted layout are appended in declaration order, and
/// persisted names that no longer exist are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnLayout {
    pub order: Vec<String>,
    pub hidden: Vec<String>,
}

impl ColumnLayout {
    /// Layout matching the declared columns, nothing hidden
    pub fn of_declared(declared: &[String]) -> Self {
        Self {
            order: declared.to_vec(),
            hidden: Vec::new(),
        }
    }

    /// Restore the layout persisted for a technical table name.
    ///
    /// Unreadable payloads and store failures fall back to declaration
    /// order; layout persistence is never allowed to break the table.
    pub fn restore<S: LayoutStore>(store: &S, table: &str, declared: &[String]) -> Self {
        let persisted = match store.load(table) {
            Ok(Some(payload)) => match serde_json::from_str::<ColumnLayout>(&payload) {
                Ok(layout) => Some(layout),
                Err(error) => {
                    warn!(table, %error, "discarding unreadable column layout");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(table, %error, "failed to load column layout");
                None
            }
        };

        match persisted {
            Some(layout) => layout.reconcile(declared),
            None => Self::of_declared(declared),
        }
    }

    /// Merge a persisted layout with the currently declared columns.
    pub fn reconcile(self, declared: &[String]) -> Self {
        let mut order: Vec<String> = self
            .order
            .into_iter()
            .filter(|field| declared.contains(field))
            .collect();
        for field in declared {
            if !order.contains(field) {
                order.push(field.clone());
            }
        }

        let hidden = self
            .hidden
            .into_iter()
            .filter(|field| declared.contains(field))
            .collect();

        Self { order, hidden }
    }

    pub fn is_hidden(&self, field: &str) -> bool {
        self.hidden.iter().any(|hidden| hidden == field)
    }

    /// Write this layout through the injected store.
    ///
    /// Store failures are logged and swallowed; the in-memory layout stays
    /// authoritative for the current session.
    pub(crate) fn persist<S: LayoutStore>(&self, store: &mut S, table: &str) {
        let payload = match serde_json::to_string(self) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(table, %error, "failed to serialize column layout");
                return;
            }
        };
        if let Err(error) = store.save(table, &payload) {
            warn!(table, %error, "failed to persist column layout");
        }
    }
}
