//! In-memory layout store

use std::collections::HashMap;

use super::{LayoutError, LayoutStore};

/// Map-backed layout store.
///
/// Layouts live for the lifetime of the process; useful in tests and in
/// hosts without durable device storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayoutStore {
    entries: HashMap<String, String>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn load(&self, table: &str) -> Result<Option<String>, LayoutError> {
        Ok(self.entries.get(table).cloned())
    }

    fn save(&mut self, table: &str, payload: &str) -> Result<(), LayoutError> {
        self.entries.insert(table.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&mut self, table: &str) -> Result<(), LayoutError> {
        self.entries.remove(table);
        Ok(())
    }
}
