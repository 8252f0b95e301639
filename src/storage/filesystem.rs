//! File-backed layout store
//!
//! Persists one YAML document per technical table name as
//! `<root>/<table>.layout.yaml`. Table names are sanitized before they touch
//! the file system; a name that sanitizes to nothing falls back to "table".

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LayoutError, LayoutStore};

/// On-disk document wrapping one table's layout payload.
///
/// The unsanitized table name travels inside the document; file names only
/// carry the sanitized form.
#[derive(Debug, Serialize, Deserialize)]
struct LayoutDocument {
    table: String,
    payload: String,
}

/// Layout store writing per-table YAML documents under a root directory
#[derive(Debug, Clone)]
pub struct FileLayoutStore {
    root: PathBuf,
}

impl FileLayoutStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, table: &str) -> PathBuf {
        self.root
            .join(format!("{}.layout.yaml", sanitize_table_name(table)))
    }
}

impl LayoutStore for FileLayoutStore {
    fn load(&self, table: &str) -> Result<Option<String>, LayoutError> {
        let path = self.path_for(table);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| LayoutError::Io(e.to_string()))?;
        let document: LayoutDocument = serde_yaml::from_str(&content)
            .map_err(|e| LayoutError::Serialization(e.to_string()))?;
        Ok(Some(document.payload))
    }

    fn save(&mut self, table: &str, payload: &str) -> Result<(), LayoutError> {
        fs::create_dir_all(&self.root).map_err(|e| LayoutError::Io(e.to_string()))?;

        let document = LayoutDocument {
            table: table.to_string(),
            payload: payload.to_string(),
        };
        let content = serde_yaml::to_string(&document)
            .map_err(|e| LayoutError::Serialization(e.to_string()))?;

        let path = self.path_for(table);
        fs::write(&path, content).map_err(|e| LayoutError::Io(e.to_string()))?;
        debug!(table, path = %path.display(), "layout written");
        Ok(())
    }

    fn remove(&mut self, table: &str) -> Result<(), LayoutError> {
        let path = self.path_for(table);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| LayoutError::Io(e.to_string()))?;
        }
        Ok(())
    }
}

/// Sanitize a technical table name for use as a file name.
///
/// Keeps alphanumerics, hyphens and underscores; everything else becomes an
/// underscore.
fn sanitize_table_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "table".to_string()
    } else {
        trimmed.to_string()
    }
}
