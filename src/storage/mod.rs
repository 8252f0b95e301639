//! Layout persistence backends
//!
//! Defines the LayoutStore trait and implementations for different hosts:
//! - MemoryLayoutStore: in-process map (tests, hosts without durable storage)
//! - FileLayoutStore: one document per table under a root directory
//!
//! The store is injected into the table runtime explicitly; the runtime
//! never reaches for an ambient storage mechanism.

use thiserror::Error;

/// Error type for layout persistence operations
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Key-value persistence for per-table UI layout.
///
/// Keys are technical table names; payloads are opaque documents produced by
/// the table runtime. Reads and writes are synchronous and non-transactional;
/// concurrent writers (e.g. two browser tabs) may race on write, which is an
/// accepted limitation.
pub trait LayoutStore {
    /// Read the persisted payload for a technical table name.
    fn load(&self, table: &str) -> Result<Option<String>, LayoutError>;

    /// Persist the payload for a technical table name.
    fn save(&mut self, table: &str, payload: &str) -> Result<(), LayoutError>;

    /// Drop the persisted payload for a technical table name.
    fn remove(&mut self, table: &str) -> Result<(), LayoutError>;
}

pub mod memory;

#[cfg(feature = "fs-layout")]
pub mod filesystem;

pub use memory::MemoryLayoutStore;

#[cfg(feature = "fs-layout")]
pub use filesystem::FileLayoutStore;
