//! Entry store contract and the stores shipped with the crate.
//!
//! The analytics engine only reads entries. Whatever owns them implements
//! [`EntryStore`]; results must be ascending by `created_at`, and an author
//! without entries yields an empty list rather than an error.

use crate::analytics::filter::select_entries;
use crate::error::{Error, Result};
use crate::types::{JournalEntry, TimeRange};
use std::path::{Path, PathBuf};

/// Read access to journal entries.
pub trait EntryStore: Send + Sync {
    /// Entries for `author_id` within `range`, restricted to `template_ids`
    /// unless that slice is empty.
    fn fetch_entries(
        &self,
        author_id: &str,
        range: &TimeRange,
        template_ids: &[String],
    ) -> Result<Vec<JournalEntry>>;
}

/// Store backed by an in-memory list, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntryStore {
    entries: Vec<JournalEntry>,
}

impl InMemoryEntryStore {
    pub fn new(entries: Vec<JournalEntry>) -> Self {
        Self { entries }
    }
}

impl EntryStore for InMemoryEntryStore {
    fn fetch_entries(
        &self,
        author_id: &str,
        range: &TimeRange,
        template_ids: &[String],
    ) -> Result<Vec<JournalEntry>> {
        let owned: Vec<&JournalEntry> = self
            .entries
            .iter()
            .filter(|e| e.author_id == author_id)
            .collect();
        Ok(select_entries(owned, range, template_ids))
    }
}

/// Store reading a JSON array of entries exported to disk.
///
/// The file is re-read on every fetch so each request sees the latest export.
#[derive(Debug, Clone)]
pub struct JsonFileEntryStore {
    path: PathBuf,
}

impl JsonFileEntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<JournalEntry>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::EntryStoreUnavailable(format!("failed to read {:?}: {}", self.path, e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            Error::EntryStoreUnavailable(format!("failed to parse {:?}: {}", self.path, e))
        })
    }
}

impl EntryStore for JsonFileEntryStore {
    fn fetch_entries(
        &self,
        author_id: &str,
        range: &TimeRange,
        template_ids: &[String],
    ) -> Result<Vec<JournalEntry>> {
        let entries = self.load()?;
        tracing::debug!(
            path = %self.path.display(),
            total = entries.len(),
            "Loaded entry export"
        );
        let owned: Vec<&JournalEntry> = entries
            .iter()
            .filter(|e| e.author_id == author_id)
            .collect();
        Ok(select_entries(owned, range, template_ids))
    }
}
