//! Summary store trait: persistence for finished contract summaries.
//!
//! Saved summaries are addressed by small integer IDs in `1..=MAX_SUMMARY_ID`.
//! IDs are reused once free, and a full store evicts a random entry to make
//! room for the next one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::StorageError;

/// Highest ID a saved summary can be given.
pub const MAX_SUMMARY_ID: u32 = 99;

/// The label → value pairs of a rendered contract summary, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryData(pub IndexMap<String, String>);

impl SummaryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping insertion order.
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.0.insert(label.into(), value.into());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The persistence seam for saved summaries.
///
/// Implementations: file-backed (one JSON file per ID) and in-memory (tests).
/// All calls are synchronous; a dialogue turn never suspends.
pub trait SummaryStore: Send + Sync {
    /// The backend name (e.g., "file", "memory").
    fn name(&self) -> &str;

    /// IDs of every summary currently saved.
    fn list_ids(&self) -> Result<BTreeSet<u32>, StorageError>;

    /// Save a summary and return the ID it was assigned.
    fn save(&self, data: &SummaryData) -> Result<u32, StorageError>;

    /// Load the summary saved under `id`.
    fn load(&self, id: u32) -> Result<SummaryData, StorageError>;

    /// Delete a summary. Returns whether anything was removed.
    fn delete(&self, id: u32) -> Result<bool, StorageError>;
}
