//! Saved-summary store implementations for Leasebot.

pub mod file_backend;
pub mod in_memory;

pub use file_backend::FileSummaryStore;
pub use in_memory::InMemorySummaryStore;

use leasebot_core::storage::{MAX_SUMMARY_ID, SummaryStore};
use rand::seq::IteratorRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Open the store named by `backend` ("file" or "memory").
///
/// Unknown names fall back to the file store.
pub fn open_store(backend: &str, summary_dir: PathBuf) -> Arc<dyn SummaryStore> {
    match backend {
        "memory" => Arc::new(InMemorySummaryStore::new()),
        "file" => Arc::new(FileSummaryStore::new(summary_dir)),
        other => {
            warn!(backend = other, "Unknown storage backend, using file store");
            Arc::new(FileSummaryStore::new(summary_dir))
        }
    }
}

/// Where the next summary goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Allocation {
    /// A free slot.
    Free(u32),
    /// The store is full; this existing summary must be removed first.
    Evict(u32),
}

impl Allocation {
    pub(crate) fn id(self) -> u32 {
        match self {
            Self::Free(id) | Self::Evict(id) => id,
        }
    }
}

/// Pick the smallest free ID, or a uniformly random taken one when full.
pub(crate) fn allocate_id<R: Rng + ?Sized>(taken: &BTreeSet<u32>, rng: &mut R) -> Allocation {
    if let Some(free) = (1..=MAX_SUMMARY_ID).find(|id| !taken.contains(id)) {
        return Allocation::Free(free);
    }
    let victim = taken
        .iter()
        .copied()
        .filter(|id| (1..=MAX_SUMMARY_ID).contains(id))
        .choose(rng)
        .unwrap_or(1);
    Allocation::Evict(victim)
}
