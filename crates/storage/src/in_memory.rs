//! In-memory summary store: useful for testing and ephemeral gateways.

use leasebot_core::error::StorageError;
use leasebot_core::storage::{SummaryData, SummaryStore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use tracing::debug;

use crate::{Allocation, allocate_id};

struct Inner {
    summaries: BTreeMap<u32, SummaryData>,
    rng: StdRng,
}

/// A store that keeps saved summaries in a map.
/// Nothing survives the process.
pub struct InMemorySummaryStore {
    inner: Mutex<Inner>,
}

impl InMemorySummaryStore {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Use a seeded RNG for eviction (reproducible tests).
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            inner: Mutex::new(Inner {
                summaries: BTreeMap::new(),
                rng,
            }),
        }
    }
}

impl Default for InMemorySummaryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryStore for InMemorySummaryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn list_ids(&self) -> Result<BTreeSet<u32>, StorageError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.summaries.keys().copied().collect())
    }

    fn save(&self, data: &SummaryData) -> Result<u32, StorageError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let Inner { summaries, rng } = &mut *inner;

        let taken: BTreeSet<u32> = summaries.keys().copied().collect();
        let allocation = allocate_id(&taken, rng);
        if let Allocation::Evict(victim) = allocation {
            debug!(id = victim, "Evicting summary from full in-memory store");
            summaries.remove(&victim);
        }

        let id = allocation.id();
        summaries.insert(id, data.clone());
        Ok(id)
    }

    fn load(&self, id: u32) -> Result<SummaryData, StorageError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .summaries
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }

    fn delete(&self, id: u32) -> Result<bool, StorageError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.summaries.remove(&id).is_some())
    }
}
