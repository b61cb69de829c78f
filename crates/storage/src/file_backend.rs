//! File-based summary store: one pretty-printed JSON file per saved summary.
//!
//! Summaries live in a single directory as `summary_NN.json`, where `NN` is
//! the two-digit ID. The directory listing is the source of truth for which
//! IDs are taken, so files dropped in or removed by hand are picked up.
//!
//! Storage location: `~/.leasebot/summaries/`

use leasebot_core::error::StorageError;
use leasebot_core::storage::{SummaryData, SummaryStore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use regex_lite::Regex;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing::{debug, info, warn};

use crate::{Allocation, allocate_id};

fn summary_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^summary_(\d{2})\.json$").expect("valid summary file pattern"))
}

/// A directory-backed summary store.
///
/// Saving holds a mutex across "list IDs → pick ID → write file" so that
/// two sessions sharing a store never claim the same ID.
pub struct FileSummaryStore {
    dir: PathBuf,
    /// Guards ID allocation; the RNG picks eviction victims.
    allocator: Mutex<StdRng>,
}

impl FileSummaryStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: PathBuf) -> Self {
        debug!(dir = %dir.display(), "File summary store opened");
        Self {
            dir,
            allocator: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Use a seeded RNG for eviction (reproducible tests).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.allocator = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for an ID, e.g. `summary_07.json`.
    pub fn file_name(id: u32) -> String {
        format!("summary_{id:02}.json")
    }

    fn path_for(&self, id: u32) -> PathBuf {
        self.dir.join(Self::file_name(id))
    }

    fn write(&self, id: u32, data: &SummaryData) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            StorageError::Io(format!("Failed to create summary directory: {e}"))
        })?;

        let content = serde_json::to_string_pretty(data)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        std::fs::write(self.path_for(id), content)
            .map_err(|e| StorageError::Io(format!("Failed to write summary {id}: {e}")))
    }
}

impl SummaryStore for FileSummaryStore {
    fn name(&self) -> &str {
        "file"
    }

    fn list_ids(&self) -> Result<BTreeSet<u32>, StorageError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            // Nothing saved yet
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => {
                return Err(StorageError::Io(format!(
                    "Failed to list summary directory: {e}"
                )));
            }
        };

        let pattern = summary_file_pattern();
        let ids = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_str()?;
                let caps = pattern.captures(name)?;
                caps.get(1)?.as_str().parse::<u32>().ok()
            })
            .collect();
        Ok(ids)
    }

    fn save(&self, data: &SummaryData) -> Result<u32, StorageError> {
        let mut rng = self.allocator.lock().unwrap_or_else(|e| e.into_inner());

        let taken = self.list_ids()?;
        let allocation = allocate_id(&taken, &mut *rng);
        if let Allocation::Evict(victim) = allocation {
            warn!(id = victim, "Summary store full, evicting a random summary");
            std::fs::remove_file(self.path_for(victim)).map_err(|e| {
                StorageError::Io(format!("Failed to evict summary {victim}: {e}"))
            })?;
        }

        let id = allocation.id();
        self.write(id, data)?;
        info!(id, "Summary saved");
        Ok(id)
    }

    fn load(&self, id: u32) -> Result<SummaryData, StorageError> {
        let content = match std::fs::read_to_string(self.path_for(id)) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StorageError::NotFound(id)),
            Err(e) => return Err(StorageError::Io(format!("Failed to read summary {id}: {e}"))),
        };
        serde_json::from_str(&content).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn delete(&self, id: u32) -> Result<bool, StorageError> {
        let _guard = self.allocator.lock().unwrap_or_else(|e| e.into_inner());
        match std::fs::remove_file(self.path_for(id)) {
            Ok(()) => {
                info!(id, "Summary deleted");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(format!("Failed to delete summary {id}: {e}"))),
        }
    }
}
