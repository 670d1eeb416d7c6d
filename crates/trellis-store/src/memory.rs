// crates/trellis-store/src/memory.rs
//
// In-memory state store. Entries are kept as the same opaque bytes the
// RocksDB backend stores, so the engine's encoding is exercised either way.
// Clones share storage, which lets a test keep a handle after giving the
// store to an engine.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use trellis_core::{SequencedEvent, StateBatch, StateStore, TrellisError};

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, Vec<u8>>,
    events: Vec<SequencedEvent>,
    commits: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events committed so far.
    pub fn events(&self) -> Result<Vec<SequencedEvent>, TrellisError> {
        Ok(self.lock()?.events.clone())
    }

    /// Number of successful `commit` calls.
    pub fn commit_count(&self) -> Result<u64, TrellisError> {
        Ok(self.lock()?.commits)
    }

    /// Raw bytes stored under `key`, if any.
    pub fn entry(&self, key: &str) -> Result<Option<Vec<u8>>, TrellisError> {
        Ok(self.lock()?.entries.get(key).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, TrellisError> {
        self.inner
            .lock()
            .map_err(|e| TrellisError::Storage(format!("memory store poisoned: {}", e)))
    }
}

impl StateStore for MemoryStateStore {
    fn load_entries(&self) -> Result<Vec<(String, Vec<u8>)>, TrellisError> {
        Ok(self
            .lock()?
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn commit(&mut self, batch: StateBatch) -> Result<(), TrellisError> {
        let mut inner = self.lock()?;
        for key in &batch.deletes {
            inner.entries.remove(key);
        }
        inner.entries.extend(batch.puts);
        inner.events.extend(batch.events);
        inner.commits += 1;
        Ok(())
    }
}
