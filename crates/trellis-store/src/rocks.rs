// crates/trellis-store/src/rocks.rs
//
// RocksDB-backed persistent storage for the engine state.
//
// Key format:
//   - `event:{seq:020}`     -> JSON-serialized SequencedEvent (append-only)
//   - anything else         -> one engine entity (`edge:...`, `score:...`,
//                              `stake:...`, `flags:...`, `meta:...`), value
//                              bytes chosen by the engine
//
// Zero-padded sequence numbers keep events in order under a prefix scan.
// Each commit is a single WriteBatch, so entity changes and the events they
// produced land together or not at all.

use rocksdb::{DBWithThreadMode, IteratorMode, MultiThreaded, Options, WriteBatch};

use trellis_core::{SequencedEvent, StateBatch, StateStore, TrellisError};

const EVENT_PREFIX: &str = "event:";

/// RocksDB wrapper implementing the `StateStore` trait.
#[derive(Debug)]
pub struct RocksStateStore {
    db: DBWithThreadMode<MultiThreaded>,
}

impl RocksStateStore {
    /// Open a RocksDB database at the given filesystem path.
    ///
    /// Creates the database directory if it does not exist.
    pub fn open(path: &str) -> Result<Self, TrellisError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DBWithThreadMode::<MultiThreaded>::open(&opts, path)
            .map_err(|e| TrellisError::Storage(format!("Failed to open RocksDB at {}: {}", path, e)))?;

        Ok(Self { db })
    }

    fn event_key(seq: u64) -> Vec<u8> {
        format!("{}{:020}", EVENT_PREFIX, seq).into_bytes()
    }

    /// Read back every stored event in sequence order.
    pub fn events(&self) -> Result<Vec<SequencedEvent>, TrellisError> {
        let prefix = EVENT_PREFIX.as_bytes();
        let mut events = Vec::new();
        for item in self.db.prefix_iterator(prefix) {
            let (key, value) = item
                .map_err(|e| TrellisError::Storage(format!("RocksDB iteration error: {}", e)))?;
            if !key.starts_with(prefix) {
                break;
            }
            events.push(serde_json::from_slice(&value)?);
        }
        Ok(events)
    }
}

impl StateStore for RocksStateStore {
    fn load_entries(&self) -> Result<Vec<(String, Vec<u8>)>, TrellisError> {
        let mut entries = Vec::new();
        for item in self.db.iterator(IteratorMode::Start) {
            let (key, value) = item
                .map_err(|e| TrellisError::Storage(format!("RocksDB iteration error: {}", e)))?;
            if key.starts_with(EVENT_PREFIX.as_bytes()) {
                continue;
            }
            let key = String::from_utf8(key.to_vec())
                .map_err(|e| TrellisError::Storage(format!("Non-UTF-8 key in store: {}", e)))?;
            entries.push((key, value.to_vec()));
        }
        Ok(entries)
    }

    fn commit(&mut self, batch: StateBatch) -> Result<(), TrellisError> {
        let mut write = WriteBatch::default();
        for key in &batch.deletes {
            write.delete(key.as_bytes());
        }
        for (key, value) in &batch.puts {
            write.put(key.as_bytes(), value);
        }
        for event in &batch.events {
            write.put(Self::event_key(event.seq), serde_json::to_vec(event)?);
        }
        self.db
            .write(write)
            .map_err(|e| TrellisError::Storage(format!("RocksDB batch write failed: {}", e)))
    }
}
