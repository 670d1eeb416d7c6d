// crates/trellis-store/src/lib.rs
//
// trellis-store: Persistence backends for the Trellis engine.
//
// Provides a RocksDB-backed state store, an in-memory state store with the
// same key/value layout, and an in-memory claim registry used when no
// external registry is wired in.

pub mod memory;
pub mod registry;
pub mod rocks;

// Re-export key types for ergonomic access from downstream crates.
pub use memory::MemoryStateStore;
pub use registry::MemoryRegistry;
pub use rocks::RocksStateStore;
