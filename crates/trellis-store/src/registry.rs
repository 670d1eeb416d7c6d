// crates/trellis-store/src/registry.rs
//
// In-memory claim registry. Clones share the same table so scores can be
// revised after the registry is handed to an engine.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use trellis_core::{ClaimId, IntrinsicScores, Registry, TrellisError};

#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    claims: Arc<RwLock<HashMap<ClaimId, IntrinsicScores>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a claim, or overwrite its sub-scores if it already exists.
    pub fn upsert(&self, claim: ClaimId, scores: IntrinsicScores) -> Result<(), TrellisError> {
        self.claims
            .write()
            .map_err(|e| TrellisError::Storage(format!("registry poisoned: {}", e)))?
            .insert(claim, scores);
        Ok(())
    }

    /// Register a new claim with a fresh v7 id.
    pub fn register(&self, scores: IntrinsicScores) -> Result<ClaimId, TrellisError> {
        let id = uuid::Uuid::now_v7();
        self.upsert(id, scores)?;
        Ok(id)
    }
}

impl Registry for MemoryRegistry {
    fn claim_exists(&self, claim: &ClaimId) -> bool {
        self.claims
            .read()
            .map(|claims| claims.contains_key(claim))
            .unwrap_or(false)
    }

    fn intrinsic_sub_scores(&self, claim: &ClaimId) -> Result<IntrinsicScores, TrellisError> {
        self.claims
            .read()
            .map_err(|e| TrellisError::Storage(format!("registry poisoned: {}", e)))?
            .get(claim)
            .copied()
            .ok_or(TrellisError::ClaimNotFound(*claim))
    }
}
