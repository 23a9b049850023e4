//! Exclusive claims for regeneration.
//!
//! Regeneration deletes and recreates a summary or report; the window
//! between delete and recreate must not interleave with another
//! regeneration of the same key. Automatic triggers never take a claim —
//! they rely on create-once inserts and discard on a lost race.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimKey {
    PoolSummary { child_id: Uuid, pool_id: Uuid },
    FinalReport { child_id: Uuid },
}

#[derive(Default)]
pub struct ClaimRegistry {
    claims: Mutex<HashMap<ClaimKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl ClaimRegistry {
    /// Acquire the exclusive claim for a key, waiting if another
    /// regeneration holds it. Released when the guard drops.
    pub async fn acquire(&self, key: ClaimKey) -> OwnedMutexGuard<()> {
        let claim = {
            let mut claims = self.claims.lock().unwrap();
            Arc::clone(claims.entry(key).or_default())
        };
        claim.lock_owned().await
    }
}
