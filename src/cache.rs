//! Short-TTL rank payload cache.
//!
//! Keeps the raw upstream `data` object per player for a few minutes so
//! repeated lookups for the same player do not hammer the upstream API.
//! Concurrent misses for the same key are NOT coalesced — each racing
//! request fetches independently and the last write wins.

use crate::region::Region;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default TTL for cached rank payloads.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache key for one player on one shard.
///
/// Structured on purpose: joining the fields with a delimiter would let
/// ("eu", "a:b", "c") collide with ("eu", "a", "b:c"). Name and tag are
/// kept verbatim — case-sensitive, no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerKey {
    pub region: Region,
    pub name: String,
    pub tag: String,
}

impl PlayerKey {
    pub fn new(region: Region, name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            region,
            name: name.into(),
            tag: tag.into(),
        }
    }
}

/// A cached upstream payload.
#[derive(Clone, Debug)]
struct CachedEntry {
    payload: Value,
    fetched_at: Instant,
}

/// Thread-safe rank cache with TTL-based invalidation.
///
/// Expired entries are treated as absent on lookup but stay in the map
/// until overwritten by the next successful fetch for their key.
#[derive(Clone, Debug)]
pub struct RankCache {
    entries: Arc<DashMap<PlayerKey, CachedEntry>>,
    ttl: Duration,
}

impl RankCache {
    /// Create a new cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Try to get a fresh payload for the given player.
    ///
    /// Returns `Some(payload)` if an entry exists and is younger than the
    /// TTL, `None` otherwise.
    pub fn get(&self, key: &PlayerKey) -> Option<Value> {
        if let Some(entry) = self.entries.get(key) {
            if entry.fetched_at.elapsed() < self.ttl {
                debug!(
                    "Rank cache HIT for {}#{} ({})",
                    key.name, key.tag, key.region
                );
                return Some(entry.payload.clone());
            }
        }
        debug!(
            "Rank cache MISS for {}#{} ({})",
            key.name, key.tag, key.region
        );
        None
    }

    /// Insert a payload for the given player, overwriting any existing
    /// entry for the key.
    pub fn insert(&self, key: PlayerKey, payload: Value) {
        self.entries.insert(
            key,
            CachedEntry {
                payload,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held, fresh or stale.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for RankCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
