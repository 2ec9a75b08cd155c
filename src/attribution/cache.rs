//! Process-wide attribution cache.

use std::collections::HashMap;
use std::net::IpAddr;

use tokio::sync::RwLock;

/// Append-only map of IP -> owner string, shared by every scan in the
/// process.
///
/// Concurrent writers can race on the same IP; attribution results are
/// idempotent for a given IP, so last-writer-wins is harmless.
pub struct AttributionCache {
    entries: RwLock<HashMap<IpAddr, String>>,
}

impl AttributionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        AttributionCache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached owner for `ip`, if any. An empty string is a cached failure.
    pub async fn get(&self, ip: IpAddr) -> Option<String> {
        self.entries.read().await.get(&ip).cloned()
    }

    /// Records the owner for `ip`.
    pub async fn insert(&self, ip: IpAddr, owner: String) {
        self.entries.write().await.insert(ip, owner);
    }

    /// Number of cached IPs (reported by the status endpoint).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when nothing has been cached yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for AttributionCache {
    fn default() -> Self {
        Self::new()
    }
}
