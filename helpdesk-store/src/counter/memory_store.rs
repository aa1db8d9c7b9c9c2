use std::collections::HashMap;
use std::sync::Arc;

use helpdesk_utils::time::now_unix_secs;
use tokio::sync::Mutex;
use tracing::debug;

/// Expired entries are dropped once per this many writes.
pub const SWEEP_EVERY_WRITES: u64 = 1024;

#[derive(Clone, Copy, Debug)]
struct Entry {
    count: u64,
    expires_at: Option<u64>,
}

impl Entry {
    fn is_live(&self, now: u64) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Entry>,
    writes_since_sweep: u64,
}

impl State {
    fn sweep_if_due(&mut self, now: u64) {
        self.writes_since_sweep += 1;
        if self.writes_since_sweep < SWEEP_EVERY_WRITES {
            return;
        }

        self.writes_since_sweep = 0;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        debug!(
            removed = before - self.entries.len(),
            live = self.entries.len(),
            "swept expired counters"
        );
    }
}

/// Process-local counters with second-granularity expiry.
///
/// Counts are not shared between server instances.
#[derive(Clone, Debug, Default)]
pub struct MemoryCounterStore {
    state: Arc<Mutex<State>>,
}

impl MemoryCounterStore {
    pub async fn get(&self, key: &str) -> anyhow::Result<Option<u64>> {
        let now = now_unix_secs();
        let mut state = self.state.lock().await;

        let Some(entry) = state.entries.get(key).copied() else {
            return Ok(None);
        };
        if entry.is_live(now) {
            return Ok(Some(entry.count));
        }

        state.entries.remove(key);
        Ok(None)
    }

    /// Increment `key` and set its expiry to `ttl_seconds` from now under one lock.
    pub async fn incr_with_expiry(&self, key: &str, ttl_seconds: u64) -> anyhow::Result<u64> {
        let now = now_unix_secs();
        let mut state = self.state.lock().await;
        state.sweep_if_due(now);

        let entry = state.entries.entry(key.to_owned()).or_insert(Entry {
            count: 0,
            expires_at: None,
        });
        if !entry.is_live(now) {
            entry.count = 0;
        }
        entry.count = entry.count.saturating_add(1);
        entry.expires_at = Some(now.saturating_add(ttl_seconds));

        Ok(entry.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn stored_keys(store: &MemoryCounterStore) -> usize {
        store.state.lock().await.entries.len()
    }

    #[tokio::test]
    async fn incr_creates_and_counts() {
        let store = MemoryCounterStore::default();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.incr_with_expiry("k", 60).await.unwrap(), 1);
        assert_eq!(store.incr_with_expiry("k", 60).await.unwrap(), 2);
        assert_eq!(store.get("k").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn expiry_is_set_with_the_increment() {
        let store = MemoryCounterStore::default();
        store.incr_with_expiry("k", 0).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.incr_with_expiry("k", 60).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn expired_keys_are_swept_without_being_read() {
        let store = MemoryCounterStore::default();
        for day in ["2025-06-01", "2025-06-02", "2025-06-03"] {
            store
                .incr_with_expiry(&format!("rate_limit:ip:{day}"), 0)
                .await
                .unwrap();
        }
        assert_eq!(stored_keys(&store).await, 3);

        for _ in 0..SWEEP_EVERY_WRITES {
            store
                .incr_with_expiry("rate_limit:ip:2025-06-04", 60)
                .await
                .unwrap();
        }

        assert_eq!(stored_keys(&store).await, 1);
        assert_eq!(
            store.get("rate_limit:ip:2025-06-04").await.unwrap(),
            Some(SWEEP_EVERY_WRITES)
        );
    }

    #[tokio::test]
    async fn live_keys_survive_a_sweep() {
        let store = MemoryCounterStore::default();
        for n in 0..SWEEP_EVERY_WRITES {
            store.incr_with_expiry(&format!("k{n}"), 60).await.unwrap();
        }

        assert_eq!(stored_keys(&store).await as u64, SWEEP_EVERY_WRITES);
    }
}
