mod memory_store;
mod redis_store;

use std::time::Duration;

use helpdesk_utils::retry::{RetryPolicy, with_retry};

use memory_store::MemoryCounterStore;
use redis_store::RedisCounterStore;

pub const DEFAULT_COUNTER_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
enum CounterBackend {
    Memory(MemoryCounterStore),
    Redis(RedisCounterStore),
}

/// Key-value counters with expiry: `get` and an increment that resets the TTL.
///
/// Every call runs under the configured [`RetryPolicy`]; the backend owns
/// atomicity of a single increment.
#[derive(Clone, Debug)]
pub struct CounterService {
    key_prefix: String,
    backend: CounterBackend,
    retry: RetryPolicy,
}

impl CounterService {
    pub fn memory(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CounterBackend::Memory(MemoryCounterStore::default()),
            retry: RetryPolicy::single_retry(DEFAULT_COUNTER_TIMEOUT),
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: CounterBackend::Redis(RedisCounterStore::from_url(redis_url)?),
            retry: RetryPolicy::single_retry(DEFAULT_COUNTER_TIMEOUT),
        })
    }

    pub fn configure_retry(&mut self, retry: RetryPolicy) {
        self.retry = retry;
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CounterBackend::Redis(_))
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn get_count(&self, key: &str) -> anyhow::Result<Option<u64>> {
        with_retry("counter get", self.retry, || async move {
            match &self.backend {
                CounterBackend::Memory(store) => store.get(key).await,
                CounterBackend::Redis(store) => store.get(key).await,
            }
        })
        .await
    }

    /// Increment `key` (creating it at 1) and reset its expiry to `ttl`, atomically.
    pub async fn increment_with_expiry(&self, key: &str, ttl: Duration) -> anyhow::Result<u64> {
        // INCR is not idempotent: a retry after a lost reply would count twice.
        let policy = RetryPolicy::no_retry(self.retry.timeout);
        let ttl_seconds = ttl.as_secs();

        with_retry("counter increment", policy, || async move {
            match &self.backend {
                CounterBackend::Memory(store) => store.incr_with_expiry(key, ttl_seconds).await,
                CounterBackend::Redis(store) => store.incr_with_expiry(key, ttl_seconds).await,
            }
        })
        .await
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CounterBackend::Memory(_) => Ok(()),
            CounterBackend::Redis(store) => {
                with_retry("counter ping", self.retry, || store.ping()).await
            }
        }
    }
}
