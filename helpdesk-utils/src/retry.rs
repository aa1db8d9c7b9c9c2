use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

/// Per-attempt timeout plus a bounded number of retries with doubling backoff.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(200);

    /// One retry after [`Self::DEFAULT_BACKOFF`].
    pub const fn single_retry(timeout: Duration) -> Self {
        Self {
            timeout,
            retries: 1,
            backoff: Self::DEFAULT_BACKOFF,
        }
    }

    pub const fn no_retry(timeout: Duration) -> Self {
        Self {
            timeout,
            retries: 0,
            backoff: Duration::ZERO,
        }
    }
}

/// An error that retrying cannot fix (bad credential, rejected request).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct Permanent(pub String);

pub fn is_permanent(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<Permanent>())
}

/// Run `op` under `policy`. A timed-out attempt counts as a transient failure.
pub async fn with_retry<T, F, Fut>(label: &str, policy: RetryPolicy, mut op: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempt = 0_u32;
    let mut delay = policy.backoff;

    loop {
        let outcome = match tokio::time::timeout(policy.timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "{label} timed out after {}ms",
                policy.timeout.as_millis()
            )),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= policy.retries || is_permanent(&err) => return Err(err),
            Err(err) => {
                attempt += 1;
                warn!(
                    ?err,
                    operation = label,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "transient failure; retrying"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
        }
    }
}
