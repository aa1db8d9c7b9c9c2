use std::time::Duration;

use chrono::NaiveDate;
use helpdesk_utils::time::{SECONDS_PER_DAY, day_key, today};
use tracing::{debug, warn};

use crate::counter::CounterService;

pub const DEFAULT_DAILY_LIMIT: u64 = 50;

/// What to do when the counter store cannot be reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Admit the request; availability over quota enforcement.
    #[default]
    Open,
    /// Deny the request.
    Closed,
}

impl FailurePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    fn admits_on_error(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Per-identity, per-calendar-day request quota.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    counters: CounterService,
    daily_limit: u64,
    failure_policy: FailurePolicy,
}

impl RateLimiter {
    pub fn new(counters: CounterService, daily_limit: u64, failure_policy: FailurePolicy) -> Self {
        Self {
            counters,
            daily_limit,
            failure_policy,
        }
    }

    pub fn daily_limit(&self) -> u64 {
        self.daily_limit
    }

    /// Count one request against today's quota, or deny once it is spent.
    pub async fn admit(&self, identity: &str) -> bool {
        self.admit_on(identity, today()).await
    }

    pub async fn admit_on(&self, identity: &str, day: NaiveDate) -> bool {
        match self.try_admit(identity, day).await {
            Ok(admitted) => admitted,
            Err(err) => {
                let admitted = self.failure_policy.admits_on_error();
                warn!(
                    ?err,
                    identity,
                    policy = self.failure_policy.as_str(),
                    admitted,
                    "rate limit check failed; applying failure policy"
                );
                admitted
            }
        }
    }

    /// Quota left today. Store failures report zero.
    pub async fn remaining(&self, identity: &str) -> u64 {
        self.remaining_on(identity, today()).await
    }

    pub async fn remaining_on(&self, identity: &str, day: NaiveDate) -> u64 {
        let key = self.record_key(identity, day);
        match self.counters.get_count(&key).await {
            Ok(count) => self.daily_limit.saturating_sub(count.unwrap_or(0)),
            Err(err) => {
                warn!(?err, identity, "remaining quota lookup failed");
                0
            }
        }
    }

    async fn try_admit(&self, identity: &str, day: NaiveDate) -> anyhow::Result<bool> {
        let key = self.record_key(identity, day);
        let current = self.counters.get_count(&key).await?.unwrap_or(0);

        if current >= self.daily_limit {
            debug!(identity, current, limit = self.daily_limit, "daily quota exhausted");
            return Ok(false);
        }

        self.counters
            .increment_with_expiry(&key, Duration::from_secs(SECONDS_PER_DAY))
            .await?;

        Ok(true)
    }

    fn record_key(&self, identity: &str, day: NaiveDate) -> String {
        self.counters
            .key(format!("rate_limit:{identity}:{}", day_key(day)))
    }
}
