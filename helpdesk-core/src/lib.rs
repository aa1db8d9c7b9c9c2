pub mod config;
pub mod faq;
pub mod mode;

use std::sync::Arc;

use anyhow::Context as _;
use helpdesk_llm::CompletionGateway;
use helpdesk_store::{CounterService, RateLimiter};
use helpdesk_utils::retry::RetryPolicy;

pub use config::AppConfig;
pub use mode::Mode;

/// Shared request state. Built once at startup; cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub limiter: RateLimiter,
    pub gateway: CompletionGateway,
}

impl AppState {
    pub fn new(config: AppConfig, mut counters: CounterService) -> anyhow::Result<Self> {
        counters.configure_retry(RetryPolicy::single_retry(config.counter_timeout));

        let limiter = RateLimiter::new(counters, config.daily_limit, config.failure_policy);
        let gateway = CompletionGateway::new(&config.completion, config.completion_timeout)
            .context("failed to build completion gateway")?;

        Ok(Self {
            config: Arc::new(config),
            limiter,
            gateway,
        })
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }
}
