pub mod counter;
pub mod impls;

pub use counter::CounterService;
pub use impls::rate_limit::{DEFAULT_DAILY_LIMIT, FailurePolicy, RateLimiter};
