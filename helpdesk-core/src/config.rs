use std::env;
use std::time::Duration;

use helpdesk_llm::BackendConfig;
use helpdesk_llm::client::{
    DEFAULT_COMPLETION_TIMEOUT, DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_PORT,
    DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
};
use helpdesk_store::counter::DEFAULT_COUNTER_TIMEOUT;
use helpdesk_store::{DEFAULT_DAILY_LIMIT, FailurePolicy};
use helpdesk_utils::parse::{parse_flag, parse_u64};
use tracing::warn;

use crate::mode::Mode;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_REDIS_KEY_PREFIX: &str = "helpdesk";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedisSettings {
    pub enabled: bool,
    pub url: Option<String>,
    pub key_prefix: String,
}

/// Process configuration, read once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub mode: Mode,
    /// Raw `DEMO_MODE` value when it named no known mode.
    pub unrecognized_mode: Option<String>,
    pub demo_password: Option<String>,
    pub daily_limit: u64,
    pub failure_policy: FailurePolicy,
    pub completion: BackendConfig,
    pub completion_timeout: Duration,
    pub counter_timeout: Duration,
    /// Adds `Secure` to the auth cookie.
    pub secure_cookies: bool,
    pub redis: RedisSettings,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset; unparsable
    /// numbers and zero timeouts fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let raw_mode = get("DEMO_MODE");
        let resolution = Mode::resolve(raw_mode.as_deref());
        let unrecognized_mode = raw_mode.filter(|_| !resolution.recognized);

        let failure_policy = match get("RATE_LIMIT_FAILURE_POLICY") {
            Some(raw) => FailurePolicy::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "unknown RATE_LIMIT_FAILURE_POLICY; using open");
                FailurePolicy::Open
            }),
            None => FailurePolicy::default(),
        };

        let completion = match get("COMPLETION_BACKEND").as_deref() {
            Some("ollama") => BackendConfig::Ollama {
                host: get("OLLAMA_HOST").unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_owned()),
                port: get("OLLAMA_PORT")
                    .and_then(|value| value.parse::<u16>().ok())
                    .unwrap_or(DEFAULT_OLLAMA_PORT),
                model: get("COMPLETION_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_owned()),
            },
            other => {
                if let Some(other) = other.filter(|name| *name != "openai") {
                    warn!(value = other, "unknown COMPLETION_BACKEND; using openai");
                }
                BackendConfig::OpenAi {
                    base_url: get("COMPLETION_BASE_URL")
                        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_owned()),
                    model: get("COMPLETION_MODEL")
                        .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_owned()),
                    api_key: get("OPENAI_API_KEY"),
                }
            }
        };

        let number = |key: &str, default: u64| match get(key) {
            Some(raw) => parse_u64(&raw).unwrap_or_else(|| {
                warn!(key, value = %raw, default, "invalid number; using default");
                default
            }),
            None => default,
        };
        let nonzero = |key: &str, default: u64| match number(key, default) {
            0 => {
                warn!(key, default, "zero is not a usable timeout; using default");
                default
            }
            value => value,
        };

        Self {
            mode: resolution.mode,
            unrecognized_mode,
            demo_password: get("DEMO_PASSWORD"),
            daily_limit: number("RATE_LIMIT_PER_DAY", DEFAULT_DAILY_LIMIT),
            failure_policy,
            completion,
            completion_timeout: Duration::from_secs(nonzero(
                "COMPLETION_TIMEOUT_SECS",
                DEFAULT_COMPLETION_TIMEOUT.as_secs(),
            )),
            counter_timeout: Duration::from_millis(nonzero(
                "COUNTER_TIMEOUT_MS",
                u64::try_from(DEFAULT_COUNTER_TIMEOUT.as_millis()).unwrap_or(500),
            )),
            secure_cookies: get("APP_ENV").is_some_and(|value| value == "production"),
            redis: RedisSettings {
                enabled: get("REDIS_ENABLED").is_some_and(|value| parse_flag(&value)),
                url: get("REDIS_URL"),
                key_prefix: get("REDIS_KEY_PREFIX")
                    .unwrap_or_else(|| DEFAULT_REDIS_KEY_PREFIX.to_owned()),
            },
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned()),
        }
    }

    /// Settings that will make some requests fail in the configured mode.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(raw) = &self.unrecognized_mode {
            warnings.push(format!(
                "DEMO_MODE={raw:?} is not mock, demo or production; running in production mode"
            ));
        }

        if self.mode == Mode::Demo {
            if !self.completion.has_credential() {
                warnings.push("OPENAI_API_KEY is not set; chat requests will fail".to_owned());
            }
            if self.demo_password.is_none() {
                warnings.push("DEMO_PASSWORD is not set; /auth will report CONFIG_ERROR".to_owned());
            }
        }

        warnings
    }
}
