use anyhow::Context as _;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use helpdesk_core::config::RedisSettings;
use helpdesk_core::{AppConfig, AppState};
use helpdesk_store::CounterService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the .env file before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    for warning in config.warnings() {
        warn!("{warning}");
    }
    info!(
        mode = %config.mode,
        backend = config.completion.name(),
        model = config.completion.model(),
        daily_limit = config.daily_limit,
        failure_policy = config.failure_policy.as_str(),
        "configuration loaded."
    );

    let counters = counter_service(&config.redis);
    if counters.is_redis_enabled() {
        if let Err(err) = counters.ping().await {
            warn!(
                ?err,
                "Redis ping failed; rate limiting will apply its failure policy until it recovers."
            );
        } else {
            info!("Redis health check passed.");
        }
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config, counters)?;

    for route in helpdesk_routes::ROUTES {
        info!(method = route.method, path = route.path, "{}", route.desc);
    }

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "helpdesk is listening.");

    axum::serve(listener, helpdesk_routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("helpdesk stopped.");
    Ok(())
}

fn counter_service(settings: &RedisSettings) -> CounterService {
    let prefix = settings.key_prefix.clone();

    if !settings.enabled {
        info!("Redis disabled (set REDIS_ENABLED=true to enable); counting in memory.");
        return CounterService::memory(prefix);
    }

    match settings.url.as_deref() {
        Some(redis_url) => match CounterService::redis(redis_url, prefix.clone()) {
            Ok(counters) => {
                info!(key_prefix = %prefix, "Redis counter store enabled.");
                counters
            }
            Err(err) => {
                warn!(?err, key_prefix = %prefix, "Failed to initialize Redis; counting in memory.");
                CounterService::memory(prefix)
            }
        },
        None => {
            warn!(key_prefix = %prefix, "REDIS_ENABLED=true but REDIS_URL is missing; counting in memory.");
            CounterService::memory(prefix)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(?err, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(?err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; draining connections.");
}
