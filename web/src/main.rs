//! Seatguard HTTP server: a high-contention seat-reservation engine.

use std::sync::Arc;
use std::time::Duration;

use seatguard_auth::TokenIssuer;
use seatguard_core::ReservationCore;
use seatguard_postgres::{PostgresRecordStore, PostgresUserStore};
use seatguard_redis::otp::OtpStore;
use seatguard_redis::rate_limiter::TokenBucketRateLimiter;
use seatguard_redis::RedisHotStateStore;
use seatguard_web::ports::{OtpProvider, RateLimiter, UserDirectory};
use seatguard_web::{build_router, seed, AppState, Config};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatguard=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting Seatguard");

    let config = Config::from_env();
    tracing::info!(
        postgres_url = %config.postgres.url,
        redis_url = %config.redis.url,
        "configuration loaded"
    );

    tracing::info!("connecting to Postgres...");
    let pg_pool = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .connect(&config.postgres.url)
        .await?;
    seatguard_postgres::run_migrations(&pg_pool).await?;
    let pg_pool = Arc::new(pg_pool);
    tracing::info!("Postgres connected and migrated");

    let record_store = PostgresRecordStore::new(pg_pool.clone());
    record_store.seed_if_empty(&seed::fixed_layout()).await?;
    let user_store = Arc::new(PostgresUserStore::new((*pg_pool).clone()));

    tracing::info!("connecting to Redis...");
    let hot_state_store = RedisHotStateStore::connect(&config.redis.url).await?;
    tracing::info!("Redis connected");

    let core = ReservationCore::new(Arc::new(hot_state_store.clone()), Arc::new(record_store));
    let otp = OtpStore::new(hot_state_store.connection());
    let rate_limiter = TokenBucketRateLimiter::new(hot_state_store.connection());
    let tokens = TokenIssuer::new(
        config.auth.jwt_secret.as_bytes(),
        Duration::from_secs(config.auth.token_ttl_secs),
    );

    let state = AppState {
        core,
        users: user_store as Arc<dyn UserDirectory>,
        otp: Arc::new(otp) as Arc<dyn OtpProvider>,
        tokens,
        rate_limiter: Arc::new(rate_limiter) as Arc<dyn RateLimiter>,
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Seatguard shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::warn!("shutdown signal received");
}
