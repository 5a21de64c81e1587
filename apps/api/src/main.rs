mod cache;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod pipeline;
mod quota;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::AnthropicClient;
use crate::quota::RedisQuotaGate;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting proposal API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    // Initialize Redis-backed quota gate
    let redis = redis::Client::open(config.redis_url.clone())?;
    let quota = Arc::new(RedisQuotaGate::new(
        redis,
        config.monthly_quota,
        config.rate_limit_per_minute,
    ));
    info!(
        "Quota gate initialized ({}/month, {}/minute)",
        config.monthly_quota, config.rate_limit_per_minute
    );

    // Initialize LLM client
    let llm = Arc::new(AnthropicClient::new(config.anthropic_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let portfolio_cache = TtlCache::new(Duration::from_secs(config.portfolio_cache_ttl_secs));

    let state = AppState {
        db,
        llm,
        quota,
        portfolio_cache,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
