use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::llm_client::CompletionService;
use crate::pipeline::matcher::PortfolioItem;
use crate::quota::QuotaGate;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable LLM backend. Production: AnthropicClient; tests inject mocks.
    pub llm: Arc<dyn CompletionService>,
    /// Per-user rate limit and monthly quota, checked before any LLM spend.
    pub quota: Arc<dyn QuotaGate>,
    /// Short-lived per-user portfolio cache in front of Postgres.
    pub portfolio_cache: TtlCache<Uuid, Vec<PortfolioItem>>,
    pub config: Config,
}
