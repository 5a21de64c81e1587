//! Quota and rate-limit gating.
//!
//! The gate runs before the first LLM call of a generation request; a
//! rejection here must prevent any provider spend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use uuid::Uuid;

use crate::errors::AppError;

/// Entry gate for the generation pipeline.
/// Carried in `AppState` as `Arc<dyn QuotaGate>`.
#[async_trait]
pub trait QuotaGate: Send + Sync {
    async fn check(&self, user_id: Uuid) -> Result<(), AppError>;
}

/// Gate that admits everything. Used in tests and local development.
pub struct UnlimitedQuota;

#[async_trait]
impl QuotaGate for UnlimitedQuota {
    async fn check(&self, _user_id: Uuid) -> Result<(), AppError> {
        Ok(())
    }
}

const MINUTE_WINDOW_SECS: i64 = 60;
// Month keys outlive the calendar month by a day so a request at 23:59 on the
// last day still counts against the right window.
const MONTH_KEY_TTL_SECS: i64 = 32 * 24 * 3600;

/// Redis-backed gate: fixed-window per-minute rate limit plus a calendar-month
/// proposal quota. Both use INCR-with-expiry counters.
pub struct RedisQuotaGate {
    client: redis::Client,
    monthly_limit: u64,
    per_minute_limit: u64,
}

impl RedisQuotaGate {
    pub fn new(client: redis::Client, monthly_limit: u64, per_minute_limit: u64) -> Self {
        Self {
            client,
            monthly_limit,
            per_minute_limit,
        }
    }
}

#[async_trait]
impl QuotaGate for RedisQuotaGate {
    async fn check(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Redis connection failed: {e}")))?;

        let now = Utc::now();

        let rate_key = minute_key(user_id, now);
        let in_window: u64 = conn
            .incr(&rate_key, 1u64)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Redis INCR failed: {e}")))?;
        if in_window == 1 {
            let _: () = conn
                .expire(&rate_key, MINUTE_WINDOW_SECS)
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Redis EXPIRE failed: {e}")))?;
        }
        if in_window > self.per_minute_limit {
            return Err(AppError::RateLimited {
                retry_after_secs: MINUTE_WINDOW_SECS as u64,
            });
        }

        let quota_key = month_key(user_id, now);
        let used: u64 = conn
            .incr(&quota_key, 1u64)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Redis INCR failed: {e}")))?;
        if used == 1 {
            let _: () = conn
                .expire(&quota_key, MONTH_KEY_TTL_SECS)
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Redis EXPIRE failed: {e}")))?;
        }
        if used > self.monthly_limit {
            return Err(AppError::QuotaExceeded {
                used,
                limit: self.monthly_limit,
            });
        }

        Ok(())
    }
}

fn minute_key(user_id: Uuid, now: DateTime<Utc>) -> String {
    format!("rl:{user_id}:{}", now.format("%Y%m%d%H%M"))
}

fn month_key(user_id: Uuid, now: DateTime<Utc>) -> String {
    format!("quota:{user_id}:{}", now.format("%Y%m"))
}
