use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted proposal, read back for the GET endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProposalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rfp_text: String,
    pub platform: String,
    pub language: String,
    pub matched_item_ids: Vec<Uuid>,
    pub extracted: Value,
    pub analysis: Value,
    pub section_plan: Value,
    pub proposal_text: String,
    pub evaluation: Option<Value>,
    pub pricing: Option<Value>,
    pub timeline: Option<Value>,
    pub cta: Option<Value>,
    pub cover: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// A portfolio item as stored per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortfolioItemRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}
