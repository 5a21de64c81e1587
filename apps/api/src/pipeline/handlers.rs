use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::proposal::{PortfolioItemRow, ProposalRow};
use crate::pipeline::extractor::{extract, ExtractedRfp};
use crate::pipeline::generator::{generate_proposal, GenerateResponse, GenerationRequest};
use crate::pipeline::matcher::PortfolioItem;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ExtractRequest {
    pub rfp_text: String,
}

/// POST /api/v1/proposals/extract
/// Extraction preview: structured RFP data without generating anything.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractedRfp>, AppError> {
    if req.rfp_text.trim().is_empty() {
        return Err(AppError::Validation("RFP text must not be empty".to_string()));
    }
    let extracted = extract(state.llm.as_ref(), &req.rfp_text).await?;
    Ok(Json(extracted))
}

/// POST /api/v1/proposals
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerationRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let portfolio = load_portfolio(&state, req.user_id).await?;
    let response = generate_proposal(
        &state.db,
        state.llm.as_ref(),
        state.quota.as_ref(),
        portfolio,
        req,
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/proposals/:id
pub async fn handle_get_proposal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProposalRow>, AppError> {
    let row: Option<ProposalRow> = sqlx::query_as("SELECT * FROM proposals WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;

    row.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Proposal {id} not found")))
}

/// Loads a user's portfolio, through the short-lived in-process cache.
async fn load_portfolio(state: &AppState, user_id: Uuid) -> Result<Vec<PortfolioItem>, AppError> {
    if let Some(items) = state.portfolio_cache.get(&user_id) {
        return Ok(items);
    }

    let rows: Vec<PortfolioItemRow> = sqlx::query_as(
        "SELECT * FROM portfolio_items WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    let items: Vec<PortfolioItem> = rows
        .into_iter()
        .map(|row| PortfolioItem {
            id: row.id,
            title: row.title,
            description: row.description,
            tags: row.tags,
        })
        .collect();

    state.portfolio_cache.insert(user_id, items.clone());
    Ok(items)
}
