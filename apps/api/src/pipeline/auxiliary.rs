//! Auxiliary generators — pricing table, delivery timeline, smart CTA, and
//! cover page.
//!
//! Each is one independent JSON-mode LLM call with a narrow contract. They
//! depend on the Stage C text but not on each other, so the orchestrator runs
//! them concurrently and degrades any single failure to an absent field.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{complete_json, CompletionParams, CompletionService};
use crate::pipeline::extractor::ExtractedRfp;
use crate::pipeline::options::Platform;
use crate::pipeline::prompts::{
    COVER_PROMPT_TEMPLATE, COVER_SYSTEM, CTA_PROMPT_TEMPLATE, CTA_SYSTEM,
    PRICING_PROMPT_TEMPLATE, PRICING_SYSTEM, TIMELINE_PROMPT_TEMPLATE, TIMELINE_SYSTEM,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTier {
    pub name: String,
    pub price: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTable {
    pub tiers: Vec<PricingTier>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePhase {
    pub name: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePlan {
    pub phases: Vec<TimelinePhase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartCta {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverPage {
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub tagline: Option<String>,
}

pub async fn pricing_table(
    llm: &dyn CompletionService,
    proposal_text: &str,
    extracted: &ExtractedRfp,
    project_value: Option<f64>,
) -> Result<PricingTable, AppError> {
    let value_line = match project_value {
        Some(value) => format!("TARGET PROJECT VALUE: anchor the middle tier near ${value:.0}."),
        None => String::new(),
    };
    let prompt = PRICING_PROMPT_TEMPLATE
        .replace("{value_line}", &value_line)
        .replace("{deliverables}", &extracted.deliverables.join("; "))
        .replace("{proposal_text}", proposal_text);

    complete_json(llm, PRICING_SYSTEM, &prompt, CompletionParams::structured())
        .await
        .map_err(|e| AppError::Auxiliary(format!("pricing table: {e}")))
}

pub async fn timeline_plan(
    llm: &dyn CompletionService,
    proposal_text: &str,
    extracted: &ExtractedRfp,
) -> Result<TimelinePlan, AppError> {
    let timeline_line = match &extracted.timeline {
        Some(t) => format!("CLIENT TIMELINE: the client expects {t}."),
        None => String::new(),
    };
    let prompt = TIMELINE_PROMPT_TEMPLATE
        .replace("{timeline_line}", &timeline_line)
        .replace("{proposal_text}", proposal_text);

    complete_json(llm, TIMELINE_SYSTEM, &prompt, CompletionParams::structured())
        .await
        .map_err(|e| AppError::Auxiliary(format!("timeline: {e}")))
}

pub async fn smart_cta(
    llm: &dyn CompletionService,
    proposal_text: &str,
    platform: Platform,
) -> Result<SmartCta, AppError> {
    let prompt = CTA_PROMPT_TEMPLATE
        .replace("{platform}", platform.as_str())
        .replace("{proposal_text}", proposal_text);

    complete_json(llm, CTA_SYSTEM, &prompt, CompletionParams::structured())
        .await
        .map_err(|e| AppError::Auxiliary(format!("smart CTA: {e}")))
}

pub async fn cover_page(
    llm: &dyn CompletionService,
    proposal_text: &str,
    company_name: Option<&str>,
    client_name: Option<&str>,
) -> Result<CoverPage, AppError> {
    let company_line = company_name
        .map(|n| format!("SENDER: {n}."))
        .unwrap_or_default();
    let client_line = client_name
        .map(|n| format!("CLIENT: {n}."))
        .unwrap_or_default();
    let prompt = COVER_PROMPT_TEMPLATE
        .replace("{company_line}", &company_line)
        .replace("{client_line}", &client_line)
        .replace("{proposal_text}", proposal_text);

    complete_json(llm, COVER_SYSTEM, &prompt, CompletionParams::structured())
        .await
        .map_err(|e| AppError::Auxiliary(format!("cover page: {e}")))
}

/// Degrades an auxiliary failure to `None` with a warning. A failed
/// enrichment never aborts the overall generation.
pub fn degrade<T>(label: &str, result: Result<T, AppError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{label} generator failed, continuing without it: {e}");
            None
        }
    }
}
