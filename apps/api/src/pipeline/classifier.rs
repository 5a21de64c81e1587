//! Industry Classifier — maps raw RFP text to an industry category plus a
//! concrete project type, tech stack, and deliverables.
//!
//! CRITICAL: misclassification cascades into wrong terminology and wrong pain
//! points through the whole pipeline. The trades/construction category may
//! only stand when the text contains an explicit trade keyword; that guard is
//! an allow-list in code, never model judgment. Classification reads raw text
//! alone — portfolio data must never flow in here.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::{complete_json, CompletionParams, CompletionService};
use crate::pipeline::intelligence;
use crate::pipeline::prompts::{CLASSIFY_PROMPT_TEMPLATE, CLASSIFY_SYSTEM};

/// The fixed set of industry categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Saas,
    Logistics,
    Construction,
    WebAgency,
    Consulting,
    Marketing,
}

impl Industry {
    pub fn as_str(self) -> &'static str {
        match self {
            Industry::Saas => "saas",
            Industry::Logistics => "logistics",
            Industry::Construction => "construction",
            Industry::WebAgency => "web_agency",
            Industry::Consulting => "consulting",
            Industry::Marketing => "marketing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Industry::Saas => "SaaS & Software",
            Industry::Logistics => "Logistics & Supply Chain",
            Industry::Construction => "Construction & Trades",
            Industry::WebAgency => "Web Design & Development",
            Industry::Consulting => "Business Consulting",
            Industry::Marketing => "Marketing & Growth",
        }
    }
}

/// Explicit trade keywords. Construction may only be selected when one of
/// these appears in the RFP text.
pub const TRADE_KEYWORDS: &[&str] = &[
    "construction",
    "contractor",
    "remodel",
    "renovation",
    "roofing",
    "plumbing",
    "electrical",
    "hvac",
    "landscaping",
    "carpentry",
    "masonry",
    "excavation",
    "demolition",
    "framing",
    "drywall",
    "siding",
];

pub fn has_trade_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    TRADE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Project-type labels too generic to drive terminology selection.
const GENERIC_PROJECT_TYPES: &[&str] = &[
    "project",
    "website",
    "web project",
    "application",
    "app",
    "software",
    "software project",
    "it project",
    "general",
];

/// Structured classification of an RFP, produced from raw text alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedProject {
    pub industry: Industry,
    pub industry_label: String,
    pub project_type: String,
    pub core_requirements: Vec<String>,
    pub tech_stack: Vec<String>,
    pub deliverables: Vec<String>,
    pub timeline: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    industry: Industry,
    project_type: String,
    #[serde(default)]
    core_requirements: Vec<String>,
    #[serde(default)]
    tech_stack: Vec<String>,
    #[serde(default)]
    deliverables: Vec<String>,
    #[serde(default)]
    timeline: Option<String>,
}

/// Classifies an RFP via one JSON-mode LLM call, then applies the
/// deterministic guard rails.
pub async fn classify(
    llm: &dyn CompletionService,
    rfp_text: &str,
) -> Result<ClassifiedProject, AppError> {
    let prompt = CLASSIFY_PROMPT_TEMPLATE.replace("{rfp_text}", rfp_text);
    let raw: RawClassification =
        complete_json(llm, CLASSIFY_SYSTEM, &prompt, CompletionParams::structured())
            .await
            .map_err(|e| AppError::Llm(format!("Industry classification failed: {e}")))?;

    Ok(finalize(raw, rfp_text))
}

fn finalize(raw: RawClassification, rfp_text: &str) -> ClassifiedProject {
    let industry = apply_trade_guard(raw.industry, rfp_text);
    let project_type = concrete_project_type(&raw.project_type, industry);

    ClassifiedProject {
        industry,
        industry_label: industry.label().to_string(),
        project_type,
        core_requirements: raw.core_requirements,
        tech_stack: raw.tech_stack,
        deliverables: raw.deliverables,
        timeline: raw.timeline,
    }
}

/// Construction stands only with an explicit trade keyword in the text;
/// otherwise the classification is re-routed by secondary keyword hits.
pub fn apply_trade_guard(industry: Industry, rfp_text: &str) -> Industry {
    if industry == Industry::Construction && !has_trade_keyword(rfp_text) {
        intelligence::reroute_from_construction(&rfp_text.to_lowercase())
    } else {
        industry
    }
}

/// Replaces generic labels with a concrete, industry-specific default.
fn concrete_project_type(raw: &str, industry: Industry) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || GENERIC_PROJECT_TYPES.contains(&trimmed.to_lowercase().as_str()) {
        default_project_type(industry).to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn default_project_type(industry: Industry) -> &'static str {
    match industry {
        Industry::Saas => "SaaS MVP",
        Industry::Logistics => "Logistics Tracking Platform",
        Industry::Construction => "Contractor Lead-Generation Website",
        Industry::WebAgency => "Marketing Website Redesign",
        Industry::Consulting => "Strategy Engagement",
        Industry::Marketing => "Growth Campaign",
    }
}
