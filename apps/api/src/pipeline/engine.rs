//! Multi-Stage Generation Engine — analysis → structure → write.
//!
//! Three sequential, non-skippable stages. Each stage's output is a typed
//! artifact passed by value to the next; Stage B cannot run without Stage A's
//! analysis and Stage C cannot run without Stage B's plan. A stage that
//! produces no parseable output is fatal to the whole generation — unlike the
//! extractor, these stages have no safe structural fallback.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{complete_json, CompletionParams, CompletionService};
use crate::pipeline::extractor::ExtractedRfp;
use crate::pipeline::matcher::MatchedPortfolioItem;
use crate::pipeline::options::{
    Language, LengthAdjustment, Platform, RfpTone, StyleId, ToneAdjustment,
};
use crate::pipeline::prompts;
use crate::pipeline::templates::ProposalTemplate;

/// Retries when a template-constrained plan does not conform.
const MAX_STRUCTURE_RETRIES: u32 = 2;
/// Token budget for the final prose call.
const WRITE_MAX_TOKENS: u32 = 3000;

/// The three engine stages, in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Analysis,
    Structuring,
    Writing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Analysis => "analysis",
            Stage::Structuring => "structuring",
            Stage::Writing => "writing",
        };
        f.write_str(name)
    }
}

/// Stage A output: strategic analysis, no proposal prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub key_goals: Vec<String>,
    pub pain_points: Vec<String>,
    pub differentiators: Vec<String>,
    pub positioning_angle: String,
}

/// One planned proposal section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedSection {
    pub name: String,
    pub summary: String,
}

/// Stage B output: the section plan Stage C expands into prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructurePlan {
    pub sections: Vec<PlannedSection>,
}

/// Resolved writing options for Stage C, computed once by the orchestrator.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub tone: RfpTone,
    pub band: (u16, u16),
    pub style: StyleId,
    pub language: Language,
    pub platform: Platform,
    pub company_name: Option<String>,
}

/// Tone precedence: explicit adjustment > stored user preference > tone
/// extracted from the RFP.
pub fn resolve_tone(
    adjustment: ToneAdjustment,
    user_preference: Option<RfpTone>,
    extracted: RfpTone,
) -> RfpTone {
    match adjustment {
        ToneAdjustment::MoreFormal => RfpTone::Formal,
        ToneAdjustment::MoreCasual => RfpTone::Casual,
        ToneAdjustment::Same => user_preference.unwrap_or(extracted),
    }
}

/// Word-count band resolution: a smart-length recommendation (computed
/// upstream from RFP complexity) overrides the requested adjustment.
pub fn resolve_word_band(
    requested: LengthAdjustment,
    smart_hint: Option<LengthAdjustment>,
) -> (u16, u16) {
    smart_hint.unwrap_or(requested).word_band()
}

/// True when the plan carries exactly the template's section names in the
/// template's order.
pub fn plan_conforms(plan: &StructurePlan, template: &ProposalTemplate) -> bool {
    plan.sections.len() == template.default_sections.len()
        && plan
            .sections
            .iter()
            .zip(template.default_sections.iter())
            .all(|(planned, expected)| {
                planned.name.trim().eq_ignore_ascii_case(expected.name)
            })
}

// ────────────────────────────────────────────────────────────────────────────
// Stage A — deep analysis
// ────────────────────────────────────────────────────────────────────────────

pub async fn run_analysis(
    llm: &dyn CompletionService,
    rfp_text: &str,
    extracted: &ExtractedRfp,
    intel_text: &str,
    matches: &[MatchedPortfolioItem],
) -> Result<AnalysisResult, AppError> {
    let prompt = build_analysis_prompt(rfp_text, extracted, intel_text, matches)?;
    complete_json(llm, prompts::ANALYSIS_SYSTEM, &prompt, CompletionParams::structured())
        .await
        .map_err(|e| AppError::GenerationStage {
            stage: Stage::Analysis,
            message: e.to_string(),
        })
}

pub fn build_analysis_prompt(
    rfp_text: &str,
    extracted: &ExtractedRfp,
    intel_text: &str,
    matches: &[MatchedPortfolioItem],
) -> Result<String, AppError> {
    let extracted_json = to_pretty_json(extracted)?;
    Ok(prompts::ANALYSIS_PROMPT_TEMPLATE
        .replace("{intelligence}", intel_text)
        .replace("{extracted_json}", &extracted_json)
        .replace("{matches_json}", &matches_json(matches)?)
        .replace("{rfp_text}", rfp_text))
}

// ────────────────────────────────────────────────────────────────────────────
// Stage B — strategic structuring
// ────────────────────────────────────────────────────────────────────────────

/// Runs Stage B. A template-constrained plan that does not conform to the
/// template's section names and order is retried a bounded number of times,
/// then fails the stage.
pub async fn run_structuring(
    llm: &dyn CompletionService,
    analysis: &AnalysisResult,
    template: Option<&ProposalTemplate>,
) -> Result<StructurePlan, AppError> {
    let prompt = build_structure_prompt(analysis, template)?;

    for attempt in 0..=MAX_STRUCTURE_RETRIES {
        let plan: StructurePlan =
            complete_json(llm, prompts::STRUCTURE_SYSTEM, &prompt, CompletionParams::structured())
                .await
                .map_err(|e| AppError::GenerationStage {
                    stage: Stage::Structuring,
                    message: e.to_string(),
                })?;

        match template {
            Some(t) if !plan_conforms(&plan, t) => {
                warn!(
                    "Structuring attempt {}/{}: plan did not match template '{}' sections — retrying",
                    attempt + 1,
                    MAX_STRUCTURE_RETRIES + 1,
                    t.id
                );
            }
            _ => {
                if plan.sections.is_empty() {
                    return Err(AppError::GenerationStage {
                        stage: Stage::Structuring,
                        message: "section plan was empty".to_string(),
                    });
                }
                return Ok(plan);
            }
        }
    }

    Err(AppError::GenerationStage {
        stage: Stage::Structuring,
        message: format!(
            "section plan did not conform to the template after {} attempts",
            MAX_STRUCTURE_RETRIES + 1
        ),
    })
}

pub fn build_structure_prompt(
    analysis: &AnalysisResult,
    template: Option<&ProposalTemplate>,
) -> Result<String, AppError> {
    let sections_directive = match template {
        Some(t) => {
            let names = t.section_names();
            let guidance: Vec<(&str, &str)> = t
                .default_sections
                .iter()
                .map(|s| (s.name, s.guidance))
                .collect();
            prompts::template_sections_directive(&names, &guidance, t.tone_hint)
        }
        None => prompts::DEFAULT_SECTIONS_DIRECTIVE.to_string(),
    };

    Ok(prompts::STRUCTURE_PROMPT_TEMPLATE
        .replace("{sections_directive}", &sections_directive)
        .replace("{analysis_json}", &to_pretty_json(analysis)?))
}

// ────────────────────────────────────────────────────────────────────────────
// Stage C — final writing
// ────────────────────────────────────────────────────────────────────────────

pub async fn run_writing(
    llm: &dyn CompletionService,
    rfp_text: &str,
    analysis: &AnalysisResult,
    plan: &StructurePlan,
    intel_text: &str,
    matches: &[MatchedPortfolioItem],
    opts: &WriteOptions,
) -> Result<String, AppError> {
    let prompt = build_writing_prompt(rfp_text, analysis, plan, intel_text, matches, opts)?;

    let text = llm
        .complete(prompts::PERSONA, &prompt, CompletionParams::prose(WRITE_MAX_TOKENS))
        .await
        .map_err(|e| AppError::GenerationStage {
            stage: Stage::Writing,
            message: e.to_string(),
        })?;

    if text.trim().is_empty() {
        return Err(AppError::GenerationStage {
            stage: Stage::Writing,
            message: "writing stage returned empty text".to_string(),
        });
    }

    Ok(text.trim().to_string())
}

pub fn build_writing_prompt(
    rfp_text: &str,
    analysis: &AnalysisResult,
    plan: &StructurePlan,
    intel_text: &str,
    matches: &[MatchedPortfolioItem],
    opts: &WriteOptions,
) -> Result<String, AppError> {
    let company_line = match &opts.company_name {
        Some(name) => format!("SENDER: write as {name}."),
        None => String::new(),
    };

    Ok(prompts::WRITE_PROMPT_TEMPLATE
        .replace("{banned_phrases}", &prompts::banned_phrase_block())
        .replace("{tone_directive}", prompts::tone_directive(opts.tone))
        .replace("{length_directive}", &prompts::length_directive(opts.band))
        .replace("{style_directive}", prompts::style_directive(opts.style))
        .replace("{language_directive}", &prompts::language_directive(opts.language))
        .replace("{platform}", opts.platform.as_str())
        .replace("{company_line}", &company_line)
        .replace("{intelligence}", intel_text)
        .replace("{plan_json}", &to_pretty_json(plan)?)
        .replace("{analysis_json}", &to_pretty_json(analysis)?)
        .replace("{matches_json}", &matches_json(matches)?)
        .replace("{rfp_text}", rfp_text))
}

// ────────────────────────────────────────────────────────────────────────────
// Shared serialization helpers
// ────────────────────────────────────────────────────────────────────────────

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize prompt input: {e}")))
}

fn matches_json(matches: &[MatchedPortfolioItem]) -> Result<String, AppError> {
    let compact: Vec<_> = matches
        .iter()
        .map(|m| {
            serde_json::json!({
                "title": m.item.title,
                "description": m.item.description,
                "tags": m.item.tags,
                "relevance": m.score,
            })
        })
        .collect();
    serde_json::to_string_pretty(&compact)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize matches: {e}")))
}
