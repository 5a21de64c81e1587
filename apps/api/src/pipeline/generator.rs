//! Proposal Generation — orchestrates the full pipeline.
//!
//! Flow: extract → intelligence lookup → portfolio match → analysis →
//!       structuring → writing → evaluation → auxiliary generators →
//!       persist to DB → return response.
//!
//! The quota gate runs before any LLM call. Evaluation and auxiliary
//! failures degrade to absent fields; only validation, quota, and engine
//! stage failures abort the request.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::CompletionService;
use crate::pipeline::auxiliary::{
    self, cover_page, pricing_table, smart_cta, timeline_plan, CoverPage, PricingTable, SmartCta,
    TimelinePlan,
};
use crate::pipeline::engine::{
    self, resolve_tone, resolve_word_band, AnalysisResult, StructurePlan, WriteOptions,
};
use crate::pipeline::evaluator::{evaluate, QualityEvaluation};
use crate::pipeline::extractor::{extract, ExtractedRfp};
use crate::pipeline::intelligence;
use crate::pipeline::matcher::{match_portfolio, MatchedPortfolioItem, PortfolioItem, DEFAULT_TOP_N};
use crate::pipeline::options::{
    Language, LengthAdjustment, Platform, RfpTone, StyleId, ToneAdjustment,
};
use crate::pipeline::templates::{template_by_id, ProposalTemplate};
use crate::quota::QuotaGate;

// ────────────────────────────────────────────────────────────────────────────
// Request / response models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for proposal generation. Every customization field has a
/// neutral default so the minimal request is just a user id and RFP text.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub user_id: Uuid,
    pub rfp_text: String,
    /// The user's own stated industry. Treated as a nominal hint: it goes
    /// through the same drift-guarded keyword routing as classifier output.
    #[serde(default)]
    pub user_industry: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    /// Stored user tone preference; loses to an explicit `tone_adjustment`.
    #[serde(default)]
    pub tone_preference: Option<RfpTone>,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub project_value: Option<f64>,
    #[serde(default)]
    pub style: StyleId,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_true")]
    pub include_pricing: bool,
    #[serde(default)]
    pub length_adjustment: LengthAdjustment,
    #[serde(default)]
    pub tone_adjustment: ToneAdjustment,
    /// Length recommendation computed upstream from RFP complexity; when
    /// present it overrides `length_adjustment`.
    #[serde(default)]
    pub smart_length_hint: Option<LengthAdjustment>,
    #[serde(default)]
    pub template_id: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Everything the pipeline produced for one request, before persistence.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub proposal_text: String,
    pub extracted: ExtractedRfp,
    pub matches: Vec<MatchedPortfolioItem>,
    pub analysis: AnalysisResult,
    pub plan: StructurePlan,
    pub evaluation: Option<QualityEvaluation>,
    pub pricing: Option<PricingTable>,
    pub timeline: Option<TimelinePlan>,
    pub cta: Option<SmartCta>,
    pub cover: Option<CoverPage>,
}

/// Response from the generation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub proposal_id: Uuid,
    pub proposal_text: String,
    pub extracted: ExtractedRfp,
    pub matches: Vec<MatchedPortfolioItem>,
    pub evaluation: Option<QualityEvaluation>,
    pub pricing: Option<PricingTable>,
    pub timeline: Option<TimelinePlan>,
    pub cta: Option<SmartCta>,
    pub cover: Option<CoverPage>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

fn resolve_template(id: Option<&str>) -> Result<Option<&'static ProposalTemplate>, AppError> {
    match id {
        None => Ok(None),
        Some(id) => template_by_id(id)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Unknown template id: {id}"))),
    }
}

/// Runs the pipeline without touching quota or the database. This is the
/// whole generation semantics; `generate_proposal` wraps it with the quota
/// gate and persistence.
pub async fn run_pipeline(
    llm: &dyn CompletionService,
    portfolio: Vec<PortfolioItem>,
    request: &GenerationRequest,
) -> Result<PipelineOutput, AppError> {
    if request.rfp_text.trim().is_empty() {
        return Err(AppError::Validation("RFP text must not be empty".to_string()));
    }
    let template = resolve_template(request.template_id.as_deref())?;

    let mut extracted = extract(llm, &request.rfp_text).await?;

    // The knowledge block is selected by keyword-priority routing over the
    // actual text, not by the nominal label alone, so classifier drift (or a
    // wrong user-supplied industry) cannot pick the wrong vocabulary.
    let nominal = request
        .user_industry
        .as_deref()
        .unwrap_or_else(|| extracted.industry.as_str());
    let intel = intelligence::lookup(
        nominal,
        extracted.project_type.as_deref(),
        &request.rfp_text,
    );
    extracted.industry = intel.industry;
    extracted.industry_label = intel.industry.label().to_string();
    info!(
        "RFP extracted: industry={}, degraded={}",
        extracted.industry.as_str(),
        extracted.degraded
    );

    let intel_text = intelligence::render_intelligence(intel);

    let matches = match_portfolio(
        portfolio,
        &request.rfp_text,
        &extracted.skills,
        DEFAULT_TOP_N,
    );
    info!("Matched {} portfolio items", matches.len());

    let analysis =
        engine::run_analysis(llm, &request.rfp_text, &extracted, &intel_text, &matches).await?;
    let plan = engine::run_structuring(llm, &analysis, template).await?;

    let opts = WriteOptions {
        tone: resolve_tone(request.tone_adjustment, request.tone_preference, extracted.tone),
        band: resolve_word_band(request.length_adjustment, request.smart_length_hint),
        style: request.style,
        language: request.language,
        platform: request.platform,
        company_name: request.company_name.clone(),
    };

    let proposal_text = engine::run_writing(
        llm,
        &request.rfp_text,
        &analysis,
        &plan,
        &intel_text,
        &matches,
        &opts,
    )
    .await?;

    let evaluation = match evaluate(
        llm,
        &proposal_text,
        &request.rfp_text,
        request.platform,
        extracted.industry,
    )
    .await
    {
        Ok(eval) => Some(eval),
        Err(e) => {
            warn!("Quality evaluation failed, storing proposal without a score: {e}");
            None
        }
    };

    // Independent enrichments: run concurrently, degrade individually.
    let (pricing, timeline, cta, cover) = tokio::join!(
        async {
            if request.include_pricing {
                auxiliary::degrade(
                    "pricing table",
                    pricing_table(llm, &proposal_text, &extracted, request.project_value).await,
                )
            } else {
                None
            }
        },
        async {
            auxiliary::degrade(
                "timeline",
                timeline_plan(llm, &proposal_text, &extracted).await,
            )
        },
        async {
            auxiliary::degrade(
                "smart CTA",
                smart_cta(llm, &proposal_text, request.platform).await,
            )
        },
        async {
            auxiliary::degrade(
                "cover page",
                cover_page(
                    llm,
                    &proposal_text,
                    request.company_name.as_deref(),
                    extracted.client_name.as_deref(),
                )
                .await,
            )
        },
    );

    Ok(PipelineOutput {
        proposal_text,
        extracted,
        matches,
        analysis,
        plan,
        evaluation,
        pricing,
        timeline,
        cta,
        cover,
    })
}

/// Full generation: quota gate → pipeline → persist → response.
pub async fn generate_proposal(
    pool: &PgPool,
    llm: &dyn CompletionService,
    quota: &dyn QuotaGate,
    portfolio: Vec<PortfolioItem>,
    request: GenerationRequest,
) -> Result<GenerateResponse, AppError> {
    // Quota is consumed per attempt, before any LLM spend.
    quota.check(request.user_id).await?;

    let output = run_pipeline(llm, portfolio, &request).await?;

    let proposal_id = Uuid::new_v4();
    let matched_item_ids: Vec<Uuid> = output.matches.iter().map(|m| m.item.id).collect();
    let extracted_value = to_json_value(&output.extracted, "ExtractedRfp")?;
    let analysis_value = to_json_value(&output.analysis, "AnalysisResult")?;
    let plan_value = to_json_value(&output.plan, "StructurePlan")?;
    let evaluation_value = output
        .evaluation
        .as_ref()
        .map(|e| to_json_value(e, "QualityEvaluation"))
        .transpose()?;
    let pricing_value = output
        .pricing
        .as_ref()
        .map(|p| to_json_value(p, "PricingTable"))
        .transpose()?;
    let timeline_value = output
        .timeline
        .as_ref()
        .map(|t| to_json_value(t, "TimelinePlan"))
        .transpose()?;
    let cta_value = output
        .cta
        .as_ref()
        .map(|c| to_json_value(c, "SmartCta"))
        .transpose()?;
    let cover_value = output
        .cover
        .as_ref()
        .map(|c| to_json_value(c, "CoverPage"))
        .transpose()?;

    sqlx::query(
        r#"
        INSERT INTO proposals
            (id, user_id, rfp_text, platform, language, matched_item_ids, extracted,
             analysis, section_plan, proposal_text, evaluation, pricing, timeline,
             cta, cover)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(proposal_id)
    .bind(request.user_id)
    .bind(&request.rfp_text)
    .bind(request.platform.as_str())
    .bind(request.language.as_str())
    .bind(&matched_item_ids)
    .bind(&extracted_value)
    .bind(&analysis_value)
    .bind(&plan_value)
    .bind(&output.proposal_text)
    .bind(&evaluation_value)
    .bind(&pricing_value)
    .bind(&timeline_value)
    .bind(&cta_value)
    .bind(&cover_value)
    .execute(pool)
    .await?;

    info!(
        "Generated proposal {} for user {} (score: {})",
        proposal_id,
        request.user_id,
        output
            .evaluation
            .as_ref()
            .map(|e| e.score.to_string())
            .unwrap_or_else(|| "unscored".to_string())
    );

    Ok(GenerateResponse {
        proposal_id,
        proposal_text: output.proposal_text,
        extracted: output.extracted,
        matches: output.matches,
        evaluation: output.evaluation,
        pricing: output.pricing,
        timeline: output.timeline,
        cta: output.cta,
        cover: output.cover,
    })
}

fn to_json_value<T: Serialize>(value: &T, what: &str) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{CompletionParams, LlmError};
    use crate::pipeline::classifier::Industry;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const CLASSIFY_JSON: &str = r#"{
        "industry": "saas",
        "project_type": "SaaS MVP",
        "core_requirements": ["User authentication", "Billing"],
        "tech_stack": ["React", "Stripe"],
        "deliverables": ["Working MVP"],
        "timeline": "8 weeks"
    }"#;

    const EXTRACT_JSON: &str = r#"{
        "requirements": ["OAuth login", "Stripe subscriptions"],
        "deliverables": ["Working MVP", "Analytics dashboard"],
        "budget": "$15,000",
        "timeline": "8 weeks",
        "red_flags": [],
        "client_name": "Acme Inc",
        "project_type": "SaaS MVP",
        "skills": ["react", "stripe"],
        "tone": "professional"
    }"#;

    const ANALYSIS_JSON: &str = r#"{
        "key_goals": ["Launch a billable MVP in 8 weeks"],
        "pain_points": ["Losing customers to slow onboarding"],
        "differentiators": ["Shipped three comparable SaaS dashboards"],
        "positioning_angle": "Fastest credible path to revenue"
    }"#;

    const PLAN_JSON: &str = r#"{"sections": [
        {"name": "opening_hook", "summary": "Mirror the 8-week deadline"},
        {"name": "problem_reframe", "summary": "Onboarding speed is the real goal"},
        {"name": "approach", "summary": "Two milestones, auth first"},
        {"name": "deliverables", "summary": "MVP plus analytics dashboard"},
        {"name": "investment", "summary": "Anchor against churn cost"},
        {"name": "call_to_action", "summary": "Offer a kickoff call"}
    ]}"#;

    const EVAL_JSON: &str = r#"{
        "score": 78,
        "strengths": ["Specific"],
        "weaknesses": [],
        "suggestions": [],
        "criteria": {
            "clarity": 8, "relevance": 8, "industry_alignment": 8,
            "tone_accuracy": 7, "differentiator_strength": 7,
            "structure": 8, "platform_fit": 8
        }
    }"#;

    const PRICING_JSON: &str =
        r#"{"tiers": [{"name": "Standard", "price": "$15,000", "description": "Full MVP"}]}"#;
    const TIMELINE_JSON: &str =
        r#"{"phases": [{"name": "Discovery", "duration": "1 week", "description": "Scope"}]}"#;
    const CTA_JSON: &str = r#"{"text": "Free for a 20-minute call Thursday?"}"#;
    const COVER_JSON: &str =
        r#"{"title": "SaaS MVP Proposal", "subtitle": "Prepared for Acme Inc"}"#;
    const PROPOSAL_TEXT: &str = "Your 8-week deadline is doable. Here's exactly how.";

    const MISCLASSIFIED_JSON: &str = r#"{
        "industry": "marketing",
        "project_type": "Growth Campaign",
        "core_requirements": ["User authentication", "Billing"],
        "tech_stack": ["React", "Stripe"],
        "deliverables": ["Working MVP"],
        "timeline": "8 weeks"
    }"#;

    /// Routes each call on distinctive system-prompt text and records the
    /// prompts it saw, so tests can assert on what each stage received.
    struct RecordingCompletion {
        prompts: Mutex<Vec<(String, String)>>,
        classify_json: &'static str,
        fail_evaluation: bool,
        fail_pricing: bool,
    }

    impl RecordingCompletion {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                classify_json: CLASSIFY_JSON,
                fail_evaluation: false,
                fail_pricing: false,
            }
        }

        fn prompt_for(&self, system_fragment: &str) -> String {
            self.prompts
                .lock()
                .unwrap()
                .iter()
                .find(|(system, _)| system.contains(system_fragment))
                .map(|(_, prompt)| prompt.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl CompletionService for RecordingCompletion {
        async fn complete(
            &self,
            system: &str,
            prompt: &str,
            _params: CompletionParams,
        ) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));

            if system.contains("classifier") {
                Ok(self.classify_json.to_string())
            } else if system.contains("RFP analyst") {
                Ok(EXTRACT_JSON.to_string())
            } else if system.contains("strategist") {
                Ok(ANALYSIS_JSON.to_string())
            } else if system.contains("architect") {
                Ok(PLAN_JSON.to_string())
            } else if system.contains("quality evaluator") {
                if self.fail_evaluation {
                    Err(LlmError::EmptyContent)
                } else {
                    Ok(EVAL_JSON.to_string())
                }
            } else if system.contains("pricing tables") {
                if self.fail_pricing {
                    Err(LlmError::EmptyContent)
                } else {
                    Ok(PRICING_JSON.to_string())
                }
            } else if system.contains("phased timeline") {
                Ok(TIMELINE_JSON.to_string())
            } else if system.contains("calls to action") {
                Ok(CTA_JSON.to_string())
            } else if system.contains("cover-page") {
                Ok(COVER_JSON.to_string())
            } else if system.contains("senior consultant") {
                Ok(PROPOSAL_TEXT.to_string())
            } else {
                Err(LlmError::Api {
                    status: 400,
                    message: format!("unexpected system prompt: {system}"),
                })
            }
        }
    }

    fn saas_portfolio() -> Vec<PortfolioItem> {
        vec![
            PortfolioItem {
                id: Uuid::new_v4(),
                title: "Analytics SaaS dashboard".to_string(),
                description: "React dashboard with Stripe subscriptions".to_string(),
                tags: vec!["react".to_string(), "stripe".to_string()],
            },
            PortfolioItem {
                id: Uuid::new_v4(),
                title: "Restaurant website".to_string(),
                description: "Brochure site with menu pages".to_string(),
                tags: vec!["wordpress".to_string()],
            },
        ]
    }

    fn saas_request() -> GenerationRequest {
        GenerationRequest {
            user_id: Uuid::new_v4(),
            rfp_text: "We need a React dashboard with Stripe subscriptions, 8 week deadline"
                .to_string(),
            user_industry: None,
            company_name: Some("Northwind Studio".to_string()),
            tone_preference: None,
            platform: Platform::Upwork,
            project_value: Some(15_000.0),
            style: StyleId::default(),
            language: Language::En,
            include_pricing: true,
            length_adjustment: LengthAdjustment::Same,
            tone_adjustment: ToneAdjustment::Same,
            smart_length_hint: None,
            template_id: Some("classic_consultative".to_string()),
        }
    }

    #[tokio::test]
    async fn test_pipeline_end_to_end_saas() {
        let llm = RecordingCompletion::new();
        let output = run_pipeline(&llm, saas_portfolio(), &saas_request())
            .await
            .unwrap();

        assert_eq!(output.proposal_text, PROPOSAL_TEXT);
        assert_eq!(output.extracted.industry, Industry::Saas);
        assert_eq!(output.plan.sections.len(), 6);
        assert_eq!(output.evaluation.as_ref().unwrap().score, 78);
        assert!(output.pricing.is_some());
        assert!(output.timeline.is_some());
        assert!(output.cta.is_some());
        assert!(output.cover.is_some());

        // The SaaS item outranks the restaurant site.
        assert_eq!(output.matches[0].item.title, "Analytics SaaS dashboard");

        // The writing prompt carried SaaS intelligence, not construction terms.
        let write_prompt = llm.prompt_for("senior consultant");
        assert!(write_prompt.contains("activation rate"));
        assert!(!write_prompt.contains("punch list"));
        assert!(write_prompt.contains("Northwind Studio"));
    }

    #[tokio::test]
    async fn test_evaluation_failure_degrades_to_none() {
        let mut llm = RecordingCompletion::new();
        llm.fail_evaluation = true;
        let output = run_pipeline(&llm, saas_portfolio(), &saas_request())
            .await
            .unwrap();
        assert!(output.evaluation.is_none());
        assert_eq!(output.proposal_text, PROPOSAL_TEXT);
    }

    #[tokio::test]
    async fn test_pricing_failure_leaves_other_auxiliaries_intact() {
        let mut llm = RecordingCompletion::new();
        llm.fail_pricing = true;
        let output = run_pipeline(&llm, saas_portfolio(), &saas_request())
            .await
            .unwrap();
        assert!(output.pricing.is_none());
        assert!(output.timeline.is_some());
        assert!(output.cta.is_some());
        assert!(output.cover.is_some());
    }

    #[tokio::test]
    async fn test_include_pricing_false_skips_the_call() {
        let llm = RecordingCompletion::new();
        let mut request = saas_request();
        request.include_pricing = false;
        let output = run_pipeline(&llm, saas_portfolio(), &request).await.unwrap();

        assert!(output.pricing.is_none());
        assert!(llm.prompt_for("pricing tables").is_empty());
    }

    #[tokio::test]
    async fn test_misclassified_industry_is_rerouted_by_text_keywords() {
        // The classifier labels a SaaS-keyword brief as marketing; keyword
        // routing over the actual text must still select the SaaS block.
        let mut llm = RecordingCompletion::new();
        llm.classify_json = MISCLASSIFIED_JSON;
        let output = run_pipeline(&llm, saas_portfolio(), &saas_request())
            .await
            .unwrap();

        assert_eq!(output.extracted.industry, Industry::Saas);
        assert_eq!(output.extracted.industry_label, "SaaS & Software");
        let write_prompt = llm.prompt_for("senior consultant");
        assert!(write_prompt.contains("activation rate"));
        assert!(!write_prompt.contains("cost per acquisition"));
    }

    #[tokio::test]
    async fn test_user_industry_hint_is_drift_guarded() {
        let llm = RecordingCompletion::new();
        let mut request = saas_request();
        // The user claims construction; the text has no trade keyword, so the
        // hint reroutes to saas and never poisons the prompts.
        request.user_industry = Some("construction".to_string());
        let output = run_pipeline(&llm, saas_portfolio(), &request).await.unwrap();

        assert_eq!(output.extracted.industry, Industry::Saas);
        let write_prompt = llm.prompt_for("senior consultant");
        assert!(!write_prompt.contains("punch list"));
    }

    #[tokio::test]
    async fn test_empty_rfp_is_validation_error() {
        let llm = RecordingCompletion::new();
        let mut request = saas_request();
        request.rfp_text = "   ".to_string();
        let result = run_pipeline(&llm, vec![], &request).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_template_is_validation_error() {
        let llm = RecordingCompletion::new();
        let mut request = saas_request();
        request.template_id = Some("bespoke_masterpiece".to_string());
        let result = run_pipeline(&llm, vec![], &request).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        // Rejected before any LLM spend.
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_request_defaults_from_minimal_json() {
        let json = format!(
            r#"{{"user_id": "{}", "rfp_text": "Build me a website"}}"#,
            Uuid::new_v4()
        );
        let request: GenerationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.platform, Platform::Upwork);
        assert_eq!(request.language, Language::En);
        assert!(request.include_pricing);
        assert_eq!(request.length_adjustment, LengthAdjustment::Same);
        assert!(request.template_id.is_none());
    }
}
