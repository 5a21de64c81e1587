//! Quality Evaluator — scores a finished proposal against a 7-criterion
//! rubric with one JSON-mode LLM call.
//!
//! On unparseable output the caller receives a typed error, never invented
//! fallback scores. The orchestrator treats evaluator failure as non-fatal
//! and stores a null score.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::{complete_json, CompletionParams, CompletionService};
use crate::pipeline::classifier::Industry;
use crate::pipeline::options::Platform;
use crate::pipeline::prompts::{EVALUATE_PROMPT_TEMPLATE, EVALUATE_SYSTEM};

/// The seven rubric sub-scores, each 1-10.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCriteria {
    pub clarity: u8,
    pub relevance: u8,
    pub industry_alignment: u8,
    pub tone_accuracy: u8,
    pub differentiator_strength: u8,
    pub structure: u8,
    pub platform_fit: u8,
}

/// Full evaluation attached to the persisted proposal. Never edited by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityEvaluation {
    /// 0-100 overall score.
    pub score: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub criteria: QualityCriteria,
}

/// Evaluates a proposal. Markdown code fences around the JSON payload are
/// tolerated; anything else unparseable is a typed `Evaluation` error.
pub async fn evaluate(
    llm: &dyn CompletionService,
    proposal_text: &str,
    rfp_text: &str,
    platform: Platform,
    industry: Industry,
) -> Result<QualityEvaluation, AppError> {
    let prompt = EVALUATE_PROMPT_TEMPLATE
        .replace("{industry}", industry.label())
        .replace("{platform}", platform.as_str())
        .replace("{proposal_text}", proposal_text)
        .replace("{rfp_text}", rfp_text);

    complete_json(llm, EVALUATE_SYSTEM, &prompt, CompletionParams::structured())
        .await
        .map_err(|e| AppError::Evaluation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    const EVALUATION_JSON: &str = r#"{
        "score": 82,
        "strengths": ["Concrete portfolio evidence"],
        "weaknesses": ["CTA is soft"],
        "suggestions": ["Name the kickoff date"],
        "criteria": {
            "clarity": 8,
            "relevance": 9,
            "industry_alignment": 8,
            "tone_accuracy": 7,
            "differentiator_strength": 6,
            "structure": 8,
            "platform_fit": 7
        }
    }"#;

    struct StaticCompletion(String);

    #[async_trait]
    impl CompletionService for StaticCompletion {
        async fn complete(
            &self,
            _system: &str,
            _prompt: &str,
            _params: CompletionParams,
        ) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_evaluate_parses_plain_json() {
        let llm = StaticCompletion(EVALUATION_JSON.to_string());
        let eval = evaluate(&llm, "proposal", "rfp", Platform::Upwork, Industry::Saas)
            .await
            .unwrap();
        assert_eq!(eval.score, 82);
        assert_eq!(eval.criteria.relevance, 9);
        assert_eq!(eval.strengths.len(), 1);
    }

    #[tokio::test]
    async fn test_evaluate_tolerates_markdown_fences() {
        let fenced = format!("```json\n{EVALUATION_JSON}\n```");
        let llm = StaticCompletion(fenced);
        let eval = evaluate(&llm, "proposal", "rfp", Platform::Email, Industry::WebAgency)
            .await
            .unwrap();
        assert_eq!(eval.score, 82);
        assert_eq!(eval.criteria.platform_fit, 7);
    }

    #[tokio::test]
    async fn test_evaluate_unparseable_output_is_typed_error() {
        let llm = StaticCompletion("The proposal looks great, 9/10!".to_string());
        let result = evaluate(&llm, "proposal", "rfp", Platform::Upwork, Industry::Saas).await;
        assert!(matches!(result, Err(AppError::Evaluation(_))));
    }
}
