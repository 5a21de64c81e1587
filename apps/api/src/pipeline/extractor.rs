//! RFP Extractor — parses free text into structured requirements,
//! deliverables, budget, timeline, and tone.
//!
//! The classifier always runs first: industry ground truth derives primarily
//! from the raw text, and the classifier call is more prompt-constrained and
//! more reliable than the open-ended extraction call. If the extraction call
//! fails, the request degrades to classifier-only data instead of failing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{complete_json, CompletionParams, CompletionService};
use crate::pipeline::classifier::{classify, ClassifiedProject, Industry};
use crate::pipeline::options::RfpTone;
use crate::pipeline::prompts::{EXTRACT_PROMPT_TEMPLATE, EXTRACT_SYSTEM};

/// Structured view of an RFP, merged from the extractor and classifier.
/// Created once per generation request and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedRfp {
    pub requirements: Vec<String>,
    /// De-duplicated union of extractor and classifier deliverables.
    pub deliverables: Vec<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub red_flags: Vec<String>,
    pub client_name: Option<String>,
    pub project_type: Option<String>,
    pub skills: Vec<String>,
    pub tone: RfpTone,
    pub industry: Industry,
    pub industry_label: String,
    pub core_requirements: Vec<String>,
    pub tech_stack: Vec<String>,
    /// True when the structured-extraction call failed and classifier-only
    /// data was used.
    pub degraded: bool,
}

#[derive(Debug, Deserialize)]
struct RawExtraction {
    #[serde(default)]
    requirements: Vec<String>,
    #[serde(default)]
    deliverables: Vec<String>,
    #[serde(default)]
    budget: Option<String>,
    #[serde(default)]
    timeline: Option<String>,
    #[serde(default)]
    red_flags: Vec<String>,
    #[serde(default)]
    client_name: Option<String>,
    #[serde(default)]
    project_type: Option<String>,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    tone: RfpTone,
}

/// Extracts structured data from an RFP. Classifier failure is fatal;
/// extraction failure falls back to classifier-only data.
pub async fn extract(
    llm: &dyn CompletionService,
    rfp_text: &str,
) -> Result<ExtractedRfp, AppError> {
    let classified = classify(llm, rfp_text).await?;

    let prompt = EXTRACT_PROMPT_TEMPLATE.replace("{rfp_text}", rfp_text);
    match complete_json::<RawExtraction>(llm, EXTRACT_SYSTEM, &prompt, CompletionParams::structured())
        .await
    {
        Ok(raw) => Ok(merge(raw, classified)),
        Err(e) => {
            warn!("RFP extraction call failed, using classifier-only data: {e}");
            Ok(classifier_only(classified))
        }
    }
}

/// Merges the extraction result with classifier-derived fields, preferring
/// the classifier's project type and timeline when the extractor found none.
fn merge(raw: RawExtraction, classified: ClassifiedProject) -> ExtractedRfp {
    let deliverables = dedup_union(raw.deliverables, classified.deliverables);

    ExtractedRfp {
        requirements: raw.requirements,
        deliverables,
        budget: raw.budget,
        timeline: raw.timeline.or(classified.timeline),
        red_flags: raw.red_flags,
        client_name: raw.client_name,
        project_type: raw
            .project_type
            .filter(|t| !t.trim().is_empty())
            .or(Some(classified.project_type)),
        skills: raw.skills,
        tone: raw.tone,
        industry: classified.industry,
        industry_label: classified.industry_label,
        core_requirements: classified.core_requirements,
        tech_stack: classified.tech_stack,
        degraded: false,
    }
}

/// Fallback when the extraction call produced nothing parseable.
fn classifier_only(classified: ClassifiedProject) -> ExtractedRfp {
    ExtractedRfp {
        requirements: vec![],
        deliverables: classified.deliverables,
        budget: None,
        timeline: classified.timeline,
        red_flags: vec![],
        client_name: None,
        project_type: Some(classified.project_type),
        skills: vec![],
        tone: RfpTone::Professional,
        industry: classified.industry,
        industry_label: classified.industry_label,
        core_requirements: classified.core_requirements,
        tech_stack: classified.tech_stack,
        degraded: true,
    }
}

/// Case-insensitive union preserving first-seen order.
fn dedup_union(first: Vec<String>, second: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|item| seen.insert(item.trim().to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    const CLASSIFY_JSON: &str = r#"{
        "industry": "saas",
        "project_type": "SaaS MVP",
        "core_requirements": ["User authentication"],
        "tech_stack": ["React", "Stripe"],
        "deliverables": ["Working MVP", "Admin panel"],
        "timeline": "8 weeks"
    }"#;

    const EXTRACT_JSON: &str = r#"{
        "requirements": ["OAuth login", "Stripe subscriptions"],
        "deliverables": ["working mvp", "Analytics dashboard"],
        "budget": "$15,000",
        "timeline": null,
        "red_flags": ["Unclear scope"],
        "client_name": "Acme Inc",
        "project_type": null,
        "skills": ["react", "stripe"],
        "tone": "casual"
    }"#;

    /// Dispatches on the system prompt: classification succeeds, extraction
    /// optionally fails.
    struct ScriptedCompletion {
        fail_extraction: bool,
    }

    #[async_trait]
    impl CompletionService for ScriptedCompletion {
        async fn complete(
            &self,
            system: &str,
            _prompt: &str,
            _params: CompletionParams,
        ) -> Result<String, LlmError> {
            if system.contains("classifier") {
                Ok(CLASSIFY_JSON.to_string())
            } else if self.fail_extraction {
                Err(LlmError::EmptyContent)
            } else {
                Ok(EXTRACT_JSON.to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_merge_prefers_extractor_but_fills_gaps_from_classifier() {
        let llm = ScriptedCompletion {
            fail_extraction: false,
        };
        let extracted = extract(&llm, "We need a React dashboard").await.unwrap();

        assert!(!extracted.degraded);
        assert_eq!(extracted.tone, RfpTone::Casual);
        assert_eq!(extracted.budget.as_deref(), Some("$15,000"));
        // Extractor had no timeline or project type: classifier fills both.
        assert_eq!(extracted.timeline.as_deref(), Some("8 weeks"));
        assert_eq!(extracted.project_type.as_deref(), Some("SaaS MVP"));
        assert_eq!(extracted.industry, Industry::Saas);
    }

    #[tokio::test]
    async fn test_deliverables_are_deduplicated_union() {
        let llm = ScriptedCompletion {
            fail_extraction: false,
        };
        let extracted = extract(&llm, "We need a React dashboard").await.unwrap();

        // "working mvp" (extractor) and "Working MVP" (classifier) collapse.
        assert_eq!(
            extracted.deliverables,
            vec!["working mvp", "Analytics dashboard", "Admin panel"]
        );
    }

    #[tokio::test]
    async fn test_extraction_failure_degrades_to_classifier_only() {
        let llm = ScriptedCompletion {
            fail_extraction: true,
        };
        let extracted = extract(&llm, "We need a React dashboard").await.unwrap();

        assert!(extracted.degraded);
        assert!(extracted.requirements.is_empty());
        assert!(extracted.red_flags.is_empty());
        assert_eq!(extracted.tone, RfpTone::Professional);
        assert_eq!(extracted.industry, Industry::Saas);
        assert_eq!(extracted.deliverables, vec!["Working MVP", "Admin panel"]);
        assert_eq!(extracted.project_type.as_deref(), Some("SaaS MVP"));
    }

    #[test]
    fn test_dedup_union_preserves_first_seen_order() {
        let merged = dedup_union(
            vec!["A".to_string(), "b".to_string()],
            vec!["B".to_string(), "c".to_string(), "a ".to_string()],
        );
        assert_eq!(merged, vec!["A", "b", "c"]);
    }
}
