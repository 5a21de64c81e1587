// All LLM prompt constants and prompt-building helpers for the pipeline.
// Keeping every LLM-facing string here keeps prompt construction testable
// without network calls.

use crate::pipeline::options::{Language, RfpTone, StyleId};

// ────────────────────────────────────────────────────────────────────────────
// Classifier
// ────────────────────────────────────────────────────────────────────────────

/// System prompt for industry classification — enforces the fixed category
/// set and a concrete project type.
pub const CLASSIFY_SYSTEM: &str = "You are an expert project classifier for a \
    proposal-writing service. Classify a client brief into exactly one industry \
    category and derive its project shape.";

pub const CLASSIFY_PROMPT_TEMPLATE: &str = r#"Classify the following client brief (RFP).

Return a JSON object with this EXACT schema (no extra fields):
{
  "industry": "saas",
  "project_type": "SaaS MVP",
  "core_requirements": ["User authentication", "Subscription billing"],
  "tech_stack": ["React", "Stripe"],
  "deliverables": ["Working MVP", "Admin panel"],
  "timeline": "8 weeks"
}

Rules:

INDUSTRY — pick exactly one of:
- "saas": software products, platforms, dashboards, web/mobile apps
- "logistics": freight, fleet, warehouse, supply chain operations
- "construction": ONLY when the brief explicitly mentions a trade (construction, contractor, remodel, roofing, plumbing, electrical, HVAC, landscaping)
- "web_agency": websites, landing pages, redesigns, brand sites
- "consulting": strategy, advisory, audits, process work
- "marketing": campaigns, ads, content, social, email

PROJECT TYPE — a concrete, specific label like "SaaS MVP", "Dashboard Application",
"Fleet Tracking Portal", or "Restaurant Website Redesign". NEVER a generic label
like "project", "website", or "application".

TIMELINE — the stated or clearly implied duration, or null.

CLIENT BRIEF:
{rfp_text}"#;

// ────────────────────────────────────────────────────────────────────────────
// Extractor
// ────────────────────────────────────────────────────────────────────────────

/// System prompt for structured RFP extraction.
pub const EXTRACT_SYSTEM: &str = "You are an expert RFP analyst performing structured \
    extraction for a proposal-writing service. Pull out only what the text supports; \
    never invent facts.";

pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract structured information from the following client brief (RFP).

Return a JSON object with this EXACT schema (no extra fields):
{
  "requirements": ["Explicit requirement the client stated"],
  "deliverables": ["Concrete artifact the client expects"],
  "budget": "$5,000-$10,000 or null",
  "timeline": "6 weeks or null",
  "red_flags": ["Vague scope, unrealistic deadline, etc."],
  "client_name": "Company or person name, or null",
  "project_type": "Specific project label, or null",
  "skills": ["react", "stripe", "seo"],
  "tone": "professional"
}

Rules:
- "tone" must be one of: "formal", "casual", "professional", "friendly".
- "skills" are lowercase technology/discipline keywords found in the text.
- "red_flags" are risks for the vendor: missing budget, scope creep signals,
  "simple/quick job" framing, payment-after-delivery demands.
- Use null (not empty string) for anything the text does not state.

CLIENT BRIEF:
{rfp_text}"#;

// ────────────────────────────────────────────────────────────────────────────
// Stage A — deep analysis
// ────────────────────────────────────────────────────────────────────────────

pub const ANALYSIS_SYSTEM: &str = "You are a senior proposal strategist performing deep \
    analysis of a client brief before any writing begins. Produce analysis only — \
    no proposal prose.";

/// Replace: {rfp_text}, {extracted_json}, {intelligence}, {matches_json}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this opportunity. Do NOT write any proposal text yet.

Return a JSON object with this EXACT schema:
{
  "key_goals": ["What the client is actually trying to achieve"],
  "pain_points": ["Underlying problems to address, beyond the stated ask"],
  "differentiators": ["Specific evidence from the portfolio matches worth leaning on"],
  "positioning_angle": "One sentence: how to frame this proposal to win"
}

{intelligence}

EXTRACTED BRIEF DATA:
{extracted_json}

RELEVANT PORTFOLIO EVIDENCE:
{matches_json}

CLIENT BRIEF:
{rfp_text}"#;

// ────────────────────────────────────────────────────────────────────────────
// Stage B — strategic structuring
// ────────────────────────────────────────────────────────────────────────────

pub const STRUCTURE_SYSTEM: &str = "You are a proposal architect turning strategic analysis \
    into a section-by-section structure plan. Plan only — no finished prose.";

/// Replace: {analysis_json}, {sections_directive}
pub const STRUCTURE_PROMPT_TEMPLATE: &str = r#"Turn the analysis below into a section plan for the proposal.

Return a JSON object with this EXACT schema:
{
  "sections": [
    {"name": "opening_hook", "summary": "What this section will say and why"}
  ]
}

{sections_directive}

Every "summary" must be specific to THIS client and THIS analysis — no
placeholder text.

STRATEGIC ANALYSIS:
{analysis_json}"#;

/// Default section plan when no template constrains Stage B.
pub const DEFAULT_SECTIONS_DIRECTIVE: &str = "SECTIONS: produce exactly these sections, in \
    this order: opening_hook, problem_reframe, approach, deliverables, investment, \
    call_to_action.";

/// Builds the mandatory section directive for a template-constrained plan.
pub fn template_sections_directive(
    names: &[&str],
    guidance: &[(&str, &str)],
    tone_hint: &str,
) -> String {
    let guidance_lines = guidance
        .iter()
        .map(|(name, text)| format!("- {name}: {text}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "SECTIONS (MANDATORY): this proposal uses a fixed template. Produce exactly \
         these sections, with these exact names, in this exact order: {}.\n\
         Section guidance:\n{guidance_lines}\n\
         Template tone hint: {tone_hint}.",
        names.join(", ")
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Stage C — final writing
// ────────────────────────────────────────────────────────────────────────────

/// The fixed writing persona for Stage C.
pub const PERSONA: &str = "You are a senior consultant with 10+ years of experience \
    winning client work. You write proposals that sound like a sharp human who read \
    the brief twice, never like a template.";

/// Generic AI clichés that must never appear in a proposal.
pub const BANNED_PHRASES: &[&str] = &[
    "I'm excited about this opportunity",
    "I came across your posting",
    "I am confident that I am the perfect fit",
    "Look no further",
    "I have a proven track record",
    "fast turnaround and quality work",
    "Dear Sir or Madam",
    "In today's fast-paced world",
    "take your business to the next level",
    "I would love the opportunity",
];

/// Renders the banned-phrase list as a hard prompt rule.
pub fn banned_phrase_block() -> String {
    let list = BANNED_PHRASES
        .iter()
        .map(|p| format!("- \"{p}\""))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "BANNED PHRASES — never use any of these, or close variants:\n{list}"
    )
}

/// Replace: {banned_phrases}, {tone_directive}, {length_directive},
/// {style_directive}, {language_directive}, {intelligence}, {plan_json},
/// {analysis_json}, {matches_json}, {company_line}, {platform}, {rfp_text}
pub const WRITE_PROMPT_TEMPLATE: &str = r#"Write the full proposal now, expanding the section plan into finished prose.

{banned_phrases}

TONE: {tone_directive}
{length_directive}
STYLE: {style_directive}
LANGUAGE: {language_directive}
PLATFORM: this proposal will be submitted via {platform} — respect its norms.
{company_line}

{intelligence}

SECTION PLAN (follow it section by section):
{plan_json}

STRATEGIC ANALYSIS (the reasoning behind the plan):
{analysis_json}

PORTFOLIO EVIDENCE to reference naturally:
{matches_json}

CLIENT BRIEF:
{rfp_text}

Rules:
1. Every sentence must be specific to this client and brief — zero placeholder text.
2. Reference portfolio evidence with concrete outcomes, not vague credentials.
3. Address the client's pain points in their own industry language.
4. End with the planned call to action, nothing after it.
5. Output the proposal text only — no preamble, no meta-commentary."#;

/// Tone directive text for the resolved tone.
pub fn tone_directive(tone: RfpTone) -> &'static str {
    match tone {
        RfpTone::Formal => {
            "formal and precise; no contractions, no colloquialisms, structured phrasing"
        }
        RfpTone::Casual => {
            "relaxed and conversational; contractions welcome, short sentences, plain words"
        }
        RfpTone::Professional => {
            "confident business register; warm but efficient, jargon only where it earns its place"
        }
        RfpTone::Friendly => {
            "approachable and personable; write like a trusted colleague, keep energy high"
        }
    }
}

/// Exact word-count band directive for the Stage C prompt contract.
pub fn length_directive(band: (u16, u16)) -> String {
    format!(
        "LENGTH: {}-{} words. Stay inside this band.",
        band.0, band.1
    )
}

/// Style directive injected on top of the base Stage C prompt.
pub fn style_directive(style: StyleId) -> &'static str {
    match style {
        StyleId::ModernClean => {
            "modern and clean: short paragraphs, descriptive subheadings, generous whitespace"
        }
        StyleId::Corporate => {
            "corporate: structured sections, measured claims, formal headings, no exclamation marks"
        }
        StyleId::Minimalist => {
            "minimalist: the fewest words that carry the argument, no subheadings unless essential"
        }
        StyleId::CreativeAgency => {
            "creative agency: vivid verbs, confident voice, one memorable image or metaphor maximum"
        }
        StyleId::StartupPitch => {
            "startup pitch: momentum-first, milestone-driven, numbers up front"
        }
        StyleId::Technical => {
            "technical: precise terminology, architecture-aware, bullet lists for specifics"
        }
    }
}

/// Output-language directive. Fully replaces the language instruction —
/// the model writes in the target language, it does not translate afterward.
pub fn language_directive(language: Language) -> String {
    match language {
        Language::En => "Write the entire proposal in English.".to_string(),
        other => format!(
            "Write the ENTIRE proposal in {}. Every section, heading, and the call \
             to action must be in {} — do not mix languages and do not translate \
             after the fact; compose directly in {}.",
            other.name(),
            other.name(),
            other.name()
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Quality evaluator
// ────────────────────────────────────────────────────────────────────────────

pub const EVALUATE_SYSTEM: &str = "You are a strict proposal quality evaluator. Score \
    honestly against the rubric; a mediocre proposal must receive a mediocre score.";

/// Replace: {proposal_text}, {rfp_text}, {platform}, {industry}
pub const EVALUATE_PROMPT_TEMPLATE: &str = r#"Evaluate this proposal against the brief it answers.

Return a JSON object with this EXACT schema:
{
  "score": 82,
  "strengths": ["..."],
  "weaknesses": ["..."],
  "suggestions": ["..."],
  "criteria": {
    "clarity": 8,
    "relevance": 9,
    "industry_alignment": 8,
    "tone_accuracy": 7,
    "differentiator_strength": 6,
    "structure": 8,
    "platform_fit": 7
  }
}

Rules:
- "score" is 0-100. Each criteria sub-score is 1-10.
- "industry_alignment": does it speak the {industry} industry's language?
- "platform_fit": is it appropriate for submission via {platform}?

PROPOSAL:
{proposal_text}

ORIGINAL BRIEF:
{rfp_text}"#;

// ────────────────────────────────────────────────────────────────────────────
// Auxiliary generators
// ────────────────────────────────────────────────────────────────────────────

pub const PRICING_SYSTEM: &str = "You build pricing tables for client proposals. \
    Tiers must map to the actual scope in the proposal.";

/// Replace: {proposal_text}, {deliverables}, {value_line}
pub const PRICING_PROMPT_TEMPLATE: &str = r#"Build a three-tier pricing table for this proposal.

Return a JSON object with this EXACT schema:
{
  "tiers": [
    {"name": "Essential", "price": "$4,500", "description": "What this tier includes"}
  ],
  "notes": "Payment terms or scope notes, or null"
}

{value_line}

DELIVERABLES IN SCOPE:
{deliverables}

PROPOSAL:
{proposal_text}"#;

pub const TIMELINE_SYSTEM: &str = "You turn proposal scope into a realistic phased timeline.";

/// Replace: {proposal_text}, {timeline_line}
pub const TIMELINE_PROMPT_TEMPLATE: &str = r#"Produce a phased delivery timeline for this proposal.

Return a JSON object with this EXACT schema:
{
  "phases": [
    {"name": "Discovery", "duration": "Week 1", "description": "What happens in this phase"}
  ]
}

{timeline_line}

PROPOSAL:
{proposal_text}"#;

pub const CTA_SYSTEM: &str = "You write closing calls to action for client proposals. \
    One sentence or two, specific and low-friction.";

/// Replace: {proposal_text}, {platform}
pub const CTA_PROMPT_TEMPLATE: &str = r#"Write a smart closing call to action for this proposal, suited to {platform}.

Return a JSON object with this EXACT schema:
{
  "text": "The call to action"
}

PROPOSAL:
{proposal_text}"#;

pub const COVER_SYSTEM: &str = "You write cover-page copy for client proposals: title, \
    subtitle, and an optional tagline.";

/// Replace: {proposal_text}, {company_line}, {client_line}
pub const COVER_PROMPT_TEMPLATE: &str = r#"Write cover-page copy for this proposal.

Return a JSON object with this EXACT schema:
{
  "title": "Proposal title",
  "subtitle": "One line under the title",
  "tagline": "Optional short tagline, or null"
}

{company_line}
{client_line}

PROPOSAL:
{proposal_text}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::options::LengthAdjustment;

    #[test]
    fn test_length_directive_bands_are_exact() {
        assert!(length_directive(LengthAdjustment::Shorter.word_band()).contains("400-500"));
        assert!(length_directive(LengthAdjustment::Same.word_band()).contains("600-900"));
        assert!(length_directive(LengthAdjustment::Longer.word_band()).contains("900-1200"));
    }

    #[test]
    fn test_banned_phrase_block_lists_the_cliches() {
        let block = banned_phrase_block();
        assert!(block.contains("I'm excited about this opportunity"));
        assert!(block.contains("BANNED PHRASES"));
    }

    #[test]
    fn test_language_directive_replaces_instruction_entirely() {
        let es = language_directive(Language::Es);
        assert!(es.contains("Write the ENTIRE proposal in Spanish"));
        assert!(!es.contains("English"));
        let en = language_directive(Language::En);
        assert!(en.contains("English"));
    }

    #[test]
    fn test_template_sections_directive_names_all_sections() {
        let directive = template_sections_directive(
            &["opening_hook", "investment"],
            &[("opening_hook", "hook them"), ("investment", "anchor price")],
            "direct",
        );
        assert!(directive.contains("opening_hook, investment"));
        assert!(directive.contains("MANDATORY"));
        assert!(directive.contains("anchor price"));
    }

    #[test]
    fn test_every_style_has_a_distinct_directive() {
        let styles = [
            StyleId::ModernClean,
            StyleId::Corporate,
            StyleId::Minimalist,
            StyleId::CreativeAgency,
            StyleId::StartupPitch,
            StyleId::Technical,
        ];
        let mut directives: Vec<&str> = styles.iter().map(|s| style_directive(*s)).collect();
        directives.sort_unstable();
        directives.dedup();
        assert_eq!(directives.len(), styles.len());
    }
}
