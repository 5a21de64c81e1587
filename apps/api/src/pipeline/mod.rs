// Proposal pipeline: extraction, classification, industry intelligence,
// portfolio matching, the three-stage generation engine, quality evaluation,
// and auxiliary generators.
// All LLM calls go through llm_client — no direct Anthropic SDK calls here.

pub mod auxiliary;
pub mod classifier;
pub mod engine;
pub mod evaluator;
pub mod extractor;
pub mod generator;
pub mod handlers;
pub mod intelligence;
pub mod matcher;
pub mod options;
pub mod prompts;
pub mod templates;
