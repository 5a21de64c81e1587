// Cross-cutting prompt fragments.
// Each pipeline stage defines its own prompts alongside its module; this file
// holds only text shared by every JSON-mode call.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
