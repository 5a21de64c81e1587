//! Request option enums shared across the pipeline.

use serde::{Deserialize, Serialize};

/// Platform the proposal will be submitted through. Shapes CTA phrasing and
/// the evaluator's platform-fit criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Upwork,
    Freelancer,
    Fiverr,
    Linkedin,
    Email,
    Direct,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Upwork => "upwork",
            Platform::Freelancer => "freelancer",
            Platform::Fiverr => "fiverr",
            Platform::Linkedin => "linkedin",
            Platform::Email => "email",
            Platform::Direct => "direct",
        }
    }
}

/// Visual/structural style injected as a Stage C prompt directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleId {
    #[default]
    ModernClean,
    Corporate,
    Minimalist,
    CreativeAgency,
    StartupPitch,
    Technical,
}

/// Supported output locales. The language directive fully replaces the
/// output-language instruction in the Stage C prompt; it does not translate
/// after the fact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Es,
    Pt,
    Ar,
    Id,
    Hi,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Pt => "pt",
            Language::Ar => "ar",
            Language::Id => "id",
            Language::Hi => "hi",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Pt => "Portuguese",
            Language::Ar => "Arabic",
            Language::Id => "Indonesian",
            Language::Hi => "Hindi",
        }
    }
}

/// Requested proposal length. Resolves to a word-count band in the Stage C
/// prompt contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthAdjustment {
    Shorter,
    #[default]
    Same,
    Longer,
}

impl LengthAdjustment {
    /// Exact word-count band for each adjustment.
    pub fn word_band(self) -> (u16, u16) {
        match self {
            LengthAdjustment::Shorter => (400, 500),
            LengthAdjustment::Same => (600, 900),
            LengthAdjustment::Longer => (900, 1200),
        }
    }
}

/// Explicit tone override. Takes precedence over the stored user preference,
/// which in turn overrides the tone extracted from the RFP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneAdjustment {
    MoreFormal,
    #[default]
    Same,
    MoreCasual,
}

/// Tone detected in (or preferred for) an RFP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RfpTone {
    Formal,
    Casual,
    #[default]
    Professional,
    Friendly,
}

impl RfpTone {
    pub fn as_str(self) -> &'static str {
        match self {
            RfpTone::Formal => "formal",
            RfpTone::Casual => "casual",
            RfpTone::Professional => "professional",
            RfpTone::Friendly => "friendly",
        }
    }
}
