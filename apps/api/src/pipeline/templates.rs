//! Static proposal template registry.
//!
//! When a template id is supplied to the generation engine, Stage B's section
//! plan must conform exactly to the template's section names and order, and
//! Stage C must still customize every sentence to the specific RFP.

use crate::pipeline::options::Platform;

/// One section a template mandates, with guidance for the structuring stage.
#[derive(Debug)]
pub struct TemplateSection {
    pub name: &'static str,
    pub guidance: &'static str,
}

/// A keyed proposal template.
#[derive(Debug)]
pub struct ProposalTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub tone_hint: &'static str,
    pub platform_fit: &'static [Platform],
    pub default_sections: &'static [TemplateSection],
}

impl ProposalTemplate {
    pub fn section_names(&self) -> Vec<&'static str> {
        self.default_sections.iter().map(|s| s.name).collect()
    }
}

static TEMPLATES: &[ProposalTemplate] = &[
    ProposalTemplate {
        id: "classic_consultative",
        name: "Classic Consultative",
        tone_hint: "measured, senior, outcome-focused",
        platform_fit: &[Platform::Upwork, Platform::Email, Platform::Direct],
        default_sections: &[
            TemplateSection {
                name: "opening_hook",
                guidance: "Mirror the client's own words back at their core problem",
            },
            TemplateSection {
                name: "problem_reframe",
                guidance: "Reframe the stated request around the underlying business goal",
            },
            TemplateSection {
                name: "approach",
                guidance: "Phased plan with a named first milestone",
            },
            TemplateSection {
                name: "deliverables",
                guidance: "Concrete artifacts the client receives, no filler",
            },
            TemplateSection {
                name: "investment",
                guidance: "Frame price against the cost of the unsolved problem",
            },
            TemplateSection {
                name: "call_to_action",
                guidance: "One low-friction next step",
            },
        ],
    },
    ProposalTemplate {
        id: "startup_speed",
        name: "Startup Speed",
        tone_hint: "direct, energetic, momentum-first",
        platform_fit: &[Platform::Upwork, Platform::Linkedin],
        default_sections: &[
            TemplateSection {
                name: "opening_hook",
                guidance: "Lead with time-to-launch",
            },
            TemplateSection {
                name: "why_me",
                guidance: "One or two directly comparable wins",
            },
            TemplateSection {
                name: "sprint_plan",
                guidance: "Week-by-week plan to a shippable first version",
            },
            TemplateSection {
                name: "deliverables",
                guidance: "What exists at the end of each sprint",
            },
            TemplateSection {
                name: "investment",
                guidance: "Simple number, milestone-gated",
            },
            TemplateSection {
                name: "call_to_action",
                guidance: "Offer a kickoff call this week",
            },
        ],
    },
    ProposalTemplate {
        id: "agency_showcase",
        name: "Agency Showcase",
        tone_hint: "polished, visual, portfolio-forward",
        platform_fit: &[Platform::Fiverr, Platform::Freelancer, Platform::Direct],
        default_sections: &[
            TemplateSection {
                name: "opening_hook",
                guidance: "Open on the client's audience, not the deliverable",
            },
            TemplateSection {
                name: "relevant_work",
                guidance: "Two portfolio pieces with outcomes, matched to this brief",
            },
            TemplateSection {
                name: "creative_direction",
                guidance: "Point of view on look, feel, and messaging",
            },
            TemplateSection {
                name: "process",
                guidance: "Review checkpoints and revision policy",
            },
            TemplateSection {
                name: "investment",
                guidance: "Tiered options where the middle tier is the anchor",
            },
            TemplateSection {
                name: "call_to_action",
                guidance: "Invite feedback on the direction, not a yes/no",
            },
        ],
    },
];

/// Looks up a template by id.
pub fn template_by_id(id: &str) -> Option<&'static ProposalTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}
