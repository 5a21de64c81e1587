//! Industry Intelligence — static knowledge blocks keyed by industry, plus
//! the keyword router that corrects upstream classification drift.
//!
//! `lookup` is a pure function: identical inputs always yield the identical
//! block. The data is read-only reference material injected verbatim into
//! generation prompts.

use crate::pipeline::classifier::{has_trade_keyword, Industry};

/// Static knowledge block for one industry.
#[derive(Debug)]
pub struct IndustryIntelligence {
    pub industry: Industry,
    pub terminology: &'static [&'static str],
    pub kpis: &'static [&'static str],
    pub ux_needs: &'static [&'static str],
    pub seo_needs: &'static [&'static str],
    pub pain_points: &'static [&'static str],
    pub conversion_principles: &'static [&'static str],
    pub technical_requirements: &'static [&'static str],
}

const SAAS_KEYWORDS: &[&str] = &[
    "saas",
    "mvp",
    "dashboard",
    "platform",
    "authentication",
    "subscription",
    "admin panel",
    "user accounts",
    "multi-tenant",
    "api integration",
    "onboarding",
    "stripe",
    "oauth",
    "login",
    "web app",
    "billing",
];

const LOGISTICS_KEYWORDS: &[&str] = &[
    "logistics",
    "freight",
    "fleet",
    "shipping",
    "warehouse",
    "supply chain",
    "dispatch",
    "carrier",
    "last-mile",
    "3pl",
    "shipment tracking",
];

const WEB_AGENCY_KEYWORDS: &[&str] = &[
    "website",
    "landing page",
    "redesign",
    "wordpress",
    "webflow",
    "squarespace",
    "brand refresh",
    "portfolio site",
    "brochure site",
    "web presence",
];

const CONSULTING_KEYWORDS: &[&str] = &[
    "consulting",
    "consultant",
    "advisory",
    "strategy",
    "audit",
    "roadmap",
    "due diligence",
    "operating model",
    "process improvement",
];

const MARKETING_KEYWORDS: &[&str] = &[
    "marketing",
    "campaign",
    "social media",
    "content calendar",
    "email marketing",
    "ppc",
    "paid ads",
    "google ads",
    "lead generation",
    "seo audit",
];

static SAAS: IndustryIntelligence = IndustryIntelligence {
    industry: Industry::Saas,
    terminology: &[
        "MVP",
        "activation",
        "onboarding flow",
        "multi-tenant architecture",
        "subscription tiers",
        "product-led growth",
        "feature flags",
        "usage-based pricing",
        "self-serve signup",
        "admin panel",
    ],
    kpis: &[
        "activation rate",
        "trial-to-paid conversion",
        "monthly recurring revenue",
        "churn rate",
        "net revenue retention",
        "weekly active users",
        "time to value",
    ],
    ux_needs: &[
        "frictionless signup",
        "empty-state guidance",
        "responsive dashboard layouts",
        "in-app onboarding checklists",
        "clear upgrade paths",
    ],
    seo_needs: &[
        "product landing pages",
        "comparison and alternative pages",
        "documentation indexing",
        "structured data markup",
    ],
    pain_points: &[
        "slow time to market",
        "churn driven by clunky onboarding",
        "technical debt from rushed MVPs",
        "poor trial-to-paid conversion",
        "scaling costs outpacing revenue",
        "feature sprawl without adoption",
    ],
    conversion_principles: &[
        "lead with time-to-launch",
        "quantify the cost of delay",
        "de-risk with milestone-based delivery",
        "reference comparable product wins",
        "offer a phased roadmap, not a monolith",
    ],
    technical_requirements: &[
        "OAuth/SSO authentication",
        "Stripe subscription billing",
        "role-based access control",
        "REST or GraphQL APIs",
        "CI/CD pipeline",
        "audit logging",
    ],
};

static LOGISTICS: IndustryIntelligence = IndustryIntelligence {
    industry: Industry::Logistics,
    terminology: &[
        "last-mile delivery",
        "fleet utilization",
        "dispatch board",
        "proof of delivery",
        "freight brokerage",
        "route optimization",
        "warehouse management",
        "carrier network",
    ],
    kpis: &[
        "on-time delivery rate",
        "cost per mile",
        "fleet utilization",
        "dock-to-stock time",
        "order accuracy",
        "empty-mile percentage",
    ],
    ux_needs: &[
        "real-time shipment visibility",
        "driver-friendly mobile views",
        "exception-first dashboards",
        "bulk import workflows",
    ],
    seo_needs: &[
        "lane and service-area pages",
        "freight quote landing pages",
        "local pack optimization",
        "industry directory listings",
    ],
    pain_points: &[
        "no real-time visibility across carriers",
        "manual dispatch and spreadsheet chaos",
        "detention and dwell-time costs",
        "disconnected TMS and accounting systems",
        "driver turnover and compliance overhead",
    ],
    conversion_principles: &[
        "lead with visibility and control",
        "quantify savings per route or load",
        "show integration with existing TMS/ERP",
        "emphasize reliability SLAs",
    ],
    technical_requirements: &[
        "GPS/telematics integration",
        "EDI and API connectivity",
        "barcode or RFID scanning",
        "geofenced notifications",
        "offline-tolerant mobile clients",
    ],
};

static CONSTRUCTION: IndustryIntelligence = IndustryIntelligence {
    industry: Industry::Construction,
    terminology: &[
        "bid package",
        "punch list",
        "change order",
        "general contractor",
        "subcontractor",
        "takeoff",
        "RFI",
        "submittals",
        "job costing",
    ],
    kpis: &[
        "bid-win rate",
        "cost variance",
        "schedule variance",
        "lead-to-estimate conversion",
        "safety incident rate",
    ],
    ux_needs: &[
        "photo-heavy project galleries",
        "instant quote request forms",
        "mobile-first browsing for field clients",
        "service-area clarity",
    ],
    seo_needs: &[
        "local service pages per trade",
        "Google Business Profile optimization",
        "before/after project schema",
        "review aggregation",
    ],
    pain_points: &[
        "feast-or-famine lead flow",
        "low-quality leads from aggregators",
        "bids lost to faster competitors",
        "no online proof of past work",
        "phone-tag scheduling",
    ],
    conversion_principles: &[
        "lead with licensed-and-insured trust signals",
        "show local project proof",
        "make the quote request effortless",
        "answer price anxiety up front",
    ],
    technical_requirements: &[
        "quote/estimate request forms",
        "project gallery CMS",
        "review platform integration",
        "click-to-call tracking",
        "local schema markup",
    ],
};

static WEB_AGENCY: IndustryIntelligence = IndustryIntelligence {
    industry: Industry::WebAgency,
    terminology: &[
        "conversion-focused design",
        "information architecture",
        "design system",
        "responsive breakpoints",
        "content migration",
        "accessibility compliance",
        "page-speed budget",
    ],
    kpis: &[
        "conversion rate",
        "bounce rate",
        "Core Web Vitals",
        "organic traffic growth",
        "form completion rate",
    ],
    ux_needs: &[
        "clear visual hierarchy",
        "fast first contentful paint",
        "scannable copy blocks",
        "accessible navigation",
    ],
    seo_needs: &[
        "technical SEO hygiene",
        "keyword-mapped page structure",
        "redirect strategy for migrations",
        "image optimization",
    ],
    pain_points: &[
        "outdated site eroding credibility",
        "traffic that never converts",
        "slow pages punished by search",
        "CMS the team cannot edit",
        "redesigns that stall for months",
    ],
    conversion_principles: &[
        "anchor the redesign to a business metric",
        "show before/after outcomes",
        "commit to a fixed launch window",
        "keep the client in their CMS comfort zone",
    ],
    technical_requirements: &[
        "CMS setup and training",
        "analytics and event tracking",
        "performance optimization",
        "301 redirect mapping",
        "WCAG AA accessibility",
    ],
};

static CONSULTING: IndustryIntelligence = IndustryIntelligence {
    industry: Industry::Consulting,
    terminology: &[
        "engagement scope",
        "discovery phase",
        "stakeholder alignment",
        "operating model",
        "quick wins",
        "executive readout",
        "implementation roadmap",
    ],
    kpis: &[
        "cost savings identified",
        "time-to-decision",
        "adoption of recommendations",
        "ROI on engagement",
    ],
    ux_needs: &[
        "credibility-first presentation",
        "case study depth",
        "clear engagement models",
    ],
    seo_needs: &[
        "thought-leadership content",
        "service-line pages",
        "speaking and publication citations",
    ],
    pain_points: &[
        "symptoms treated instead of root causes",
        "initiatives that die after the deck",
        "internal teams too close to the problem",
        "decisions stalled by missing data",
    ],
    conversion_principles: &[
        "diagnose before prescribing",
        "tie every recommendation to a number",
        "name the first 30-day win",
        "position as partner, not vendor",
    ],
    technical_requirements: &[
        "data gathering and interviews",
        "benchmark analysis",
        "scenario modeling",
        "executive-ready deliverables",
    ],
};

static MARKETING: IndustryIntelligence = IndustryIntelligence {
    industry: Industry::Marketing,
    terminology: &[
        "funnel stages",
        "audience segmentation",
        "creative testing",
        "attribution model",
        "content calendar",
        "retargeting",
        "landing page variants",
    ],
    kpis: &[
        "cost per acquisition",
        "return on ad spend",
        "click-through rate",
        "marketing-qualified leads",
        "email open and click rates",
    ],
    ux_needs: &[
        "message-matched landing pages",
        "single clear call to action",
        "mobile-optimized creative",
    ],
    seo_needs: &[
        "keyword gap analysis",
        "content cluster strategy",
        "link-worthy assets",
    ],
    pain_points: &[
        "spend rising while results plateau",
        "no attribution past the click",
        "inconsistent brand voice across channels",
        "content produced but never distributed",
    ],
    conversion_principles: &[
        "promise measurable lift, not impressions",
        "show channel-specific wins",
        "propose a test-and-scale sequence",
        "report in revenue terms",
    ],
    technical_requirements: &[
        "pixel and conversion tracking",
        "CRM integration",
        "A/B testing setup",
        "UTM governance",
        "dashboard reporting",
    ],
};

fn hit(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Fallback routing for a nominal construction classification with no
/// explicit trade keyword: SaaS if software signals are present, otherwise
/// web agency. Never construction.
pub fn reroute_from_construction(haystack: &str) -> Industry {
    if hit(haystack, SAAS_KEYWORDS) {
        Industry::Saas
    } else {
        Industry::WebAgency
    }
}

/// Resolves the effective industry from the nominal industry id plus the
/// concatenated lowercase project text. Priority, first match wins:
/// construction-drift correction, SaaS, logistics, construction (explicit
/// keywords only), web agency, consulting, marketing, default web agency.
pub fn resolve_industry(industry: &str, project_type: Option<&str>, rfp_text: &str) -> Industry {
    let haystack = format!("{} {}", project_type.unwrap_or(""), rfp_text).to_lowercase();

    // Correct upstream classifier drift: nominal construction without an
    // explicit trade keyword in the text is never honored.
    if industry.eq_ignore_ascii_case("construction") && !has_trade_keyword(&haystack) {
        return reroute_from_construction(&haystack);
    }

    if hit(&haystack, SAAS_KEYWORDS) {
        return Industry::Saas;
    }
    if hit(&haystack, LOGISTICS_KEYWORDS) {
        return Industry::Logistics;
    }
    if has_trade_keyword(&haystack) {
        return Industry::Construction;
    }
    if hit(&haystack, WEB_AGENCY_KEYWORDS) {
        return Industry::WebAgency;
    }
    if hit(&haystack, CONSULTING_KEYWORDS) {
        return Industry::Consulting;
    }
    if hit(&haystack, MARKETING_KEYWORDS) {
        return Industry::Marketing;
    }

    // Default is web agency, never construction.
    Industry::WebAgency
}

/// Pure lookup: (industry, project type, RFP text) → knowledge block.
pub fn lookup(
    industry: &str,
    project_type: Option<&str>,
    rfp_text: &str,
) -> &'static IndustryIntelligence {
    block_for(resolve_industry(industry, project_type, rfp_text))
}

pub fn block_for(industry: Industry) -> &'static IndustryIntelligence {
    match industry {
        Industry::Saas => &SAAS,
        Industry::Logistics => &LOGISTICS,
        Industry::Construction => &CONSTRUCTION,
        Industry::WebAgency => &WEB_AGENCY,
        Industry::Consulting => &CONSULTING,
        Industry::Marketing => &MARKETING,
    }
}

// Bounded slice sizes per category. Truncation keeps prompt size predictable
// and is intentional.
const TERMINOLOGY_LIMIT: usize = 8;
const KPI_LIMIT: usize = 6;
const PAIN_POINT_LIMIT: usize = 6;
const CONVERSION_LIMIT: usize = 5;
const UX_LIMIT: usize = 4;
const SEO_LIMIT: usize = 4;
const TECHNICAL_LIMIT: usize = 6;

fn top(items: &[&str], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a bounded slice of the knowledge block into prompt text.
pub fn render_intelligence(intel: &IndustryIntelligence) -> String {
    format!(
        "INDUSTRY CONTEXT ({label}):\n\
         - Speak in the client's language: {terminology}\n\
         - KPIs that matter: {kpis}\n\
         - Pain points to address: {pain_points}\n\
         - Conversion principles: {conversion}\n\
         - UX expectations: {ux}\n\
         - SEO priorities: {seo}\n\
         - Technical requirements: {technical}",
        label = intel.industry.label(),
        terminology = top(intel.terminology, TERMINOLOGY_LIMIT),
        kpis = top(intel.kpis, KPI_LIMIT),
        pain_points = top(intel.pain_points, PAIN_POINT_LIMIT),
        conversion = top(intel.conversion_principles, CONVERSION_LIMIT),
        ux = top(intel.ux_needs, UX_LIMIT),
        seo = top(intel.seo_needs, SEO_LIMIT),
        technical = top(intel.technical_requirements, TECHNICAL_LIMIT),
    )
}
