//! Portfolio Matcher — scores a user's portfolio items against an RFP and
//! returns the top-N most relevant.
//!
//! Score = 0.7 × keyword overlap + 0.3 × semantic relevance. The semantic
//! half uses cosine similarity over token-frequency vectors: deterministic,
//! no LLM call. Output is stable for identical inputs; ties break on
//! original index. A sparse portfolio degrades to "best available" — the
//! matcher never errors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const KEYWORD_WEIGHT: f64 = 0.7;
const SEMANTIC_WEIGHT: f64 = 0.3;

// Internal split of the keyword component between tag hits and skill
// coverage of the description.
const TAG_WEIGHT: f64 = 0.6;
const SKILL_WEIGHT: f64 = 0.4;

/// Product default for how many matches feed the generation prompt.
pub const DEFAULT_TOP_N: usize = 3;

/// A portfolio item supplied by the caller. Mapping matched titles back to
/// persistence identifiers is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// A portfolio item with its computed relevance score and rank.
/// Ephemeral; recomputed per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedPortfolioItem {
    pub item: PortfolioItem,
    pub score: f64,
    pub rank: usize,
}

/// Scores and ranks portfolio items against the RFP, returning at most
/// `top_n` items in non-increasing score order.
pub fn match_portfolio(
    items: Vec<PortfolioItem>,
    rfp_text: &str,
    skills: &[String],
    top_n: usize,
) -> Vec<MatchedPortfolioItem> {
    let rfp_lower = rfp_text.to_lowercase();
    let skills_lower: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();
    let rfp_tokens = token_frequencies(&rfp_lower);

    let mut scored: Vec<(usize, PortfolioItem, f64)> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let keyword = keyword_score(&item, &rfp_lower, &skills_lower);
            let semantic = semantic_score(&item, &rfp_tokens);
            let score = KEYWORD_WEIGHT * keyword + SEMANTIC_WEIGHT * semantic;
            (index, item, score)
        })
        .collect();

    // Stable ordering: descending score, ties by original index.
    scored.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    scored
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(rank, (_, item, score))| MatchedPortfolioItem { item, score, rank })
        .collect()
}

/// Keyword overlap: share of tags hit by the RFP text or extracted skills,
/// blended with the share of skills covered by the item description.
fn keyword_score(item: &PortfolioItem, rfp_lower: &str, skills_lower: &[String]) -> f64 {
    let tag_ratio = if item.tags.is_empty() {
        0.0
    } else {
        let hits = item
            .tags
            .iter()
            .filter(|tag| {
                let tag_lower = tag.to_lowercase();
                rfp_lower.contains(&tag_lower)
                    || skills_lower.iter().any(|s| *s == tag_lower)
            })
            .count();
        hits as f64 / item.tags.len() as f64
    };

    let skill_cover = if skills_lower.is_empty() {
        0.0
    } else {
        let description_lower = item.description.to_lowercase();
        let title_lower = item.title.to_lowercase();
        let hits = skills_lower
            .iter()
            .filter(|s| description_lower.contains(*s) || title_lower.contains(*s))
            .count();
        hits as f64 / skills_lower.len() as f64
    };

    TAG_WEIGHT * tag_ratio + SKILL_WEIGHT * skill_cover
}

/// Cosine similarity between token-frequency vectors of the item text and
/// the RFP text.
fn semantic_score(item: &PortfolioItem, rfp_tokens: &HashMap<String, f64>) -> f64 {
    let item_text = format!(
        "{} {} {}",
        item.title,
        item.description,
        item.tags.join(" ")
    )
    .to_lowercase();
    let item_tokens = token_frequencies(&item_text);
    cosine(&item_tokens, rfp_tokens)
}

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "our", "you", "your", "are", "will", "have",
    "from", "need", "who", "can", "has", "was", "but", "not", "all", "its",
];

fn token_frequencies(text: &str) -> HashMap<String, f64> {
    let mut freq = HashMap::new();
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 3 && !STOPWORDS.contains(t))
    {
        *freq.entry(token.to_string()).or_insert(0.0) += 1.0;
    }
    freq
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(token, weight)| b.get(token).map(|other| weight * other))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }
    let norm_a: f64 = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(title: &str, description: &str, tags: &[&str]) -> PortfolioItem {
        PortfolioItem {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    const RFP: &str = "We need a React dashboard with Stripe subscriptions and OAuth login";

    #[test]
    fn test_returns_at_most_top_n() {
        let items = vec![
            make_item("A", "react work", &["react"]),
            make_item("B", "stripe work", &["stripe"]),
            make_item("C", "oauth work", &["oauth"]),
            make_item("D", "dashboard work", &["dashboard"]),
        ];
        let matches = match_portfolio(items, RFP, &[], 3);
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_scores_are_non_increasing_and_ranks_sequential() {
        let items = vec![
            make_item("Irrelevant", "bakery photography", &["photos"]),
            make_item(
                "SaaS dashboard",
                "Built a React dashboard with Stripe subscriptions and OAuth login",
                &["react", "stripe", "oauth"],
            ),
            make_item("Partial", "A React marketing site", &["react"]),
        ];
        let matches = match_portfolio(items, RFP, &["react".to_string()], 3);
        for pair in matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(matches[0].item.title, "SaaS dashboard");
        let ranks: Vec<usize> = matches.iter().map(|m| m.rank).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn test_deterministic_across_repeated_calls() {
        let items = vec![
            make_item("A", "react dashboard build", &["react"]),
            make_item("B", "stripe billing integration", &["stripe"]),
        ];
        let skills = vec!["react".to_string(), "stripe".to_string()];
        let first = match_portfolio(items.clone(), RFP, &skills, 2);
        let second = match_portfolio(items, RFP, &skills, 2);
        let first_scores: Vec<(Uuid, u64)> = first
            .iter()
            .map(|m| (m.item.id, m.score.to_bits()))
            .collect();
        let second_scores: Vec<(Uuid, u64)> = second
            .iter()
            .map(|m| (m.item.id, m.score.to_bits()))
            .collect();
        assert_eq!(first_scores, second_scores);
    }

    #[test]
    fn test_ties_break_by_original_index() {
        let a = make_item("First", "unrelated text here", &[]);
        let b = make_item("Second", "unrelated text here", &[]);
        let (id_a, id_b) = (a.id, b.id);
        let matches = match_portfolio(vec![a, b], RFP, &[], 2);
        assert_eq!(matches[0].item.id, id_a);
        assert_eq!(matches[1].item.id, id_b);
    }

    #[test]
    fn test_zero_overlap_items_still_returned_on_sparse_portfolio() {
        let items = vec![make_item("Only one", "totally unrelated content", &["pottery"])];
        let matches = match_portfolio(items, RFP, &[], 3);
        assert_eq!(matches.len(), 1, "best available, never an error");
    }

    #[test]
    fn test_empty_portfolio_yields_empty_matches() {
        let matches = match_portfolio(vec![], RFP, &[], 3);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_component_weights_sum_to_one() {
        assert!((KEYWORD_WEIGHT + SEMANTIC_WEIGHT - 1.0).abs() < f64::EPSILON);
        assert!((TAG_WEIGHT + SKILL_WEIGHT - 1.0).abs() < f64::EPSILON);
    }
}
