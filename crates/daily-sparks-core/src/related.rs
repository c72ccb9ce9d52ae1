//! Related-content scoring and ranking.
//!
//! The recommendation pipeline operates entirely through the
//! [`ContentStore`] trait, with no database or configuration
//! dependencies. The calling application constructs a [`RelatedQuery`]
//! at the boundary (limit already clamped) and passes the appropriate
//! store implementation.
//!
//! # Ranking Algorithm
//!
//! 1. Tokenize the query title text (lowercase, alphanumeric runs ≥ 3 chars).
//! 2. Fetch up to `candidate_cap` candidates matching the coarse filter
//!    (same category OR overlapping tags), excluding the current post.
//! 3. Score each candidate: `score = 3 × tag_matches + token_hits + category_bonus`.
//! 4. Sort by score (desc), created_at (desc).
//! 5. Truncate to `limit` and strip the body.

use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;

use crate::models::ContentItem;
use crate::store::ContentStore;
use crate::tokenize::tokenize;

/// Weight of one matching tag, in units of a single title-token hit.
///
/// Tag overlap is the strongest relevance signal; a category match is the
/// weakest, worth the same as one keyword hit.
pub const TAG_WEIGHT: u32 = 3;

/// Default ceiling on the pre-score candidate fetch.
pub const DEFAULT_CANDIDATE_CAP: i64 = 400;

/// Bundles all inputs for a single related-content invocation.
///
/// Constructed once at the boundary (HTTP handler or CLI) with validated
/// and clamped fields; raw request objects never reach the pipeline.
#[derive(Debug, Clone)]
pub struct RelatedQuery {
    /// Post to exclude from results, matched against id *or* slug.
    pub exclude: Option<String>,
    /// Category filter, matched case-insensitively.
    pub category: Option<String>,
    /// Tag filter, matched case-sensitively as stored.
    pub tags: Vec<String>,
    /// Free text (typically the current post's title) for keyword hits.
    pub title_text: Option<String>,
    /// Maximum results to return. The boundary clamps this to `[1, 10]`.
    pub limit: usize,
    /// Ceiling on the pre-score candidate fetch.
    pub candidate_cap: i64,
}

/// Per-candidate relevance signals, computed independently and combined
/// by [`Signals::score`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signals {
    /// Size of the set intersection between candidate and query tags.
    pub tag_matches: usize,
    /// Number of distinct query title-tokens found as case-insensitive
    /// substrings in any of title, meta title, meta description, or body.
    pub token_hits: usize,
    /// 1 if the query specified a category and this candidate matches it.
    pub category_bonus: u32,
}

impl Signals {
    /// Composite score: `3 × tag_matches + token_hits + category_bonus`.
    pub fn score(&self) -> u32 {
        TAG_WEIGHT * self.tag_matches as u32 + self.token_hits as u32 + self.category_bonus
    }
}

/// A ranked related post, shaped for the public API. The body is
/// deliberately absent to keep payloads small.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedItem {
    pub slug: String,
    pub title: String,
    pub image: Option<String>,
    pub category: String,
    pub author: Option<String>,
    pub tags: Vec<String>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

impl RelatedItem {
    fn from_item(item: &ContentItem) -> Self {
        Self {
            slug: item.slug.clone(),
            title: item.title.clone(),
            image: item.image.clone(),
            category: item.category.clone(),
            author: item.author.clone(),
            tags: item.tags.clone(),
            created_at: format_ts_iso(item.created_at),
        }
    }
}

/// Compute the relevance signals for one candidate.
///
/// `title_tokens` must be the output of [`tokenize`] on the query's title
/// text (already lowercase). Duplicate tokens are counted once.
pub fn score_candidate(
    candidate: &ContentItem,
    query: &RelatedQuery,
    title_tokens: &[String],
) -> Signals {
    let candidate_tags: HashSet<&str> = candidate.tags.iter().map(String::as_str).collect();
    let tag_matches = query
        .tags
        .iter()
        .map(String::as_str)
        .collect::<HashSet<&str>>()
        .into_iter()
        .filter(|t| candidate_tags.contains(t))
        .count();

    let haystacks = [
        Some(candidate.title.as_str()),
        candidate.meta_title.as_deref(),
        candidate.meta_description.as_deref(),
        Some(candidate.body.as_str()),
    ];
    let lowered: Vec<String> = haystacks
        .iter()
        .flatten()
        .map(|field| field.to_lowercase())
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut token_hits = 0;
    for token in title_tokens {
        if !seen.insert(token.as_str()) {
            continue;
        }
        if lowered.iter().any(|field| field.contains(token.as_str())) {
            token_hits += 1;
        }
    }

    let category_bonus = match &query.category {
        Some(c) if candidate.category.eq_ignore_ascii_case(c) => 1,
        _ => 0,
    };

    Signals {
        tag_matches,
        token_hits,
        category_bonus,
    }
}

/// Sort scored candidates and shape the top `limit` into [`RelatedItem`]s.
///
/// Order: score descending, ties broken by `created_at` descending.
/// Candidates sharing the same second sort unspecified relative to each
/// other (the sort is stable, so repeated calls over the same snapshot
/// agree). `limit = 0` returns an empty list.
pub fn rank(mut scored: Vec<(ContentItem, Signals)>, limit: usize) -> Vec<RelatedItem> {
    scored.sort_by(|a, b| {
        b.1.score()
            .cmp(&a.1.score())
            .then(b.0.created_at.cmp(&a.0.created_at))
    });
    scored.truncate(limit);
    scored
        .iter()
        .map(|(item, _)| RelatedItem::from_item(item))
        .collect()
}

/// Run the full related-content pipeline against a [`ContentStore`].
///
/// This is the core function that all frontends (CLI, HTTP) delegate to.
/// It fetches coarse-filtered candidates, scores each one, ranks, and
/// returns body-stripped results. Deterministic for a fixed store
/// snapshot and query. Store failures propagate to the caller, which is
/// responsible for graceful degradation.
pub async fn related<S: ContentStore + ?Sized>(
    store: &S,
    query: &RelatedQuery,
) -> Result<Vec<RelatedItem>> {
    let title_tokens = query
        .title_text
        .as_deref()
        .map(tokenize)
        .unwrap_or_default();

    let candidates = store
        .related_candidates(
            query.exclude.as_deref(),
            query.category.as_deref(),
            &query.tags,
            query.candidate_cap,
        )
        .await?;

    let scored: Vec<(ContentItem, Signals)> = candidates
        .into_iter()
        .map(|item| {
            let signals = score_candidate(&item, query, &title_tokens);
            (item, signals)
        })
        .collect();

    Ok(rank(scored, query.limit))
}

/// Format a Unix timestamp as ISO 8601.
pub fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn make_item(id: &str, category: &str, tags: &[&str], created_at: i64) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            slug: format!("post-{id}"),
            title: format!("Post {id}"),
            image: None,
            category: category.to_string(),
            author: None,
            meta_title: None,
            meta_description: None,
            body: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at,
        }
    }

    fn base_query() -> RelatedQuery {
        RelatedQuery {
            exclude: None,
            category: None,
            tags: Vec::new(),
            title_text: None,
            limit: 5,
            candidate_cap: DEFAULT_CANDIDATE_CAP,
        }
    }

    #[test]
    fn test_tag_matches_case_sensitive_intersection() {
        let candidate = make_item("1", "Travel", &["japan", "food", "japan"], 0);
        let query = RelatedQuery {
            tags: vec!["japan".to_string(), "Food".to_string(), "japan".to_string()],
            ..base_query()
        };
        let signals = score_candidate(&candidate, &query, &[]);
        // "japan" intersects once; "Food" differs in case from "food".
        assert_eq!(signals.tag_matches, 1);
    }

    #[test]
    fn test_token_hits_substring_case_insensitive() {
        let mut candidate = make_item("1", "Culture", &[], 0);
        candidate.title = "The Anime Industry".to_string();
        candidate.body = "<p>Studio profiles and production notes.</p>".to_string();
        let query = base_query();
        let tokens = tokenize("anime studio guide");
        let signals = score_candidate(&candidate, &query, &tokens);
        // "anime" hits the title, "studio" hits the body, "guide" misses.
        assert_eq!(signals.token_hits, 2);
    }

    #[test]
    fn test_token_counted_once_across_fields_and_duplicates() {
        let mut candidate = make_item("1", "Travel", &[], 0);
        candidate.title = "Travel notes".to_string();
        candidate.meta_description = Some("travel travel travel".to_string());
        let query = base_query();
        let tokens = tokenize("travel travel");
        let signals = score_candidate(&candidate, &query, &tokens);
        assert_eq!(signals.token_hits, 1);
    }

    #[test]
    fn test_category_bonus_requires_query_category() {
        let candidate = make_item("1", "Travel", &[], 0);

        let without = score_candidate(&candidate, &base_query(), &[]);
        assert_eq!(without.category_bonus, 0);

        let query = RelatedQuery {
            category: Some("travel".to_string()),
            ..base_query()
        };
        let with = score_candidate(&candidate, &query, &[]);
        assert_eq!(with.category_bonus, 1);
    }

    #[test]
    fn test_category_bonus_not_granted_via_tag_admission() {
        // A candidate admitted by the OR-filter's tag arm earns no bonus.
        let candidate = make_item("1", "Tech", &["japan"], 0);
        let query = RelatedQuery {
            category: Some("Travel".to_string()),
            tags: vec!["japan".to_string()],
            ..base_query()
        };
        let signals = score_candidate(&candidate, &query, &[]);
        assert_eq!(signals.category_bonus, 0);
        assert_eq!(signals.score(), 3);
    }

    #[test]
    fn test_composite_score_weights() {
        let signals = Signals {
            tag_matches: 2,
            token_hits: 4,
            category_bonus: 1,
        };
        assert_eq!(signals.score(), 11);
    }

    #[test]
    fn test_rank_tag_weight_dominates_token_hits() {
        let a = make_item("tagged", "X", &[], 0);
        let b = make_item("texty", "X", &[], 100);
        let scored = vec![
            (
                a,
                Signals {
                    tag_matches: 1,
                    token_hits: 0,
                    category_bonus: 0,
                },
            ),
            (
                b,
                Signals {
                    tag_matches: 0,
                    token_hits: 2,
                    category_bonus: 0,
                },
            ),
        ];
        let ranked = rank(scored, 5);
        // score 3 beats score 2 despite the older timestamp.
        assert_eq!(ranked[0].slug, "post-tagged");
        assert_eq!(ranked[1].slug, "post-texty");
    }

    #[test]
    fn test_rank_ties_break_by_recency() {
        let older = make_item("older", "X", &[], 100);
        let newer = make_item("newer", "X", &[], 200);
        let tie = Signals {
            tag_matches: 0,
            token_hits: 1,
            category_bonus: 0,
        };
        let ranked = rank(vec![(older, tie.clone()), (newer, tie)], 5);
        assert_eq!(ranked[0].slug, "post-newer");
        assert_eq!(ranked[1].slug, "post-older");
    }

    #[test]
    fn test_rank_truncates_and_strips_body() {
        let mut item = make_item("1", "X", &[], 0);
        item.body = "a large body".to_string();
        let zero = Signals {
            tag_matches: 0,
            token_hits: 0,
            category_bonus: 0,
        };
        let ranked = rank(vec![(item, zero.clone())], 0);
        assert!(ranked.is_empty());

        let item = make_item("1", "X", &[], 0);
        let ranked = rank(vec![(item, zero)], 3);
        assert_eq!(ranked.len(), 1);
        // RelatedItem has no body field; serialization must not leak one.
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert!(json.get("body").is_none());
        assert!(json.get("createdAt").is_some());
    }

    async fn scenario_store() -> InMemoryStore {
        // With category=Travel and tags=[japan]: C1 scores 4, C2 scores 3, C3 scores 1.
        let store = InMemoryStore::new();
        for item in [
            make_item("c1", "Travel", &["japan", "food"], 100),
            make_item("c2", "Tech", &["japan"], 200),
            make_item("c3", "Travel", &[], 300),
        ] {
            store.upsert_item(&item).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let store = scenario_store().await;
        let query = RelatedQuery {
            exclude: None,
            category: Some("Travel".to_string()),
            tags: vec!["japan".to_string()],
            title_text: Some(String::new()),
            limit: 2,
            candidate_cap: DEFAULT_CANDIDATE_CAP,
        };
        let results = related(&store, &query).await.unwrap();
        let slugs: Vec<&str> = results.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["post-c1", "post-c2"]);
    }

    #[tokio::test]
    async fn test_determinism() {
        let store = scenario_store().await;
        let query = RelatedQuery {
            category: Some("Travel".to_string()),
            tags: vec!["japan".to_string()],
            ..base_query()
        };
        let first = related(&store, &query).await.unwrap();
        for _ in 0..5 {
            let again = related(&store, &query).await.unwrap();
            let a: Vec<&str> = first.iter().map(|r| r.slug.as_str()).collect();
            let b: Vec<&str> = again.iter().map(|r| r.slug.as_str()).collect();
            assert_eq!(a, b);
        }
    }

    #[tokio::test]
    async fn test_excluded_item_never_appears() {
        let store = scenario_store().await;
        for exclude in ["c1", "post-c1"] {
            let query = RelatedQuery {
                exclude: Some(exclude.to_string()),
                category: Some("Travel".to_string()),
                tags: vec!["japan".to_string()],
                ..base_query()
            };
            let results = related(&store, &query).await.unwrap();
            assert!(results.iter().all(|r| r.slug != "post-c1"));
        }
    }

    #[tokio::test]
    async fn test_limit_bound() {
        let store = scenario_store().await;
        for limit in 1..=3 {
            let query = RelatedQuery {
                limit,
                ..base_query()
            };
            let results = related(&store, &query).await.unwrap();
            assert!(results.len() <= limit);
        }
    }

    #[tokio::test]
    async fn test_empty_filter_returns_most_recent() {
        let store = scenario_store().await;
        let query = RelatedQuery {
            exclude: Some("c3".to_string()),
            limit: 10,
            ..base_query()
        };
        let results = related(&store, &query).await.unwrap();
        let slugs: Vec<&str> = results.iter().map(|r| r.slug.as_str()).collect();
        // No filters: most recent first, excluded id omitted.
        assert_eq!(slugs, vec!["post-c2", "post-c1"]);
    }

    #[tokio::test]
    async fn test_title_only_query_ranks_by_keyword_hits() {
        let store = InMemoryStore::new();
        let mut a = make_item("a", "Travel", &[], 100);
        a.title = "Osaka Street Food Guide".to_string();
        let mut b = make_item("b", "Travel", &[], 200);
        b.title = "Alpine Hiking Routes".to_string();
        store.upsert_item(&a).await.unwrap();
        store.upsert_item(&b).await.unwrap();

        let query = RelatedQuery {
            title_text: Some("street food in osaka".to_string()),
            limit: 10,
            ..base_query()
        };
        let results = related(&store, &query).await.unwrap();
        assert_eq!(results[0].slug, "post-a");
    }

    #[test]
    fn test_format_ts_iso() {
        assert_eq!(format_ts_iso(0), "1970-01-01T00:00:00Z");
    }
}
