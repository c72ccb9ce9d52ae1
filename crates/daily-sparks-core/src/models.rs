//! Core data models used throughout Daily Sparks.
//!
//! These types represent the published posts that flow through the
//! import pipeline, the content store, and the recommendation engine.

/// A published post, the unit of recommendation.
///
/// `slug` is unique across all items and URL-safe. `category` is a single
/// free-text label matched case-insensitively; `tags` are compared
/// case-sensitively as stored. `created_at` is Unix seconds and serves as
/// the recency tie-break in ranking.
#[derive(Debug, Clone)]
pub struct ContentItem {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub image: Option<String>,
    pub category: String,
    pub author: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub body: String,
    pub tags: Vec<String>,
    pub created_at: i64,
}
