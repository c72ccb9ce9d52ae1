//! Storage abstraction for Daily Sparks.
//!
//! The [`ContentStore`] trait defines all storage operations needed by
//! the recommendation pipeline, slug assignment, and the public read
//! surfaces, enabling pluggable backends (SQLite, in-memory).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ContentItem;

/// Abstract content store for Daily Sparks.
///
/// All operations are async (via `async-trait`). The recommendation
/// pipeline is a read-only consumer; writes happen only through the
/// import path.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`upsert_item`](ContentStore::upsert_item) | Insert or update a post |
/// | [`get_by_slug`](ContentStore::get_by_slug) | Retrieve a full post by slug |
/// | [`slug_exists`](ContentStore::slug_exists) | Check slug availability |
/// | [`recent`](ContentStore::recent) | Most recent posts (feeds, listings) |
/// | [`related_candidates`](ContentStore::related_candidates) | Coarse-filtered candidate fetch for ranking |
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert or update a post. Returns the post ID.
    async fn upsert_item(&self, item: &ContentItem) -> Result<String>;

    /// Retrieve a full post by its slug.
    async fn get_by_slug(&self, slug: &str) -> Result<Option<ContentItem>>;

    /// Whether any post already owns this slug.
    async fn slug_exists(&self, slug: &str) -> Result<bool>;

    /// The most recent posts, ordered by `created_at` descending.
    async fn recent(&self, limit: i64) -> Result<Vec<ContentItem>>;

    /// Fetch candidates for related-content ranking.
    ///
    /// Returns posts whose category matches `category` case-insensitively
    /// OR whose tag list intersects `tags` (case-sensitive), unioned.
    /// With neither filter supplied the fetch is unrestricted. The post
    /// whose id *or* slug equals `exclude` is always omitted. Results are
    /// ordered by `created_at` descending and capped at `cap` rows; they
    /// carry the full body, which the scorer matches tokens against.
    async fn related_candidates(
        &self,
        exclude: Option<&str>,
        category: Option<&str>,
        tags: &[String],
        cap: i64,
    ) -> Result<Vec<ContentItem>>;
}
