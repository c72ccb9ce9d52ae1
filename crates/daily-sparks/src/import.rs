//! Content import pipeline.
//!
//! Reads a JSON array of post drafts, normalizes each into a
//! [`ContentItem`] (slug assignment with uniqueness suffixing, UUID
//! identity, RFC 3339 → epoch timestamps), and upserts into the store.
//! A SHA-256 fingerprint of the editable fields lets re-imports skip
//! posts that haven't changed.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use uuid::Uuid;

use daily_sparks_core::models::ContentItem;
use daily_sparks_core::slug::{slugify, unique_slug};
use daily_sparks_core::store::ContentStore;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

/// A post as authored in the import file, before normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    pub body: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fingerprint of every field an author can edit. Identity and slug are
/// excluded so a skip decision only reflects content.
fn fingerprint(item: &ContentItem) -> String {
    let mut hasher = Sha256::new();
    hasher.update(item.title.as_bytes());
    hasher.update([0]);
    hasher.update(item.category.as_bytes());
    hasher.update([0]);
    for tag in &item.tags {
        hasher.update(tag.as_bytes());
        hasher.update([0]);
    }
    hasher.update([0]);
    for field in [&item.image, &item.author, &item.meta_title, &item.meta_description] {
        hasher.update(field.as_deref().unwrap_or("").as_bytes());
        hasher.update([0]);
    }
    hasher.update(item.body.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub async fn run_import(
    config: &Config,
    file: &Path,
    dry_run: bool,
    limit: Option<usize>,
) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;
    let mut drafts: Vec<PostDraft> =
        serde_json::from_str(&raw).with_context(|| "Failed to parse import file")?;

    if let Some(lim) = limit {
        drafts.truncate(lim);
    }

    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());

    let mut created = 0u64;
    let mut updated = 0u64;
    let mut unchanged = 0u64;

    for draft in &drafts {
        let base_slug = match &draft.slug {
            Some(explicit) => slugify(explicit),
            None => slugify(&draft.title),
        };

        let existing = store.get_by_slug(&base_slug).await?;
        let item = match &existing {
            Some(current) => ContentItem {
                id: current.id.clone(),
                slug: current.slug.clone(),
                title: draft.title.clone(),
                image: draft.image.clone(),
                category: draft.category.clone(),
                author: draft.author.clone(),
                meta_title: draft.meta_title.clone(),
                meta_description: draft.meta_description.clone(),
                body: draft.body.clone(),
                tags: draft.tags.clone(),
                created_at: draft
                    .created_at
                    .map(|dt| dt.timestamp())
                    .unwrap_or(current.created_at),
            },
            None => ContentItem {
                id: Uuid::new_v4().to_string(),
                slug: unique_slug(&store, &base_slug).await?,
                title: draft.title.clone(),
                image: draft.image.clone(),
                category: draft.category.clone(),
                author: draft.author.clone(),
                meta_title: draft.meta_title.clone(),
                meta_description: draft.meta_description.clone(),
                body: draft.body.clone(),
                tags: draft.tags.clone(),
                created_at: draft
                    .created_at
                    .map(|dt| dt.timestamp())
                    .unwrap_or_else(|| Utc::now().timestamp()),
            },
        };

        match &existing {
            Some(current) if fingerprint(current) == fingerprint(&item) => {
                unchanged += 1;
                continue;
            }
            Some(_) => updated += 1,
            None => created += 1,
        }

        if !dry_run {
            store.upsert_item(&item).await?;
        }
    }

    if dry_run {
        println!("import {} (dry run)", file.display());
    } else {
        println!("import {}", file.display());
    }
    println!("  posts read: {}", drafts.len());
    println!("  created: {created}");
    println!("  updated: {updated}");
    println!("  unchanged: {unchanged}");
    println!("ok");

    pool.close().await;
    Ok(())
}
