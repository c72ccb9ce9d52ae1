//! SQLite-backed [`ContentStore`] implementation.
//!
//! Maps each store operation to SQL against the posts table. Tags are
//! stored as a JSON array in `tags_json` and intersected with
//! `json_each`; category comparisons use `COLLATE NOCASE`. Scoring
//! happens in application code — SQL only performs the coarse candidate
//! filter.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use daily_sparks_core::models::ContentItem;
use daily_sparks_core::store::ContentStore;

/// SQLite implementation of the [`ContentStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

const ITEM_COLUMNS: &str = "id, slug, title, image, category, author, meta_title, \
                            meta_description, body, tags_json, created_at";

fn item_from_row(row: &SqliteRow) -> ContentItem {
    let tags_json: String = row.get("tags_json");
    let tags: Vec<String> = serde_json::from_str(&tags_json).unwrap_or_default();
    ContentItem {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        image: row.get("image"),
        category: row.get("category"),
        author: row.get("author"),
        meta_title: row.get("meta_title"),
        meta_description: row.get("meta_description"),
        body: row.get("body"),
        tags,
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn upsert_item(&self, item: &ContentItem) -> Result<String> {
        let tags_json = serde_json::to_string(&item.tags)?;
        sqlx::query(
            r#"
            INSERT INTO posts (id, slug, title, image, category, author,
                               meta_title, meta_description, body, tags_json, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                slug = excluded.slug,
                title = excluded.title,
                image = excluded.image,
                category = excluded.category,
                author = excluded.author,
                meta_title = excluded.meta_title,
                meta_description = excluded.meta_description,
                body = excluded.body,
                tags_json = excluded.tags_json,
                created_at = excluded.created_at
            "#,
        )
        .bind(&item.id)
        .bind(&item.slug)
        .bind(&item.title)
        .bind(&item.image)
        .bind(&item.category)
        .bind(&item.author)
        .bind(&item.meta_title)
        .bind(&item.meta_description)
        .bind(&item.body)
        .bind(&tags_json)
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        Ok(item.id.clone())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<ContentItem>> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM posts WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(item_from_row))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM posts WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ContentItem>> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM posts ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    async fn related_candidates(
        &self,
        exclude: Option<&str>,
        category: Option<&str>,
        tags: &[String],
        cap: i64,
    ) -> Result<Vec<ContentItem>> {
        let tags_json = serde_json::to_string(tags)?;
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM posts
            WHERE (?1 IS NULL OR (id <> ?1 AND slug <> ?1))
              AND (
                    (?2 IS NOT NULL AND category = ?2 COLLATE NOCASE)
                 OR EXISTS (
                        SELECT 1
                        FROM json_each(posts.tags_json) post_tag
                        JOIN json_each(?3) query_tag ON post_tag.value = query_tag.value
                    )
                 OR (?2 IS NULL AND json_array_length(?3) = 0)
              )
            ORDER BY created_at DESC
            LIMIT ?4
            "#
        ))
        .bind(exclude)
        .bind(category)
        .bind(&tags_json)
        .bind(cap)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(item_from_row).collect())
    }
}
