//! In-memory [`ContentStore`] implementation for tests.
//!
//! Uses a `HashMap` behind `std::sync::RwLock` for thread safety. The
//! candidate filter mirrors the SQLite implementation: category matches
//! use ASCII case folding, tag intersection is case-sensitive.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ContentItem;

use super::ContentStore;

/// In-memory store for tests.
pub struct InMemoryStore {
    items: RwLock<HashMap<String, ContentItem>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_recent(items: &mut [ContentItem]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn upsert_item(&self, item: &ContentItem) -> Result<String> {
        let mut items = self.items.write().unwrap();
        items.insert(item.id.clone(), item.clone());
        Ok(item.id.clone())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<ContentItem>> {
        let items = self.items.read().unwrap();
        Ok(items.values().find(|it| it.slug == slug).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let items = self.items.read().unwrap();
        Ok(items.values().any(|it| it.slug == slug))
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ContentItem>> {
        let items = self.items.read().unwrap();
        let mut out: Vec<ContentItem> = items.values().cloned().collect();
        sort_recent(&mut out);
        out.truncate(limit.max(0) as usize);
        Ok(out)
    }

    async fn related_candidates(
        &self,
        exclude: Option<&str>,
        category: Option<&str>,
        tags: &[String],
        cap: i64,
    ) -> Result<Vec<ContentItem>> {
        let items = self.items.read().unwrap();
        let unrestricted = category.is_none() && tags.is_empty();
        let mut out: Vec<ContentItem> = items
            .values()
            .filter(|it| exclude.map_or(true, |x| it.id != x && it.slug != x))
            .filter(|it| {
                if unrestricted {
                    return true;
                }
                let category_hit =
                    category.map_or(false, |c| it.category.eq_ignore_ascii_case(c));
                let tag_hit = it.tags.iter().any(|t| tags.contains(t));
                category_hit || tag_hit
            })
            .cloned()
            .collect();
        sort_recent(&mut out);
        out.truncate(cap.max(0) as usize);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(id: &str, slug: &str, category: &str, tags: &[&str], created_at: i64) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            slug: slug.to_string(),
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

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        for item in [
            make_item("1", "tokyo-eats", "Travel", &["japan", "food"], 100),
            make_item("2", "rust-intro", "Tech", &["rust"], 200),
            make_item("3", "kyoto-temples", "travel", &["japan"], 300),
        ] {
            store.upsert_item(&item).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let store = seeded().await;
        let item = store.get_by_slug("rust-intro").await.unwrap().unwrap();
        assert_eq!(item.id, "2");
        assert!(store.get_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_slug_exists() {
        let store = seeded().await;
        assert!(store.slug_exists("tokyo-eats").await.unwrap());
        assert!(!store.slug_exists("tokyo-eats-2").await.unwrap());
    }

    #[tokio::test]
    async fn test_recent_orders_and_caps() {
        let store = seeded().await;
        let items = store.recent(2).await.unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);
    }

    #[tokio::test]
    async fn test_candidates_category_is_case_insensitive() {
        let store = seeded().await;
        let items = store
            .related_candidates(None, Some("TRAVEL"), &[], 10)
            .await
            .unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[tokio::test]
    async fn test_candidates_tags_are_case_sensitive() {
        let store = seeded().await;
        let items = store
            .related_candidates(None, None, &["Japan".to_string()], 10)
            .await
            .unwrap();
        assert!(items.is_empty());

        let items = store
            .related_candidates(None, None, &["japan".to_string()], 10)
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_candidates_union_of_filters() {
        let store = seeded().await;
        // Category Tech OR tag "japan" admits all three posts.
        let items = store
            .related_candidates(None, Some("Tech"), &["japan".to_string()], 10)
            .await
            .unwrap();
        assert_eq!(items.len(), 3);
    }

    #[tokio::test]
    async fn test_candidates_exclude_by_id_or_slug() {
        let store = seeded().await;
        let items = store.related_candidates(Some("2"), None, &[], 10).await.unwrap();
        assert!(items.iter().all(|i| i.id != "2"));

        let items = store
            .related_candidates(Some("rust-intro"), None, &[], 10)
            .await
            .unwrap();
        assert!(items.iter().all(|i| i.slug != "rust-intro"));
    }

    #[tokio::test]
    async fn test_candidates_unrestricted_when_no_filters() {
        let store = seeded().await;
        let items = store.related_candidates(None, None, &[], 10).await.unwrap();
        assert_eq!(items.len(), 3);
    }
}
