//! `sparks related` — query the recommendation pipeline from the CLI.

use anyhow::Result;

use daily_sparks_core::related::{related, RelatedQuery};

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

pub async fn run_related(
    config: &Config,
    exclude: Option<String>,
    category: Option<String>,
    tags: Vec<String>,
    title: Option<String>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let related_cfg = &config.related;
    let limit = limit
        .unwrap_or(related_cfg.default_limit)
        .clamp(1, related_cfg.max_limit);

    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());

    let query = RelatedQuery {
        exclude,
        category,
        tags,
        title_text: title,
        limit,
        candidate_cap: related_cfg.candidate_cap,
    };

    let items = related(&store, &query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("No related posts.");
    } else {
        for (i, item) in items.iter().enumerate() {
            println!("{:>2}. {}  [{}]", i + 1, item.title, item.category);
            println!("    /posts/{}  {}", item.slug, item.created_at);
        }
    }

    pool.close().await;
    Ok(())
}
