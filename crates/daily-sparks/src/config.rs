use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use daily_sparks_core::related::DEFAULT_CANDIDATE_CAP;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub related: RelatedConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

/// Tuning for the related-content pipeline. The score weights themselves
/// are fixed; only the fetch ceiling and limit clamping are configurable.
#[derive(Debug, Deserialize, Clone)]
pub struct RelatedConfig {
    #[serde(default = "default_candidate_cap")]
    pub candidate_cap: i64,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            candidate_cap: default_candidate_cap(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_candidate_cap() -> i64 {
    DEFAULT_CANDIDATE_CAP
}
fn default_limit() -> usize {
    5
}
fn default_max_limit() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

/// Site identity used by the RSS/OPML feeds.
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_site_title")]
    pub title: String,
    #[serde(default = "default_site_url")]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_feed_limit")]
    pub feed_limit: i64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            url: default_site_url(),
            description: String::new(),
            feed_limit: default_feed_limit(),
        }
    }
}

fn default_site_title() -> String {
    "Daily Sparks".to_string()
}
fn default_site_url() -> String {
    "http://localhost:7341".to_string()
}
fn default_feed_limit() -> i64 {
    20
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.related.default_limit < 1 {
        anyhow::bail!("related.default_limit must be >= 1");
    }

    if config.related.max_limit > 10 {
        anyhow::bail!("related.max_limit must be <= 10");
    }

    if config.related.default_limit > config.related.max_limit {
        anyhow::bail!("related.default_limit must be <= related.max_limit");
    }

    if config.related.candidate_cap < config.related.max_limit as i64 {
        anyhow::bail!("related.candidate_cap must be >= related.max_limit");
    }

    if config.site.url.trim().is_empty() {
        anyhow::bail!("site.url must not be empty");
    }

    if config.site.feed_limit < 1 {
        anyhow::bail!("site.feed_limit must be >= 1");
    }

    Ok(config)
}
