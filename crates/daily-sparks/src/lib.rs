//! # Daily Sparks
//!
//! **A blogging platform's related-content engine.**
//!
//! Daily Sparks serves "More like this" recommendations for article
//! pages: candidates are fetched from a SQLite content store with a
//! coarse filter (same category OR overlapping tags), scored on three
//! lexical signals, and ranked with fixed weights. Content enters
//! through a JSON import pipeline; results leave through a CLI and a
//! public HTTP API that also serves single posts and RSS/OPML feeds.
//!
//! ## Data Flow
//!
//! 1. `sparks import` normalizes drafts into [`daily_sparks_core::models::ContentItem`]s
//!    (slug assignment, UUID identity) and upserts them into SQLite.
//! 2. A related-content request becomes a [`daily_sparks_core::related::RelatedQuery`]
//!    at the boundary (limit clamped, tags split, malformed values defaulted).
//! 3. The pipeline in [`daily_sparks_core::related`] fetches candidates through the
//!    [`daily_sparks_core::store::ContentStore`] trait, scores
//!    (`3 × tag_matches + token_hits + category_bonus`), sorts by score then
//!    recency, truncates, and strips bodies.
//! 4. Results are exposed via the **CLI** (`sparks related`) and
//!    **HTTP** (`GET /related-content`).
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Database schema migrations (idempotent) |
//! | [`sqlite_store`] | SQLite implementation of the content store trait |
//! | [`import`] | JSON import pipeline: draft → normalize → upsert |
//! | [`related_cmd`] | CLI front-end for the recommendation pipeline |
//! | [`feed`] | RSS 2.0 and OPML feed assembly |
//! | [`server`] | Public HTTP API (Axum) with CORS |

pub mod config;
pub mod db;
pub mod feed;
pub mod import;
pub mod migrate;
pub mod related_cmd;
pub mod server;
pub mod sqlite_store;

pub use daily_sparks_core::{faq, models, related, slug, store, tokenize};
