//! Public HTTP API.
//!
//! Serves the related-content rail, single posts, and syndication feeds.
//! All endpoints are public reads; writes happen only through the CLI
//! import path.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/related-content` | Ranked related posts |
//! | `GET`  | `/posts/{slug}` | Full post by slug |
//! | `GET`  | `/feed.xml` | RSS 2.0 feed |
//! | `GET`  | `/opml.xml` | OPML subscription document |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Error bodies are flat JSON: `{"error": "Something went wrong"}` for
//! store failures (500) and `{"error": "Post not found"}` for missing
//! slugs (404). Malformed `limit` values never produce a 400 — they are
//! clamped or defaulted silently.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted: the related rail is
//! fetched client-side from article pages on other hosts.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use daily_sparks_core::faq::{extract_faq, FaqEntry};
use daily_sparks_core::related::{format_ts_iso, related, RelatedItem, RelatedQuery};
use daily_sparks_core::store::ContentStore;

use crate::config::{Config, RelatedConfig};
use crate::db;
use crate::feed;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<dyn ContentStore>,
}

/// Starts the HTTP server on the configured bind address.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let pool = db::connect(config).await?;
    let store: Arc<dyn ContentStore> = Arc::new(SqliteStore::new(pool));

    let router = app(Arc::new(config.clone()), store);

    println!("Daily Sparks listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Build the router against any [`ContentStore`] implementation.
pub fn app(config: Arc<Config>, store: Arc<dyn ContentStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState { config, store };

    Router::new()
        .route("/related-content", get(handle_related))
        .route("/posts/{slug}", get(handle_post))
        .route("/feed.xml", get(handle_rss))
        .route("/opml.xml", get(handle_opml))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

/// Internal error type that converts into a flat JSON error response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Something went wrong".to_string(),
        }
    }

    fn post_not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Post not found".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /related-content ============

/// Raw query parameters for `GET /related-content`.
///
/// Everything arrives as optional strings; [`build_related_query`] turns
/// them into a validated [`RelatedQuery`]. `limit` stays a string so a
/// malformed value falls back to the default instead of a 400 from the
/// extractor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelatedParams {
    exclude_id: Option<String>,
    category: Option<String>,
    tags: Option<String>,
    title: Option<String>,
    limit: Option<String>,
}

/// Clamp a raw `limit` parameter: malformed → default, out of range →
/// nearest bound. Never an error.
fn clamp_limit(raw: Option<&str>, related_cfg: &RelatedConfig) -> usize {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) => n.clamp(1, related_cfg.max_limit as i64) as usize,
        None => related_cfg.default_limit,
    }
}

fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

fn build_related_query(params: RelatedParams, related_cfg: &RelatedConfig) -> RelatedQuery {
    RelatedQuery {
        exclude: params.exclude_id,
        category: params.category.filter(|c| !c.trim().is_empty()),
        tags: parse_tags(params.tags.as_deref()),
        title_text: params.title,
        limit: clamp_limit(params.limit.as_deref(), related_cfg),
        candidate_cap: related_cfg.candidate_cap,
    }
}

async fn handle_related(
    State(state): State<AppState>,
    Query(params): Query<RelatedParams>,
) -> Result<Json<Vec<RelatedItem>>, AppError> {
    let query = build_related_query(params, &state.config.related);
    let items = related(state.store.as_ref(), &query)
        .await
        .map_err(|_| AppError::internal())?;
    Ok(Json(items))
}

// ============ GET /posts/{slug} ============

/// Full post response, camelCase wire names matching the platform's API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostResponse {
    id: String,
    slug: String,
    title: String,
    image: Option<String>,
    category: String,
    author: Option<String>,
    meta_title: Option<String>,
    meta_description: Option<String>,
    tags: Vec<String>,
    created_at: String,
    body: String,
    /// Question/answer pairs extracted from the body, for FAQ
    /// structured data on the article page.
    faq: Vec<FaqEntry>,
}

async fn handle_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let item = state
        .store
        .get_by_slug(&slug)
        .await
        .map_err(|_| AppError::internal())?
        .ok_or_else(AppError::post_not_found)?;

    let faq = extract_faq(&item.body);
    Ok(Json(PostResponse {
        id: item.id,
        slug: item.slug,
        title: item.title,
        image: item.image,
        category: item.category,
        author: item.author,
        meta_title: item.meta_title,
        meta_description: item.meta_description,
        tags: item.tags,
        created_at: format_ts_iso(item.created_at),
        body: item.body,
        faq,
    }))
}

// ============ GET /feed.xml and /opml.xml ============

async fn handle_rss(State(state): State<AppState>) -> Result<Response, AppError> {
    let items = state
        .store
        .recent(state.config.site.feed_limit)
        .await
        .map_err(|_| AppError::internal())?;
    let xml = feed::build_rss(&state.config.site, &items).map_err(|_| AppError::internal())?;
    Ok((
        [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
        xml,
    )
        .into_response())
}

async fn handle_opml(State(state): State<AppState>) -> Result<Response, AppError> {
    let xml = feed::build_opml(&state.config.site).map_err(|_| AppError::internal())?;
    Ok((
        [(header::CONTENT_TYPE, "text/x-opml; charset=utf-8")],
        xml,
    )
        .into_response())
}
