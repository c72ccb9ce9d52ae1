//! Slug generation and uniqueness.
//!
//! Slugs are assigned at creation from the post title (or an explicit
//! override) and must stay unique across all posts. Collisions are
//! resolved by numeric suffixing against the store.

use anyhow::Result;

use crate::store::ContentStore;

/// Turn free text into a URL-safe slug.
///
/// Lowercases ASCII letters, keeps digits, and collapses every other run
/// of characters into a single hyphen. No leading or trailing hyphens.
/// Text with no usable characters falls back to `"post"`.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    if out.is_empty() {
        "post".to_string()
    } else {
        out
    }
}

/// Find a free slug starting from `base`.
///
/// Returns `base` unchanged if no post owns it, otherwise probes
/// `base-2`, `base-3`, … until a free one is found.
pub async fn unique_slug<S: ContentStore + ?Sized>(store: &S, base: &str) -> Result<String> {
    if !store.slug_exists(base).await? {
        return Ok(base.to_string());
    }
    let mut n: u64 = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !store.slug_exists(&candidate).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}
