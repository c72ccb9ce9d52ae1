//! # Daily Sparks Core
//!
//! Shared logic for the Daily Sparks blogging platform: content models,
//! the related-content scoring and ranking pipeline, slug generation,
//! FAQ extraction, and the content store abstraction.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or other
//! native-only dependencies. The application crate supplies a SQLite
//! [`store::ContentStore`] implementation; an in-memory implementation
//! ships here for tests.

pub mod faq;
pub mod models;
pub mod related;
pub mod slug;
pub mod store;
pub mod tokenize;
