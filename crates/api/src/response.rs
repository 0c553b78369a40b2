//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Limit/offset page envelope: `{ "count", "next", "previous", "results" }`.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    /// Total rows across all pages.
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A list endpoint's body: a bare array, or a [`Page`] when pagination was requested.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Listing<T: Serialize> {
    All(Vec<T>),
    Paged(Page<T>),
}
