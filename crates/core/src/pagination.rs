//! Limit/offset pagination helpers for list endpoints.

/// Page size used when only `offset` is supplied.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Upper bound on a requested page size.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build the `next` / `previous` links for a page of `count` total rows.
///
/// `path` is the request path without a query string. `next` is `None` on the
/// last page, `previous` is `None` on the first.
pub fn page_links(
    path: &str,
    limit: i64,
    offset: i64,
    count: i64,
) -> (Option<String>, Option<String>) {
    let next = offset
        .checked_add(limit)
        .filter(|&next_offset| next_offset < count)
        .map(|next_offset| format!("{path}?limit={limit}&offset={next_offset}"));

    let previous = (offset > 0).then(|| {
        let prev_offset = (offset - limit).max(0);
        if prev_offset == 0 {
            format!("{path}?limit={limit}")
        } else {
            format!("{path}?limit={limit}&offset={prev_offset}")
        }
    });

    (next, previous)
}
