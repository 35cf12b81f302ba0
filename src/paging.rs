//! Fixed-size windowing over an already-ordered result set.

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Returns the `page`-th window (1-based) of `items`.
/// Pages at or below zero, and pages past the end, are empty.
pub fn paginate<T>(items: &[T], page: i64) -> &[T] {
    if page < 1 {
        return &[];
    }
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE));
    match start {
        Some(start) if start < items.len() => {
            let end = (start + QUESTIONS_PER_PAGE).min(items.len());
            &items[start..end]
        }
        _ => &[],
    }
}

/// Page parameter as sent in the query string: absent or unparsable means 1.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1)
}
