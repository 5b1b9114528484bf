// Filtering engine: (posts, criteria) -> filtered posts.
//
// Pure and total: no hidden state, no errors, store order preserved.

use tracing::debug;

use super::criteria::FilterCriteria;
use crate::posts::Post;

/// Substring that keeps odd-id posts visible under a location query.
pub const LOCATION_KEYWORD: &str = "los";

/// Placeholder location predicate.
///
/// There is no geocoded search behind this. An empty query matches
/// everything; otherwise odd-id posts only match when the lower-cased query
/// contains "los", and even-id posts always match. Kept as-is for
/// compatibility with the existing dashboard behavior.
pub fn matches_location(post: &Post, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let odd = post.id % 2 == 1;
    !(odd && !query.to_lowercase().contains(LOCATION_KEYWORD))
}

/// Whether a single post passes every criterion.
pub fn matches(post: &Post, criteria: &FilterCriteria) -> bool {
    criteria.range().contains(post.date)
        && criteria.severities().contains(post.severity)
        && matches_location(post, criteria.location_query())
}

/// Filter the store, keeping its order.
pub fn filter_posts(posts: &[Post], criteria: &FilterCriteria) -> Vec<Post> {
    let filtered: Vec<Post> = posts
        .iter()
        .filter(|post| matches(post, criteria))
        .cloned()
        .collect();

    debug!(
        total = posts.len(),
        matched = filtered.len(),
        location_query = criteria.location_query(),
        "Filtered posts"
    );

    filtered
}
