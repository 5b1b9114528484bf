// Alert evaluation over the filtered post list.
//
// One rule: two or more high-severity posts in view raise the crisis alert.

use crate::posts::{Post, Severity};

/// Number of high-severity posts that raises the alert.
pub const ALERT_HIGH_SEVERITY_THRESHOLD: usize = 2;

/// The alert banner text.
pub const HIGH_SEVERITY_ALERT: &str =
    "High severity crisis alert: multiple critical posts detected!";

/// Count the high-severity posts in a list.
pub fn high_severity_count(posts: &[Post]) -> usize {
    posts
        .iter()
        .filter(|p| p.severity == Severity::High)
        .count()
}

/// Derive the alert message for a filtered list, if any.
pub fn evaluate(filtered: &[Post]) -> Option<String> {
    if high_severity_count(filtered) >= ALERT_HIGH_SEVERITY_THRESHOLD {
        Some(HIGH_SEVERITY_ALERT.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::PostStore;

    fn with_ids(ids: &[u32]) -> Vec<Post> {
        let store = PostStore::sample();
        ids.iter().filter_map(|id| store.get(*id).cloned()).collect()
    }

    #[test]
    fn test_two_high_posts_raise_alert() {
        let alert = evaluate(&with_ids(&[1, 2]));
        assert_eq!(alert.as_deref(), Some(HIGH_SEVERITY_ALERT));
    }

    #[test]
    fn test_one_high_post_is_quiet() {
        assert_eq!(evaluate(&with_ids(&[1, 3, 4, 5, 6])), None);
    }

    #[test]
    fn test_empty_list_is_quiet() {
        assert_eq!(evaluate(&[]), None);
        assert_eq!(high_severity_count(&[]), 0);
    }
}
