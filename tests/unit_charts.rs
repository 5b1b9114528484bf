// Unit tests for the alert evaluator and chart projections.
//
// Tests the alert threshold boundaries, histogram sums, and the shape and
// ordering of the engagement time series.

use chrono::NaiveDateTime;
use crisiswatch::alert::{evaluate, high_severity_count, HIGH_SEVERITY_ALERT};
use crisiswatch::charts::{crosstab, project, SentimentCounts};
use crisiswatch::posts::{Engagement, GeoPoint, Post, PostStore, Sentiment, Severity};

fn make_post(id: u32, severity: Severity, sentiment: Sentiment, date: &str) -> Post {
    Post {
        id,
        text: format!("post {id}"),
        severity,
        location: GeoPoint { lat: 0.0, lng: 0.0 },
        date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").unwrap(),
        sentiment,
        topic: "test".to_string(),
        engagement: Engagement {
            retweets: id * 10,
            replies: id,
        },
    }
}

// ============================================================
// Alert threshold
// ============================================================

#[test]
fn exactly_two_high_posts_trigger_alert() {
    let posts = vec![
        make_post(1, Severity::High, Sentiment::Negative, "2025-04-15 10:00:00"),
        make_post(2, Severity::High, Sentiment::Negative, "2025-04-15 11:00:00"),
        make_post(3, Severity::Low, Sentiment::Positive, "2025-04-15 12:00:00"),
    ];
    assert_eq!(evaluate(&posts).as_deref(), Some(HIGH_SEVERITY_ALERT));
}

#[test]
fn exactly_one_high_post_does_not_trigger_alert() {
    let posts = vec![
        make_post(1, Severity::High, Sentiment::Negative, "2025-04-15 10:00:00"),
        make_post(2, Severity::Medium, Sentiment::Negative, "2025-04-15 11:00:00"),
        make_post(3, Severity::Medium, Sentiment::Neutral, "2025-04-15 12:00:00"),
    ];
    assert_eq!(evaluate(&posts), None);
    assert_eq!(high_severity_count(&posts), 1);
}

#[test]
fn alert_message_text() {
    assert_eq!(
        HIGH_SEVERITY_ALERT,
        "High severity crisis alert: multiple critical posts detected!"
    );
}

// ============================================================
// Sentiment histogram
// ============================================================

#[test]
fn histogram_sums_to_filtered_length() {
    let store = PostStore::sample();
    for n in 0..=store.len() {
        let slice = &store.posts()[..n];
        let counts = SentimentCounts::from_posts(slice);
        assert_eq!(counts.total(), n, "histogram over {n} posts");
    }
}

#[test]
fn histogram_order_is_positive_neutral_negative() {
    let posts = vec![
        make_post(1, Severity::Low, Sentiment::Negative, "2025-04-15 10:00:00"),
        make_post(2, Severity::Low, Sentiment::Negative, "2025-04-15 10:00:00"),
        make_post(3, Severity::Low, Sentiment::Neutral, "2025-04-15 10:00:00"),
    ];
    assert_eq!(project(&posts).sentiment.as_array(), [0, 1, 2]);
}

// ============================================================
// Engagement series
// ============================================================

#[test]
fn series_are_parallel_and_date_sorted() {
    let posts = vec![
        make_post(1, Severity::Low, Sentiment::Neutral, "2025-04-16 10:00:00"),
        make_post(2, Severity::Low, Sentiment::Neutral, "2025-04-14 10:00:00"),
        make_post(3, Severity::Low, Sentiment::Neutral, "2025-04-15 10:00:00"),
    ];
    let charts = project(&posts);
    let series = &charts.engagement;
    assert_eq!(series.labels.len(), 3);
    assert_eq!(series.retweets.len(), 3);
    assert_eq!(series.replies.len(), 3);
    assert_eq!(series.replies, vec![2, 3, 1]);
    assert_eq!(series.retweets, vec![20, 30, 10]);
    assert_eq!(series.labels, vec!["4/14/2025", "4/15/2025", "4/16/2025"]);
}

#[test]
fn projection_does_not_reorder_input() {
    let posts = vec![
        make_post(1, Severity::Low, Sentiment::Neutral, "2025-04-16 10:00:00"),
        make_post(2, Severity::Low, Sentiment::Neutral, "2025-04-14 10:00:00"),
    ];
    let _ = project(&posts);
    assert_eq!(posts[0].id, 1);
    assert_eq!(posts[1].id, 2);
}

#[test]
fn empty_input_gives_empty_charts() {
    let charts = project(&[]);
    assert_eq!(charts.sentiment.total(), 0);
    assert!(charts.engagement.is_empty());
    assert!(charts.engagement.retweets.is_empty());
    assert!(charts.engagement.replies.is_empty());
}

#[test]
fn crosstab_total_matches_input() {
    let store = PostStore::sample();
    let table = crosstab(store.posts());
    assert_eq!(table.total(), store.len());
    assert_eq!(table.get(Sentiment::Positive, Severity::High), 0);
}
