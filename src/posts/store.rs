// Post store: the fixed, read-only source collection.
//
// Built once at startup and shared by every dashboard session through an
// Arc. Posts are kept in ascending id order; that order is the order every
// filtered result preserves.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use super::models::{Engagement, GeoPoint, Post, Sentiment, Severity};
use crate::error::StoreError;

/// Immutable, cheaply clonable collection of posts.
#[derive(Debug, Clone)]
pub struct PostStore {
    posts: Arc<[Post]>,
}

impl PostStore {
    /// Build a store from a list of posts. Sorts by id and rejects duplicates.
    pub fn from_posts(mut posts: Vec<Post>) -> Result<Self, StoreError> {
        posts.sort_by_key(|p| p.id);
        let mut seen = HashSet::new();
        for post in &posts {
            if !seen.insert(post.id) {
                return Err(StoreError::DuplicateId(post.id));
            }
        }
        Ok(Self {
            posts: posts.into(),
        })
    }

    /// Load a store from a JSON array of posts.
    pub fn load_json(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)?;
        let posts: Vec<Post> = serde_json::from_str(&raw)?;
        let store = Self::from_posts(posts)?;
        info!(
            count = store.len(),
            path = %path.display(),
            "Loaded post store"
        );
        Ok(store)
    }

    /// The built-in six-post sample the dashboard ships with.
    pub fn sample() -> Self {
        Self {
            posts: sample_posts().into(),
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, id: u32) -> Option<&Post> {
        self.posts
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.posts[i])
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .expect("valid sample timestamp")
}

#[allow(clippy::too_many_arguments)]
fn post(
    id: u32,
    text: &str,
    severity: Severity,
    (lat, lng): (f64, f64),
    date: NaiveDateTime,
    sentiment: Sentiment,
    topic: &str,
    (retweets, replies): (u32, u32),
) -> Post {
    Post {
        id,
        text: text.to_string(),
        severity,
        location: GeoPoint { lat, lng },
        date,
        sentiment,
        topic: topic.to_string(),
        engagement: Engagement { retweets, replies },
    }
}

fn sample_posts() -> Vec<Post> {
    vec![
        post(
            1,
            "Feeling low today...",
            Severity::High,
            (40.7128, -74.006),
            at(2025, 4, 15, 10, 30),
            Sentiment::Negative,
            "suicidal ideation",
            (10, 4),
        ),
        post(
            2,
            "I need help, everything is overwhelming",
            Severity::High,
            (34.0522, -118.2437),
            at(2025, 4, 16, 12, 0),
            Sentiment::Negative,
            "stress",
            (5, 2),
        ),
        post(
            3,
            "Had a good day for a change",
            Severity::Low,
            (41.8781, -87.6298),
            at(2025, 4, 14, 9, 0),
            Sentiment::Positive,
            "wellbeing",
            (2, 1),
        ),
        post(
            4,
            "I'm feeling anxious about the future",
            Severity::Medium,
            (29.7604, -95.3698),
            at(2025, 4, 15, 14, 0),
            Sentiment::Neutral,
            "anxiety",
            (8, 3),
        ),
        post(
            5,
            "Can't stop thinking about negative things",
            Severity::Medium,
            (37.7749, -122.4194),
            at(2025, 4, 16, 8, 30),
            Sentiment::Negative,
            "depression",
            (15, 7),
        ),
        post(
            6,
            "Therapy session went well today",
            Severity::Low,
            (39.9526, -75.1652),
            at(2025, 4, 15, 16, 45),
            Sentiment::Positive,
            "therapy",
            (6, 3),
        ),
    ]
}
