// Chart projections: sentiment histogram and engagement-over-time series.
//
// Everything here is recomputed from scratch for each filtered list. The
// time series works on a sorted copy; the filtered list keeps store order.

use serde::Serialize;

use crate::posts::{Post, Sentiment, Severity};

/// Axis label format for the engagement series (e.g. "4/15/2025").
pub const DEFAULT_LABEL_FORMAT: &str = "%-m/%-d/%Y";

/// Post counts per sentiment, in positive, neutral, negative order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn from_posts(posts: &[Post]) -> Self {
        let mut counts = Self::default();
        for post in posts {
            match post.sentiment {
                Sentiment::Positive => counts.positive += 1,
                Sentiment::Neutral => counts.neutral += 1,
                Sentiment::Negative => counts.negative += 1,
            }
        }
        counts
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    /// The three counts as a chart dataset.
    pub fn as_array(&self) -> [usize; 3] {
        [self.positive, self.neutral, self.negative]
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Parallel per-post series ordered by ascending date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngagementSeries {
    pub labels: Vec<String>,
    pub retweets: Vec<u32>,
    pub replies: Vec<u32>,
}

impl EngagementSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Everything the chart widgets need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartProjections {
    pub sentiment: SentimentCounts,
    pub engagement: EngagementSeries,
}

/// Project a filtered list using the default axis label format.
pub fn project(filtered: &[Post]) -> ChartProjections {
    project_with_format(filtered, DEFAULT_LABEL_FORMAT)
}

/// Project a filtered list, formatting axis labels with a chrono format string.
pub fn project_with_format(filtered: &[Post], label_format: &str) -> ChartProjections {
    // Stable sort: posts sharing a timestamp keep their store order.
    let mut by_date: Vec<&Post> = filtered.iter().collect();
    by_date.sort_by_key(|p| p.date);

    let mut engagement = EngagementSeries {
        labels: Vec::with_capacity(by_date.len()),
        retweets: Vec::with_capacity(by_date.len()),
        replies: Vec::with_capacity(by_date.len()),
    };
    for post in by_date {
        engagement
            .labels
            .push(post.date.format(label_format).to_string());
        engagement.retweets.push(post.engagement.retweets);
        engagement.replies.push(post.engagement.replies);
    }

    ChartProjections {
        sentiment: SentimentCounts::from_posts(filtered),
        engagement,
    }
}

/// Sentiment x severity distribution table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityBySentiment {
    /// Rows follow `Sentiment::ALL`, columns follow `Severity::ALL`.
    counts: [[usize; 3]; 3],
}

impl SeverityBySentiment {
    pub fn get(&self, sentiment: Sentiment, severity: Severity) -> usize {
        self.counts[sentiment_index(sentiment)][severity_index(severity)]
    }

    /// Total for one sentiment row.
    pub fn row_total(&self, sentiment: Sentiment) -> usize {
        self.counts[sentiment_index(sentiment)].iter().sum()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// Cross-tabulate sentiment against severity.
pub fn crosstab(filtered: &[Post]) -> SeverityBySentiment {
    let mut table = SeverityBySentiment::default();
    for post in filtered {
        table.counts[sentiment_index(post.sentiment)][severity_index(post.severity)] += 1;
    }
    table
}

fn sentiment_index(sentiment: Sentiment) -> usize {
    match sentiment {
        Sentiment::Positive => 0,
        Sentiment::Neutral => 1,
        Sentiment::Negative => 2,
    }
}

fn severity_index(severity: Severity) -> usize {
    match severity {
        Severity::High => 0,
        Severity::Medium => 1,
        Severity::Low => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::PostStore;

    #[test]
    fn test_sample_sentiment_histogram() {
        let store = PostStore::sample();
        let counts = SentimentCounts::from_posts(store.posts());
        assert_eq!(counts.as_array(), [2, 1, 3]);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_engagement_series_is_date_ordered() {
        let store = PostStore::sample();
        let charts = project(store.posts());
        // 3 (4/14), 1, 4, 6 (4/15), 5, 2 (4/16)
        assert_eq!(charts.engagement.retweets, vec![2, 10, 8, 6, 15, 5]);
        assert_eq!(charts.engagement.replies, vec![1, 4, 3, 3, 7, 2]);
        assert_eq!(charts.engagement.labels[0], "4/14/2025");
        assert_eq!(charts.engagement.labels[5], "4/16/2025");
    }

    #[test]
    fn test_custom_label_format() {
        let store = PostStore::sample();
        let charts = project_with_format(&store.posts()[..1], "%Y-%m-%d %H:%M");
        assert_eq!(charts.engagement.labels, vec!["2025-04-15 10:30"]);
    }

    #[test]
    fn test_ties_keep_store_order() {
        let store = PostStore::sample();
        let mut a = store.get(4).unwrap().clone();
        let mut b = store.get(6).unwrap().clone();
        b.date = a.date;
        a.engagement.retweets = 100;
        b.engagement.retweets = 200;
        let charts = project(&[a, b]);
        assert_eq!(charts.engagement.retweets, vec![100, 200]);
    }

    #[test]
    fn test_crosstab_counts() {
        let store = PostStore::sample();
        let table = crosstab(store.posts());
        assert_eq!(table.get(Sentiment::Negative, Severity::High), 2);
        assert_eq!(table.get(Sentiment::Negative, Severity::Medium), 1);
        assert_eq!(table.get(Sentiment::Positive, Severity::Low), 2);
        assert_eq!(table.get(Sentiment::Neutral, Severity::Medium), 1);
        assert_eq!(table.row_total(Sentiment::Negative), 3);
        assert_eq!(table.total(), 6);
    }
}
