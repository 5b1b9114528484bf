// Text cleaning, keyword-based risk classification and sentiment scoring.
//
// Used when turning raw post text into dashboard records: the cleaner
// normalizes text for keyword matching, the risk classifier assigns a
// severity from crisis phrases, and the sentiment classifier buckets the
// VADER compound score. Phrase lists are ordered by priority: any
// high-risk phrase wins over moderate ones.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::posts::{Sentiment, Severity};

/// Compound scores at or above this are positive.
pub const POSITIVE_COMPOUND_THRESHOLD: f64 = 0.05;
/// Compound scores at or below this are negative.
pub const NEGATIVE_COMPOUND_THRESHOLD: f64 = -0.05;

/// Direct crisis language.
pub const HIGH_RISK_PHRASES: &[&str] = &[
    "don't want to be here",
    "end it all",
    "kill myself",
    "suicide",
    "i want to die",
    "cant go on",
    "can not go on",
];

/// Signs of struggle.
pub const MODERATE_RISK_PHRASES: &[&str] = &[
    "feel lost",
    "need help",
    "struggling",
    "hard to cope",
    "feeling overwhelmed",
    "depressed",
    "anxious",
    "lonely",
    "feeling down",
    "feeling sad",
];

/// Keywords that mark a post as crisis-related at collection time.
pub const CRISIS_KEYWORDS: &[&str] = &[
    "depressed",
    "depression",
    "addiction help",
    "overwhelmed",
    "suicidal",
    "substance abuse",
    "mental health",
    "anxiety",
    "hopeless",
    "lonely",
    "self-harm",
    "trauma",
    "stress",
    "anxious",
    "insomnia",
];

fn non_letters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z]+").expect("valid pattern"))
}

fn english_stop_words() -> &'static HashSet<String> {
    static WORDS: OnceLock<HashSet<String>> = OnceLock::new();
    WORDS.get_or_init(|| get(LANGUAGE::English).into_iter().collect())
}

/// Normalize post text: split on any Unicode whitespace, drop everything
/// but ASCII letters from each word (emoji, digits, punctuation), lowercase,
/// and remove English stop words.
pub fn clean_text(text: &str) -> String {
    let stop_words = english_stop_words();
    text.split(char::is_whitespace)
        .map(|word| non_letters().replace_all(word, "").to_lowercase())
        .filter(|word| !word.is_empty() && !stop_words.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// VADER compound score in [-1, 1] for raw text.
pub fn sentiment_score(text: &str) -> f64 {
    let analyzer = SentimentIntensityAnalyzer::new();
    analyzer
        .polarity_scores(text)
        .get("compound")
        .copied()
        .unwrap_or(0.0)
}

/// Bucket a compound score into positive / neutral / negative.
pub fn sentiment_from_score(compound: f64) -> Sentiment {
    if compound >= POSITIVE_COMPOUND_THRESHOLD {
        Sentiment::Positive
    } else if compound <= NEGATIVE_COMPOUND_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Classify the sentiment of raw post text.
pub fn classify_sentiment(text: &str) -> Sentiment {
    sentiment_from_score(sentiment_score(text))
}

/// Assign a severity from crisis phrases (case-insensitive substring match).
pub fn classify_risk(text: &str) -> Severity {
    let lower = text.to_lowercase();
    if HIGH_RISK_PHRASES.iter().any(|p| lower.contains(p)) {
        Severity::High
    } else if MODERATE_RISK_PHRASES.iter().any(|p| lower.contains(p)) {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Report label for a classified severity.
pub fn risk_label(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "High-Risk",
        Severity::Medium => "Moderate Concern",
        Severity::Low => "Low Concern",
    }
}

/// Crisis keywords found in the text, in list order.
pub fn matched_keywords(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    CRISIS_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| lower.contains(kw))
        .collect()
}

pub fn mentions_crisis_keyword(text: &str) -> bool {
    !matched_keywords(text).is_empty()
}
