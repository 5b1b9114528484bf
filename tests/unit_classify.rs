// Unit tests for text cleaning and keyword risk classification,
// run over the sample post texts.

use crisiswatch::charts::crosstab;
use crisiswatch::classify::{
    classify_risk, classify_sentiment, clean_text, mentions_crisis_keyword, risk_label,
};
use crisiswatch::posts::{Post, PostStore, Sentiment, Severity};

#[test]
fn sample_texts_classify_as_expected() {
    let store = PostStore::sample();
    let text = |id: u32| store.get(id).map(|p| p.text.clone()).unwrap();

    assert_eq!(classify_risk(&text(2)), Severity::Medium); // "need help"
    assert_eq!(classify_risk(&text(4)), Severity::Medium); // "anxious"
    assert_eq!(classify_risk(&text(3)), Severity::Low);
    assert_eq!(classify_risk(&text(6)), Severity::Low);
}

#[test]
fn high_risk_phrase_is_case_insensitive() {
    assert_eq!(classify_risk("Sometimes I think about SUICIDE"), Severity::High);
    assert_eq!(classify_risk("i just cant go on like this"), Severity::High);
}

#[test]
fn labels_cover_every_level() {
    assert_eq!(risk_label(Severity::Medium), "Moderate Concern");
    for severity in Severity::ALL {
        assert!(!risk_label(severity).is_empty());
    }
}

#[test]
fn clean_text_output_is_lowercase_letters_only() {
    let cleaned = clean_text("Can't sleep, INSOMNIA again!!! #3 \u{1F614}");
    assert!(cleaned
        .chars()
        .all(|c| c.is_ascii_lowercase() || c == ' '));
    assert!(cleaned.contains("insomnia"));
    assert!(!cleaned.contains("  "));
}

#[test]
fn clean_text_of_empty_string_is_empty() {
    assert_eq!(clean_text(""), "");
    assert_eq!(clean_text("123 !!! \u{1F600}"), "");
}

#[test]
fn crisis_keyword_detection() {
    assert!(mentions_crisis_keyword("Dealing with a lot of stress at work"));
    assert!(!mentions_crisis_keyword("Had a good day for a change"));
}

#[test]
fn classified_texts_feed_the_crosstab() {
    let texts = [
        "I love this, it is wonderful",
        "I hate everything, this is terrible and I want to die",
        "The meeting is on Tuesday",
    ];
    let store = PostStore::sample();
    let posts: Vec<Post> = store
        .posts()
        .iter()
        .zip(texts)
        .map(|(post, text)| Post {
            text: text.to_string(),
            severity: classify_risk(text),
            sentiment: classify_sentiment(text),
            ..post.clone()
        })
        .collect();

    let table = crosstab(&posts);
    assert_eq!(table.get(Sentiment::Positive, Severity::Low), 1);
    assert_eq!(table.get(Sentiment::Negative, Severity::High), 1);
    assert_eq!(table.get(Sentiment::Neutral, Severity::Low), 1);
    assert_eq!(table.total(), 3);
}
