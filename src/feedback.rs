// Feedback submission: the annotation boundary of the dashboard.
//
// The FeedbackSink trait is the swap point for a real backend. The only
// implementation today is SimulatedFeedback, which waits a fixed delay and
// accepts whatever text it is given. Callers that collect text from a user
// check it with FeedbackDraft::validate first.
//
// Drafts are borrowed, never consumed, so a failed submission leaves the
// entered text with the caller for a retry.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SubmissionError;
use crate::posts::PostStore;

/// Default simulated submission latency.
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(800);

/// A free-text annotation on one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub post_id: u32,
    pub text: String,
}

impl FeedbackDraft {
    pub fn new(post_id: u32, text: impl Into<String>) -> Self {
        Self {
            post_id,
            text: text.into(),
        }
    }

    /// Input check for user-entered drafts: the annotation must not be blank.
    pub fn validate(&self) -> Result<(), SubmissionError> {
        if self.text.trim().is_empty() {
            return Err(SubmissionError::EmptyText);
        }
        Ok(())
    }
}

/// Trait for submitting feedback. Async because a real backend is remote.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Submit one draft. Must not block the runtime thread.
    async fn submit(&self, draft: &FeedbackDraft) -> Result<(), SubmissionError>;
}

/// Stand-in backend: sleeps, then succeeds.
pub struct SimulatedFeedback {
    delay: Duration,
    /// When set, drafts for posts outside the store are rejected.
    store: Option<PostStore>,
}

impl SimulatedFeedback {
    pub fn new(delay: Duration) -> Self {
        Self { delay, store: None }
    }

    pub fn with_store(mut self, store: PostStore) -> Self {
        self.store = Some(store);
        self
    }
}

impl Default for SimulatedFeedback {
    fn default() -> Self {
        Self::new(DEFAULT_FEEDBACK_DELAY)
    }
}

#[async_trait]
impl FeedbackSink for SimulatedFeedback {
    async fn submit(&self, draft: &FeedbackDraft) -> Result<(), SubmissionError> {
        if let Some(store) = &self.store {
            if store.get(draft.post_id).is_none() {
                return Err(SubmissionError::UnknownPost(draft.post_id));
            }
        }

        tokio::time::sleep(self.delay).await;

        info!(
            post_id = draft.post_id,
            chars = draft.text.chars().count(),
            "Feedback submitted"
        );
        Ok(())
    }
}

/// Submit a draft, retrying transient failures up to `attempts` times in total.
///
/// Returns the number of attempts it took. Non-retryable errors are returned
/// immediately.
pub async fn submit_with_retry(
    sink: &dyn FeedbackSink,
    draft: &FeedbackDraft,
    attempts: u32,
    backoff: Duration,
) -> Result<u32, SubmissionError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match sink.submit(draft).await {
            Ok(()) => return Ok(attempt),
            Err(e) if e.is_retryable() && attempt < attempts => {
                warn!(
                    post_id = draft.post_id,
                    attempt,
                    error = %e,
                    "Feedback submission failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with a retryable error a fixed number of times, then succeeds.
    struct FlakySink {
        failures_left: AtomicU32,
        calls: AtomicU32,
    }

    impl FlakySink {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl FeedbackSink for FlakySink {
        async fn submit(&self, _draft: &FeedbackDraft) -> Result<(), SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(SubmissionError::Retryable("storage unavailable".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_simulated_feedback_succeeds() {
        let sink = SimulatedFeedback::new(Duration::from_millis(5));
        let draft = FeedbackDraft::new(1, "Reached out to local crisis line");
        assert_eq!(sink.submit(&draft).await, Ok(()));
    }

    #[tokio::test]
    async fn test_simulated_feedback_waits_for_delay() {
        let sink = SimulatedFeedback::new(Duration::from_millis(50));
        let start = tokio::time::Instant::now();
        sink.submit(&FeedbackDraft::new(1, "note")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[tokio::test]
    async fn test_simulated_feedback_accepts_empty_text() {
        let sink = SimulatedFeedback::new(Duration::ZERO);
        assert_eq!(sink.submit(&FeedbackDraft::new(1, "")).await, Ok(()));
        assert_eq!(sink.submit(&FeedbackDraft::new(1, "   ")).await, Ok(()));
    }

    #[test]
    fn test_validate_rejects_blank_text() {
        let err = FeedbackDraft::new(1, " \t ").validate().unwrap_err();
        assert_eq!(err, SubmissionError::EmptyText);
        assert!(!err.is_retryable());
        assert!(FeedbackDraft::new(1, "Follow up tomorrow").validate().is_ok());
    }

    #[tokio::test]
    async fn test_unknown_post_rejected_with_store() {
        let sink = SimulatedFeedback::new(Duration::ZERO).with_store(PostStore::sample());
        let err = sink.submit(&FeedbackDraft::new(99, "note")).await.unwrap_err();
        assert_eq!(err, SubmissionError::UnknownPost(99));
    }

    #[tokio::test]
    async fn test_retry_keeps_draft_and_eventually_succeeds() {
        let sink = FlakySink::new(2);
        let draft = FeedbackDraft::new(2, "Escalate to outreach team");
        let attempts = submit_with_retry(&sink, &draft, 3, Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(attempts, 3);
        assert_eq!(draft.text, "Escalate to outreach team");
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_attempts() {
        let sink = FlakySink::new(5);
        let draft = FeedbackDraft::new(2, "note");
        let err = submit_with_retry(&sink, &draft, 2, Duration::from_millis(1))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(sink.calls.load(Ordering::SeqCst), 2);
    }
}
