// Error taxonomy for the dashboard core.
//
// Filtering, alerting and chart projection are total functions and never
// fail. Errors only come from the edges: user input that would break the
// criteria invariants, loading a post store from disk, and feedback
// submission.

use thiserror::Error;

/// Invalid filter input, caught at the input boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The start of the date range falls after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvertedDateRange { start: String, end: String },

    /// A severity name that isn't one of high, medium, low.
    #[error("Unknown severity '{0}' (expected high, medium or low)")]
    UnknownSeverity(String),

    /// A calendar day that couldn't be parsed.
    #[error("Invalid day '{0}' (expected YYYY-MM-DD)")]
    BadDay(String),

    /// A role name that isn't recognized.
    #[error("Unknown role '{0}' (expected publicHealth, researcher or user)")]
    UnknownRole(String),
}

/// Feedback submission failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Transient failure (network or storage); resubmitting may succeed.
    #[error("Feedback submission failed, try again: {0}")]
    Retryable(String),

    /// The annotated post isn't in the store.
    #[error("No post with id {0}")]
    UnknownPost(u32),

    /// Nothing to submit.
    #[error("Feedback text is empty")]
    EmptyText,
}

impl SubmissionError {
    /// Whether resubmitting the same draft can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmissionError::Retryable(_))
    }
}

/// Failure loading a post store from a file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read post file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse post file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate post id {0} in post file")]
    DuplicateId(u32),
}
