// Dashboard session: owns the criteria and drives recomputes.
//
// Every criteria change bumps a monotonic generation token and schedules a
// recompute task that waits out the simulated fetch delay. Scheduling a new
// recompute aborts the previous one, and a task only publishes if its token
// is still the latest when it finishes, so a stale result can never replace
// a fresher one. Views are published on a watch channel as whole snapshots.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::view::{compute_view, DashboardView};
use crate::charts::DEFAULT_LABEL_FORMAT;
use crate::error::SubmissionError;
use crate::feedback::{FeedbackDraft, FeedbackSink};
use crate::filter::{DateRange, FilterCriteria, SeveritySet};
use crate::posts::{PostStore, Severity};

/// Default simulated delay between a criteria change and its published result.
pub const DEFAULT_FILTER_DELAY: Duration = Duration::from_millis(300);

/// Tunables for a dashboard session.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub filter_delay: Duration,
    /// chrono format string for engagement series labels
    pub label_format: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            filter_delay: DEFAULT_FILTER_DELAY,
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
        }
    }
}

/// A single user's dashboard: criteria plus the published derived view.
pub struct Dashboard {
    store: PostStore,
    settings: Arc<PipelineSettings>,
    criteria: FilterCriteria,
    /// Latest generation handed out. Shared with recompute tasks.
    latest: Arc<AtomicU64>,
    view_tx: Arc<watch::Sender<DashboardView>>,
    pending: Option<JoinHandle<()>>,
}

impl Dashboard {
    /// Start a session with default criteria. The initial view (generation 0)
    /// is computed immediately, without the simulated delay.
    ///
    /// Construction needs no runtime, but every criteria mutation spawns a
    /// tokio task.
    pub fn new(store: PostStore, settings: PipelineSettings) -> Self {
        Self::with_criteria(store, settings, FilterCriteria::default())
    }

    pub fn with_criteria(
        store: PostStore,
        settings: PipelineSettings,
        criteria: FilterCriteria,
    ) -> Self {
        let initial = compute_view(&store, &criteria, 0, &settings.label_format);
        let (view_tx, _) = watch::channel(initial);
        Self {
            store,
            settings: Arc::new(settings),
            criteria,
            latest: Arc::new(AtomicU64::new(0)),
            view_tx: Arc::new(view_tx),
            pending: None,
        }
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    /// The criteria as last set by the user (may be ahead of the published view).
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The latest generation scheduled so far.
    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Snapshot of the currently published view.
    pub fn view(&self) -> DashboardView {
        self.view_tx.borrow().clone()
    }

    /// Subscribe to published views.
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.view_tx.subscribe()
    }

    /// Wait until the latest scheduled recompute has been published.
    pub async fn settle(&self) -> DashboardView {
        let target = self.generation();
        let mut rx = self.view_tx.subscribe();
        let view = match rx
            .wait_for(|v| v.generation >= target && !v.loading)
            .await
        {
            Ok(view) => view.clone(),
            // The session holds a sender, so the channel can't close here.
            Err(_) => self.view(),
        };
        view
    }

    // --- Criteria mutations; each schedules a recompute and returns its token ---

    /// Apply an arbitrary edit to the criteria.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, since the recompute is
    /// spawned with `tokio::spawn`. The same holds for every setter below.
    pub fn update(&mut self, edit: impl FnOnce(&mut FilterCriteria)) -> u64 {
        edit(&mut self.criteria);
        self.schedule_recompute()
    }

    pub fn set_range(&mut self, range: DateRange) -> u64 {
        self.update(|c| c.set_range(range))
    }

    pub fn set_start(&mut self, start: NaiveDateTime) -> u64 {
        self.update(|c| c.set_start(start))
    }

    pub fn set_end(&mut self, end: NaiveDateTime) -> u64 {
        self.update(|c| c.set_end(end))
    }

    pub fn set_first_day(&mut self, day: NaiveDate) -> u64 {
        self.update(|c| c.set_first_day(day))
    }

    pub fn set_last_day(&mut self, day: NaiveDate) -> u64 {
        self.update(|c| c.set_last_day(day))
    }

    pub fn toggle_severity(&mut self, severity: Severity) -> u64 {
        self.update(|c| {
            c.toggle_severity(severity);
        })
    }

    pub fn set_severities(&mut self, severities: SeveritySet) -> u64 {
        self.update(|c| c.set_severities(severities))
    }

    pub fn set_location_query(&mut self, query: impl Into<String>) -> u64 {
        let query = query.into();
        self.update(|c| c.set_location_query(query))
    }

    fn schedule_recompute(&mut self) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!(generation, "Cancelling superseded recompute");
            }
            handle.abort();
        }

        self.view_tx.send_modify(|v| v.loading = true);

        let store = self.store.clone();
        let settings = Arc::clone(&self.settings);
        let criteria = self.criteria.clone();
        let latest = Arc::clone(&self.latest);
        let view_tx = Arc::clone(&self.view_tx);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(settings.filter_delay).await;

            let view = compute_view(&store, &criteria, generation, &settings.label_format);
            let matched = view.filtered.len();
            let alert = view.alert.is_some();

            let published = view_tx.send_if_modified(|current| {
                if latest.load(Ordering::SeqCst) != generation {
                    return false;
                }
                let submitting = current.submitting;
                *current = view;
                current.submitting = submitting;
                true
            });

            if published {
                info!(generation, matched, alert, "Published dashboard view");
            } else {
                debug!(generation, "Discarded stale recompute");
            }
        }));

        generation
    }

    /// Submit feedback through `sink`, flagging the view as submitting meanwhile.
    ///
    /// The flag is cleared even if this future is dropped before completing.
    pub async fn submit_feedback(
        &self,
        sink: &dyn FeedbackSink,
        draft: &FeedbackDraft,
    ) -> Result<(), SubmissionError> {
        self.view_tx.send_modify(|v| v.submitting = true);
        let _submitting = SubmittingGuard(&self.view_tx);
        sink.submit(draft).await
    }
}

/// Clears the `submitting` flag when dropped.
struct SubmittingGuard<'a>(&'a watch::Sender<DashboardView>);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|v| v.submitting = false);
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
