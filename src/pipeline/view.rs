// Dashboard view: one complete, consistent snapshot of derived state.
//
// A view is built entirely from a single (store, criteria) pair and then
// published as a unit. Subscribers never see a filtered list paired with
// charts or an alert from a different criteria snapshot.

use serde::Serialize;

use crate::alert;
use crate::charts::{self, ChartProjections};
use crate::filter::{filter_posts, FilterCriteria};
use crate::posts::{Post, PostStore};

/// Derived dashboard state for one criteria snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Recompute token this view was built for (0 = initial view).
    pub generation: u64,
    pub criteria: FilterCriteria,
    pub filtered: Vec<Post>,
    pub alert: Option<String>,
    pub charts: ChartProjections,
    /// A recompute has been scheduled and hasn't published yet.
    pub loading: bool,
    /// A feedback submission is in flight.
    pub submitting: bool,
}

impl DashboardView {
    /// Whether any simulated request is pending.
    pub fn is_busy(&self) -> bool {
        self.loading || self.submitting
    }

    pub fn post_ids(&self) -> Vec<u32> {
        self.filtered.iter().map(|p| p.id).collect()
    }
}

/// Run the whole pipeline for one criteria snapshot.
pub fn compute_view(
    store: &PostStore,
    criteria: &FilterCriteria,
    generation: u64,
    label_format: &str,
) -> DashboardView {
    let filtered = filter_posts(store.posts(), criteria);
    let alert = alert::evaluate(&filtered);
    let charts = charts::project_with_format(&filtered, label_format);

    DashboardView {
        generation,
        criteria: criteria.clone(),
        filtered,
        alert,
        charts,
        loading: false,
        submitting: false,
    }
}
