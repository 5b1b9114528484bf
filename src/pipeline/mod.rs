// Recompute pipeline: criteria change -> delayed recompute -> published view.

pub mod dashboard;
pub mod view;

pub use dashboard::{Dashboard, PipelineSettings, DEFAULT_FILTER_DELAY};
pub use view::{compute_view, DashboardView};
