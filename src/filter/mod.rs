// Post filtering: criteria state and the engine that applies it.

pub mod criteria;
pub mod engine;

pub use criteria::{DateRange, FilterCriteria, SeveritySet};
pub use engine::{filter_posts, matches};
