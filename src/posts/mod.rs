// Crisis posts: the data model and the read-only store.

pub mod models;
pub mod store;

pub use models::{Engagement, GeoPoint, Post, Sentiment, Severity};
pub use store::PostStore;
