// crisiswatch: crisis post dashboard core
//
// This is the library root. Data flows leaf-first through the modules:
// posts -> filter -> alert / charts -> pipeline (published views) -> output.

pub mod alert;
pub mod charts;
pub mod classify;
pub mod config;
pub mod error;
pub mod feedback;
pub mod filter;
pub mod output;
pub mod pipeline;
pub mod posts;
pub mod role;
