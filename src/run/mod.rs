//! Run entry points.
//!
//! - `run_scrape`: a target list through the batch scheduler into a sink
//! - `run_walk`: one user's full timeline through the walker into a sink

mod scrape;
mod targets;
mod walk;

pub use scrape::{run_scrape, run_scrape_with, ScrapeReport};
pub use targets::{read_targets, read_targets_from};
pub use walk::{run_walk, run_walk_with, WalkReport};
