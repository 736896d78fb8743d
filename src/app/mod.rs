//! Progress and statistics output used by the run entry points.

pub mod logging;
pub mod statistics;

// Re-export public API
pub use logging::{log_progress, log_round, RoundSummary};
pub use statistics::{print_failure_statistics, print_run_summary};
