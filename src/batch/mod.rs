//! Batch execution.
//!
//! - `partition`: fixed-size batches
//! - `runner`: one batch under one session (`BatchRunner`, `BatchExecutor`)
//! - `scheduler`: rounds, the concurrency limit and the stagnation cutoff

mod partition;
mod runner;
mod scheduler;

pub use partition::partition;
pub use runner::{BatchExecutor, BatchResult, BatchRunner};
pub use scheduler::{BatchScheduler, BatchState, RunOutput, SchedulerSettings};
