//! Error handling and failure statistics.
//!
//! This module provides:
//! - The per-fetch failure taxonomy (`FailureReason`) and its retryability
//! - Extraction, configuration and initialization error types
//! - Status / transport error categorization
//! - The explicit timeout `RetryPolicy`
//! - Per-kind failure statistics

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, categorize_status, RetryPolicy};
pub use stats::FailureStats;
pub use types::{ConfigError, ExtractError, FailureKind, FailureReason, InitializationError};
