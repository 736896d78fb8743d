//! Utility functions.
//!
//! This module provides:
//! - The timeout-only retry driver used by the fetcher
//! - Error message sanitization

mod retry;
pub mod sanitize;

pub use retry::{retry_timeouts, RetryResult};
