//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - HTTP clients (one per proxy session)
//! - The logger
//! - The batch concurrency semaphore

mod client;
mod logger;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use client::{build_session_client, default_platform_headers, ClientSettings};
pub use logger::init_logger_with;

/// Initializes a semaphore for controlling concurrency.
///
/// Used to bound the number of batches in flight at once.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}
