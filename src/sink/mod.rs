//! Result sinks.
//!
//! A sink receives finished results (records and error records) in the order
//! the pipeline produces them.

mod jsonl;
mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ScrapeResult;

pub use jsonl::JsonlSink;
pub use memory::MemorySink;

/// Accepts finished results.
#[async_trait]
pub trait ResultSink: Send {
    /// Writes a sequence of results, returning how many were written.
    async fn write_all(&mut self, results: &[ScrapeResult]) -> Result<usize>;

    /// Flushes anything buffered. Called once after the last write.
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
