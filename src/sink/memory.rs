//! In-memory sink, for library callers that want the results back.

use anyhow::Result;
use async_trait::async_trait;

use super::ResultSink;
use crate::models::ScrapeResult;

#[derive(Debug, Default)]
pub struct MemorySink {
    results: Vec<ScrapeResult>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[ScrapeResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<ScrapeResult> {
        self.results
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn write_all(&mut self, results: &[ScrapeResult]) -> Result<usize> {
        self.results.extend_from_slice(results);
        Ok(results.len())
    }
}
