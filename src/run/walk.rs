//! Timeline walk entry point.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::{Config, ValidatedConfig};
use crate::fetch::ProxiedFetcher;
use crate::models::{ErrorRecord, Record, ScrapeResult, ScrapeTarget};
use crate::paginate::{PaginationWalker, StopReason};
use crate::proxy::{Endpoints, ProxyPool};
use crate::sink::{JsonlSink, ResultSink};

/// Results of one timeline walk.
#[derive(Debug, Clone)]
pub struct WalkReport {
    pub user_id: String,
    pub posts: usize,
    pub pages: usize,
    pub stop_reason: StopReason,
    pub elapsed_seconds: f64,
}

/// Walks one user's timeline and writes JSON Lines to the configured output.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the output cannot be
/// written.
pub async fn run_walk(config: Config, user_id: String) -> Result<WalkReport> {
    let config = config.validate().context("Invalid configuration")?;
    let mut sink = JsonlSink::from_output(config.output.as_deref()).await?;
    run_walk_with(&config, Endpoints::default(), user_id, &mut sink).await
}

/// Walks one user's timeline against `endpoints`, writing each page into
/// `sink` as it arrives.
///
/// A walk cut short by a failed page fetch keeps what it wrote and ends with
/// one `NOT_FETCHED` error record for the user.
///
/// # Errors
///
/// Returns an error if the sink fails.
pub async fn run_walk_with<S: ResultSink + ?Sized>(
    config: &ValidatedConfig,
    endpoints: Endpoints,
    user_id: String,
    sink: &mut S,
) -> Result<WalkReport> {
    let start_time = Instant::now();

    let provider = Arc::new(ProxyPool::from_config(config, endpoints));
    let fetcher = ProxiedFetcher::new(config.retry.clone(), config.walk.page_size);
    let mut walker = PaginationWalker::new(user_id.clone(), provider, fetcher, config.walk.clone());

    let mut posts = 0;
    while let Some(page) = walker.next_page().await {
        posts += page.len();
        let results: Vec<ScrapeResult> = page
            .into_iter()
            .map(|post| ScrapeResult::Record(Record::Post(post)))
            .collect();
        sink.write_all(&results)
            .await
            .context("Failed to write results")?;
    }

    let pages = walker.pages();
    let stop_reason = walker
        .stop_reason()
        .cloned()
        .unwrap_or(StopReason::NoNextPage);

    if let StopReason::FetchFailed(reason) = &stop_reason {
        warn!("Walk of user {} incomplete: {}", user_id, reason);
        let error = ErrorRecord::not_fetched(
            ScrapeTarget::UserId(user_id.clone()),
            format!("walk ended after {pages} page(s): {reason}"),
        );
        sink.write_all(&[ScrapeResult::Error(error)])
            .await
            .context("Failed to write results")?;
    }
    sink.finish().await.context("Failed to finish output")?;

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    info!(
        "Walked {} post(s) over {} page(s) of user {} in {:.1}s ({:?})",
        posts, pages, user_id, elapsed_seconds, stop_reason
    );

    Ok(WalkReport {
        user_id,
        posts,
        pages,
        stop_reason,
        elapsed_seconds,
    })
}
