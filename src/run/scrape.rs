//! Batch scrape entry point.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::app::{log_progress, print_failure_statistics, print_run_summary};
use crate::batch::{BatchRunner, BatchScheduler};
use crate::config::{Config, ValidatedConfig};
use crate::error_handling::FailureStats;
use crate::fetch::ProxiedFetcher;
use crate::models::ScrapeTarget;
use crate::proxy::{Endpoints, ProxyPool};
use crate::sink::{JsonlSink, ResultSink};

/// Results of a batch scrape.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// Targets given as input
    pub total_targets: usize,
    /// Records written (a timeline target can yield many)
    pub records: usize,
    /// Targets fetched successfully
    pub fetched: usize,
    /// Targets written as `NOT_FETCHED`
    pub failed: usize,
    /// Scheduler rounds run
    pub rounds: usize,
    pub stats: FailureStats,
    pub elapsed_seconds: f64,
}

/// Scrapes every target and writes JSON Lines to the configured output.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the output cannot be
/// written. Fetch failures are never errors here; they end up as error
/// records.
///
/// # Example
///
/// ```no_run
/// use ig_harvest::{run_scrape, Config, ScrapeTarget};
///
/// # async fn example() -> anyhow::Result<()> {
/// let targets = vec![ScrapeTarget::Shortcode("CuE2WNQs6vH".into())];
/// let report = run_scrape(Config::default(), targets).await?;
/// println!("{} of {} fetched", report.fetched, report.total_targets);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config, targets: Vec<ScrapeTarget>) -> Result<ScrapeReport> {
    let config = config.validate().context("Invalid configuration")?;
    let mut sink = JsonlSink::from_output(config.output.as_deref()).await?;
    run_scrape_with(&config, Endpoints::default(), targets, &mut sink).await
}

/// Scrapes every target against `endpoints` and writes into `sink`.
///
/// # Errors
///
/// Returns an error if the sink fails.
pub async fn run_scrape_with<S: ResultSink + ?Sized>(
    config: &ValidatedConfig,
    endpoints: Endpoints,
    targets: Vec<ScrapeTarget>,
    sink: &mut S,
) -> Result<ScrapeReport> {
    let start_time = Instant::now();

    let provider = Arc::new(ProxyPool::from_config(config, endpoints));
    if provider.is_empty() {
        log::warn!("No proxies configured, connecting directly");
    } else {
        log::info!("Rotating over {} proxies", provider.len());
    }

    let fetcher = ProxiedFetcher::new(config.retry.clone(), config.walk.page_size);
    let runner = Arc::new(BatchRunner::new(provider, fetcher));
    let scheduler = BatchScheduler::new(config.scheduler.clone());

    let output = scheduler.run_all(targets, runner).await;

    sink.write_all(&output.results)
        .await
        .context("Failed to write results")?;
    sink.finish().await.context("Failed to finish output")?;

    let report = ScrapeReport {
        total_targets: output.total_targets,
        records: output.records(),
        fetched: output.fetched,
        failed: output.errors(),
        rounds: output.rounds,
        stats: output.stats,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    };

    log_progress(start_time, report.fetched + report.failed);
    print_failure_statistics(&report.stats);
    print_run_summary(
        report.total_targets,
        report.fetched,
        report.failed,
        report.elapsed_seconds,
    );

    Ok(report)
}
