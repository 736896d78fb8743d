//! Round-based batch scheduling.
//!
//! Targets are split into batches and every batch of a round runs as its own
//! task, at most `concurrency_limit` at a time. Retryable failures are
//! re-batched into the next round; terminal ones become error records right
//! away. A round that does not shrink the pending set counts towards
//! stagnation, and after `max_retry_rounds` such rounds whatever is still
//! pending is given up as `NOT_FETCHED`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{info, warn};

use super::partition::partition;
use super::runner::{BatchExecutor, BatchResult};
use crate::app::{log_round, RoundSummary};
use crate::config::{DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY_LIMIT, DEFAULT_MAX_RETRY_ROUNDS};
use crate::error_handling::{FailureReason, FailureStats};
use crate::initialization::init_semaphore;
use crate::models::{ErrorRecord, Record, ScrapeResult, ScrapeTarget};

/// Scheduling knobs.
///
/// Worst-case parallel requests are `concurrency_limit * batch_size`; tune
/// that product against the platform's rate limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub batch_size: usize,
    pub concurrency_limit: usize,
    /// Rounds without progress before pending targets are given up
    pub max_retry_rounds: usize,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            max_retry_rounds: DEFAULT_MAX_RETRY_ROUNDS,
        }
    }
}

impl SchedulerSettings {
    pub fn resource_ceiling(&self) -> usize {
        self.concurrency_limit.saturating_mul(self.batch_size)
    }
}

/// Scheduler state, owned by one `run_all` call and updated between rounds.
#[derive(Debug)]
pub struct BatchState {
    pub round: usize,
    pub pending: Vec<ScrapeTarget>,
    pub records: Vec<Record>,
    pub errors: Vec<ErrorRecord>,
    /// Targets fetched successfully so far
    pub fetched: usize,
    /// Consecutive rounds that did not shrink `pending`
    pub stagnation: usize,
    pub stats: FailureStats,
    last_failure: HashMap<ScrapeTarget, FailureReason>,
}

impl BatchState {
    pub fn new(targets: Vec<ScrapeTarget>) -> Self {
        Self {
            round: 0,
            pending: targets,
            records: Vec::new(),
            errors: Vec::new(),
            fetched: 0,
            stagnation: 0,
            stats: FailureStats::new(),
            last_failure: HashMap::new(),
        }
    }

    /// Folds a finished round into the state.
    pub fn apply_round(&mut self, results: Vec<BatchResult>) -> RoundSummary {
        let attempted = self.pending.len();
        let mut next_pending = Vec::new();
        let mut fetched = 0;
        let mut terminal = 0;

        for result in results {
            self.records.extend(result.records);
            fetched += result.succeeded.len();
            for (target, reason) in result.failed {
                self.stats.record(&reason);
                if reason.is_retryable() {
                    self.last_failure.insert(target.clone(), reason);
                    next_pending.push(target);
                } else {
                    terminal += 1;
                    self.errors
                        .push(ErrorRecord::not_fetched(target, reason.to_string()));
                }
            }
        }

        self.round += 1;
        self.fetched += fetched;
        self.pending = next_pending;
        if self.pending.len() < attempted {
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }

        RoundSummary {
            round: self.round,
            attempted,
            fetched,
            terminal,
            retryable: self.pending.len(),
            stagnation: self.stagnation,
        }
    }

    pub fn is_done(&self, max_retry_rounds: usize) -> bool {
        self.pending.is_empty() || self.stagnation >= max_retry_rounds
    }

    /// Demotes every pending target to a `NOT_FETCHED` error record.
    pub fn give_up(&mut self) {
        for target in std::mem::take(&mut self.pending) {
            let message = self
                .last_failure
                .get(&target)
                .map(ToString::to_string)
                .unwrap_or_else(|| "never attempted".to_string());
            self.errors.push(ErrorRecord::not_fetched(target, message));
        }
    }

    /// Successful records first, then error records.
    pub fn into_output(self, total_targets: usize, elapsed_seconds: f64) -> RunOutput {
        let results = self
            .records
            .into_iter()
            .map(ScrapeResult::Record)
            .chain(self.errors.into_iter().map(ScrapeResult::Error))
            .collect();
        RunOutput {
            results,
            total_targets,
            fetched: self.fetched,
            rounds: self.round,
            stats: self.stats,
            elapsed_seconds,
        }
    }
}

/// Everything a scheduler run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Successful records followed by error records
    pub results: Vec<ScrapeResult>,
    pub total_targets: usize,
    /// Targets fetched successfully; `fetched + errors() == total_targets`
    pub fetched: usize,
    pub rounds: usize,
    /// Failed attempts per kind, over all rounds
    pub stats: FailureStats,
    pub elapsed_seconds: f64,
}

impl RunOutput {
    pub fn errors(&self) -> usize {
        self.results.iter().filter(|r| r.is_error()).count()
    }

    pub fn records(&self) -> usize {
        self.results.len() - self.errors()
    }
}

/// Drives a target list to completion in rounds.
#[derive(Debug, Clone, Default)]
pub struct BatchScheduler {
    settings: SchedulerSettings,
}

impl BatchScheduler {
    pub fn new(settings: SchedulerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// Runs every target until it is fetched or given up.
    ///
    /// Every input target is accounted for exactly once in the output.
    pub async fn run_all<E: BatchExecutor>(
        &self,
        targets: Vec<ScrapeTarget>,
        executor: Arc<E>,
    ) -> RunOutput {
        let start_time = Instant::now();
        let total_targets = targets.len();
        info!(
            "Scheduling {} target(s): batch size {}, {} batch(es) in flight, up to {} concurrent requests",
            total_targets,
            self.settings.batch_size,
            self.settings.concurrency_limit,
            self.settings.resource_ceiling()
        );

        let semaphore = init_semaphore(self.settings.concurrency_limit.max(1));
        let mut state = BatchState::new(targets);

        while !state.is_done(self.settings.max_retry_rounds) {
            let batches = partition(state.pending.clone(), self.settings.batch_size);
            let results = run_round(batches, &executor, &semaphore).await;
            let summary = state.apply_round(results);
            log_round(&summary);
        }

        if !state.pending.is_empty() {
            warn!(
                "No progress for {} round(s), giving up on {} target(s)",
                state.stagnation,
                state.pending.len()
            );
            state.give_up();
        }

        state.into_output(total_targets, start_time.elapsed().as_secs_f64())
    }
}

/// Runs one round's batches concurrently, bounded by `semaphore`.
async fn run_round<E: BatchExecutor>(
    batches: Vec<Vec<ScrapeTarget>>,
    executor: &Arc<E>,
    semaphore: &Arc<tokio::sync::Semaphore>,
) -> Vec<BatchResult> {
    let mut results = Vec::with_capacity(batches.len());
    let mut tasks = FuturesUnordered::new();

    for batch in batches {
        let permit = match Arc::clone(semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Semaphore closed, failing batch of {}", batch.len());
                results.push(BatchResult::all_failed(
                    batch,
                    FailureReason::ProxyError("batch limiter closed".to_string()),
                ));
                continue;
            }
        };

        let executor = Arc::clone(executor);
        let targets = batch.clone();
        let handle = tokio::spawn(async move {
            let _permit = permit;
            executor.run_batch(batch).await
        });
        tasks.push(async move { (targets, handle.await) });
    }

    while let Some((targets, joined)) = tasks.next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(join_error) => {
                warn!("Batch task failed: {:?}", join_error);
                results.push(BatchResult::all_failed(
                    targets,
                    FailureReason::ProxyError(format!("batch task failed: {join_error}")),
                ));
            }
        }
    }

    results
}
