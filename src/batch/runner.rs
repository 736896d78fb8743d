//! Running one batch under one session.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};

use crate::error_handling::FailureReason;
use crate::extract::extract_for_target;
use crate::fetch::ProxiedFetcher;
use crate::models::{Record, ScrapeTarget};
use crate::proxy::SessionProvider;

/// What one batch produced.
///
/// Every input target ends up in exactly one of `succeeded` or `failed`.
/// A succeeded target contributes zero or more `records` (an empty timeline
/// page yields none); a failed one contributes nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub records: Vec<Record>,
    pub succeeded: Vec<ScrapeTarget>,
    pub failed: Vec<(ScrapeTarget, FailureReason)>,
}

impl BatchResult {
    /// Folds per-target outcomes of one session into a batch result.
    ///
    /// A `ProxyError` on any target condemns the session, so every other
    /// failure in the batch is rewritten as a retryable `ProxyError`.
    /// Successes are kept as they are.
    pub fn from_outcomes(
        outcomes: Vec<(ScrapeTarget, Result<Vec<Record>, FailureReason>)>,
    ) -> Self {
        let session_error = outcomes.iter().find_map(|(_, outcome)| match outcome {
            Err(FailureReason::ProxyError(message)) => Some(message.clone()),
            _ => None,
        });

        let mut result = Self::default();
        for (target, outcome) in outcomes {
            match outcome {
                Ok(records) => {
                    result.records.extend(records);
                    result.succeeded.push(target);
                }
                Err(reason) => {
                    debug!("Target {} failed: {}", target, reason);
                    let reason = match (&session_error, reason) {
                        (_, FailureReason::ProxyError(message)) => {
                            FailureReason::ProxyError(message)
                        }
                        (Some(session_error), reason) => FailureReason::ProxyError(format!(
                            "{reason} on a failed session: {session_error}"
                        )),
                        (None, reason) => reason,
                    };
                    result.failed.push((target, reason));
                }
            }
        }
        result
    }

    /// Whether any target hit a session-level failure.
    pub fn session_failed(&self) -> bool {
        self.failed
            .iter()
            .any(|(_, reason)| matches!(reason, FailureReason::ProxyError(_)))
    }

    /// Every target failed for the same reason.
    pub fn all_failed(targets: Vec<ScrapeTarget>, reason: FailureReason) -> Self {
        Self {
            records: Vec::new(),
            succeeded: Vec::new(),
            failed: targets
                .into_iter()
                .map(|target| (target, reason.clone()))
                .collect(),
        }
    }
}

/// Runs a batch of targets to completion.
///
/// The scheduler only talks to this trait, so tests can script outcomes.
#[async_trait]
pub trait BatchExecutor: Send + Sync + 'static {
    async fn run_batch(&self, targets: Vec<ScrapeTarget>) -> BatchResult;
}

/// Fans a batch out over one freshly acquired session.
pub struct BatchRunner<P: SessionProvider + ?Sized> {
    provider: Arc<P>,
    fetcher: ProxiedFetcher,
}

impl<P: SessionProvider + ?Sized> BatchRunner<P> {
    pub fn new(provider: Arc<P>, fetcher: ProxiedFetcher) -> Self {
        Self { provider, fetcher }
    }
}

#[async_trait]
impl<P: SessionProvider + ?Sized + 'static> BatchExecutor for BatchRunner<P> {
    async fn run_batch(&self, targets: Vec<ScrapeTarget>) -> BatchResult {
        let session = match self.provider.acquire().await {
            Ok(session) => session,
            Err(reason) => {
                warn!(
                    "Session acquisition failed for a batch of {}: {}",
                    targets.len(),
                    reason
                );
                return BatchResult::all_failed(targets, reason);
            }
        };
        debug!(
            "Running batch of {} on session {} ({})",
            targets.len(),
            session.id(),
            session.label()
        );

        let session = &session;
        let outcomes = join_all(targets.into_iter().map(|target| async move {
            let outcome = self
                .fetcher
                .fetch(&target, session)
                .await
                .into_result()
                .and_then(|payload| {
                    extract_for_target(&target, &payload).map_err(FailureReason::from)
                });
            (target, outcome)
        }))
        .await;

        let result = BatchResult::from_outcomes(outcomes);
        if result.session_failed() {
            warn!(
                "Session {} ({}) failed; requeueing {} target(s) of its batch",
                session.id(),
                session.label(),
                result.failed.len()
            );
        }
        result
    }
}
