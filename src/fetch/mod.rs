//! Proxied fetching.
//!
//! One fetch is one logical call for one target through one session:
//! - the request is built per target kind (`request`)
//! - the response is classified into a `FetchOutcome`
//! - transport timeouts alone are retried here, with the configured
//!   `RetryPolicy`; every other failure goes straight back to the caller

pub mod request;

use log::debug;
use serde_json::Value;

use crate::error_handling::{categorize_reqwest_error, categorize_status, FailureReason, RetryPolicy};
use crate::models::ScrapeTarget;
use crate::proxy::ProxySession;
use crate::utils::retry_timeouts;

pub use request::{
    post_request, profile_request, request_for, timeline_request, PlatformRequest,
    POST_PAYLOAD_PATH, PROFILE_PAYLOAD_PATH, TIMELINE_PAYLOAD_PATH,
};

/// The decoded JSON found at a request's expected key path.
pub type RawPayload = Value;

/// Result of one fetch for one target.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(RawPayload),
    Failure(FailureReason),
}

impl FetchOutcome {
    pub fn into_result(self) -> Result<RawPayload, FailureReason> {
        match self {
            FetchOutcome::Success(payload) => Ok(payload),
            FetchOutcome::Failure(reason) => Err(reason),
        }
    }
}

/// Issues platform calls through a session and classifies what comes back.
///
/// Holds no mutable state; one instance is shared by every batch of a run.
#[derive(Debug, Clone)]
pub struct ProxiedFetcher {
    retry: RetryPolicy,
    page_size: usize,
}

impl ProxiedFetcher {
    /// `page_size` is used when a batch target is a user id.
    pub fn new(retry: RetryPolicy, page_size: usize) -> Self {
        Self { retry, page_size }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetches the payload for one target.
    pub async fn fetch(&self, target: &ScrapeTarget, session: &ProxySession) -> FetchOutcome {
        let request = request_for(target, session.endpoints(), self.page_size);
        let outcome = self.execute(&request, session).await;
        if let FetchOutcome::Failure(reason) = &outcome {
            debug!("Fetch of {} via {} failed: {}", target, session.label(), reason);
        }
        outcome
    }

    /// Runs a prepared request, retrying transport timeouts only.
    pub async fn execute(&self, request: &PlatformRequest, session: &ProxySession) -> FetchOutcome {
        let retried = retry_timeouts(&self.retry, || attempt(request, session)).await;
        if retried.attempts > 1 {
            debug!(
                "{} {} took {} attempts",
                request.method,
                request.url.path(),
                retried.attempts
            );
        }
        match retried.result {
            Ok(payload) => FetchOutcome::Success(payload),
            Err(reason) => FetchOutcome::Failure(reason),
        }
    }
}

/// A single network call, classified.
async fn attempt(request: &PlatformRequest, session: &ProxySession) -> Result<RawPayload, FailureReason> {
    let response = request
        .to_builder(session.client())
        .send()
        .await
        .map_err(|e| categorize_reqwest_error(&e))?;

    if let Some(reason) = categorize_status(response.status().as_u16()) {
        return Err(reason);
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| categorize_reqwest_error(&e))?;

    take_path(body, request.expected_path).ok_or_else(|| {
        FailureReason::MalformedPayload(format!(
            "response has no '{}'",
            request.expected_path.join(".")
        ))
    })
}

/// Moves the value at `path` out of `value`; `None` if absent or `null`.
pub fn take_path(value: Value, path: &[&str]) -> Option<Value> {
    let found = path.iter().try_fold(value, |current, key| match current {
        Value::Object(mut map) => map.remove(*key),
        _ => None,
    })?;
    (!found.is_null()).then_some(found)
}
