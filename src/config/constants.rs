//! Configuration constants.
//!
//! This module defines the platform constants (endpoints, document ids, app id)
//! and the operational defaults used throughout the pipeline.

use std::time::Duration;

// Platform endpoints
/// Base URL of the web platform (used for GraphQL queries)
pub const PLATFORM_BASE_URL: &str = "https://www.instagram.com/";
/// Base URL of the private web API (used for profile lookups)
pub const API_BASE_URL: &str = "https://i.instagram.com/";
/// Path of the GraphQL query endpoint, relative to `PLATFORM_BASE_URL`
pub const GRAPHQL_QUERY_PATH: &str = "graphql/query";
/// Path of the profile info endpoint, relative to `API_BASE_URL`
pub const PROFILE_INFO_PATH: &str = "api/v1/users/web_profile_info/";

/// Public app id the web client sends in `x-ig-app-id`
pub const APP_ID: &str = "936619743392459";
/// Persisted document id for the single-post query
pub const POST_DOCUMENT_ID: &str = "8845758582119845";
/// Persisted query hash for the user timeline query
pub const TIMELINE_QUERY_HASH: &str = "e769aa130647d2354c40ea6a439bfc08";

/// Default User-Agent string for outbound requests.
///
/// Can be overridden with `--user-agent`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Scheduling defaults
/// Targets per batch (one proxy session per batch)
pub const DEFAULT_BATCH_SIZE: usize = 10;
/// Maximum batches in flight at once
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 4;
/// Rounds without progress before remaining targets are given up
pub const DEFAULT_MAX_RETRY_ROUNDS: usize = 3;
/// Posts requested per timeline page
pub const DEFAULT_PAGE_SIZE: usize = 24;
/// Per-request transport timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

// Retry strategy (timeouts only, inside a single fetch)
/// Attempts per fetch, including the initial one
pub const RETRY_MAX_ATTEMPTS: usize = 3;
/// Delay before the first retry
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);
/// Factor applied to the delay on each further retry
pub const RETRY_MULTIPLIER: f64 = 2.0;
/// Upper bound of the random jitter added to each delay
pub const RETRY_JITTER: Duration = Duration::from_millis(250);

// Error record limits
/// Maximum error message length in characters
/// Messages longer than this are truncated with a note about the original length
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;

/// Error label written into records for targets that were never fetched
pub const NOT_FETCHED: &str = "NOT_FETCHED";

/// Environment variable holding a comma-separated list of proxy URLs
pub const PROXIES_ENV_VAR: &str = "IG_HARVEST_PROXIES";
