//! Error type definitions.
//!
//! This module defines the failure taxonomy of a single fetch, the extraction
//! errors raised by the record extractor, and the configuration/initialization
//! errors rejected before the pipeline starts.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Why a single fetch attempt for one target did not produce a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// 401 from the platform: credentials or headers are wrong.
    #[error("Unauthorized (401)")]
    Unauthorized,

    /// Any other non-200 status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Transport timeout, after the fetch's own retries were exhausted.
    #[error("Request timed out")]
    Timeout,

    /// The response decoded but the expected key path was absent (or the body
    /// was not JSON at all), or a required record field was missing.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The session itself failed: proxy refused, connection reset, session
    /// acquisition failed, or the batch task died.
    #[error("Proxy error: {0}")]
    ProxyError(String),
}

impl FailureReason {
    /// Whether the target should be tried again in a later round.
    ///
    /// `Unauthorized` and `MalformedPayload` are terminal: another round with
    /// the same credentials or the same schema will fail the same way.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            FailureReason::Unauthorized | FailureReason::MalformedPayload(_)
        )
    }

    /// The field-less category of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            FailureReason::Unauthorized => FailureKind::Unauthorized,
            FailureReason::HttpStatus(_) => FailureKind::HttpStatus,
            FailureReason::Timeout => FailureKind::Timeout,
            FailureReason::MalformedPayload(_) => FailureKind::MalformedPayload,
            FailureReason::ProxyError(_) => FailureKind::ProxyError,
        }
    }
}

/// Field-less mirror of `FailureReason`, used as a statistics key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureKind {
    Unauthorized,
    HttpStatus,
    Timeout,
    MalformedPayload,
    ProxyError,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Unauthorized => "Unauthorized (401)",
            FailureKind::HttpStatus => "HTTP status error",
            FailureKind::Timeout => "Timeout",
            FailureKind::MalformedPayload => "Malformed payload",
            FailureKind::ProxyError => "Proxy error",
        }
    }
}

/// Errors raised while turning a raw payload into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A required field was absent or had the wrong type.
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),

    /// The payload (or a nested node) was expected to be a JSON object.
    #[error("'{0}' is not an object")]
    NotAnObject(&'static str),
}

impl From<ExtractError> for FailureReason {
    fn from(err: ExtractError) -> Self {
        FailureReason::MalformedPayload(err.to_string())
    }
}

/// Configuration rejected before the pipeline starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value is out of its allowed range.
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),

    /// The cutoff date is not `YYYY-MM-DD`.
    #[error("Invalid date_cutoff '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A proxy entry is not a usable HTTP(S) proxy URL.
    #[error("Invalid proxy URL '{proxy}': {reason}")]
    InvalidProxy { proxy: String, reason: String },
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}
