//! Application configuration and constants.
//!
//! This module provides:
//! - Platform constants (endpoints, document ids, retry defaults)
//! - HTTP header name constants
//! - Library configuration and its validation
//! - Command-line options for the binary

mod cli;
mod constants;
mod headers;
mod types;

// Re-export all constants
pub use cli::{parse_proxy_list, Command, CommonArgs, Opt};
pub use constants::*;
pub use headers::*;
pub use types::{parse_date_cutoff, parse_proxy_url, Config, LogFormat, LogLevel, ValidatedConfig};
