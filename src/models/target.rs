//! Scrape targets and input parsing.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Post/reel URL, e.g. `https://www.instagram.com/p/Cx1AbC/?img_index=1`.
static POST_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:p|reel|reels|tv)/([A-Za-z0-9_-]+)").expect("valid post URL regex")
});

static SHORTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid shortcode regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]{1,30}$").expect("valid username regex"));

/// One unit of scrape work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScrapeTarget {
    /// A single post, by shortcode.
    Shortcode(String),
    /// A user's timeline, by numeric user id.
    UserId(String),
    /// A user's profile, by username.
    Username(String),
}

impl fmt::Display for ScrapeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeTarget::Shortcode(code) => f.write_str(code),
            ScrapeTarget::UserId(id) => write!(f, "user:{id}"),
            ScrapeTarget::Username(name) => write!(f, "@{name}"),
        }
    }
}

impl Serialize for ScrapeTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A line of input that is not a recognizable target.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("empty target")]
    Empty,
    #[error("'{0}' is not a numeric user id")]
    InvalidUserId(String),
    #[error("'{0}' is not a valid username")]
    InvalidUsername(String),
    #[error("no shortcode found in URL '{0}'")]
    NoShortcodeInUrl(String),
    #[error("'{0}' is not a valid shortcode")]
    InvalidShortcode(String),
}

impl FromStr for ScrapeTarget {
    type Err = TargetParseError;

    /// Accepts `user:<id>`, `@<username>`, a post/reel URL, or a bare shortcode.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(TargetParseError::Empty);
        }

        if let Some(id) = input.strip_prefix("user:") {
            let id = id.trim();
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
                return Err(TargetParseError::InvalidUserId(id.to_string()));
            }
            return Ok(ScrapeTarget::UserId(id.to_string()));
        }

        if let Some(name) = input.strip_prefix('@') {
            if !USERNAME_RE.is_match(name) {
                return Err(TargetParseError::InvalidUsername(name.to_string()));
            }
            return Ok(ScrapeTarget::Username(name.to_string()));
        }

        if input.contains("://") || input.contains('/') {
            return POST_URL_RE
                .captures(input)
                .and_then(|caps| caps.get(1))
                .map(|m| ScrapeTarget::Shortcode(m.as_str().to_string()))
                .ok_or_else(|| TargetParseError::NoShortcodeInUrl(input.to_string()));
        }

        if SHORTCODE_RE.is_match(input) {
            Ok(ScrapeTarget::Shortcode(input.to_string()))
        } else {
            Err(TargetParseError::InvalidShortcode(input.to_string()))
        }
    }
}
