//! Record extraction.
//!
//! Pure functions turning one raw platform payload into a flat record. No I/O
//! and no retries; a missing required field is an `ExtractError`, everything
//! else degrades to `None`/empty.
//!
//! Fields are declared through a small mapping layer (`path::Field`): an
//! output name plus the key path it is read from.

mod comments;
mod media;
mod path;
mod post;
mod profile;
mod timeline;

pub use comments::{detect_shape, extract_comments, CommentShape};
pub use media::{extract_image, extract_media, extract_sidecar, extract_video, MediaKind};
pub use path::{lookup, Field};
pub use post::{extract_post, join_caption, CAPTION_SEPARATOR};
pub use profile::extract_profile;
pub use timeline::{extract_timeline_page, TimelinePage};

use serde_json::Value;

use crate::error_handling::ExtractError;
use crate::models::{Record, ScrapeTarget};

/// Extracts the records a fetched target yields: one post, every post of a
/// timeline page, or one profile.
///
/// # Errors
///
/// Any `ExtractError` from the underlying extractor; a timeline page with one
/// malformed post fails as a whole.
pub fn extract_for_target(target: &ScrapeTarget, payload: &Value) -> Result<Vec<Record>, ExtractError> {
    match target {
        ScrapeTarget::Shortcode(_) => Ok(vec![Record::Post(extract_post(payload)?)]),
        ScrapeTarget::UserId(_) => Ok(extract_timeline_page(payload)?
            .posts
            .into_iter()
            .map(Record::Post)
            .collect()),
        ScrapeTarget::Username(_) => Ok(vec![Record::Profile(extract_profile(payload)?)]),
    }
}
