//! Domain types shared across the pipeline.

mod record;
mod target;

pub use record::{
    CommentEntry, CommentSummary, ErrorRecord, ImageRecord, MediaAnnotations, MediaSet,
    PageCursor, PostRecord, Record, ScrapeResult, UserProfile, VideoRecord,
};
pub use target::{ScrapeTarget, TargetParseError};
