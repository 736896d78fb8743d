//! Timeline page extraction.

use serde_json::Value;

use super::path::{expect_object, Field};
use super::post::extract_post;
use crate::error_handling::ExtractError;
use crate::models::{PageCursor, PostRecord};

const HAS_NEXT: Field = Field::new("has_next_page", &["page_info", "has_next_page"]);
const END_CURSOR: Field = Field::new("end_cursor", &["page_info", "end_cursor"]);
const TOTAL_COUNT: Field = Field::new("count", &["count"]);
const SELF_EDGES: Field = Field::new("edges", &[]);

/// One page of a user's timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePage {
    /// Posts in the order the server returned them
    pub posts: Vec<PostRecord>,
    pub cursor: PageCursor,
    /// Total posts on the timeline, as reported by the server
    pub total_count: Option<i64>,
}

/// Extracts a page from an `edge_owner_to_timeline_media` connection.
///
/// # Errors
///
/// Fails if the connection is not an object or any post node is malformed.
pub fn extract_timeline_page(raw: &Value) -> Result<TimelinePage, ExtractError> {
    expect_object(raw, "timeline")?;

    let posts = SELF_EDGES
        .edge_nodes(raw)
        .map(extract_post)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TimelinePage {
        posts,
        cursor: PageCursor {
            token: END_CURSOR.str(raw),
            has_next: HAS_NEXT.bool(raw).unwrap_or(false),
        },
        total_count: TOTAL_COUNT.i64(raw),
    })
}
