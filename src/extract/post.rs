//! Post extraction.

use serde_json::Value;

use super::comments::extract_comments;
use super::media::{extract_media, MediaKind, TYPE_TAG};
use super::path::{expect_object, Field};
use crate::error_handling::ExtractError;
use crate::models::PostRecord;

const ID: Field = Field::new("id", &["id"]);
const SHORTCODE: Field = Field::new("shortcode", &["shortcode"]);
const CREATED_AT: Field = Field::new("post_created", &["taken_at_timestamp"]);
const USERNAME: Field = Field::new("username", &["owner", "username"]);
const CAPTION: Field = Field::new("caption", &["edge_media_to_caption"]);
const LIKES: Field = Field::new("n_likes", &["edge_media_preview_like", "count"]);
const LOCATION: Field = Field::new("location", &["location", "name"]);
const IS_VIDEO: Field = Field::new("is_video", &["is_video"]);
const IS_PAID_PARTNERSHIP: Field = Field::new("is_paid_partnership", &["is_paid_partnership"]);
const TAGGED_USERS: Field = Field::new("tagged_users", &["edge_media_to_tagged_user"]);

/// Separator between caption paragraphs.
pub const CAPTION_SEPARATOR: &str = "\n\n";

/// Extracts a post from its `xdt_shortcode_media` (or timeline node) payload.
///
/// # Errors
///
/// Fails if the payload is not an object or lacks `id`, `shortcode` or
/// `taken_at_timestamp`. Everything else is optional.
pub fn extract_post(raw: &Value) -> Result<PostRecord, ExtractError> {
    expect_object(raw, "post")?;

    let shortcode = SHORTCODE.required_str(raw)?;
    let media = extract_media(raw);
    if matches!(media, crate::models::MediaSet::Empty) {
        log::debug!(
            "Post {} has unrecognized media type {:?}",
            shortcode,
            TYPE_TAG.get(raw).and_then(Value::as_str)
        );
    }

    Ok(PostRecord {
        id: ID.required_str(raw)?,
        shortcode,
        created_at: CREATED_AT.required_i64(raw)?,
        username: USERNAME.str(raw),
        caption: join_caption(&CAPTION.edge_strings(raw, &["text"])),
        like_count: LIKES.i64(raw),
        location: LOCATION.str(raw),
        is_video: IS_VIDEO.bool(raw).or_else(|| {
            TYPE_TAG
                .get(raw)
                .and_then(Value::as_str)
                .and_then(MediaKind::from_type_tag)
                .map(|kind| kind == MediaKind::Video)
        }),
        is_paid_partnership: IS_PAID_PARTNERSHIP.bool(raw),
        tagged_users: TAGGED_USERS.edge_strings(raw, &["user", "username"]),
        comments: extract_comments(raw),
        media,
    })
}

/// Joins caption paragraphs with a blank line; no paragraphs gives `""`.
pub fn join_caption(paragraphs: &[String]) -> String {
    paragraphs.join(CAPTION_SEPARATOR)
}
