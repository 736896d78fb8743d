//! Flat domain records produced by the extractor.
//!
//! Field names are serialized with the names downstream consumers of the
//! JSON Lines output already rely on (`post_created`, `n_likes`, ...).

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::target::ScrapeTarget;
use crate::config::NOT_FETCHED;

/// One post, flattened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: String,
    pub shortcode: String,
    /// Creation time, Unix seconds
    #[serde(rename = "post_created")]
    pub created_at: i64,
    /// Author username
    pub username: Option<String>,
    /// Caption paragraphs joined with a blank line
    pub caption: String,
    #[serde(rename = "n_likes")]
    pub like_count: Option<i64>,
    pub location: Option<String>,
    pub is_video: Option<bool>,
    pub is_paid_partnership: Option<bool>,
    pub tagged_users: Vec<String>,
    #[serde(flatten)]
    pub comments: CommentSummary,
    #[serde(flatten)]
    pub media: MediaSet,
}

/// Comment statistics and the first page of comments of a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentSummary {
    #[serde(rename = "n_comments")]
    pub count: i64,
    #[serde(rename = "comments_disabled")]
    pub disabled: Option<bool>,
    #[serde(rename = "comments_next_page")]
    pub next_cursor: Option<String>,
    #[serde(rename = "comments_has_next_page")]
    pub has_more: bool,
    pub comments: Vec<CommentEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentEntry {
    pub id: Option<String>,
    pub text: String,
    pub created_at: Option<i64>,
    pub username: Option<String>,
    /// Only present in the parent-comment shape
    #[serde(rename = "n_likes")]
    pub like_count: Option<i64>,
    #[serde(rename = "n_replies")]
    pub reply_count: Option<i64>,
    #[serde(rename = "spam")]
    pub spam_flag: Option<bool>,
}

/// Accessibility and moderation annotations shared by images and videos.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaAnnotations {
    pub alt_text: Option<String>,
    pub factcheck_rating: Option<Value>,
    pub factcheck_information: Option<Value>,
    pub sensitivity_information: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageRecord {
    pub shortcode: Option<String>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub annotations: MediaAnnotations,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoRecord {
    pub shortcode: Option<String>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub annotations: MediaAnnotations,
    #[serde(rename = "video_views")]
    pub view_count: Option<i64>,
    #[serde(rename = "video_plays")]
    pub play_count: Option<i64>,
}

/// The media of a post, selected by the payload's type tag.
///
/// Serializes as an `images` list (image and sidecar posts) or a `videos`
/// list (video posts), never both. `Empty` serializes as nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSet {
    Image(ImageRecord),
    Video(VideoRecord),
    Sidecar(Vec<ImageRecord>),
    /// Unrecognized type tag
    Empty,
}

impl MediaSet {
    pub fn images(&self) -> &[ImageRecord] {
        match self {
            MediaSet::Image(image) => std::slice::from_ref(image),
            MediaSet::Sidecar(images) => images,
            MediaSet::Video(_) | MediaSet::Empty => &[],
        }
    }
}

impl Serialize for MediaSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            MediaSet::Image(image) => map.serialize_entry("images", &[image])?,
            MediaSet::Sidecar(images) => map.serialize_entry("images", images)?,
            MediaSet::Video(video) => map.serialize_entry("videos", &[video])?,
            MediaSet::Empty => {}
        }
        map.end()
    }
}

/// A user's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(rename = "name")]
    pub full_name: Option<String>,
    #[serde(rename = "profile_picture_url")]
    pub profile_pic_url: Option<String>,
    pub biography: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "n_followers")]
    pub follower_count: Option<i64>,
    #[serde(rename = "n_follows")]
    pub follow_count: Option<i64>,
    #[serde(rename = "n_posts")]
    pub post_count: Option<i64>,
    pub is_business_account: Option<bool>,
    pub business_category: Option<String>,
    pub is_professional_account: Option<bool>,
    pub is_joined_recently: Option<bool>,
    pub is_verified: Option<bool>,
    pub is_private: Option<bool>,
    pub is_regulated_c18: Option<bool>,
    pub external_url: Option<String>,
    pub related_accounts: Vec<String>,
    pub bio_links: Vec<String>,
    pub video_count: Option<i64>,
}

/// A successfully extracted record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Post(PostRecord),
    Profile(UserProfile),
}

/// A target that was given up on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    pub target: ScrapeTarget,
    pub error: String,
    pub message: String,
}

impl ErrorRecord {
    pub fn not_fetched(target: ScrapeTarget, message: impl Into<String>) -> Self {
        Self {
            target,
            error: NOT_FETCHED.to_string(),
            message: crate::utils::sanitize::sanitize_and_truncate_error_message(&message.into()),
        }
    }
}

/// One entry of a run's output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScrapeResult {
    Record(Record),
    Error(ErrorRecord),
}

impl ScrapeResult {
    pub fn is_error(&self) -> bool {
        matches!(self, ScrapeResult::Error(_))
    }
}

/// Pagination state returned with a timeline page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Opaque token for the next page
    pub token: Option<String>,
    pub has_next: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_with(media: MediaSet) -> PostRecord {
        PostRecord {
            id: "1".into(),
            shortcode: "abc".into(),
            created_at: 1_700_000_000,
            username: Some("someone".into()),
            caption: String::new(),
            like_count: Some(3),
            location: None,
            is_video: Some(false),
            is_paid_partnership: Some(false),
            tagged_users: vec![],
            comments: CommentSummary::default(),
            media,
        }
    }

    #[test]
    fn test_video_post_has_no_images_field() {
        let value = serde_json::to_value(post_with(MediaSet::Video(VideoRecord::default())))
            .unwrap();
        assert!(value.get("images").is_none());
        assert_eq!(value["videos"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_image_post_has_no_videos_field() {
        let value = serde_json::to_value(post_with(MediaSet::Image(ImageRecord::default())))
            .unwrap();
        assert!(value.get("videos").is_none());
        assert_eq!(value["images"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_empty_media_has_neither_field() {
        let value = serde_json::to_value(post_with(MediaSet::Empty)).unwrap();
        assert!(value.get("images").is_none());
        assert!(value.get("videos").is_none());
    }

    #[test]
    fn test_post_uses_output_field_names() {
        let value = serde_json::to_value(post_with(MediaSet::Empty)).unwrap();
        assert_eq!(value["post_created"], json!(1_700_000_000));
        assert_eq!(value["n_likes"], json!(3));
        assert_eq!(value["n_comments"], json!(0));
        assert_eq!(value["comments_has_next_page"], json!(false));
    }

    #[test]
    fn test_error_record_shape() {
        let result = ScrapeResult::Error(ErrorRecord::not_fetched(
            ScrapeTarget::Shortcode("abc".into()),
            "HTTP status 429",
        ));
        assert!(result.is_error());
        assert_eq!(
            serde_json::to_value(result).unwrap(),
            json!({"target": "abc", "error": "NOT_FETCHED", "message": "HTTP status 429"})
        );
    }
}
