//! Image, video and sidecar extraction.

use serde_json::Value;

use super::path::Field;
use crate::models::{ImageRecord, MediaAnnotations, MediaSet, VideoRecord};

const SHORTCODE: Field = Field::new("shortcode", &["shortcode"]);
const DISPLAY_URL: Field = Field::new("url", &["display_url"]);
const VIDEO_URL: Field = Field::new("url", &["video_url"]);
const ALT_TEXT: Field = Field::new("alt_text", &["accessibility_caption"]);
const FACTCHECK_RATING: Field = Field::new("factcheck_rating", &["fact_check_overall_rating"]);
const FACTCHECK_INFORMATION: Field =
    Field::new("factcheck_information", &["fact_check_information"]);
const SENSITIVITY_INFORMATION: Field =
    Field::new("sensitivity_information", &["sensitivity_friction_info"]);
const VIDEO_VIEWS: Field = Field::new("video_views", &["video_view_count"]);
const VIDEO_PLAYS: Field = Field::new("video_plays", &["video_play_count"]);
const SIDECAR_CHILDREN: Field = Field::new("sidecar", &["edge_sidecar_to_children"]);

/// The `__typename` tag selecting the media shape.
pub const TYPE_TAG: Field = Field::new("type", &["__typename"]);

/// Media shape declared by a post's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Sidecar,
}

impl MediaKind {
    /// Maps a type tag (current `XDT` names and legacy names) to a media kind.
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "XDTGraphImage" | "GraphImage" => Some(MediaKind::Image),
            "XDTGraphVideo" | "GraphVideo" => Some(MediaKind::Video),
            "XDTGraphSidecar" | "GraphSidecar" => Some(MediaKind::Sidecar),
            _ => None,
        }
    }
}

fn extract_annotations(raw: &Value) -> MediaAnnotations {
    MediaAnnotations {
        alt_text: ALT_TEXT.str(raw),
        factcheck_rating: FACTCHECK_RATING.raw(raw),
        factcheck_information: FACTCHECK_INFORMATION.raw(raw),
        sensitivity_information: SENSITIVITY_INFORMATION.raw(raw),
    }
}

pub fn extract_image(raw: &Value) -> ImageRecord {
    ImageRecord {
        shortcode: SHORTCODE.str(raw),
        url: DISPLAY_URL.str(raw),
        annotations: extract_annotations(raw),
    }
}

pub fn extract_video(raw: &Value) -> VideoRecord {
    VideoRecord {
        shortcode: SHORTCODE.str(raw),
        url: VIDEO_URL.str(raw),
        annotations: extract_annotations(raw),
        view_count: VIDEO_VIEWS.i64(raw),
        play_count: VIDEO_PLAYS.i64(raw),
    }
}

/// Maps every carousel child through `extract_image`, in child order.
pub fn extract_sidecar(raw: &Value) -> Vec<ImageRecord> {
    SIDECAR_CHILDREN.edge_nodes(raw).map(extract_image).collect()
}

/// Dispatches on the type tag. An unknown or missing tag yields `MediaSet::Empty`.
pub fn extract_media(raw: &Value) -> MediaSet {
    let kind = TYPE_TAG
        .get(raw)
        .and_then(Value::as_str)
        .and_then(MediaKind::from_type_tag);

    match kind {
        Some(MediaKind::Image) => MediaSet::Image(extract_image(raw)),
        Some(MediaKind::Video) => MediaSet::Video(extract_video(raw)),
        Some(MediaKind::Sidecar) => MediaSet::Sidecar(extract_sidecar(raw)),
        None => MediaSet::Empty,
    }
}
