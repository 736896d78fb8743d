//! Comment extraction.
//!
//! Two shapes exist in the wild:
//! - `edge_media_to_parent_comment`: threaded comments with per-comment like
//!   and reply counts (current post query)
//! - `edge_media_to_comment`: flat top-level comments (older and timeline
//!   payloads)
//!
//! The parent shape wins when both are present.

use serde_json::Value;

use super::path::{lookup, Field};
use crate::models::{CommentEntry, CommentSummary};

const PARENT_COMMENTS: Field = Field::new("comments", &["edge_media_to_parent_comment"]);
const TOP_LEVEL_COMMENTS: Field = Field::new("comments", &["edge_media_to_comment"]);
const COMMENTS_DISABLED: Field = Field::new("comments_disabled", &["comments_disabled"]);

const COMMENT_ID: Field = Field::new("id", &["id"]);
const COMMENT_TEXT: Field = Field::new("text", &["text"]);
const COMMENT_CREATED_AT: Field = Field::new("created_at", &["created_at"]);
const COMMENT_USERNAME: Field = Field::new("username", &["owner", "username"]);
const COMMENT_LIKES: Field = Field::new("n_likes", &["edge_liked_by", "count"]);
const COMMENT_REPLIES: Field = Field::new("n_replies", &["edge_threaded_comments", "count"]);
const COMMENT_SPAM: Field = Field::new("spam", &["did_report_as_spam"]);

/// Which comment shape a payload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentShape {
    Parent,
    TopLevel,
    Absent,
}

pub fn detect_shape(raw: &Value) -> CommentShape {
    if PARENT_COMMENTS.is_present(raw) {
        CommentShape::Parent
    } else if TOP_LEVEL_COMMENTS.is_present(raw) {
        CommentShape::TopLevel
    } else {
        CommentShape::Absent
    }
}

pub fn extract_comments(raw: &Value) -> CommentSummary {
    let shape = detect_shape(raw);
    let connection = match shape {
        CommentShape::Parent => PARENT_COMMENTS,
        CommentShape::TopLevel => TOP_LEVEL_COMMENTS,
        CommentShape::Absent => {
            return CommentSummary {
                disabled: COMMENTS_DISABLED.bool(raw),
                ..Default::default()
            };
        }
    };

    let Some(edge) = connection.get(raw) else {
        return CommentSummary::default();
    };

    CommentSummary {
        count: lookup(edge, &["count"]).and_then(Value::as_i64).unwrap_or(0),
        disabled: COMMENTS_DISABLED.bool(raw),
        next_cursor: lookup(edge, &["page_info", "end_cursor"])
            .and_then(Value::as_str)
            .map(str::to_string),
        has_more: lookup(edge, &["page_info", "has_next_page"])
            .and_then(Value::as_bool)
            .unwrap_or(false),
        comments: connection
            .edge_nodes(raw)
            .map(|node| extract_comment(node, shape))
            .collect(),
    }
}

fn extract_comment(node: &Value, shape: CommentShape) -> CommentEntry {
    let threaded = shape == CommentShape::Parent;
    CommentEntry {
        id: COMMENT_ID.str(node),
        text: COMMENT_TEXT.str(node).unwrap_or_default(),
        created_at: COMMENT_CREATED_AT.i64(node),
        username: COMMENT_USERNAME.str(node),
        like_count: if threaded { COMMENT_LIKES.i64(node) } else { None },
        reply_count: if threaded { COMMENT_REPLIES.i64(node) } else { None },
        spam_flag: COMMENT_SPAM.bool(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parent_comment_shape() {
        let raw = json!({
            "comments_disabled": false,
            "edge_media_to_parent_comment": {
                "count": 2,
                "page_info": {"has_next_page": true, "end_cursor": "c1"},
                "edges": [
                    {"node": {
                        "id": "1", "text": "nice", "created_at": 1700000000,
                        "owner": {"username": "bob"},
                        "edge_liked_by": {"count": 4},
                        "edge_threaded_comments": {"count": 1},
                        "did_report_as_spam": false
                    }}
                ]
            }
        });
        assert_eq!(detect_shape(&raw), CommentShape::Parent);
        let summary = extract_comments(&raw);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.disabled, Some(false));
        assert_eq!(summary.next_cursor.as_deref(), Some("c1"));
        assert!(summary.has_more);
        assert_eq!(summary.comments.len(), 1);
        assert_eq!(summary.comments[0].like_count, Some(4));
        assert_eq!(summary.comments[0].reply_count, Some(1));
        assert_eq!(summary.comments[0].username.as_deref(), Some("bob"));
    }

    #[test]
    fn test_top_level_comment_shape() {
        let raw = json!({
            "edge_media_to_comment": {
                "count": 10,
                "page_info": {"has_next_page": false, "end_cursor": null},
                "edges": [
                    {"node": {"id": "9", "text": "first", "created_at": 1, "owner": {"username": "x"}}},
                    {"node": {"id": "8", "text": "second", "created_at": 2, "owner": {"username": "y"}}}
                ]
            }
        });
        assert_eq!(detect_shape(&raw), CommentShape::TopLevel);
        let summary = extract_comments(&raw);
        assert_eq!(summary.count, 10);
        assert_eq!(summary.next_cursor, None);
        assert!(!summary.has_more);
        let texts: Vec<_> = summary.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(summary.comments.iter().all(|c| c.like_count.is_none()));
    }

    #[test]
    fn test_no_comment_connection() {
        let summary = extract_comments(&json!({"comments_disabled": true}));
        assert_eq!(summary.count, 0);
        assert_eq!(summary.disabled, Some(true));
        assert!(summary.comments.is_empty());
    }
}
