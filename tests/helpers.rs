// Shared test helpers: payload fixtures and mock-server wiring.
//
// This module provides common utilities used across multiple test files to reduce duplication.

#![allow(dead_code)] // Each test file uses a different subset

use std::sync::Arc;
use std::time::Duration;

use httptest::Server;
use serde_json::{json, Value};
use url::Url;

use ig_harvest::initialization::ClientSettings;
use ig_harvest::{Endpoints, ProxiedFetcher, ProxyPool, RetryPolicy};

/// Endpoints pointing at a mock server.
pub fn server_endpoints(server: &Server) -> Endpoints {
    let base = Url::parse(&format!("http://{}/", server.addr())).expect("valid server URL");
    Endpoints::with_base_url(&base).expect("valid endpoints")
}

pub fn client_settings(timeout: Duration) -> ClientSettings {
    ClientSettings {
        timeout,
        user_agent: "ig-harvest-tests".to_string(),
    }
}

/// A direct-connection pool talking to `server`.
pub fn direct_pool(server: &Server) -> Arc<ProxyPool> {
    Arc::new(ProxyPool::new(
        vec![],
        server_endpoints(server),
        client_settings(Duration::from_secs(5)),
    ))
}

/// A fetcher that retries timeouts without waiting.
pub fn fast_fetcher(page_size: usize) -> ProxiedFetcher {
    ProxiedFetcher::new(RetryPolicy::immediate(3), page_size)
}

/// A post node as found under `xdt_shortcode_media` or a timeline edge.
pub fn post_node(shortcode: &str, taken_at: i64, typename: &str) -> Value {
    json!({
        "__typename": typename,
        "id": format!("id_{shortcode}"),
        "shortcode": shortcode,
        "taken_at_timestamp": taken_at,
        "owner": {"username": "natgeo"},
        "display_url": format!("https://cdn.example/{shortcode}.jpg"),
        "video_url": format!("https://cdn.example/{shortcode}.mp4"),
        "accessibility_caption": "Photo of a mountain",
        "is_video": typename.ends_with("Video"),
        "is_paid_partnership": false,
        "location": {"name": "Yosemite"},
        "edge_media_preview_like": {"count": 1234},
        "edge_media_to_caption": {"edges": [
            {"node": {"text": "First paragraph"}},
            {"node": {"text": "Second paragraph"}}
        ]},
        "edge_media_to_tagged_user": {"edges": [
            {"node": {"user": {"username": "photographer"}}}
        ]},
        "comments_disabled": false,
        "edge_media_to_parent_comment": {
            "count": 1,
            "page_info": {"has_next_page": false, "end_cursor": null},
            "edges": [{"node": {
                "id": "c1",
                "text": "Stunning",
                "created_at": taken_at + 60,
                "owner": {"username": "fan"},
                "edge_liked_by": {"count": 3},
                "edge_threaded_comments": {"count": 0},
                "did_report_as_spam": false
            }}]
        }
    })
}

/// Full response body of the single-post query.
pub fn post_response(shortcode: &str) -> Value {
    json!({"data": {"xdt_shortcode_media": post_node(shortcode, 1_700_000_000, "XDTGraphImage")}})
}

/// Full response body of one timeline page.
pub fn timeline_response(timestamps: &[i64], has_next: bool, cursor: Option<&str>) -> Value {
    let edges: Vec<Value> = timestamps
        .iter()
        .map(|ts| json!({"node": post_node(&format!("p{ts}"), *ts, "GraphImage")}))
        .collect();
    json!({"data": {"user": {"edge_owner_to_timeline_media": {
        "count": 100,
        "page_info": {"has_next_page": has_next, "end_cursor": cursor},
        "edges": edges
    }}}})
}

/// Full response body of a profile lookup.
pub fn profile_response(username: &str) -> Value {
    json!({"data": {"user": {
        "id": "787132",
        "username": username,
        "full_name": "National Geographic",
        "edge_followed_by": {"count": 280_000_000},
        "edge_follow": {"count": 150},
        "edge_owner_to_timeline_media": {"count": 30_000},
        "is_verified": true
    }}})
}

pub fn created_at(results: &[ig_harvest::PostRecord]) -> Vec<i64> {
    results.iter().map(|p| p.created_at).collect()
}
