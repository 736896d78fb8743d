//! Platform request building.
//!
//! Each target kind maps to one request plus the key path a successful
//! response must contain. Callers only see `PlatformRequest`, so new target
//! kinds plug in here without touching the fetcher's contract.

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::json;
use url::form_urlencoded;
use url::Url;

use crate::config::{FORM_CONTENT_TYPE, POST_DOCUMENT_ID, TIMELINE_QUERY_HASH};
use crate::models::ScrapeTarget;
use crate::proxy::Endpoints;

/// Success path of the single-post query.
pub const POST_PAYLOAD_PATH: &[&str] = &["data", "xdt_shortcode_media"];
/// Success path of a timeline page.
pub const TIMELINE_PAYLOAD_PATH: &[&str] = &["data", "user", "edge_owner_to_timeline_media"];
/// Success path of a profile lookup.
pub const PROFILE_PAYLOAD_PATH: &[&str] = &["data", "user"];

/// One request against the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformRequest {
    pub method: Method,
    pub url: Url,
    /// Form-encoded body, sent with `content-type: application/x-www-form-urlencoded`
    pub form_body: Option<String>,
    /// Key path that must be present (and not `null`) in a successful response
    pub expected_path: &'static [&'static str],
}

impl PlatformRequest {
    /// Builds the `reqwest` request on a session's client.
    pub fn to_builder(&self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        let builder = client.request(self.method.clone(), self.url.clone());
        match &self.form_body {
            Some(body) => builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body.clone()),
            None => builder,
        }
    }
}

/// `POST` to the query endpoint with the post document id and the shortcode
/// as URL-encoded JSON variables.
pub fn post_request(shortcode: &str, endpoints: &Endpoints) -> PlatformRequest {
    let variables = json!({
        "shortcode": shortcode,
        "fetch_tagged_user_count": null,
        "hoisted_comment_id": null,
        "hoisted_reply_id": null,
    });
    let body = form_urlencoded::Serializer::new(String::new())
        .append_pair("variables", &variables.to_string())
        .append_pair("doc_id", POST_DOCUMENT_ID)
        .finish();

    PlatformRequest {
        method: Method::POST,
        url: endpoints.graphql_query.clone(),
        form_body: Some(body),
        expected_path: POST_PAYLOAD_PATH,
    }
}

/// `GET` one page of a user's timeline. `after` is the previous page's cursor.
pub fn timeline_request(
    user_id: &str,
    page_size: usize,
    after: Option<&str>,
    endpoints: &Endpoints,
) -> PlatformRequest {
    let variables = json!({
        "id": user_id,
        "first": page_size,
        "after": after,
    });
    let mut url = endpoints.graphql_query.clone();
    url.query_pairs_mut()
        .append_pair("query_hash", TIMELINE_QUERY_HASH)
        .append_pair("variables", &variables.to_string());

    PlatformRequest {
        method: Method::GET,
        url,
        form_body: None,
        expected_path: TIMELINE_PAYLOAD_PATH,
    }
}

/// `GET` a user's profile by username.
pub fn profile_request(username: &str, endpoints: &Endpoints) -> PlatformRequest {
    let mut url = endpoints.profile_info.clone();
    url.query_pairs_mut().append_pair("username", username);

    PlatformRequest {
        method: Method::GET,
        url,
        form_body: None,
        expected_path: PROFILE_PAYLOAD_PATH,
    }
}

/// The request for a batch target. A user id fetches its newest timeline page.
pub fn request_for(target: &ScrapeTarget, endpoints: &Endpoints, page_size: usize) -> PlatformRequest {
    match target {
        ScrapeTarget::Shortcode(code) => post_request(code, endpoints),
        ScrapeTarget::UserId(id) => timeline_request(id, page_size, None, endpoints),
        ScrapeTarget::Username(name) => profile_request(name, endpoints),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variables_of(pairs: Vec<(String, String)>) -> serde_json::Value {
        let raw = pairs
            .into_iter()
            .find(|(k, _)| k == "variables")
            .map(|(_, v)| v)
            .unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_post_request_body() {
        let request = post_request("CuE2WNQs6vH", &Endpoints::default());
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.as_str(), "https://www.instagram.com/graphql/query");

        let body = request.form_body.unwrap();
        assert!(body.ends_with("&doc_id=8845758582119845"));
        assert!(body.starts_with("variables=%7B"));

        let pairs: Vec<(String, String)> = form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        let variables = variables_of(pairs);
        assert_eq!(variables["shortcode"], "CuE2WNQs6vH");
        assert!(variables["fetch_tagged_user_count"].is_null());
        assert!(variables["hoisted_comment_id"].is_null());
        assert!(variables["hoisted_reply_id"].is_null());
    }

    #[test]
    fn test_timeline_request_query() {
        let request = timeline_request("1067259270", 12, Some("QVFD"), &Endpoints::default());
        assert_eq!(request.method, Method::GET);
        assert!(request.form_body.is_none());

        let pairs: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
        assert!(pairs
            .iter()
            .any(|(k, v)| k == "query_hash" && v == TIMELINE_QUERY_HASH));
        let variables = variables_of(pairs);
        assert_eq!(variables["id"], "1067259270");
        assert_eq!(variables["first"], 12);
        assert_eq!(variables["after"], "QVFD");
    }

    #[test]
    fn test_first_timeline_page_has_null_cursor() {
        let request = timeline_request("1", 24, None, &Endpoints::default());
        let pairs: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
        assert!(variables_of(pairs)["after"].is_null());
    }

    #[test]
    fn test_request_for_each_target_kind() {
        let endpoints = Endpoints::default();
        let post = request_for(&ScrapeTarget::Shortcode("abc".into()), &endpoints, 24);
        assert_eq!(post.expected_path, POST_PAYLOAD_PATH);
        let timeline = request_for(&ScrapeTarget::UserId("1".into()), &endpoints, 24);
        assert_eq!(timeline.expected_path, TIMELINE_PAYLOAD_PATH);
        let profile = request_for(&ScrapeTarget::Username("nasa".into()), &endpoints, 24);
        assert_eq!(profile.expected_path, PROFILE_PAYLOAD_PATH);
        assert_eq!(
            profile.url.as_str(),
            "https://i.instagram.com/api/v1/users/web_profile_info/?username=nasa"
        );
    }
}
