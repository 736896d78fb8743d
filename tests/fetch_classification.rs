//! Fetch outcome classification against a mock platform.

mod helpers;

use std::time::Duration;

use httptest::{matchers::*, responders::*, Expectation, Server};
use ig_harvest::initialization::ClientSettings;
use ig_harvest::{
    Endpoints, FailureReason, FetchOutcome, ProxyPool, ScrapeTarget, SessionProvider,
};
use url::Url;

use helpers::{client_settings, direct_pool, fast_fetcher, post_response, profile_response, server_endpoints};

fn shortcode(code: &str) -> ScrapeTarget {
    ScrapeTarget::Shortcode(code.to_string())
}

async fn fetch_once(server: &Server, target: &ScrapeTarget) -> FetchOutcome {
    let session = direct_pool(server).acquire().await.expect("direct session");
    fast_fetcher(12).fetch(target, &session).await
}

#[tokio::test]
async fn test_post_fetch_success_returns_payload_at_path() {
    let server = Server::run();
    server.expect(
        Expectation::matching(httptest::all_of![
            request::method_path("POST", "/graphql/query"),
            request::body(url_decoded(contains(("doc_id", "8845758582119845")))),
        ])
        .respond_with(json_encoded(post_response("CuE2WNQs6vH"))),
    );

    let outcome = fetch_once(&server, &shortcode("CuE2WNQs6vH")).await;
    let payload = outcome.into_result().expect("fetch should succeed");
    assert_eq!(payload["shortcode"], "CuE2WNQs6vH");
}

#[tokio::test]
async fn test_profile_fetch_sends_username_query() {
    let server = Server::run();
    server.expect(
        Expectation::matching(httptest::all_of![
            request::method_path("GET", "/api/v1/users/web_profile_info/"),
            request::query(url_decoded(contains(("username", "natgeo")))),
        ])
        .respond_with(json_encoded(profile_response("natgeo"))),
    );

    let outcome = fetch_once(&server, &ScrapeTarget::Username("natgeo".into())).await;
    let payload = outcome.into_result().expect("fetch should succeed");
    assert_eq!(payload["username"], "natgeo");
}

#[tokio::test]
async fn test_unauthorized_is_classified_and_not_retried() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/graphql/query"))
            .times(1)
            .respond_with(status_code(401)),
    );

    let outcome = fetch_once(&server, &shortcode("abc")).await;
    assert_eq!(outcome, FetchOutcome::Failure(FailureReason::Unauthorized));
}

#[tokio::test]
async fn test_rate_limit_is_http_status() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/graphql/query"))
            .times(1)
            .respond_with(status_code(429)),
    );

    let outcome = fetch_once(&server, &shortcode("abc")).await;
    assert_eq!(outcome, FetchOutcome::Failure(FailureReason::HttpStatus(429)));
}

#[tokio::test]
async fn test_server_error_is_not_retried_inside_fetch() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/graphql/query"))
            .times(1)
            .respond_with(status_code(500)),
    );

    let outcome = fetch_once(&server, &shortcode("abc")).await;
    assert_eq!(outcome, FetchOutcome::Failure(FailureReason::HttpStatus(500)));
}

#[tokio::test]
async fn test_missing_key_path_is_malformed() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/graphql/query"))
            .respond_with(json_encoded(serde_json::json!({"data": {}}))),
    );

    match fetch_once(&server, &shortcode("abc")).await {
        FetchOutcome::Failure(FailureReason::MalformedPayload(message)) => {
            assert!(message.contains("data.xdt_shortcode_media"), "{message}");
        }
        other => panic!("expected malformed payload, got {other:?}"),
    }
}

#[tokio::test]
async fn test_null_payload_is_malformed() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/graphql/query"))
            .respond_with(json_encoded(
                serde_json::json!({"data": {"xdt_shortcode_media": null}}),
            )),
    );

    let outcome = fetch_once(&server, &shortcode("abc")).await;
    assert!(matches!(
        outcome,
        FetchOutcome::Failure(FailureReason::MalformedPayload(_))
    ));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/graphql/query"))
            .respond_with(status_code(200).body("<html>login required</html>")),
    );

    let outcome = fetch_once(&server, &shortcode("abc")).await;
    assert!(matches!(
        outcome,
        FetchOutcome::Failure(FailureReason::MalformedPayload(_))
    ));
}

#[tokio::test]
async fn test_timeouts_are_retried_then_reported() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/graphql/query"))
            .times(3)
            .respond_with(delay_and_then(
                Duration::from_millis(800),
                json_encoded(post_response("slow")),
            )),
    );

    let pool = ProxyPool::new(
        vec![],
        server_endpoints(&server),
        client_settings(Duration::from_millis(100)),
    );
    let session = pool.acquire().await.expect("direct session");
    let outcome = fast_fetcher(12).fetch(&shortcode("slow"), &session).await;

    assert_eq!(outcome, FetchOutcome::Failure(FailureReason::Timeout));
}

#[tokio::test]
async fn test_timeout_then_success() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/graphql/query"))
            .times(2)
            .respond_with(httptest::cycle![
                delay_and_then(Duration::from_millis(800), status_code(200)),
                json_encoded(post_response("flaky")),
            ]),
    );

    let pool = ProxyPool::new(
        vec![],
        server_endpoints(&server),
        client_settings(Duration::from_millis(100)),
    );
    let session = pool.acquire().await.expect("direct session");
    let outcome = fast_fetcher(12).fetch(&shortcode("flaky"), &session).await;

    assert!(matches!(outcome, FetchOutcome::Success(_)));
}

#[tokio::test]
async fn test_unreachable_platform_is_proxy_error() {
    // Bind then release a port so nothing is listening on it
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr")
    };
    let base = Url::parse(&format!("http://{addr}/")).expect("valid URL");
    let pool = ProxyPool::new(
        vec![],
        Endpoints::with_base_url(&base).expect("valid endpoints"),
        ClientSettings {
            timeout: Duration::from_secs(2),
            user_agent: "ig-harvest-tests".into(),
        },
    );
    let session = pool.acquire().await.expect("direct session");
    let outcome = fast_fetcher(12).fetch(&shortcode("abc"), &session).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Failure(FailureReason::ProxyError(_))
    ));
}
