//! Integration tests for the Travelog HTTP client

mod common;

use common::SessionOnly;
use serde_json::{Value, json};
use std::time::Duration;
use travelog_core::ClientSettings;
use travelog_http::client::posts::{NewPost, Post};
use travelog_http::client::response::success_marker;
use travelog_http::{
    ApiClient, ApiClientBuilder, ClientError, IdempotencyKey, RequestDescriptor, StaticToken,
};
use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_client(server: &MockServer, provider: std::sync::Arc<SessionOnly>) -> ApiClient {
    ApiClient::builder()
        .base_url(server.uri())
        .credentials(provider)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_client_builder() {
    let client = ApiClient::builder()
        .base_url("http://localhost:8080/")
        .timeout(Duration::from_secs(5))
        .build();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = ApiClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_builder_from_settings_uses_refresh_path() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/renew"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = ClientSettings {
        base_url: mock_server.uri(),
        timeout_secs: 10,
        user_agent: "travelog-tests".to_string(),
        session_refresh_path: "/session/renew".to_string(),
    };
    let client = ApiClientBuilder::from_settings(&settings).build().unwrap();

    let me: Value = client.get_authenticated("/me").await.unwrap();
    assert_eq!(me, json!({"id": "u1"}));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].headers.get("user-agent").unwrap(), "travelog-tests");
}

#[tokio::test]
async fn test_unauthenticated_get_returns_body_verbatim() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "1"}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = SessionOnly::succeeding(Duration::ZERO);
    let client = session_client(&mock_server, provider.clone());

    let value = client
        .execute(&RequestDescriptor::public(reqwest::Method::GET, "/posts"))
        .await
        .unwrap();

    assert_eq!(value, json!([{"id": "1"}]));
    assert_eq!(provider.token_lookups(), 0);
    assert_eq!(provider.refreshes(), 0);
}

#[tokio::test]
async fn test_list_posts_fills_missing_fields() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "1"}])))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let posts = client.list_posts().await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "1");
    assert!(posts[0].title.is_empty());
    assert!(posts[0].image_urls.is_empty());
}

#[tokio::test]
async fn test_json_response_is_parsed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let value: Value = client.get("/health").await.unwrap();
    assert_eq!(value, json!({"ok": true}));
}

#[tokio::test]
async fn test_non_json_response_yields_success_marker() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/newsletter"))
        .respond_with(ResponseTemplate::new(200).set_body_string("subscribed"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();

    let value: Value = client
        .post("/newsletter", &json!({"email": "a@b.c"}))
        .await
        .unwrap();
    assert_eq!(value, success_marker());
    assert_eq!(value, json!({"success": true}));

    let value: Value = client.get("/ping").await.unwrap();
    assert_eq!(value, success_marker());
}

#[tokio::test]
async fn test_server_error_message_is_surfaced_without_refresh() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = SessionOnly::succeeding(Duration::ZERO);
    let client = session_client(&mock_server, provider.clone());
    let mut failures = client.signals().subscribe();

    let err = client
        .get_authenticated::<Value>("/weather")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.message(), "boom");
    assert_eq!(provider.refreshes(), 0);
    assert!(failures.try_recv().is_err());
}

#[tokio::test]
async fn test_error_without_usable_body_gets_generic_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transport"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();

    let err = client.get::<Value>("/transport").await.unwrap_err();
    assert!(matches!(err, ClientError::ServerError { status: 502, .. }));
    assert_eq!(err.message(), "Request failed with status 502");

    let err = client.get_post("missing").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_auth_with_static_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bookmarks"))
        .and(header("authorization", "Bearer test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::builder()
        .base_url(mock_server.uri())
        .credentials(std::sync::Arc::new(StaticToken::new("test-api-key")))
        .build()
        .unwrap();

    let bookmarks: Vec<Value> = client.get_authenticated("/bookmarks").await.unwrap();
    assert!(bookmarks.is_empty());
}

#[tokio::test]
async fn test_create_post_sends_idempotency_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("idempotency-key", "abc-123"))
        .and(body_json(json!({"title": "Kyoto", "body": "Temples", "imageUrls": []})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": "p9", "title": "Kyoto", "body": "Temples"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::builder()
        .base_url(mock_server.uri())
        .credentials(std::sync::Arc::new(StaticToken::new("key")))
        .build()
        .unwrap();

    let post: Post = client
        .create_post(
            &NewPost {
                title: "Kyoto".into(),
                body: "Temples".into(),
                location: None,
                image_urls: vec![],
            },
            IdempotencyKey::from("abc-123"),
        )
        .await
        .unwrap();

    assert_eq!(post.id, "p9");
}

#[tokio::test]
async fn test_remove_bookmark_sends_delete_with_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/bookmarks"))
        .and(body_json(json!({"postId": "42"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = session_client(&mock_server, SessionOnly::succeeding(Duration::ZERO));
    let value = client.remove_bookmark("42").await.unwrap();
    assert_eq!(value, success_marker());
}

#[tokio::test]
async fn test_bookmark_post_sends_derived_idempotency_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bookmarks"))
        .and(header("idempotency-key", "bookmark_post:42"))
        .and(body_json(json!({"postId": "42"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"postId": "42"})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = session_client(&mock_server, SessionOnly::succeeding(Duration::ZERO));
    client.bookmark_post("42").await.unwrap();
    // Bookmarking again is the same write
    let value = client.bookmark_post("42").await.unwrap();
    assert_eq!(value["postId"], "42");
}

#[tokio::test]
async fn test_upload_image_is_multipart() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uploads"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("filename=\"sunset.jpg\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"url": "https://img.travelog.app/sunset.jpg"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = session_client(&mock_server, SessionOnly::succeeding(Duration::ZERO));
    let image = client
        .upload_image("sunset.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF])
        .await
        .unwrap();

    assert_eq!(image.url, "https://img.travelog.app/sunset.jpg");
}

#[tokio::test]
async fn test_rate_post_uses_put() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/posts/p1/rating"))
        .and(body_json(json!({"score": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"average": 4.5})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = session_client(&mock_server, SessionOnly::succeeding(Duration::ZERO));
    let value = client.rate_post("p1", 4).await.unwrap();
    assert_eq!(value["average"], 4.5);
}
