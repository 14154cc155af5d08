//! End-to-end tests for the API client over a real HTTP transport.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use vantage_client::{ApiClient, RetryPolicy};
use vantage_domain::{ClientConfig, Credentials, EntityKind, QuerySpec, SegmentDraft};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client(server: &MockServer, api_key: Option<&str>) -> ApiClient {
    ApiClient::builder()
        .config(ClientConfig { base_url: server.uri(), timeout: Duration::from_secs(5) })
        .credentials(Arc::new(Credentials::new(
            "sub-123",
            "app-456",
            api_key.map(str::to_string),
        )))
        .retry(RetryPolicy::default().with_base_backoff(Duration::from_millis(5)))
        .build()
        .expect("client")
}

#[tokio::test]
async fn list_segments_sends_scoping_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/subscription/sub-123/segment"))
        .and(header("X-Vantage-Subscription-Id", "sub-123"))
        .and(header("X-Vantage-App-Id", "app-456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "seg-1", "name": "Power Users"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = client(&server, None).list_segments().await;

    assert!(envelope.is_success());
    let segments = envelope.data.expect("segments");
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].name, "Power Users");
}

#[tokio::test]
async fn create_segment_carries_integration_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/subscription/sub-123/segment"))
        .and(header("X-Vantage-Integration-Key", "secret"))
        .and(body_partial_json(json!({"name": "Trial Accounts"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "seg-9", "name": "Trial Accounts"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = client(&server, Some("secret"))
        .create_segment(&SegmentDraft::new("Trial Accounts"))
        .await;

    assert!(envelope.is_success());
    assert_eq!(envelope.data.expect("segment").id, "seg-9");
}

#[tokio::test]
async fn create_without_key_never_reaches_the_server() {
    let server = MockServer::start().await;
    // No mounted mock: any request would fail the received-requests check.

    let envelope = client(&server, None).create_segment(&SegmentDraft::new("X")).await;

    assert!(envelope.errors[0].starts_with("ConfigurationError:"));
    let requests = server.received_requests().await.expect("requests");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn read_your_write_after_create() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/subscription/sub-123/segment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "seg-42", "name": "New Signups"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/subscription/sub-123/segment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "seg-1", "name": "Power Users"},
                {"id": "seg-42", "name": "New Signups"},
            ]
        })))
        .mount(&server)
        .await;

    let client = client(&server, Some("secret"));
    let created = client.create_segment(&SegmentDraft::new("New Signups")).await;
    let created_id = created.data.expect("segment").id;

    let listed = client.list_segments().await;
    let segments = listed.data.expect("segments");
    assert!(segments.iter().any(|segment| segment.id == created_id));
}

#[tokio::test]
async fn transient_server_errors_are_retried_through_the_wire() {
    let server = MockServer::start().await;
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_clone = attempts.clone();

    Mock::given(method("POST"))
        .and(path("/api/v1/aggregation"))
        .respond_with(move |_req: &Request| -> ResponseTemplate {
            let current = attempts_clone.fetch_add(1, Ordering::SeqCst);
            if current < 2 {
                ResponseTemplate::new(503)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({"results": []}))
            }
        })
        .expect(3)
        .mount(&server)
        .await;

    let spec = QuerySpec::new(EntityKind::Visitor).last_days(7);
    let envelope = client(&server, None).query_visitors(&spec).await;

    assert!(envelope.is_success());
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn activity_aggregation_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/aggregation"))
        .and(body_partial_json(json!({
            "response": {"mimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"day": "2026-08-01", "count": 3, "totalEvents": 17}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let spec = QuerySpec::new(EntityKind::Activity).last_days(1).group_by(["day"]);
    let envelope = client(&server, None).query_activity(&spec).await;

    let rows = envelope.data.expect("rows");
    assert_eq!(rows[0].number("totalEvents"), Some(17.0));
    assert_eq!(rows[0].number("count"), Some(3.0));
}
