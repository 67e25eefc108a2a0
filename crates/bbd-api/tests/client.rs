//! Client integration tests with wiremock.

use bbd_api::{ApiClient, ApiConfig, ApiError, ListQuery, NewFeeding};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiConfig::new(server.uri(), "test-key")).unwrap()
}

const EMPTY_PAGE: &str = r#"{"count": 0, "next": null, "previous": null, "results": []}"#;

#[tokio::test]
async fn every_request_carries_the_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/children/"))
        .and(header("Authorization", "Token test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(EMPTY_PAGE, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server).children().await.unwrap();
    assert_eq!(page.count, 0);
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn list_endpoints_decode_the_page_envelope() {
    let server = MockServer::start().await;
    let body = r#"{
        "count": 2,
        "next": null,
        "previous": null,
        "results": [
            {"id": 1, "child": 1, "start": "2024-01-05T08:00:00", "amount": 120},
            {"id": 2, "child": 1, "start": "2024-01-05T11:00:00", "amount": 90}
        ]
    }"#;
    Mock::given(method("GET"))
        .and(path("/api/feedings/"))
        .and(query_param("limit", "100"))
        .and(query_param("ordering", "-start"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let query = ListQuery::new().limit(100).ordering("-start");
    let page = client(&server).feedings(&query).await.unwrap();
    assert_eq!(page.count, 2);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].amount, Some(120.0));
}

#[tokio::test]
async fn create_timer_posts_child_and_name() {
    let server = MockServer::start().await;
    let body = r#"{"id": 12, "child": 1, "name": "Feeding", "start": "2024-01-05T08:00:00+00:00", "active": true}"#;
    Mock::given(method("POST"))
        .and(path("/api/timers/"))
        .and(body_json(serde_json::json!({"child": 1, "name": "Feeding"})))
        .respond_with(ResponseTemplate::new(201).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let timer = client(&server).create_timer(1, "Feeding").await.unwrap();
    assert_eq!(timer.id, 12);
    assert_eq!(timer.name.as_deref(), Some("Feeding"));
}

#[tokio::test]
async fn delete_timer_accepts_204_with_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/timers/12/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_timer(12).await.unwrap();
}

#[tokio::test]
async fn non_2xx_surfaces_as_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/children/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server).children().await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_feeding_from_timer_sends_timer_id() {
    let server = MockServer::start().await;
    let body = r#"{
        "id": 30, "child": 1,
        "start": "2024-01-05T08:00:00", "end": "2024-01-05T08:15:00",
        "type": "breast milk", "method": "bottle", "amount": 120,
        "duration": "00:15:00"
    }"#;
    Mock::given(method("POST"))
        .and(path("/api/feedings/"))
        .and(body_json(serde_json::json!({
            "timer": 12,
            "type": "breast milk",
            "method": "bottle",
            "amount": 120.0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let new = NewFeeding {
        timer: 12,
        kind: "breast milk".to_string(),
        method: "bottle".to_string(),
        amount: Some(120.0),
        notes: None,
    };
    let feeding = client(&server).create_feeding(&new).await.unwrap();
    assert_eq!(feeding.id, 30);
    assert_eq!(feeding.amount, Some(120.0));
}

#[tokio::test]
async fn invalid_json_is_an_invalid_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/children/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server).children().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}
