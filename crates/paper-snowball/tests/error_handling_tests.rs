//! Failure scenarios: server errors, unreachable backend, malformed bodies.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_snowball::actions;
use paper_snowball::client::ScholarClient;
use paper_snowball::config::Config;
use paper_snowball::error::{ClientError, RequestError};
use paper_snowball::models::{Provider, ReferenceDepth};

fn setup_client(mock_server: &MockServer) -> ScholarClient {
    let config = Config::for_testing(&mock_server.uri());
    ScholarClient::new(config).unwrap()
}

fn client_error(err: RequestError) -> ClientError {
    match err {
        RequestError::Client { source, .. } => source,
        RequestError::Validation { message, .. } => {
            panic!("unexpected validation error: {message}")
        }
    }
}

// =============================================================================
// HTTP status handling
// =============================================================================

#[tokio::test]
async fn test_references_server_error_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/download_references"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "database unavailable"})),
        )
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = actions::fetch_references(&client, "P1", ReferenceDepth::Nested).await.unwrap_err();

    let message = err.to_user_message();
    assert!(message.contains("Server error"), "got: {message}");
    assert!(message.contains("fetch references"), "got: {message}");
    assert!(message.contains("database unavailable"), "got: {message}");
}

#[tokio::test]
async fn test_search_server_error_plain_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search_papers"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = actions::perform_search(&client, "q", None, Provider::Doaj).await.unwrap_err();

    let source = client_error(err);
    assert!(source.is_server_error());
    assert!(source.to_string().contains("Service Unavailable"));
}

#[tokio::test]
async fn test_search_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search_papers"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = actions::perform_search(&client, "q", None, Provider::Doaj).await.unwrap_err();

    let message = err.to_user_message();
    assert!(message.starts_with("Failed to search papers"), "got: {message}");
    assert!(matches!(client_error(err), ClientError::UnexpectedStatus { status: 404, .. }));
}

// =============================================================================
// Connectivity
// =============================================================================

#[tokio::test]
async fn test_unreachable_backend() {
    let client = ScholarClient::new(Config::for_testing("http://127.0.0.1:1")).unwrap();

    let err = actions::perform_search(&client, "q", None, Provider::Doaj).await.unwrap_err();

    assert_eq!(
        err.to_user_message(),
        "Cannot connect to server. Please check if the server is running."
    );
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search_papers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = Config::for_testing(&mock_server.uri());
    config.request_timeout = Duration::from_millis(300);
    let client = ScholarClient::new(config).unwrap();

    let err = actions::perform_search(&client, "q", None, Provider::Doaj).await.unwrap_err();
    let message = err.to_user_message();

    assert!(matches!(
        client_error(err),
        ClientError::Timeout(t) if t == Duration::from_millis(300)
    ));
    assert!(message.contains("timed out"), "got: {message}");
}

// =============================================================================
// Malformed bodies
// =============================================================================

#[tokio::test]
async fn test_search_unrecognized_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search_papers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = actions::perform_search(&client, "q", None, Provider::Doaj).await.unwrap_err();

    assert!(err.to_user_message().contains("Invalid response format from server"));
}

#[tokio::test]
async fn test_references_unrecognized_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/download_references"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("not a list")))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = actions::fetch_references(&client, "P1", ReferenceDepth::Direct).await.unwrap_err();

    assert!(matches!(client_error(err), ClientError::InvalidFormat(_)));
}

#[tokio::test]
async fn test_malformed_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search_papers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = actions::perform_search(&client, "q", None, Provider::Doaj).await.unwrap_err();

    assert!(matches!(client_error(err), ClientError::Parse(_)));
}

#[tokio::test]
async fn test_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/download_references"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = actions::fetch_references(&client, "P1", ReferenceDepth::Direct).await.unwrap_err();

    assert!(matches!(client_error(err), ClientError::InvalidFormat(_)));
}

// =============================================================================
// Suggestion status
// =============================================================================

#[tokio::test]
async fn test_suggestion_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/suggest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "suggestions": [],
            "message": "Provider quota exhausted"
        })))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = actions::fetch_suggestions(&client, "graph", Provider::Doaj).await.unwrap_err();

    assert_eq!(err.to_user_message(), "Failed to fetch suggestions: Provider quota exhausted");
}

#[tokio::test]
async fn test_suggestion_error_with_null_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/suggest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "suggestions": null,
            "message": "quota"
        })))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = actions::fetch_suggestions(&client, "graph", Provider::Doaj).await.unwrap_err();

    assert_eq!(err.to_user_message(), "Failed to fetch suggestions: quota");
}

#[tokio::test]
async fn test_suggestion_error_without_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/suggest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error"})))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = actions::fetch_suggestions(&client, "graph", Provider::Doaj).await.unwrap_err();

    assert!(matches!(
        client_error(err),
        ClientError::Remote(m) if m == "Failed to fetch suggestions"
    ));
}
