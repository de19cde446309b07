use parlance_core::{PromptRequest, RequestType};
use parlance_widget::{HttpRelay, RelayTransport, TransportError};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> PromptRequest {
    PromptRequest::new(
        Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap(),
        "Hello".to_string(),
        RequestType::Launch,
    )
}

#[tokio::test]
async fn posts_camel_case_body_to_api_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/prompt"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "id": "11111111-1111-1111-1111-111111111111",
            "prompt": "Hello",
            "requestType": "launch"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("Hi there"))
        .expect(1)
        .mount(&server)
        .await;

    let relay = HttpRelay::new(&server.uri()).unwrap();
    let body = relay.send(&request()).await.unwrap();
    assert_eq!(body, "Hi there");
}

#[tokio::test]
async fn empty_200_is_returned_as_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/prompt"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let relay = HttpRelay::new(&server.uri()).unwrap();
    assert_eq!(relay.send(&request()).await.unwrap(), "");
}

#[tokio::test]
async fn non_success_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/prompt"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("Unable to parse upstream payload: []"),
        )
        .mount(&server)
        .await;

    let relay = HttpRelay::new(&server.uri()).unwrap();
    let err = relay.send(&request()).await.unwrap_err();
    assert_eq!(
        err,
        TransportError::Status {
            status: 500,
            message: "Unable to parse upstream payload: []".into(),
        }
    );
}

#[tokio::test]
async fn unreachable_relay_is_network_error() {
    // Port 9 (discard) is closed on test hosts.
    let relay = HttpRelay::new("http://127.0.0.1:9").unwrap();
    let err = relay.send(&request()).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));
    assert_eq!(err.status(), None);
}
