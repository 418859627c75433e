//! Chat client against an in-process endpoint.

mod common;

use common::{app_config_for, completion, dead_url, MockChat, TEST_KEY};
use jester::ai::ERROR_MARKER;
use jester::config::USER_AGENT;
use jester::{AiClient, AiReply};

#[tokio::test]
async fn success_returns_first_choice() {
    let mock = MockChat::answering("## Photosynthesis\nPlants eat light.").await;
    let client = AiClient::new(&mock.app_config()).unwrap();

    let reply = client.ask("Summarize photosynthesis").await;
    assert_eq!(
        reply,
        AiReply::Success {
            text: "## Photosynthesis\nPlants eat light.".into()
        }
    );
}

#[tokio::test]
async fn request_carries_model_prompt_and_credentials() {
    let mock = MockChat::answering("ok").await;
    let client = AiClient::new(&mock.app_config()).unwrap();
    client.ask("What is 2+2?").await;

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];

    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/api/v1/chat/completions");
    assert_eq!(
        req.headers.get("authorization").map(String::as_str),
        Some(format!("Bearer {TEST_KEY}").as_str())
    );
    assert_eq!(
        req.headers.get("user-agent").map(String::as_str),
        Some(USER_AGENT)
    );
    assert!(req
        .headers
        .get("content-type")
        .is_some_and(|v| v.starts_with("application/json")));
    assert_eq!(
        req.body,
        serde_json::json!({
            "model": "test/model",
            "messages": [{"role": "user", "content": "What is 2+2?"}]
        })
    );
}

#[tokio::test]
async fn non_2xx_is_a_failure_with_marker() {
    let mock = MockChat::start(429, r#"{"error":{"message":"rate limited"}}"#).await;
    let client = AiClient::new(&mock.app_config()).unwrap();

    let reply = client.ask("hello").await;
    assert!(!reply.is_success());
    let shown = reply.to_string();
    assert!(shown.starts_with(ERROR_MARKER), "got {shown:?}");
    assert!(shown.contains("429"));
    assert!(shown.contains("rate limited"));
}

#[tokio::test]
async fn malformed_body_is_a_failure() {
    let mock = MockChat::start(200, "<html>upstream hiccup</html>").await;
    let client = AiClient::new(&mock.app_config()).unwrap();

    match client.ask("hello").await {
        AiReply::Failure { reason } => assert!(reason.contains("malformed")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_content_is_a_failure() {
    let mock = MockChat::start(200, r#"{"choices":[]}"#).await;
    let client = AiClient::new(&mock.app_config()).unwrap();
    assert!(!client.ask("hello").await.is_success());
}

#[tokio::test]
async fn transport_failure_never_escapes() {
    let client = AiClient::new(&app_config_for(&dead_url())).unwrap();

    let reply = client.ask("anyone there?").await;
    assert!(matches!(reply, AiReply::Failure { .. }));
    assert!(reply.to_string().starts_with(ERROR_MARKER));
}

#[tokio::test]
async fn completion_helper_round_trips_unicode() {
    let mock = MockChat::start(200, completion("café ☕")).await;
    let client = AiClient::new(&mock.app_config()).unwrap();
    assert_eq!(client.ask("x").await.text(), Some("café ☕"));
}
