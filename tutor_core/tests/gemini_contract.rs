use serde_json::json;
use tutor_core::{ChatTurn, GeminiClient, TutorConfig, TutorError, APOLOGY_REPLY};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn client_for(server: &MockServer) -> GeminiClient {
    let config = TutorConfig::default()
        .with_api_key("gem-key")
        .with_api_url(server.uri());
    GeminiClient::new(&config).unwrap()
}

fn reply_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "gem-key"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 1024
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("Fractions are parts.")))
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![
        ChatTurn::user("Hi"),
        ChatTurn::model("Hello! What shall we study?"),
    ];
    let reply = client_for(&server)
        .reply(&history, "What is a fraction?")
        .await
        .unwrap();
    assert_eq!(reply, "Fractions are parts.");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 4);
    assert_eq!(contents[0]["role"], "user");
    assert!(contents[0]["parts"][0]["text"].as_str().unwrap().contains("tutoring assistant"));
    assert_eq!(contents[1]["parts"][0]["text"], "Hi");
    assert_eq!(contents[2]["role"], "model");
    assert_eq!(contents[3]["role"], "user");
    assert_eq!(contents[3]["parts"][0]["text"], "What is a fraction?");
}

#[tokio::test]
async fn test_forbidden_is_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client_for(&server).reply(&[], "Hi").await.unwrap_err();
    assert!(matches!(err, TutorError::InvalidCredentials));
}

#[tokio::test]
async fn test_empty_candidates_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server).reply(&[], "Hi").await.unwrap_err();
    assert!(matches!(err, TutorError::EmptyReply));
}

#[tokio::test]
async fn test_failure_falls_back_to_apology() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let reply = client_for(&server).reply_or_apology(&[], "Hi").await;
    assert_eq!(reply, APOLOGY_REPLY);
}

#[test]
fn test_missing_key_is_rejected() {
    let err = GeminiClient::new(&TutorConfig::default()).unwrap_err();
    assert!(matches!(err, TutorError::MissingApiKey));
}
