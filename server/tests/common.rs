//! Common utilities for integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use narration_core::{Narrator, SpeechConfig};
use serde_json::{json, Value};
use server::config::{NarrationFailureMode, ServerConfig};
use server::metrics::NarrationMetrics;
use server::{app, AppState};
use tower::ServiceExt;
use tutor_core::{ConversationStore, GeminiClient, GuestGate, TutorConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

/// Router wired to mock speech and tutor endpoints.
pub struct TestApp {
    pub router: Router,
    pub speech: MockServer,
    pub tutor: MockServer,
}

/// Create a test app instance
pub async fn create_test_app(mode: NarrationFailureMode) -> TestApp {
    create_test_app_with(ServerConfig {
        narration_failure: mode,
        ..ServerConfig::default()
    })
    .await
}

/// Same as [`create_test_app`], with full control over server settings.
pub async fn create_test_app_with(config: ServerConfig) -> TestApp {
    let speech = MockServer::start().await;
    let tutor = MockServer::start().await;

    let narrator = Narrator::from_config(
        &SpeechConfig::default()
            .with_api_key("speech-key")
            .with_api_url(speech.uri()),
    )
    .expect("speech config has a key");
    let gemini = GeminiClient::new(
        &TutorConfig::default()
            .with_api_key("tutor-key")
            .with_api_url(tutor.uri()),
    )
    .expect("tutor config has a key");

    let state = AppState {
        narrator: Some(Arc::new(narrator)),
        tutor: Some(Arc::new(gemini)),
        conversations: ConversationStore::new(),
        gate: GuestGate::default(),
        metrics: NarrationMetrics::new(),
        config,
    };

    TestApp {
        router: app(state),
        speech,
        tutor,
    }
}

pub async fn mount_speech_ok(server: &MockServer, payload: &[u8]) {
    Mock::given(method("POST"))
        .and(path("/text-to-speech"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "audios": [general_purpose::STANDARD.encode(payload)] })),
        )
        .mount(server)
        .await;
}

pub async fn mount_speech_status(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/text-to-speech"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub async fn mount_speech_slow(server: &MockServer, payload: &[u8], delay: Duration) {
    Mock::given(method("POST"))
        .and(path("/text-to-speech"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "audios": [general_purpose::STANDARD.encode(payload)] }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

pub async fn mount_tutor_reply(server: &MockServer, text: &str) {
    mount_tutor_reply_after(server, text, Duration::ZERO).await;
}

pub async fn mount_tutor_reply_after(server: &MockServer, text: &str, delay: Duration) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
                }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
    (status, value)
}

pub async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}
