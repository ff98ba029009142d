pub mod config;
pub mod error;
pub mod metrics;
pub mod validation;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use narration_core::voice::{Language, Speaker};
use narration_core::{Narrator, PlayableAudio, Utterance, VoiceOptions, SPEAKERS, SUPPORTED_LANGUAGES};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tutor_core::{Admission, ConversationStore, GateDecision, GeminiClient, GuestGate, APOLOGY_REPLY};

use crate::config::{NarrationFailureMode, ServerConfig};
use crate::error::ApiError;
use crate::metrics::{MetricsResponse, NarrationMetrics};
use crate::validation::{
    validate_chat_request, validate_conversation_id, validate_language, validate_prosody,
    validate_speaker, validate_tts_request,
};

#[derive(Clone)]
pub struct AppState {
    /// `None` when no speech API key is configured.
    pub narrator: Option<Arc<Narrator>>,
    /// `None` when no tutor API key is configured; chat then answers with
    /// the apology reply.
    pub tutor: Option<Arc<GeminiClient>>,
    pub conversations: ConversationStore,
    pub gate: GuestGate,
    pub metrics: NarrationMetrics,
    pub config: ServerConfig,
}

#[derive(Deserialize)]
pub struct TtsRequest {
    text: String,
    language: Option<String>,
    speaker: Option<String>,
    pitch: Option<f32>,
    pace: Option<f32>,
    loudness: Option<f32>,
}

#[derive(Serialize)]
pub struct TtsResponse {
    /// `None` when the text held nothing to speak.
    audio_base64: Option<String>,
    mime_type: String,
    sample_rate: u32,
    segments: usize,
    byte_length: usize,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    message: String,
    conversation_id: Option<String>,
    /// Set for signed-in users; guests are subject to the usage gate.
    user_id: Option<String>,
    language: Option<String>,
    speaker: Option<String>,
    #[serde(default = "default_true")]
    narrate: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
pub struct ChatResponse {
    reply: String,
    conversation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    narration_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_guest_messages: Option<u32>,
}

/// Build the application router with middleware attached.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/languages", get(list_languages))
        .route("/speakers", get(list_speakers))
        .route("/tts", post(tts_endpoint))
        .route("/chat", post(chat_endpoint))
        .route("/metrics", get(metrics_endpoint));

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(cors_layer(&config))
        .into_inner();

    Router::new()
        .merge(api.clone())   // root paths
        .nest("/api", api)    // /api prefix
        .layer(axum::middleware::from_fn(add_request_id))
        .layer(middleware_stack)
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
        .allow_credentials(false);

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .flatten()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (development mode)");
        base.allow_origin(tower_http::cors::Any)
    } else {
        info!("CORS configured for {} origin(s)", origins.len());
        base.allow_origin(tower_http::cors::AllowOrigin::list(origins))
    }
}

/// Request ID middleware for tracing
async fn add_request_id(mut request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = header.clone() {
        request.headers_mut().insert("x-request-id", value);
    }
    let mut response = next.run(request).await;
    if let Some(value) = header {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_languages() -> Json<&'static [Language]> {
    Json(SUPPORTED_LANGUAGES)
}

pub async fn list_speakers() -> Json<&'static [Speaker]> {
    Json(SPEAKERS)
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(state.metrics.snapshot())
}

/// Headroom left for writing the response after narration gives up.
const RESPONSE_MARGIN: Duration = Duration::from_millis(500);

/// Run the narrator within `limit` and record metrics for the outcome.
async fn narrate(
    state: &AppState,
    narrator: &Narrator,
    utterance: &Utterance,
    limit: Duration,
) -> Result<PlayableAudio, ApiError> {
    let start = Instant::now();
    match tokio::time::timeout(limit, narrator.narrate(utterance)).await {
        Ok(Ok(audio)) => {
            state.metrics.record_narration(
                audio.segment_count(),
                audio.bytes().len(),
                start.elapsed().as_millis() as u64,
            );
            Ok(audio)
        }
        Ok(Err(e)) => {
            state.metrics.record_failure();
            Err(e.into())
        }
        Err(_) => {
            state.metrics.record_failure();
            warn!("narration did not finish within {:?}", limit);
            Err(ApiError::NarrationTimeout(limit))
        }
    }
}

/// Narration limit for a request that started at `started`: the configured
/// narration timeout, cut short so the response still beats the request
/// timeout.
fn narration_budget(config: &ServerConfig, started: Instant) -> Duration {
    let remaining = config
        .request_timeout()
        .saturating_sub(started.elapsed() + RESPONSE_MARGIN);
    config.narration_timeout().min(remaining)
}

pub async fn tts_endpoint(
    State(state): State<AppState>,
    Json(req): Json<TtsRequest>,
) -> Result<Json<TtsResponse>, ApiError> {
    let started = Instant::now();
    state.metrics.record_request();
    validate_tts_request(&req.text, req.language.as_deref())?;
    validate_speaker(req.speaker.as_deref())?;
    validate_prosody(req.pitch, req.pace, req.loudness)?;

    let narrator = state.narrator.clone().ok_or(ApiError::NarrationUnavailable)?;
    let voice = VoiceOptions::from_parts(
        req.language.as_deref(),
        req.speaker.as_deref(),
        req.pitch,
        req.pace,
        req.loudness,
    );
    let limit = narration_budget(&state.config, started);
    let audio = narrate(&state, &narrator, &Utterance::new(req.text, voice), limit).await?;

    Ok(Json(TtsResponse {
        audio_base64: (!audio.is_empty()).then(|| audio.to_base64()),
        mime_type: audio.mime_type().to_string(),
        sample_rate: audio.sample_rate(),
        segments: audio.segment_count(),
        byte_length: audio.bytes().len(),
    }))
}

pub async fn chat_endpoint(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let started = Instant::now();
    state.metrics.record_request();
    validate_chat_request(&req.message)?;
    if let Some(ref id) = req.conversation_id {
        validate_conversation_id(id)?;
    }
    validate_language(req.language.as_deref())?;
    validate_speaker(req.speaker.as_deref())?;

    let conv_id = req
        .conversation_id
        .clone()
        .unwrap_or_else(ConversationStore::new_id);
    let signed_in = req.user_id.as_deref().is_some_and(|id| !id.trim().is_empty());

    // Gate check and user turn are one step, so parallel guest messages
    // cannot slip past the limit while the tutor is still answering.
    let Admission { decision, history } = state
        .conversations
        .admit(&conv_id, &state.gate, signed_in, &req.message)
        .await;
    let remaining = match decision {
        GateDecision::LoginRequired => {
            info!(conversation = %conv_id, "guest message limit reached");
            return Err(ApiError::LoginRequired);
        }
        GateDecision::Allowed { remaining } => remaining,
    };

    info!(
        "Chat request received: message length={}, conv_id={}",
        req.message.len(),
        conv_id
    );

    let reply = match state.tutor.as_ref() {
        Some(tutor) => {
            let pending = tutor.reply_or_apology(&history, &req.message);
            match tokio::time::timeout(state.config.llm_timeout(), pending).await {
                Ok(reply) => reply,
                Err(_) => {
                    error!(
                        "Tutor request timed out after {} seconds",
                        state.config.llm_timeout().as_secs()
                    );
                    APOLOGY_REPLY.to_string()
                }
            }
        }
        None => {
            warn!("tutor API key not configured, replying with apology");
            APOLOGY_REPLY.to_string()
        }
    };

    state.conversations.record_reply(&conv_id, &reply).await;

    let mut response = ChatResponse {
        reply,
        conversation_id: conv_id,
        audio_base64: None,
        sample_rate: None,
        narration_error: None,
        remaining_guest_messages: remaining,
    };

    // Narration is best effort: a failure never blocks the text reply.
    if let (true, Some(narrator)) = (req.narrate, state.narrator.clone()) {
        let voice = VoiceOptions::from_parts(
            req.language.as_deref(),
            req.speaker.as_deref(),
            None,
            None,
            None,
        );
        let utterance = Utterance::new(response.reply.clone(), voice);
        let limit = narration_budget(&state.config, started);
        match narrate(&state, &narrator, &utterance, limit).await {
            Ok(audio) if !audio.is_empty() => {
                response.audio_base64 = Some(audio.to_base64());
                response.sample_rate = Some(audio.sample_rate());
            }
            Ok(_) => {}
            Err(e) => {
                warn!("continuing without audio: {e}");
                if state.config.narration_failure == NarrationFailureMode::Surface {
                    response.narration_error = Some(e.to_string());
                }
            }
        }
    }

    Ok(Json(response))
}
