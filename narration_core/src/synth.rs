//! Speech requests against the hosted synthesis endpoint.
//!
//! Every chunk becomes one request. All requests are started together and
//! joined with `try_join_all`, which yields results in input order no matter
//! which response lands first and fails as soon as any request fails.

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::audio::{AudioCodec, AudioSegment};
use crate::config::SpeechConfig;
use crate::error::NarrationError;
use crate::voice::VoiceOptions;

/// Anything that can turn one chunk of text into a base64 audio payload.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// `Ok(None)` means the service answered but carried no audio.
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceOptions,
    ) -> Result<Option<String>, NarrationError>;
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    inputs: [&'a str; 1],
    target_language_code: &'a str,
    speaker: &'a str,
    pitch: f32,
    pace: f32,
    loudness: f32,
    model: &'a str,
    speech_sample_rate: u32,
}

#[derive(Deserialize)]
struct SynthesisResponse {
    #[serde(default)]
    audios: Vec<String>,
}

/// Client for the Sarvam `text-to-speech` endpoint.
#[derive(Debug, Clone)]
pub struct SarvamClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    sample_rate: u32,
}

impl SarvamClient {
    pub fn new(config: &SpeechConfig) -> Result<Self, NarrationError> {
        let api_key = config.api_key.clone().ok_or(NarrationError::MissingApiKey)?;
        Ok(Self {
            client: Client::new(),
            api_key,
            endpoint: format!("{}/text-to-speech", config.api_url.trim_end_matches('/')),
            model: config.model.clone(),
            sample_rate: config.sample_rate,
        })
    }
}

#[async_trait]
impl SpeechBackend for SarvamClient {
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceOptions,
    ) -> Result<Option<String>, NarrationError> {
        let body = SynthesisRequest {
            inputs: [text],
            target_language_code: &voice.language,
            speaker: &voice.speaker,
            pitch: voice.pitch,
            pace: voice.pace,
            loudness: voice.loudness,
            model: &self.model,
            speech_sample_rate: self.sample_rate,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("API-Subscription-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NarrationError::SynthesisFailure {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(NarrationError::InvalidCredentials);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NarrationError::SynthesisFailure {
                status: Some(status.as_u16()),
                message,
            });
        }

        let parsed: SynthesisResponse =
            response
                .json()
                .await
                .map_err(|e| NarrationError::SynthesisFailure {
                    status: Some(status.as_u16()),
                    message: format!("invalid response body: {e}"),
                })?;

        Ok(parsed.audios.into_iter().next().filter(|a| !a.is_empty()))
    }
}

/// Synthesize every chunk concurrently and decode the payloads.
///
/// Segments come back in chunk order. The first failure aborts the whole
/// batch; nothing is retried.
pub async fn request_segments<S: AsRef<str>>(
    backend: &dyn SpeechBackend,
    codec: &dyn AudioCodec,
    chunks: &[S],
    voice: &VoiceOptions,
) -> Result<Vec<AudioSegment>, NarrationError> {
    let requests = chunks.iter().enumerate().map(|(index, chunk)| async move {
        let chunk = chunk.as_ref();
        debug!(index, len = chunk.len(), "requesting speech for chunk");

        let payload = backend
            .synthesize(chunk, voice)
            .await
            .and_then(|audio| audio.ok_or(NarrationError::MissingAudioData { chunk: index }))
            .map_err(|e| {
                error!(index, status = ?e.status(), "speech request failed: {e}");
                e
            })?;

        let bytes = codec.decode_base64_to_bytes(&payload)?;
        Ok::<_, NarrationError>(AudioSegment { index, bytes })
    });

    try_join_all(requests).await
}
