use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::prompt::{APOLOGY_REPLY, SYSTEM_PROMPT};
use crate::{ChatTurn, Role, TutorConfig, TutorError};

/// Structure for the Gemini `generateContent` request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

/// Structure for the Gemini response
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

fn content<'a>(role: &'static str, text: &'a str) -> Content<'a> {
    Content {
        role,
        parts: [Part { text }],
    }
}

pub struct GeminiClient {
    api_key: String,
    client: Client,
    endpoint: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl GeminiClient {
    /// Create a new client. Fails when no API key is configured.
    pub fn new(config: &TutorConfig) -> Result<Self, TutorError> {
        let api_key = config.api_key.clone().ok_or(TutorError::MissingApiKey)?;
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.api_url.trim_end_matches('/'),
            config.model
        );
        Ok(Self {
            api_key,
            client: Client::new(),
            endpoint,
        })
    }

    /// Ask the model for the next tutor reply.
    ///
    /// The system prompt goes first as a user turn, then the prior turns, then
    /// the new message.
    pub async fn reply(&self, history: &[ChatTurn], message: &str) -> Result<String, TutorError> {
        let mut contents = Vec::with_capacity(history.len() + 2);
        contents.push(content("user", SYSTEM_PROMPT));
        for turn in history {
            let role = match turn.role {
                Role::User => "user",
                Role::Model => "model",
            };
            contents.push(content(role, &turn.content));
        }
        contents.push(content("user", message));

        let body = GenerateRequest {
            contents,
            generation_config: GenerationConfig::default(),
        };

        info!(turns = history.len(), "sending request to Gemini");
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
            return Err(TutorError::InvalidCredentials);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TutorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let reply: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if reply.trim().is_empty() {
            return Err(TutorError::EmptyReply);
        }
        info!(reply_len = reply.len(), "response received from Gemini");
        Ok(reply)
    }

    /// Like [`reply`](Self::reply), but falls back to a fixed apology.
    pub async fn reply_or_apology(&self, history: &[ChatTurn], message: &str) -> String {
        match self.reply(history, message).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("tutor reply failed: {e}");
                APOLOGY_REPLY.to_string()
            }
        }
    }
}
