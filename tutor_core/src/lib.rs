pub mod conversation;
pub mod gate;
pub mod gemini;
pub mod prompt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use conversation::{Admission, Conversation, ConversationStore};
pub use gate::{GateDecision, GuestGate, DEFAULT_GUEST_MESSAGE_LIMIT};
pub use gemini::GeminiClient;
pub use prompt::APOLOGY_REPLY;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("tutor API key is not configured")]
    MissingApiKey,

    #[error("tutor API rejected the credentials")]
    InvalidCredentials,

    #[error("tutor API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("tutor API returned no text")]
    EmptyReply,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            at: Utc::now(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

#[derive(Clone)]
pub struct TutorConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub guest_message_limit: u32,
}

impl std::fmt::Debug for TutorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("guest_message_limit", &self.guest_message_limit)
            .finish()
    }
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            guest_message_limit: DEFAULT_GUEST_MESSAGE_LIMIT,
        }
    }
}

impl TutorConfig {
    /// Reads `GEMINI_API_KEY`, `GEMINI_API_URL`, `GEMINI_MODEL` and
    /// `GUEST_MESSAGE_LIMIT`.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let api_url = std::env::var("GEMINI_API_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let model = std::env::var("GEMINI_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let guest_message_limit = std::env::var("GUEST_MESSAGE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_GUEST_MESSAGE_LIMIT);

        Self {
            api_key,
            api_url,
            model,
            guest_message_limit,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}
