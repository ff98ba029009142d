// Speech endpoint configuration

use crate::chunk::DEFAULT_MAX_CHUNK_LENGTH;

pub const DEFAULT_API_URL: &str = "https://api.sarvam.ai";
pub const DEFAULT_MODEL: &str = "bulbul:v1";
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

#[derive(Clone)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub sample_rate: u32,
    pub max_chunk_length: usize,
}

impl std::fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("sample_rate", &self.sample_rate)
            .field("max_chunk_length", &self.max_chunk_length)
            .finish()
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_chunk_length: DEFAULT_MAX_CHUNK_LENGTH,
        }
    }
}

impl SpeechConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("SARVAM_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let api_url = std::env::var("SARVAM_API_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let model = std::env::var("TTS_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let sample_rate = std::env::var("TTS_SAMPLE_RATE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SAMPLE_RATE);

        let max_chunk_length = std::env::var("TTS_MAX_CHUNK_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_MAX_CHUNK_LENGTH);

        Self {
            api_key,
            api_url,
            model,
            sample_rate,
            max_chunk_length,
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

    pub fn with_max_chunk_length(mut self, max: usize) -> Self {
        self.max_chunk_length = max;
        self
    }
}
