use thiserror::Error;

/// Errors produced while turning an utterance into audio.
#[derive(Debug, Error)]
pub enum NarrationError {
    /// The synthesis endpoint failed or could not be reached.
    /// `status` is `None` for transport errors that never produced a response.
    #[error("speech synthesis failed (status {status:?}): {message}")]
    SynthesisFailure { status: Option<u16>, message: String },

    /// The endpoint answered 403: the subscription key is wrong or missing.
    #[error("invalid or missing speech API key")]
    InvalidCredentials,

    /// Success status, but no audio payload for the chunk.
    #[error("no audio data received for chunk {chunk}")]
    MissingAudioData { chunk: usize },

    #[error("speech API key is not configured")]
    MissingApiKey,

    #[error("audio payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("audio segments have mismatched formats")]
    FormatMismatch,
}

impl NarrationError {
    /// HTTP status reported by the endpoint, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            NarrationError::SynthesisFailure { status, .. } => *status,
            NarrationError::InvalidCredentials => Some(403),
            _ => None,
        }
    }
}
