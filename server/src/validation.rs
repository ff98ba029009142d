use narration_core::voice::{is_known_speaker, is_supported_language};

use crate::error::ApiError;

/// Maximum text length for TTS requests
const MAX_TEXT_LENGTH: usize = 5000;
/// Maximum chat message length
const MAX_MESSAGE_LENGTH: usize = 2000;

const PITCH_RANGE: (f32, f32) = (-0.75, 0.75);
const PACE_RANGE: (f32, f32) = (0.5, 2.0);
const LOUDNESS_RANGE: (f32, f32) = (0.3, 3.0);

/// Validate TTS request. Empty text is allowed and narrates to nothing.
pub fn validate_tts_request(text: &str, language: Option<&str>) -> Result<(), ApiError> {
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(ApiError::InvalidInput(format!(
            "Text too long (max {} characters)",
            MAX_TEXT_LENGTH
        )));
    }
    validate_language(language)
}

/// Language must be one of the catalog codes (e.g. hi-IN, en-IN)
pub fn validate_language(language: Option<&str>) -> Result<(), ApiError> {
    match language {
        Some(lang) if !is_supported_language(lang) => Err(ApiError::InvalidInput(format!(
            "Unsupported language code: {}. Use /languages to list.",
            lang
        ))),
        _ => Ok(()),
    }
}

pub fn validate_speaker(speaker: Option<&str>) -> Result<(), ApiError> {
    match speaker {
        Some(id) if !id.is_empty() && !is_known_speaker(id) => Err(ApiError::InvalidInput(
            format!("Unknown speaker: {}. Use /speakers to list.", id),
        )),
        _ => Ok(()),
    }
}

/// Pitch, pace and loudness must sit inside the endpoint's accepted ranges.
/// A zero pace/loudness means "use the default" and is accepted.
pub fn validate_prosody(
    pitch: Option<f32>,
    pace: Option<f32>,
    loudness: Option<f32>,
) -> Result<(), ApiError> {
    check_range("pitch", pitch, PITCH_RANGE, false)?;
    check_range("pace", pace, PACE_RANGE, true)?;
    check_range("loudness", loudness, LOUDNESS_RANGE, true)
}

fn check_range(
    name: &str,
    value: Option<f32>,
    (min, max): (f32, f32),
    zero_is_default: bool,
) -> Result<(), ApiError> {
    let Some(v) = value else {
        return Ok(());
    };
    if zero_is_default && v == 0.0 {
        return Ok(());
    }
    if !v.is_finite() || v < min || v > max {
        return Err(ApiError::InvalidInput(format!(
            "{} must be between {} and {}",
            name, min, max
        )));
    }
    Ok(())
}

/// Validate chat message
pub fn validate_chat_request(message: &str) -> Result<(), ApiError> {
    if message.trim().is_empty() {
        return Err(ApiError::InvalidInput("Message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(ApiError::InvalidInput(format!(
            "Message too long (max {} characters)",
            MAX_MESSAGE_LENGTH
        )));
    }
    Ok(())
}

/// Conversation ids are UUIDs handed out by the server
pub fn validate_conversation_id(id: &str) -> Result<(), ApiError> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ApiError::InvalidInput(format!("Invalid conversation id: {}", id)))
}
