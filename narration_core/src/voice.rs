use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Speaker {
    pub id: &'static str,
    pub name: &'static str,
}

/// Languages accepted by the synthesis endpoint.
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "hi-IN", name: "Hindi" },
    Language { code: "bn-IN", name: "Bengali" },
    Language { code: "kn-IN", name: "Kannada" },
    Language { code: "ml-IN", name: "Malayalam" },
    Language { code: "mr-IN", name: "Marathi" },
    Language { code: "od-IN", name: "Odia" },
    Language { code: "pa-IN", name: "Punjabi" },
    Language { code: "ta-IN", name: "Tamil" },
    Language { code: "te-IN", name: "Telugu" },
    Language { code: "gu-IN", name: "Gujarati" },
    Language { code: "en-IN", name: "English" },
];

pub const SPEAKERS: &[Speaker] = &[
    Speaker { id: "meera", name: "Meera" },
    Speaker { id: "pavithra", name: "Pavithra" },
    Speaker { id: "maitreyi", name: "Maitreyi" },
    Speaker { id: "arvind", name: "Arvind" },
    Speaker { id: "amol", name: "Amol" },
    Speaker { id: "amartya", name: "Amartya" },
];

pub const DEFAULT_LANGUAGE: &str = "en-IN";
pub const DEFAULT_SPEAKER: &str = "meera";

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|l| l.code == code)
}

pub fn is_known_speaker(id: &str) -> bool {
    SPEAKERS.iter().any(|s| s.id == id)
}

/// Voice and prosody shared by every chunk of one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceOptions {
    pub language: String,
    pub speaker: String,
    pub pitch: f32,
    pub pace: f32,
    pub loudness: f32,
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            speaker: DEFAULT_SPEAKER.to_string(),
            pitch: 0.0,
            pace: 1.0,
            loudness: 1.0,
        }
    }
}

impl VoiceOptions {
    /// Build options from optional request fields.
    ///
    /// Missing or zero pace/loudness fall back to 1.0 and a missing or empty
    /// speaker falls back to the default voice.
    pub fn from_parts(
        language: Option<&str>,
        speaker: Option<&str>,
        pitch: Option<f32>,
        pace: Option<f32>,
        loudness: Option<f32>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            language: language
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.language),
            speaker: speaker
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.speaker),
            pitch: pitch.unwrap_or(defaults.pitch),
            pace: pace.filter(|p| *p != 0.0).unwrap_or(defaults.pace),
            loudness: loudness.filter(|l| *l != 0.0).unwrap_or(defaults.loudness),
        }
    }
}

/// Text to be spoken together with the voice to speak it in.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub text: String,
    pub voice: VoiceOptions,
}

impl Utterance {
    pub fn new(text: impl Into<String>, voice: VoiceOptions) -> Self {
        Self { text: text.into(), voice }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookups() {
        assert!(is_supported_language("hi-IN"));
        assert!(is_supported_language("en-IN"));
        assert!(!is_supported_language("en_US"));
        assert!(is_known_speaker("arvind"));
        assert!(!is_known_speaker("nobody"));
    }

    #[test]
    fn test_from_parts_falls_back_to_defaults() {
        let opts = VoiceOptions::from_parts(Some("ta-IN"), Some(""), None, Some(0.0), None);
        assert_eq!(opts.language, "ta-IN");
        assert_eq!(opts.speaker, DEFAULT_SPEAKER);
        assert_eq!(opts.pitch, 0.0);
        assert_eq!(opts.pace, 1.0);
        assert_eq!(opts.loudness, 1.0);

        let opts = VoiceOptions::from_parts(None, Some("amol"), Some(0.25), Some(1.5), Some(2.0));
        assert_eq!(opts.language, DEFAULT_LANGUAGE);
        assert_eq!(opts.speaker, "amol");
        assert_eq!(opts.pitch, 0.25);
        assert_eq!(opts.pace, 1.5);
        assert_eq!(opts.loudness, 2.0);
    }
}
