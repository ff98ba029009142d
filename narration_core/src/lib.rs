pub mod audio;
pub mod chunk;
pub mod config;
pub mod error;
pub mod sentence;
pub mod synth;
pub mod voice;
pub mod wav;

use std::sync::Arc;

use tracing::{error, info};

pub use audio::{concatenate, AudioCodec, AudioSegment, PlayableAudio, WavCodec, WAV_MIME_TYPE};
pub use chunk::{combine_chunks, DEFAULT_MAX_CHUNK_LENGTH};
pub use config::SpeechConfig;
pub use error::NarrationError;
pub use sentence::{split_into_sentences, Sentences};
pub use synth::{request_segments, SarvamClient, SpeechBackend};
pub use voice::{Utterance, VoiceOptions, SPEAKERS, SUPPORTED_LANGUAGES};

/// Runs the whole narration pipeline for one utterance:
/// split into sentences, regroup into chunks, synthesize every chunk
/// concurrently, then concatenate the audio in chunk order.
#[derive(Clone)]
pub struct Narrator {
    backend: Arc<dyn SpeechBackend>,
    codec: Arc<dyn AudioCodec>,
    max_chunk_length: usize,
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("backend", &"<SpeechBackend>")
            .field("max_chunk_length", &self.max_chunk_length)
            .finish()
    }
}

impl Narrator {
    pub fn new(
        backend: Arc<dyn SpeechBackend>,
        codec: Arc<dyn AudioCodec>,
        max_chunk_length: usize,
    ) -> Self {
        Self {
            backend,
            codec,
            max_chunk_length,
        }
    }

    /// Narrator backed by the Sarvam endpoint described by `config`.
    pub fn from_config(config: &SpeechConfig) -> Result<Self, NarrationError> {
        let backend = SarvamClient::new(config)?;
        Ok(Self::new(
            Arc::new(backend),
            Arc::new(WavCodec::new(config.sample_rate)),
            config.max_chunk_length,
        ))
    }

    /// Chunks that `narrate` would send for `text`.
    pub fn plan(&self, text: &str) -> Vec<String> {
        combine_chunks(Sentences::new(text), self.max_chunk_length)
    }

    pub async fn narrate(&self, utterance: &Utterance) -> Result<PlayableAudio, NarrationError> {
        info!(
            text_len = utterance.text.len(),
            language = %utterance.voice.language,
            speaker = %utterance.voice.speaker,
            "starting narration"
        );

        let chunks = self.plan(&utterance.text);
        if chunks.is_empty() {
            info!("nothing to narrate");
            return Ok(self.codec.empty());
        }
        info!(chunks = chunks.len(), "split text into chunks");

        let segments = request_segments(
            self.backend.as_ref(),
            self.codec.as_ref(),
            &chunks,
            &utterance.voice,
        )
        .await
        .map_err(|e| {
            error!("narration failed, discarding partial audio: {e}");
            e
        })?;

        let audio = concatenate(segments, self.codec.as_ref());
        info!(bytes = audio.bytes().len(), segments = audio.segment_count(), "narration ready");
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use base64::{engine::general_purpose, Engine as _};
    use std::sync::Mutex;

    /// Echoes each chunk back as its own "audio" so output order is visible.
    #[derive(Default)]
    struct EchoBackend {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SpeechBackend for EchoBackend {
        async fn synthesize(
            &self,
            text: &str,
            _voice: &VoiceOptions,
        ) -> Result<Option<String>, NarrationError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(Some(general_purpose::STANDARD.encode(text)))
        }
    }

    fn narrator(backend: Arc<EchoBackend>, max: usize) -> Narrator {
        Narrator::new(backend, Arc::new(WavCodec::new(22050)), max)
    }

    #[tokio::test]
    async fn test_narrate_concatenates_chunks() {
        let backend = Arc::new(EchoBackend::default());
        let narrator = narrator(backend.clone(), 40);
        let utterance = Utterance::new(
            "Hello there. How are you today? I am fine, thank you very much for asking, it means a lot.",
            VoiceOptions::default(),
        );

        let audio = narrator.narrate(&utterance).await.unwrap();
        assert_eq!(
            audio.bytes(),
            b"Hello there. How are you today?I am fine, thank you very much for asking, it means a lot."
        );
        assert_eq!(audio.segment_count(), 2);
        assert_eq!(backend.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_text_makes_no_requests() {
        let backend = Arc::new(EchoBackend::default());
        let narrator = narrator(backend.clone(), 250);

        let audio = narrator
            .narrate(&Utterance::new("  \n ", VoiceOptions::default()))
            .await
            .unwrap();
        assert!(audio.is_empty());
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = Narrator::from_config(&SpeechConfig::default()).unwrap_err();
        assert!(matches!(err, NarrationError::MissingApiKey));
        assert!(Narrator::from_config(&SpeechConfig::default().with_api_key("k")).is_ok());
    }
}
