use base64::{engine::general_purpose, Engine as _};

use crate::error::NarrationError;
use crate::wav;

pub const WAV_MIME_TYPE: &str = "audio/wav; codecs=1";

/// Decoded audio for one chunk, tagged with the chunk's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSegment {
    pub index: usize,
    pub bytes: Vec<u8>,
}

/// Merged audio for a whole utterance, ready for the playback layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableAudio {
    bytes: Vec<u8>,
    boundaries: Vec<usize>,
    mime_type: String,
    sample_rate: u32,
}

impl PlayableAudio {
    /// Nothing to play.
    pub fn empty(mime_type: impl Into<String>, sample_rate: u32) -> Self {
        Self {
            bytes: Vec::new(),
            boundaries: Vec::new(),
            mime_type: mime_type.into(),
            sample_rate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hand the buffer over to the caller.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn segment_count(&self) -> usize {
        self.boundaries.len()
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Segment slices in playback order.
    pub fn segments(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let mut start = 0;
        self.boundaries.iter().map(move |&end| {
            let slice = &self.bytes[start..end];
            start = end;
            slice
        })
    }

    /// Re-mux the segments into one WAV file with a single header.
    pub fn to_wav(&self) -> Result<Vec<u8>, NarrationError> {
        wav::merge_wav_segments(self.segments())
    }
}

/// Platform hooks used by the pipeline to decode payloads and build the
/// playable resource.
pub trait AudioCodec: Send + Sync {
    fn decode_base64_to_bytes(&self, payload: &str) -> Result<Vec<u8>, NarrationError>;

    /// Wrap already concatenated bytes. `boundaries` holds the end offset of
    /// each segment.
    fn wrap_bytes_as_playable(&self, bytes: Vec<u8>, boundaries: Vec<usize>) -> PlayableAudio;

    fn empty(&self) -> PlayableAudio;
}

/// WAV payloads at a fixed sample rate.
#[derive(Debug, Clone)]
pub struct WavCodec {
    sample_rate: u32,
}

impl WavCodec {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl AudioCodec for WavCodec {
    fn decode_base64_to_bytes(&self, payload: &str) -> Result<Vec<u8>, NarrationError> {
        Ok(general_purpose::STANDARD.decode(payload.trim())?)
    }

    fn wrap_bytes_as_playable(&self, bytes: Vec<u8>, boundaries: Vec<usize>) -> PlayableAudio {
        PlayableAudio {
            bytes,
            boundaries,
            mime_type: WAV_MIME_TYPE.to_string(),
            sample_rate: self.sample_rate,
        }
    }

    fn empty(&self) -> PlayableAudio {
        PlayableAudio::empty(WAV_MIME_TYPE, self.sample_rate)
    }
}

/// Concatenate segments in chunk order.
///
/// The result is exactly as long as the sum of the segment lengths.
pub fn concatenate(mut segments: Vec<AudioSegment>, codec: &dyn AudioCodec) -> PlayableAudio {
    if segments.is_empty() {
        return codec.empty();
    }
    segments.sort_by_key(|s| s.index);

    let total: usize = segments.iter().map(|s| s.bytes.len()).sum();
    let mut bytes = Vec::with_capacity(total);
    let mut boundaries = Vec::with_capacity(segments.len());
    for segment in segments {
        bytes.extend_from_slice(&segment.bytes);
        boundaries.push(bytes.len());
    }

    codec.wrap_bytes_as_playable(bytes, boundaries)
}
