use std::io::Cursor;

use crate::error::NarrationError;

/// Encode mono f32 samples as a 16-bit PCM WAV file.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, NarrationError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    // 44-byte header plus 2 bytes per sample
    let mut cursor = Cursor::new(Vec::<u8>::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &s in samples {
            writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Re-mux several complete WAV files into one file with a single header.
///
/// All inputs must share channel count, sample rate and sample format.
pub fn merge_wav_segments<'a, I>(segments: I) -> Result<Vec<u8>, NarrationError>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut spec: Option<hound::WavSpec> = None;
    let mut samples: Vec<i32> = Vec::new();

    for bytes in segments {
        let reader = hound::WavReader::new(Cursor::new(bytes))?;
        let seg_spec = reader.spec();
        if *spec.get_or_insert(seg_spec) != seg_spec {
            return Err(NarrationError::FormatMismatch);
        }
        if seg_spec.sample_format != hound::SampleFormat::Int {
            return Err(NarrationError::FormatMismatch);
        }
        for sample in reader.into_samples::<i32>() {
            samples.push(sample?);
        }
    }

    let Some(spec) = spec else {
        return Ok(Vec::new());
    };

    let mut cursor = Cursor::new(Vec::<u8>::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for s in samples {
            writer.write_sample(s)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}
