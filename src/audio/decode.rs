//! Uploaded-audio decoding: any common container/codec to 16kHz mono f32.

use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;
use tracing::debug;

use super::WHISPER_SAMPLE_RATE;

/// Errors surfaced when an upload cannot be turned into model input. All of
/// these are caller mistakes (bad file), not server faults.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("uploaded audio is empty")]
    EmptyInput,

    #[error("unreadable audio: {0}")]
    Unreadable(String),

    #[error("no audio track found in upload")]
    NoAudioTrack,

    #[error("no audio samples decoded")]
    NoSamples,

    #[error("resampling failed: {0}")]
    Resample(String),
}

/// Decoded upload, already mixed to mono and resampled to the model rate.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono samples at 16kHz, normalized to [-1, 1].
    pub samples: Vec<f32>,
    /// Sample rate of the source file before resampling.
    pub source_sample_rate: u32,
    /// Channel count of the source file before downmixing.
    pub source_channels: usize,
}

impl DecodedAudio {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / WHISPER_SAMPLE_RATE as f64
    }
}

/// Decode audio bytes into 16kHz mono f32 samples.
///
/// Supports WAV, MP3, M4A/AAC, FLAC, and OGG via symphonia. The file name, if
/// known, seeds the format probe; the probe falls back to content sniffing
/// when the extension is missing or wrong.
pub fn decode_audio(data: &[u8], file_name: Option<&str>) -> Result<DecodedAudio, DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = file_name.and_then(|n| Path::new(n).extension()).and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Unreadable(format!("probe failed: {e}")))?;

    let mut format = probed.format;

    // Find the first audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let codec_params = track.codec_params.clone();
    let track_id = track.id;
    let source_rate = codec_params.sample_rate.unwrap_or(WHISPER_SAMPLE_RATE);
    let channels = codec_params.channels.map_or(1, |c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Unreadable(format!("codec init failed: {e}")))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(DecodeError::Unreadable(format!("packet read: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| DecodeError::Unreadable(format!("decode: {e}")))?;

        let spec = *decoded.spec();
        let n_frames = decoded.capacity();
        let mut sample_buf = SampleBuffer::<f32>::new(n_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let samples = sample_buf.samples();

        // Mix to mono
        if channels > 1 {
            for chunk in samples.chunks(channels) {
                let mono: f32 = chunk.iter().sum::<f32>() / channels as f32;
                all_samples.push(mono);
            }
        } else {
            all_samples.extend_from_slice(samples);
        }
    }

    if all_samples.is_empty() {
        return Err(DecodeError::NoSamples);
    }

    if source_rate != WHISPER_SAMPLE_RATE {
        all_samples = resample(&all_samples, source_rate, WHISPER_SAMPLE_RATE)?;
    }

    debug!(
        source_rate,
        channels,
        samples = all_samples.len(),
        "decoded upload to mono 16kHz"
    );

    Ok(DecodedAudio {
        samples: all_samples,
        source_sample_rate: source_rate,
        source_channels: channels,
    })
}

/// Resample mono audio from `from_rate` to `to_rate` using rubato.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, DecodeError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = f64::from(to_rate) / f64::from(from_rate);
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| DecodeError::Resample(format!("init: {e}")))?;

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize + 1024);

    for chunk in samples.chunks(chunk_size) {
        let input = if chunk.len() < chunk_size {
            // Pad last chunk with zeros
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            vec![padded]
        } else {
            vec![chunk.to_vec()]
        };

        let resampled = resampler
            .process(&input, None)
            .map_err(|e| DecodeError::Resample(format!("process: {e}")))?;

        if let Some(channel) = resampled.first() {
            output.extend_from_slice(channel);
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = decode_audio(b"not audio data", Some("clip.wav"));
        assert!(matches!(result, Err(DecodeError::Unreadable(_))));
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = decode_audio(b"", Some("clip.wav"));
        assert!(matches!(result, Err(DecodeError::EmptyInput)));
    }

    #[test]
    fn resample_identity() {
        let samples: Vec<f32> = (0..16000).map(|i| (i as f32 / 16000.0).sin()).collect();
        let result = resample(&samples, 16000, 16000).unwrap();
        let ratio = result.len() as f64 / samples.len() as f64;
        assert!((ratio - 1.0).abs() < 0.1, "ratio: {ratio}");
    }

    #[test]
    fn resample_downsample() {
        // 48kHz → 16kHz should produce ~1/3 the samples
        let samples: Vec<f32> = (0..48000).map(|i| (i as f32 / 48000.0).sin()).collect();
        let result = resample(&samples, 48000, 16000).unwrap();
        let ratio = result.len() as f64 / samples.len() as f64;
        assert!((ratio - 1.0 / 3.0).abs() < 0.05, "ratio: {ratio}");
    }
}
