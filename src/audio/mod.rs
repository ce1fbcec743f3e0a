//! Audio decoding and conditioning for the transcription model.

pub mod decode;

pub use decode::{decode_audio, DecodeError, DecodedAudio};

/// Sample rate the speech model expects.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Fixed analysis window of the speech model, in seconds.
pub const WINDOW_SECONDS: u32 = 30;

/// Pad or trim a mono 16kHz signal to the fixed model window.
///
/// Short clips are zero-padded to 30 seconds, long clips truncated. The model
/// scores exactly one window per request.
pub fn pad_or_trim(mut samples: Vec<f32>) -> Vec<f32> {
    let window = (WHISPER_SAMPLE_RATE * WINDOW_SECONDS) as usize;
    samples.resize(window, 0.0);
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_clip_is_zero_padded() {
        let samples = vec![0.5f32; 16_000];
        let padded = pad_or_trim(samples);
        assert_eq!(padded.len(), 480_000);
        assert_eq!(padded[0], 0.5);
        assert_eq!(padded[16_000], 0.0);
        assert_eq!(*padded.last().unwrap(), 0.0);
    }

    #[test]
    fn long_clip_is_truncated() {
        let samples = vec![0.25f32; 600_000];
        let trimmed = pad_or_trim(samples);
        assert_eq!(trimmed.len(), 480_000);
        assert!(trimmed.iter().all(|&s| s == 0.25));
    }

    #[test]
    fn exact_window_is_untouched() {
        let samples: Vec<f32> = (0..480_000).map(|i| (i % 7) as f32).collect();
        let out = pad_or_trim(samples.clone());
        assert_eq!(out, samples);
    }
}
