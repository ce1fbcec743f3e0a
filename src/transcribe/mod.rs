//! Transcription adapter: audio in, detected language + transcript text out.

mod whisper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use whisper::{WhisperConfig, WhisperTranscriber};

/// Available Whisper model sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhisperModel {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl WhisperModel {
    /// GGML file name within the whisper.cpp model repo.
    pub fn filename(&self) -> &'static str {
        match self {
            WhisperModel::Tiny => "ggml-tiny.bin",
            WhisperModel::Base => "ggml-base.bin",
            WhisperModel::Small => "ggml-small.bin",
            WhisperModel::Medium => "ggml-medium.bin",
            WhisperModel::Large => "ggml-large-v3.bin",
        }
    }
}

impl std::fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WhisperModel::Tiny => write!(f, "tiny"),
            WhisperModel::Base => write!(f, "base"),
            WhisperModel::Small => write!(f, "small"),
            WhisperModel::Medium => write!(f, "medium"),
            WhisperModel::Large => write!(f, "large"),
        }
    }
}

impl std::str::FromStr for WhisperModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(WhisperModel::Tiny),
            "base" => Ok(WhisperModel::Base),
            "small" => Ok(WhisperModel::Small),
            "medium" => Ok(WhisperModel::Medium),
            "large" => Ok(WhisperModel::Large),
            _ => Err(format!(
                "Unknown model: {}. Use tiny, base, small, medium, or large",
                s
            )),
        }
    }
}

/// Result of transcribing one clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    /// Detected language code ("en", "fr", ...), lowercase. None when the
    /// model could not identify a language.
    pub language: Option<String>,
    /// The transcribed text, segments joined with single spaces.
    pub text: String,
}

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("Failed to fetch model: {0}")]
    ModelFetch(String),

    #[error("Failed to initialize Whisper: {0}")]
    Init(String),

    #[error("Transcription failed: {0}")]
    Inference(String),
}

/// Audio → transcript seam. `WhisperTranscriber` is the whisper.cpp-backed
/// implementation; tests substitute their own.
#[async_trait]
pub trait TranscriptionAdapter: Send + Sync {
    /// Transcribe a clip of mono 16kHz samples already conditioned to the
    /// model window.
    async fn transcribe(&self, samples: &[f32]) -> Result<Transcription, TranscribeError>;
}
