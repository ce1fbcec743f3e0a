pub mod audio;
pub mod config;
pub mod emoji;
pub mod http;
pub mod render;
pub mod sentiment;
pub mod transcribe;

pub use audio::{decode_audio, pad_or_trim, DecodeError, DecodedAudio, WHISPER_SAMPLE_RATE};
pub use config::Config;
pub use emoji::emoji_for;
pub use http::{create_router, AppState};
pub use render::{render_language, render_sentiment, DisplayOption};
pub use sentiment::{
    LabelScore, SentimentAdapter, SentimentClassifier, SentimentConfig, SentimentError,
    EMOTION_LABELS,
};
pub use transcribe::{
    TranscribeError, Transcription, TranscriptionAdapter, WhisperConfig, WhisperModel,
    WhisperTranscriber,
};
