use std::sync::Arc;

use crate::sentiment::SentimentAdapter;
use crate::transcribe::TranscriptionAdapter;

/// Shared application state for HTTP handlers
///
/// Both models are loaded once at startup and shared read-only across
/// requests; handlers never mutate this state.
#[derive(Clone)]
pub struct AppState {
    pub transcriber: Arc<dyn TranscriptionAdapter>,
    pub sentiment: Arc<dyn SentimentAdapter>,
}

impl AppState {
    pub fn new(
        transcriber: Arc<dyn TranscriptionAdapter>,
        sentiment: Arc<dyn SentimentAdapter>,
    ) -> Self {
        Self {
            transcriber,
            sentiment,
        }
    }
}
