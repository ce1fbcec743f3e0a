//! Whisper.cpp-backed transcription.
//!
//! The GGML model file is fetched from the ggerganov/whisper.cpp repo via
//! `hf-hub` on first run, then loaded once into a shared context. Each request
//! gets its own decode state; the context itself is read-only after load.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::{TranscribeError, Transcription, TranscriptionAdapter, WhisperModel};

/// Configuration for the Whisper transcriber.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Hugging Face repo holding the GGML model files.
    pub repo: String,
    /// Model size to load.
    pub model: WhisperModel,
    /// Local cache directory for fetched files.
    pub cache_dir: PathBuf,
    /// Decode thread count (0 = all available cores).
    pub threads: i32,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            repo: "ggerganov/whisper.cpp".to_string(),
            model: WhisperModel::Base,
            cache_dir: PathBuf::from("models"),
            threads: 0,
        }
    }
}

struct Inner {
    ctx: WhisperContext,
    n_threads: i32,
}

/// Pretrained speech model, loaded once and shared across requests.
pub struct WhisperTranscriber {
    inner: Arc<Inner>,
    model: WhisperModel,
}

impl WhisperTranscriber {
    /// Fetch the model file if needed and load it.
    ///
    /// Does blocking I/O (model download on first run). Called once at
    /// startup; a failure here is fatal, the process must not serve requests
    /// without a speech model.
    pub fn load(config: &WhisperConfig) -> Result<Self, TranscribeError> {
        let path = fetch_model(config)?;

        info!("Loading Whisper {} model...", config.model);

        let ctx = WhisperContext::new_with_params(
            path.to_str()
                .ok_or_else(|| TranscribeError::Init("invalid model path".to_string()))?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| TranscribeError::Init(format!("Failed to load model: {}", e)))?;

        let n_threads = if config.threads > 0 {
            config.threads
        } else {
            std::thread::available_parallelism()
                .map(|p| p.get() as i32)
                .unwrap_or(4)
        };

        info!(
            "Whisper model loaded successfully (using {} threads)",
            n_threads
        );

        Ok(Self {
            inner: Arc::new(Inner { ctx, n_threads }),
            model: config.model,
        })
    }

    /// Model size this transcriber was loaded with.
    pub fn model(&self) -> WhisperModel {
        self.model
    }
}

/// Fetch the GGML model file via `hf-hub`, reusing the local cache.
fn fetch_model(config: &WhisperConfig) -> Result<PathBuf, TranscribeError> {
    debug!(repo = %config.repo, model = %config.model, "resolving whisper model file");

    let api = hf_hub::api::sync::ApiBuilder::new()
        .with_cache_dir(config.cache_dir.clone())
        .build()
        .map_err(|e| TranscribeError::ModelFetch(e.to_string()))?;

    let repo = api.model(config.repo.clone());
    let path = repo
        .get(config.model.filename())
        .map_err(|e| TranscribeError::ModelFetch(e.to_string()))?;

    Ok(path)
}

impl Inner {
    /// Run language detection + decoding on one conditioned clip.
    fn run(&self, samples: &[f32]) -> Result<Transcription, TranscribeError> {
        let start_time = std::time::Instant::now();

        // Greedy sampling: the demo favors latency over beam-search quality.
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.n_threads);
        params.set_token_timestamps(false);
        params.set_language(Some("auto"));
        params.set_translate(false);
        params.set_no_context(true);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_print_special(false);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| TranscribeError::Inference(format!("Failed to create state: {}", e)))?;

        state
            .full(params, samples)
            .map_err(|e| TranscribeError::Inference(format!("Inference failed: {}", e)))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| TranscribeError::Inference(format!("Failed to get segments: {}", e)))?;

        let mut text_parts = Vec::new();
        for i in 0..num_segments {
            let segment_text = state
                .full_get_segment_text(i)
                .map_err(|e| TranscribeError::Inference(format!("Failed to get text: {}", e)))?;
            let trimmed = segment_text.trim();
            if !trimmed.is_empty() {
                text_parts.push(trimmed.to_string());
            }
        }
        let text = text_parts.join(" ");

        // The decode state carries the winning language id from auto-detection.
        let language = state
            .full_lang_id_from_state()
            .ok()
            .and_then(|id| whisper_rs::get_lang_str(id).map(|s| s.to_string()));

        let elapsed = start_time.elapsed();
        debug!(
            language = language.as_deref().unwrap_or("?"),
            elapsed_secs = elapsed.as_secs_f32(),
            "transcription complete"
        );

        Ok(Transcription { language, text })
    }
}

#[async_trait]
impl TranscriptionAdapter for WhisperTranscriber {
    async fn transcribe(&self, samples: &[f32]) -> Result<Transcription, TranscribeError> {
        let inner = Arc::clone(&self.inner);
        let samples = samples.to_vec();

        tokio::task::spawn_blocking(move || inner.run(&samples))
            .await
            .map_err(|e| TranscribeError::Inference(format!("join: {e}")))?
    }
}
