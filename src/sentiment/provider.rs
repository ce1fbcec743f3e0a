//! ONNX-backed emotion classifier.
//!
//! Fetches the go_emotions RoBERTa export and its tokenizer via `hf-hub`,
//! tokenizes with `tokenizers`, and runs inference through `ort`. The session
//! is created once at startup and reused for every request.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{scores_from_logits, LabelScore, SentimentAdapter, SentimentError, EMOTION_LABELS};

/// Configuration for the sentiment classifier.
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    /// Hugging Face repo holding the ONNX export.
    pub repo: String,
    /// Model file within the repo.
    pub model_file: String,
    /// Tokenizer file within the repo.
    pub tokenizer_file: String,
    /// Local cache directory for fetched files.
    pub cache_dir: PathBuf,
    /// Intra-op thread count for ONNX inference.
    pub threads: usize,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            repo: "SamLowe/roberta-base-go_emotions-onnx".to_string(),
            model_file: "onnx/model.onnx".to_string(),
            tokenizer_file: "tokenizer.json".to_string(),
            cache_dir: PathBuf::from("models"),
            threads: 2,
        }
    }
}

/// Combined session + tokenizer state behind a single mutex.
struct InferenceState {
    session: ort::session::Session,
    tokenizer: tokenizers::Tokenizer,
}

/// Pretrained go_emotions classifier, loaded once and shared across requests.
pub struct SentimentClassifier {
    state: parking_lot::Mutex<Option<InferenceState>>,
}

impl SentimentClassifier {
    /// Fetch model files and build the ONNX session.
    ///
    /// Does blocking I/O (model download on first run, file reads). Called
    /// once at startup; a failure here is fatal, the process must not serve
    /// requests without a classifier.
    pub fn load(config: &SentimentConfig) -> Result<Self, SentimentError> {
        let (model_path, tokenizer_path) = fetch_files(config)?;

        let (tokenizer, session) = build_state(config, &model_path, &tokenizer_path)
            .map_err(|e| SentimentError::Init(e.to_string()))?;

        info!(repo = %config.repo, "sentiment classifier ready");

        Ok(Self {
            state: parking_lot::Mutex::new(Some(InferenceState { session, tokenizer })),
        })
    }
}

/// Fetch model and tokenizer files via `hf-hub`, reusing the local cache.
fn fetch_files(config: &SentimentConfig) -> Result<(PathBuf, PathBuf), SentimentError> {
    debug!(cache_dir = %config.cache_dir.display(), repo = %config.repo, "fetching classifier via hf-hub");

    let api = hf_hub::api::sync::ApiBuilder::new()
        .with_cache_dir(config.cache_dir.clone())
        .build()
        .map_err(|e| SentimentError::ModelFetch(e.to_string()))?;

    let repo = api.model(config.repo.clone());
    let model_path = repo
        .get(&config.model_file)
        .map_err(|e| SentimentError::ModelFetch(e.to_string()))?;
    let tokenizer_path = repo
        .get(&config.tokenizer_file)
        .map_err(|e| SentimentError::ModelFetch(e.to_string()))?;

    Ok((model_path, tokenizer_path))
}

/// Create tokenizer and ONNX session from fetched files.
///
/// Uses `Box<dyn Error>` internally so all calls can use `?` directly; the
/// caller maps the error to `SentimentError` at the boundary.
fn build_state(
    config: &SentimentConfig,
    model_path: &std::path::Path,
    tokenizer_path: &std::path::Path,
) -> std::result::Result<
    (tokenizers::Tokenizer, ort::session::Session),
    Box<dyn std::error::Error>,
> {
    let tokenizer = tokenizers::Tokenizer::from_file(tokenizer_path)
        .map_err(|e| format!("tokenizer load: {e}"))?;

    let session = ort::session::Session::builder()?
        .with_intra_threads(config.threads)?
        .with_log_level(ort::logging::LogLevel::Warning)?
        .commit_from_file(model_path)?;

    info!(model = %model_path.display(), "ONNX classifier loaded");
    Ok((tokenizer, session))
}

/// Run one text through the classifier.
fn run_inference(
    session: &mut ort::session::Session,
    tokenizer: &tokenizers::Tokenizer,
    text: &str,
) -> Result<Vec<LabelScore>, SentimentError> {
    run_inference_inner(session, tokenizer, text)
        .map_err(|e| SentimentError::Inference(e.to_string()))
}

fn run_inference_inner(
    session: &mut ort::session::Session,
    tokenizer: &tokenizers::Tokenizer,
    text: &str,
) -> std::result::Result<Vec<LabelScore>, Box<dyn std::error::Error + Send + Sync>> {
    // Empty or whitespace-only text goes through uninspected; the tokenizer
    // still emits the special tokens and the model scores those.
    let encoding = tokenizer.encode(text, true)?;

    let ids = encoding.get_ids();
    let mask = encoding.get_attention_mask();
    let seq_len = ids.len();
    if seq_len == 0 {
        return Err("empty tokenization".into());
    }

    let input_ids: Vec<i64> = ids.iter().map(|&id| i64::from(id)).collect();
    let attention_mask: Vec<i64> = mask.iter().map(|&m| i64::from(m)).collect();

    #[allow(clippy::cast_possible_wrap)]
    let shape = vec![1i64, seq_len as i64];

    let input_ids_tensor = ort::value::Tensor::from_array((shape.clone(), input_ids))?;
    let attention_mask_tensor = ort::value::Tensor::from_array((shape, attention_mask))?;

    let outputs = session.run(ort::inputs![input_ids_tensor, attention_mask_tensor])?;

    let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let dims: Vec<usize> = output_shape.iter().map(|&d| d as usize).collect();
    if dims.len() != 2 || dims[0] != 1 || dims[1] != EMOTION_LABELS.len() {
        return Err(format!("unexpected output shape: {output_shape:?}").into());
    }

    Ok(scores_from_logits(output_data))
}

#[async_trait]
impl SentimentAdapter for SentimentClassifier {
    async fn analyze(&self, text: &str) -> Result<Vec<LabelScore>, SentimentError> {
        // Take state out of the mutex (brief lock), run inference on a
        // blocking thread, then restore state. Avoids holding a sync mutex
        // across async work.
        let mut state = self
            .state
            .lock()
            .take()
            .ok_or_else(|| SentimentError::Inference("classifier state missing".to_string()))?;
        let text = text.to_string();

        let (result, returned_state) = tokio::task::spawn_blocking(move || {
            let r = run_inference(&mut state.session, &state.tokenizer, &text);
            (r, state)
        })
        .await
        .map_err(|e| SentimentError::Inference(format!("join: {e}")))?;

        // Restore state even on inference error (state is still valid)
        *self.state.lock() = Some(returned_state);
        result
    }
}
