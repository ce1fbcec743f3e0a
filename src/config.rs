use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::sentiment::SentimentConfig;
use crate::transcribe::{WhisperConfig, WhisperModel};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub models: ModelsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct ModelsConfig {
    /// Local cache directory shared by both model downloads.
    pub cache_dir: String,
    pub whisper: WhisperSection,
    pub sentiment: SentimentSection,
}

#[derive(Debug, Deserialize)]
pub struct WhisperSection {
    pub repo: String,
    pub size: String,
    pub threads: i32,
}

#[derive(Debug, Deserialize)]
pub struct SentimentSection {
    pub repo: String,
    pub model_file: String,
    pub tokenizer_file: String,
    pub threads: usize,
}

impl Config {
    /// Load configuration from `<path>.{toml,yaml,json}`, falling back to
    /// built-in defaults for anything the file does not set. A missing file
    /// is fine; the demo runs unconfigured.
    pub fn load(path: &str) -> Result<Self> {
        let defaults = WhisperConfig::default();
        let sentiment_defaults = SentimentConfig::default();

        let settings = config::Config::builder()
            .set_default("service.name", "polyglot-sentiments")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 7860i64)?
            .set_default("models.cache_dir", "models")?
            .set_default("models.whisper.repo", defaults.repo)?
            .set_default("models.whisper.size", defaults.model.to_string())?
            .set_default("models.whisper.threads", i64::from(defaults.threads))?
            .set_default("models.sentiment.repo", sentiment_defaults.repo)?
            .set_default("models.sentiment.model_file", sentiment_defaults.model_file)?
            .set_default(
                "models.sentiment.tokenizer_file",
                sentiment_defaults.tokenizer_file,
            )?
            .set_default(
                "models.sentiment.threads",
                sentiment_defaults.threads as i64,
            )?
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Adapter configuration for the speech model.
    pub fn whisper(&self) -> Result<WhisperConfig> {
        let model = WhisperModel::from_str(&self.models.whisper.size)
            .map_err(|e| anyhow::anyhow!(e))
            .context("invalid models.whisper.size")?;

        Ok(WhisperConfig {
            repo: self.models.whisper.repo.clone(),
            model,
            cache_dir: PathBuf::from(&self.models.cache_dir),
            threads: self.models.whisper.threads,
        })
    }

    /// Adapter configuration for the sentiment classifier.
    pub fn sentiment(&self) -> SentimentConfig {
        SentimentConfig {
            repo: self.models.sentiment.repo.clone(),
            model_file: self.models.sentiment.model_file.clone(),
            tokenizer_file: self.models.sentiment.tokenizer_file.clone(),
            cache_dir: PathBuf::from(&self.models.cache_dir),
            threads: self.models.sentiment.threads,
        }
    }
}
