use std::sync::Arc;

use anyhow::{Context, Result};
use polyglot_sentiments::{AppState, Config, SentimentClassifier, WhisperTranscriber};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::load("config/polyglot-sentiments")?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!(
        "HTTP server will bind to {}:{}",
        cfg.service.http.bind, cfg.service.http.port
    );

    // Both pretrained models load once, before the server accepts anything.
    // A model that cannot load means the process must not start.
    let whisper_cfg = cfg.whisper()?;
    let sentiment_cfg = cfg.sentiment();

    let transcriber = tokio::task::spawn_blocking(move || WhisperTranscriber::load(&whisper_cfg))
        .await
        .context("model load task failed")?
        .context("failed to load speech model")?;

    let classifier = tokio::task::spawn_blocking(move || SentimentClassifier::load(&sentiment_cfg))
        .await
        .context("model load task failed")?
        .context("failed to load sentiment classifier")?;

    let state = AppState::new(Arc::new(transcriber), Arc::new(classifier));
    let app = polyglot_sentiments::create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
