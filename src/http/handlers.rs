use super::state::AppState;
use crate::audio::{decode_audio, pad_or_trim};
use crate::render::{render_language, render_sentiment, DisplayOption};
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub request_id: String,
    /// Detected language code, uppercased ("EN"). Empty when undetected.
    pub language: String,
    pub transcript: String,
    /// Emoji-annotated sentiment lines, formatted per the display option.
    pub sentiment: String,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/analyze
/// Run the full pipeline on one uploaded clip: decode, transcribe, classify,
/// render. One synchronous request/response cycle; nothing is persisted.
pub async fn analyze(State(state): State<AppState>, mut multipart: Multipart) -> impl IntoResponse {
    let request_id = format!("req-{}", uuid::Uuid::new_v4());

    // Pull the two form parts out of the upload. The option part is optional
    // and defaults to the label-only display, matching the UI's initial state.
    let mut audio: Option<(Option<String>, Bytes)> = None;
    let mut option = DisplayOption::SentimentOnly;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Malformed upload: {}", e),
                    }),
                )
                    .into_response();
            }
        };

        // The field name borrow ends here; reading the body consumes the field.
        let name = field.name().map(|s| s.to_string());

        match name.as_deref() {
            Some("audio") => {
                let file_name = field.file_name().map(|s| s.to_string());
                match field.bytes().await {
                    Ok(bytes) => audio = Some((file_name, bytes)),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Failed to read audio upload: {}", e),
                            }),
                        )
                            .into_response();
                    }
                }
            }
            Some("option") => {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Failed to read display option: {}", e),
                            }),
                        )
                            .into_response();
                    }
                };
                match text.parse::<DisplayOption>() {
                    Ok(parsed) => option = parsed,
                    Err(e) => {
                        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e }))
                            .into_response();
                    }
                }
            }
            _ => {}
        }
    }

    let Some((file_name, data)) = audio else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No audio uploaded. Record or choose a clip first.".to_string(),
            }),
        )
            .into_response();
    };

    info!(
        "[{}] Analyzing clip: {} ({} bytes)",
        request_id,
        file_name.as_deref().unwrap_or("<recorded>"),
        data.len()
    );

    // Decode and condition on a blocking thread; format probing and
    // resampling are CPU-bound.
    let decoded = tokio::task::spawn_blocking(move || {
        decode_audio(&data, file_name.as_deref()).map(|d| pad_or_trim(d.samples))
    })
    .await;

    let samples = match decoded {
        Ok(Ok(samples)) => samples,
        Ok(Err(e)) => {
            info!("[{}] Rejecting upload: {}", request_id, e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Could not read the uploaded audio: {}", e),
                }),
            )
                .into_response();
        }
        Err(e) => {
            error!("[{}] Decode task failed: {}", request_id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Audio decoding failed unexpectedly".to_string(),
                }),
            )
                .into_response();
        }
    };

    let transcription = match state.transcriber.transcribe(&samples).await {
        Ok(t) => t,
        Err(e) => {
            error!("[{}] Transcription failed: {}", request_id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Transcription failed: {}", e),
                }),
            )
                .into_response();
        }
    };

    // The transcript goes to the classifier as-is, empty text included; the
    // classifier scores whatever it is given.
    let scores = match state.sentiment.analyze(&transcription.text).await {
        Ok(scores) => scores,
        Err(e) => {
            error!("[{}] Sentiment classification failed: {}", request_id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Sentiment analysis failed: {}", e),
                }),
            )
                .into_response();
        }
    };

    let response = AnalyzeResponse {
        request_id: request_id.clone(),
        language: render_language(transcription.language.as_deref()),
        transcript: transcription.text,
        sentiment: render_sentiment(&scores, option),
        processed_at: Utc::now(),
    };

    info!(
        "[{}] Analysis complete: language={}, {} transcript chars",
        request_id,
        response.language,
        response.transcript.len()
    );

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
