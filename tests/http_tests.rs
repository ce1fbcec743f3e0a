// Integration tests for the HTTP surface
//
// The real models are far too heavy for tests, so these wire the router with
// fixed-output adapters and exercise the full handler path: multipart
// parsing, decoding, error mapping, and response formatting.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use polyglot_sentiments::{
    create_router, AppState, LabelScore, SentimentAdapter, SentimentError, TranscribeError,
    Transcription, TranscriptionAdapter,
};
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary-7a2f";

struct FixedTranscriber;

#[async_trait]
impl TranscriptionAdapter for FixedTranscriber {
    async fn transcribe(&self, _samples: &[f32]) -> Result<Transcription, TranscribeError> {
        Ok(Transcription {
            language: Some("en".to_string()),
            text: "I love this so much".to_string(),
        })
    }
}

struct FixedSentiment;

#[async_trait]
impl SentimentAdapter for FixedSentiment {
    async fn analyze(&self, _text: &str) -> Result<Vec<LabelScore>, SentimentError> {
        Ok(vec![
            LabelScore {
                label: "joy".to_string(),
                score: 0.87,
            },
            LabelScore {
                label: "neutral".to_string(),
                score: 0.12,
            },
        ])
    }
}

struct FailingSentiment;

#[async_trait]
impl SentimentAdapter for FailingSentiment {
    async fn analyze(&self, _text: &str) -> Result<Vec<LabelScore>, SentimentError> {
        Err(SentimentError::Inference("classifier exploded".to_string()))
    }
}

fn test_router() -> axum::Router {
    create_router(AppState::new(
        Arc::new(FixedTranscriber),
        Arc::new(FixedSentiment),
    ))
}

/// Build a multipart/form-data body from (name, optional filename, data) parts.
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(f) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn analyze_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// One second of 16kHz mono tone, WAV-encoded.
fn wav_fixture() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..16_000 {
            let t = i as f32 / 16_000.0;
            let sample = (t * 220.0 * 2.0 * std::f32::consts::PI).sin();
            writer
                .write_sample((sample * 0.5 * f32::from(i16::MAX)) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let response = test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn analyze_returns_language_transcript_and_sentiment() {
    let wav = wav_fixture();
    let request = analyze_request(&[
        ("audio", Some("clip.wav"), &wav),
        ("option", None, b"Sentiment + Score"),
    ]);

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["language"], "EN");
    assert_eq!(body["transcript"], "I love this so much");
    let sentiment = body["sentiment"].as_str().unwrap();
    assert!(sentiment.contains("joy 😄: 0.87"), "got: {sentiment}");
    assert!(sentiment.contains("neutral 😐: 0.12"), "got: {sentiment}");
}

#[tokio::test]
async fn analyze_defaults_to_label_only_display() {
    let wav = wav_fixture();
    let request = analyze_request(&[("audio", Some("clip.wav"), &wav)]);

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["sentiment"], "joy 😄\nneutral 😐\n");
}

#[tokio::test]
async fn analyze_without_audio_is_a_bad_request() {
    let request = analyze_request(&[("option", None, b"Sentiment Only")]);

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("audio"));
}

#[tokio::test]
async fn analyze_with_unreadable_audio_is_a_bad_request() {
    let request = analyze_request(&[
        ("audio", Some("clip.wav"), b"definitely not audio data"),
        ("option", None, b"Sentiment Only"),
    ]);

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Could not read the uploaded audio"));
}

#[tokio::test]
async fn analyze_with_unknown_option_is_a_bad_request() {
    let wav = wav_fixture();
    let request = analyze_request(&[
        ("audio", Some("clip.wav"), &wav),
        ("option", None, b"Scores Please"),
    ]);

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn classifier_failure_surfaces_as_server_error() {
    let router = create_router(AppState::new(
        Arc::new(FixedTranscriber),
        Arc::new(FailingSentiment),
    ));

    let wav = wav_fixture();
    let request = analyze_request(&[("audio", Some("clip.wav"), &wav)]);

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Sentiment analysis failed"));
}
