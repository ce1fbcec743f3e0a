//! Sentiment adapter: text in, emotion label → confidence score map out.
//!
//! The scores come from a pretrained multi-label emotion classifier
//! (go_emotions), so they do not sum to 1; each label gets an independent
//! confidence in [0, 1].

mod provider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use provider::{SentimentClassifier, SentimentConfig};

/// The fixed label vocabulary of the classifier, in model output order.
pub const EMOTION_LABELS: [&str; 28] = [
    "admiration",
    "amusement",
    "anger",
    "annoyance",
    "approval",
    "caring",
    "confusion",
    "curiosity",
    "desire",
    "disappointment",
    "disapproval",
    "disgust",
    "embarrassment",
    "excitement",
    "fear",
    "gratitude",
    "grief",
    "joy",
    "love",
    "nervousness",
    "optimism",
    "pride",
    "realization",
    "relief",
    "remorse",
    "sadness",
    "surprise",
    "neutral",
];

/// One emotion label with its confidence score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("Failed to fetch classifier files: {0}")]
    ModelFetch(String),

    #[error("Failed to load classifier: {0}")]
    Init(String),

    #[error("Classification failed: {0}")]
    Inference(String),
}

/// Text → emotion scores seam. `SentimentClassifier` is the ONNX-backed
/// implementation; tests substitute their own.
#[async_trait]
pub trait SentimentAdapter: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Vec<LabelScore>, SentimentError>;
}

/// Map raw classifier logits onto the label vocabulary.
///
/// Applies a sigmoid per label (multi-label head) and sorts by descending
/// score so the strongest emotion always renders first. Ties fall back to
/// label order to keep the output deterministic.
pub fn scores_from_logits(logits: &[f32]) -> Vec<LabelScore> {
    let mut scores: Vec<LabelScore> = EMOTION_LABELS
        .iter()
        .zip(logits.iter())
        .map(|(label, &logit)| LabelScore {
            label: (*label).to_string(),
            score: sigmoid(logit),
        })
        .collect();

    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });

    scores
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_vocabulary_is_complete() {
        assert_eq!(EMOTION_LABELS.len(), 28);
        assert_eq!(EMOTION_LABELS[27], "neutral");
    }

    #[test]
    fn sigmoid_maps_into_unit_interval() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn scores_are_sorted_descending() {
        let mut logits = vec![0.0f32; 28];
        logits[17] = 4.0; // joy
        logits[27] = 1.0; // neutral

        let scores = scores_from_logits(&logits);
        assert_eq!(scores.len(), 28);
        assert_eq!(scores[0].label, "joy");
        assert_eq!(scores[1].label, "neutral");
        for pair in scores.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn scores_stay_in_range() {
        let logits: Vec<f32> = (0..28).map(|i| i as f32 - 14.0).collect();
        for ls in scores_from_logits(&logits) {
            assert!((0.0..=1.0).contains(&ls.score), "{} out of range", ls.score);
        }
    }

    #[test]
    fn short_logit_vector_yields_partial_map() {
        // A truncated output still pairs up with the leading labels.
        let scores = scores_from_logits(&[0.0, 0.0]);
        assert_eq!(scores.len(), 2);
    }
}
