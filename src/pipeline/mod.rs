//! Frame analysis: classify a webcam frame, log the emotion, check for a
//! negative streak and recommend a song.

use crate::catalog_store::CatalogStore;
use crate::classifier::{ClassifierError, EmotionClassifier};
use crate::emotion::Emotion;
use crate::nudge::NegativeStreakDetector;
use crate::recommendation::{RecommendationEngine, RecommendationError, RecommendationOutcome};
use crate::server::metrics;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub const MOTIVATIONAL_MESSAGE: &str = "Everything is going to be okay!";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Emotion classification failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    pub emotion: Emotion,
    pub recommended_song: RecommendationOutcome,
    pub show_motivational_popup: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivational_message: Option<String>,
}

/// Decodes a `data:<mime>;base64,<payload>` URL, or a bare base64 payload.
pub fn decode_data_url(input: &str) -> Result<Vec<u8>, AnalysisError> {
    let input = input.trim();
    let payload = match input.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                AnalysisError::BadRequest("Malformed data URL: missing ','".to_string())
            })?;
            if !header.ends_with(";base64") {
                return Err(AnalysisError::BadRequest(
                    "Data URL must be base64 encoded".to_string(),
                ));
            }
            payload
        }
        None => input,
    };
    if payload.is_empty() {
        return Err(AnalysisError::BadRequest("Image is empty".to_string()));
    }
    BASE64
        .decode(payload)
        .map_err(|e| AnalysisError::BadRequest(format!("Invalid base64 image: {}", e)))
}

#[derive(Clone)]
pub struct FramePipeline {
    classifier: Arc<dyn EmotionClassifier>,
    store: Arc<dyn CatalogStore>,
    detector: NegativeStreakDetector,
    recommender: RecommendationEngine,
}

impl FramePipeline {
    pub fn new(
        classifier: Arc<dyn EmotionClassifier>,
        store: Arc<dyn CatalogStore>,
        recommender: RecommendationEngine,
    ) -> Self {
        Self {
            classifier,
            detector: NegativeStreakDetector::new(store.clone()),
            store,
            recommender,
        }
    }

    /// Runs one frame through the pipeline.
    ///
    /// Nothing is written when decoding or classification fails. Once the
    /// emotion is logged, recommendation failures are reported inside the
    /// result rather than as an error.
    pub async fn analyze(&self, image: &str) -> Result<FrameAnalysis, AnalysisError> {
        let bytes = decode_data_url(image)?;

        let emotion = self.classifier.classify(&bytes).await.map_err(|e| {
            warn!("Classifier failed on {} byte frame: {}", bytes.len(), e);
            e
        })?;
        debug!("Frame classified as {}", emotion);
        metrics::record_frame_analyzed(emotion.as_str());

        self.store.append_emotion(emotion.as_str())?;
        let show_motivational_popup = self.detector.should_nudge()?;

        let recommended_song = match self.recommender.recommend(emotion.as_str()).await {
            Err(RecommendationError::Storage(e)) => return Err(AnalysisError::Storage(e)),
            other => RecommendationOutcome::from(other),
        };

        Ok(FrameAnalysis {
            emotion,
            recommended_song,
            show_motivational_popup,
            motivational_message: show_motivational_popup
                .then(|| MOTIVATIONAL_MESSAGE.to_string()),
        })
    }
}
