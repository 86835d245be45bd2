//! Facial emotion classification.
//!
//! The server never runs a model itself: it talks to an [`EmotionClassifier`],
//! normally a [`DeepFaceClassifier`] pointing at a DeepFace-compatible HTTP
//! service.

mod deepface;

pub use deepface::DeepFaceClassifier;

use crate::emotion::Emotion;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Classifier returned an unknown label: {0}")]
    UnknownLabel(String),

    #[error("No emotion classifier is configured")]
    Unavailable,
}

#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Returns the dominant emotion of the face in `image` (encoded image bytes).
    async fn classify(&self, image: &[u8]) -> Result<Emotion, ClassifierError>;
}

/// Stand-in used when no classifier endpoint is configured; every call fails.
pub struct UnavailableClassifier;

#[async_trait]
impl EmotionClassifier for UnavailableClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Emotion, ClassifierError> {
        Err(ClassifierError::Unavailable)
    }
}
