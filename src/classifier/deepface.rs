use super::{ClassifierError, EmotionClassifier};
use crate::emotion::Emotion;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Client for a DeepFace-style `POST /analyze` endpoint.
pub struct DeepFaceClassifier {
    client: Client,
    base_url: String,
}

impl DeepFaceClassifier {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    img: String,
    actions: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct FaceAnalysis {
    dominant_emotion: String,
}

/// DeepFace versions disagree on the envelope: a `results` list, a bare list,
/// or a single object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnalyzeResponse {
    Wrapped { results: Vec<FaceAnalysis> },
    List(Vec<FaceAnalysis>),
    Single(FaceAnalysis),
}

impl AnalyzeResponse {
    fn first_face(self) -> Option<FaceAnalysis> {
        match self {
            AnalyzeResponse::Wrapped { results } | AnalyzeResponse::List(results) => {
                results.into_iter().next()
            }
            AnalyzeResponse::Single(face) => Some(face),
        }
    }
}

/// Builds the data URL sent to the service, rejecting anything that is not an
/// image.
fn image_data_url(image: &[u8]) -> Result<String, ClassifierError> {
    let kind = infer::get(image)
        .ok_or_else(|| ClassifierError::Decode("unrecognized image format".to_string()))?;
    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(ClassifierError::Decode(format!(
            "expected an image, got {}",
            kind.mime_type()
        )));
    }
    Ok(format!("data:{};base64,{}", kind.mime_type(), BASE64.encode(image)))
}

fn parse_label(label: &str) -> Result<Emotion, ClassifierError> {
    label
        .parse::<Emotion>()
        .map_err(|_| ClassifierError::UnknownLabel(label.to_string()))
}

#[async_trait]
impl EmotionClassifier for DeepFaceClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Emotion, ClassifierError> {
        let request = AnalyzeRequest {
            img: image_data_url(image)?,
            actions: ["emotion"],
        };
        let url = format!("{}/analyze", self.base_url);
        debug!(url = %url, bytes = image.len(), "Sending frame to classifier");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Inference(format!(
                "classifier returned {}: {}",
                status, body
            )));
        }

        let analysis: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Inference(format!("bad classifier response: {}", e)))?;
        let face = analysis
            .first_face()
            .ok_or_else(|| ClassifierError::Inference("no face detected".to_string()))?;

        parse_label(&face.dominant_emotion)
    }
}
