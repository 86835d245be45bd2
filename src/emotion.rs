//! Emotion labels shared by the classifier, the recommender and the music generator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of labels the classifier may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Fear,
    Surprise,
    Disgust,
    Neutral,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown emotion label: {0}")]
pub struct UnknownEmotion(pub String);

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
        }
    }

    /// Emotions that count towards a negative streak.
    pub fn is_negative(&self) -> bool {
        matches!(self, Emotion::Angry | Emotion::Sad | Emotion::Fear)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str() == normalized)
            .ok_or(UnknownEmotion(s.to_string()))
    }
}

/// Lowercases and trims a mood or emotion label.
///
/// Every label written to or compared against the catalog goes through here.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Returns true if the raw label names one of the negative emotions.
pub fn is_negative_label(label: &str) -> bool {
    label
        .parse::<Emotion>()
        .map(|e| e.is_negative())
        .unwrap_or(false)
}
