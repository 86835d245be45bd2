//! Negative-streak detection over the emotion log.

use crate::catalog_store::{CatalogStore, EmotionLogEntry};
use crate::emotion::is_negative_label;
use anyhow::Result;
use std::sync::Arc;

/// Number of consecutive negative entries that triggers a nudge.
pub const STREAK_LENGTH: usize = 5;

/// True iff `newest_first` holds exactly [`STREAK_LENGTH`] entries and all of
/// them are negative.
pub fn is_negative_streak(newest_first: &[EmotionLogEntry]) -> bool {
    newest_first.len() == STREAK_LENGTH
        && newest_first.iter().all(|e| is_negative_label(&e.emotion))
}

#[derive(Clone)]
pub struct NegativeStreakDetector {
    store: Arc<dyn CatalogStore>,
}

impl NegativeStreakDetector {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub fn should_nudge(&self) -> Result<bool> {
        let recent = self.store.recent_emotions(STREAK_LENGTH)?;
        Ok(is_negative_streak(&recent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::catalog_with;

    fn detector_after(log: &[&str]) -> NegativeStreakDetector {
        let store = catalog_with(&[]);
        for emotion in log {
            store.append_emotion(emotion).unwrap();
        }
        NegativeStreakDetector::new(store)
    }

    #[test]
    fn five_negatives_nudge() {
        let detector = detector_after(&["sad", "angry", "sad", "fear", "angry"]);
        assert!(detector.should_nudge().unwrap());
    }

    #[test]
    fn fewer_than_five_entries_never_nudge() {
        let detector = detector_after(&["sad", "angry", "fear", "sad"]);
        assert!(!detector.should_nudge().unwrap());
        assert!(!detector_after(&[]).should_nudge().unwrap());
    }

    #[test]
    fn one_positive_in_the_window_breaks_the_streak() {
        let detector = detector_after(&["sad", "angry", "happy", "fear", "sad"]);
        assert!(!detector.should_nudge().unwrap());
    }

    #[test]
    fn only_the_newest_five_count() {
        let detector = detector_after(&["happy", "neutral", "sad", "sad", "fear", "angry", "sad"]);
        assert!(detector.should_nudge().unwrap());

        let detector = detector_after(&["angry", "sad", "angry", "fear", "sad", "happy"]);
        assert!(!detector.should_nudge().unwrap());
    }

    #[test]
    fn surprise_and_disgust_are_not_negative() {
        let detector = detector_after(&["sad", "disgust", "sad", "surprise", "sad"]);
        assert!(!detector.should_nudge().unwrap());
    }
}
