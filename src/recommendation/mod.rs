//! Song recommendation for a detected emotion or a requested mood.

use crate::catalog_store::{CatalogStore, Song};
use crate::emotion::normalize_label;
use crate::server::metrics;
use crate::video::VideoLinkResolver;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("No songs found for this mood.")]
    NoSongsForMood,

    #[error("Could not fetch YouTube link for the song.")]
    NoLink,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl RecommendationError {
    fn metric_label(&self) -> &'static str {
        match self {
            RecommendationError::NoSongsForMood => "no_songs",
            RecommendationError::NoLink => "no_link",
            RecommendationError::Storage(_) => "storage_error",
        }
    }
}

/// A recommended song with its resolved video link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub release_date: String,
    pub youtube_link: String,
}

impl Recommendation {
    fn new(song: Song, youtube_link: String) -> Self {
        Self {
            name: song.name,
            artist: song.artist,
            album: song.album,
            release_date: song.release_date,
            youtube_link,
        }
    }
}

/// What clients see in place of a recommendation: the song, or `{"error": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationOutcome {
    Song(Recommendation),
    Error { error: String },
}

impl From<Result<Recommendation, RecommendationError>> for RecommendationOutcome {
    fn from(result: Result<Recommendation, RecommendationError>) -> Self {
        match result {
            Ok(recommendation) => RecommendationOutcome::Song(recommendation),
            Err(e) => RecommendationOutcome::Error {
                error: e.to_string(),
            },
        }
    }
}

#[derive(Clone)]
pub struct RecommendationEngine {
    store: Arc<dyn CatalogStore>,
    resolver: Arc<dyn VideoLinkResolver>,
}

impl RecommendationEngine {
    pub fn new(store: Arc<dyn CatalogStore>, resolver: Arc<dyn VideoLinkResolver>) -> Self {
        Self { store, resolver }
    }

    /// Recommends a song for a detected emotion, honouring the survey
    /// preference recorded for that emotion.
    pub async fn recommend(&self, emotion: &str) -> Result<Recommendation, RecommendationError> {
        let emotion = normalize_label(emotion);
        let mood = match self.store.find_survey(&emotion)? {
            Some(preferred) => {
                debug!("Survey maps emotion '{}' to mood '{}'", emotion, preferred);
                preferred
            }
            None => emotion,
        };
        self.recommend_for_mood(&mood).await
    }

    /// Recommends a song with exactly this mood. Records the recommendation
    /// only when a song with a link is returned.
    pub async fn recommend_for_mood(
        &self,
        mood: &str,
    ) -> Result<Recommendation, RecommendationError> {
        let result = self.pick_and_resolve(&normalize_label(mood)).await;
        match &result {
            Ok(_) => metrics::record_recommendation("song"),
            Err(e) => metrics::record_recommendation(e.metric_label()),
        }
        result
    }

    async fn pick_and_resolve(&self, mood: &str) -> Result<Recommendation, RecommendationError> {
        let songs = self.store.find_songs_by_mood(mood)?;
        let song = songs
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(RecommendationError::NoSongsForMood)?;

        let link = match self.resolver.resolve(&song.name, &song.artist).await {
            Ok(Some(link)) => link,
            Ok(None) => {
                debug!("No video found for '{}' by {}", song.name, song.artist);
                return Err(RecommendationError::NoLink);
            }
            Err(e) => {
                warn!("Video lookup for '{}' failed: {}", song.name, e);
                return Err(RecommendationError::NoLink);
            }
        };

        self.store.append_recommendation(song.id)?;
        Ok(Recommendation::new(song, link))
    }
}
