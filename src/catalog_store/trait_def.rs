//! CatalogStore trait definition.

use super::models::*;
use anyhow::Result;

/// Durable storage for songs, survey preferences and the emotion and
/// recommendation logs.
///
/// Mood and emotion arguments are normalized by the implementation, callers can
/// pass them in any case.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Songs
    // =========================================================================

    /// Inserts a song, or refreshes the release date of an identical
    /// (name, artist, album, mood) entry. Returns the song id.
    fn upsert_song(&self, song: &NewSong) -> Result<i64>;

    fn count_songs(&self) -> Result<usize>;

    /// All songs with the given mood, in insertion order.
    fn find_songs_by_mood(&self, mood: &str) -> Result<Vec<Song>>;

    /// Up to `limit` songs with the given mood, in random order.
    fn random_songs_by_mood(&self, mood: &str, limit: usize) -> Result<Vec<Song>>;

    /// Distinct moods present in the catalog, sorted.
    fn distinct_moods(&self) -> Result<Vec<String>>;

    // =========================================================================
    // Survey
    // =========================================================================

    /// Stores the preferred mood for `mood`, replacing any previous answer.
    fn upsert_survey(&self, mood: &str, preferred_mood_songs: &str) -> Result<()>;

    /// The preferred mood recorded for `mood`, if any.
    fn find_survey(&self, mood: &str) -> Result<Option<String>>;

    // =========================================================================
    // Emotion log
    // =========================================================================

    fn append_emotion(&self, emotion: &str) -> Result<EmotionLogEntry>;

    /// The `k` most recent entries, newest first.
    fn recent_emotions(&self, k: usize) -> Result<Vec<EmotionLogEntry>>;

    /// Every entry, oldest first.
    fn list_emotions(&self) -> Result<Vec<EmotionLogEntry>>;

    // =========================================================================
    // Recommendation history
    // =========================================================================

    fn append_recommendation(&self, song_id: i64) -> Result<i64>;

    /// Every recommendation joined with its song, newest first.
    fn list_recommendations(&self) -> Result<Vec<RecommendationRecord>>;
}
