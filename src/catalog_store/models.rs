//! Rows stored in the catalog database.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

/// A song as stored in the catalog. `mood` is always normalized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub release_date: String,
    pub mood: String,
}

/// A song about to be inserted; also the shape of the JSON seed file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSong {
    pub name: String,
    pub artist: String,
    pub album: String,
    #[serde(default)]
    pub release_date: String,
    pub mood: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmotionLogEntry {
    pub id: i64,
    pub emotion: String,
    /// Unix millis.
    pub logged_at: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecommendationRecord {
    pub id: i64,
    pub song: Song,
    /// Unix millis.
    pub recommended_at: i64,
}

/// Formats a unix-millis timestamp as local `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => millis.to_string(),
    }
}

pub fn now_millis() -> i64 {
    Local::now().timestamp_millis()
}
