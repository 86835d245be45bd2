//! SQLite schema for songs, survey answers and the two append-only logs.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, OnDelete, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP_MS,
};

const SONG_TABLE: Table = Table {
    name: "song",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("album", &SqlType::Text, non_null = true),
        sqlite_column!("release_date", &SqlType::Text, non_null = true),
        sqlite_column!("mood", &SqlType::Text, non_null = true), // normalized
    ],
    indices: &[("idx_song_mood", "mood")],
};

const SURVEY_RESPONSE_TABLE: Table = Table {
    name: "survey_response",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("mood", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("preferred_mood_songs", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

const EMOTION_LOG_TABLE: Table = Table {
    name: "emotion_log",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("emotion", &SqlType::Text, non_null = true),
        sqlite_column!(
            "logged_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP_MS)
        ),
    ],
    indices: &[("idx_emotion_log_logged_at", "logged_at")],
};

const SONG_ID_FOREIGN_KEY: ForeignKey = ForeignKey {
    foreign_table: "song",
    foreign_column: "id",
    on_delete: OnDelete::Cascade,
};

const RECOMMENDATION_HISTORY_TABLE: Table = Table {
    name: "recommendation_history",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONG_ID_FOREIGN_KEY)
        ),
        sqlite_column!(
            "recommended_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP_MS)
        ),
    ],
    indices: &[(
        "idx_recommendation_history_recommended_at",
        "recommended_at",
    )],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        SONG_TABLE,
        SURVEY_RESPONSE_TABLE,
        EMOTION_LOG_TABLE,
        RECOMMENDATION_HISTORY_TABLE,
    ],
    migration: None,
}];
