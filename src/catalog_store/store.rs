//! SQLite-backed catalog store.

use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use crate::emotion::normalize_label;
use crate::sqlite_persistence::{open_in_memory, open_versioned};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

#[derive(Clone)]
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

const SONG_COLUMNS: &str = "id, name, artist, album, release_date, mood";

fn song_from_row(row: &Row, offset: usize) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        artist: row.get(offset + 2)?,
        album: row.get(offset + 3)?,
        release_date: row.get(offset + 4)?,
        mood: row.get(offset + 5)?,
    })
}

fn emotion_from_row(row: &Row) -> rusqlite::Result<EmotionLogEntry> {
    Ok(EmotionLogEntry {
        id: row.get(0)?,
        emotion: row.get(1)?,
        logged_at: row.get(2)?,
    })
}

impl SqliteCatalogStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = open_versioned(db_path, CATALOG_VERSIONED_SCHEMAS)
            .with_context(|| format!("Failed to open catalog database {:?}", db_path))?;
        info!("Opened catalog database at {:?}", db_path);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = open_in_memory(CATALOG_VERSIONED_SCHEMAS)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn upsert_song(&self, song: &NewSong) -> Result<i64> {
        let mood = normalize_label(&song.mood);
        let conn = self.conn.lock().unwrap();

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM song WHERE name = ?1 AND artist = ?2 AND album = ?3 AND mood = ?4",
                params![song.name, song.artist, song.album, mood],
                |r| r.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            conn.execute(
                "UPDATE song SET release_date = ?1 WHERE id = ?2",
                params![song.release_date, id],
            )?;
            return Ok(id);
        }

        conn.execute(
            "INSERT INTO song (name, artist, album, release_date, mood) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![song.name, song.artist, song.album, song.release_date, mood],
        )?;
        let id = conn.last_insert_rowid();
        debug!("Inserted song {} '{}' ({})", id, song.name, mood);
        Ok(id)
    }

    fn count_songs(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM song", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn find_songs_by_mood(&self, mood: &str) -> Result<Vec<Song>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM song WHERE mood = ?1 ORDER BY id",
            SONG_COLUMNS
        ))?;
        let songs = stmt
            .query_map(params![normalize_label(mood)], |r| song_from_row(r, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }

    fn random_songs_by_mood(&self, mood: &str, limit: usize) -> Result<Vec<Song>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM song WHERE mood = ?1 ORDER BY RANDOM() LIMIT ?2",
            SONG_COLUMNS
        ))?;
        let songs = stmt
            .query_map(params![normalize_label(mood), limit as i64], |r| {
                song_from_row(r, 0)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }

    fn distinct_moods(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT DISTINCT mood FROM song ORDER BY mood")?;
        let moods = stmt
            .query_map([], |r| r.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(moods)
    }

    fn upsert_survey(&self, mood: &str, preferred_mood_songs: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO survey_response (mood, preferred_mood_songs) VALUES (?1, ?2)
             ON CONFLICT(mood) DO UPDATE SET preferred_mood_songs = excluded.preferred_mood_songs",
            params![normalize_label(mood), normalize_label(preferred_mood_songs)],
        )?;
        Ok(())
    }

    fn find_survey(&self, mood: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let preferred = conn
            .query_row(
                "SELECT preferred_mood_songs FROM survey_response WHERE mood = ?1",
                params![normalize_label(mood)],
                |r| r.get(0),
            )
            .optional()?;
        Ok(preferred)
    }

    fn append_emotion(&self, emotion: &str) -> Result<EmotionLogEntry> {
        let emotion = normalize_label(emotion);
        let logged_at = now_millis();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO emotion_log (emotion, logged_at) VALUES (?1, ?2)",
            params![emotion, logged_at],
        )?;
        Ok(EmotionLogEntry {
            id: conn.last_insert_rowid(),
            emotion,
            logged_at,
        })
    }

    fn recent_emotions(&self, k: usize) -> Result<Vec<EmotionLogEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, emotion, logged_at FROM emotion_log
             ORDER BY logged_at DESC, id DESC LIMIT ?1",
        )?;
        let entries = stmt
            .query_map(params![k as i64], emotion_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn list_emotions(&self) -> Result<Vec<EmotionLogEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, emotion, logged_at FROM emotion_log ORDER BY logged_at ASC, id ASC",
        )?;
        let entries = stmt
            .query_map([], emotion_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn append_recommendation(&self, song_id: i64) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO recommendation_history (song_id, recommended_at) VALUES (?1, ?2)",
            params![song_id, now_millis()],
        )
        .with_context(|| format!("Failed to record recommendation of song {}", song_id))?;
        Ok(conn.last_insert_rowid())
    }

    fn list_recommendations(&self) -> Result<Vec<RecommendationRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT h.id, h.recommended_at,
                    s.id, s.name, s.artist, s.album, s.release_date, s.mood
             FROM recommendation_history h
             JOIN song s ON s.id = h.song_id
             ORDER BY h.recommended_at DESC, h.id DESC",
        )?;
        let records = stmt
            .query_map([], |r| {
                Ok(RecommendationRecord {
                    id: r.get(0)?,
                    recommended_at: r.get(1)?,
                    song: song_from_row(r, 2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_song(name: &str, mood: &str) -> NewSong {
        NewSong {
            name: name.to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            release_date: "2001".to_string(),
            mood: mood.to_string(),
        }
    }

    #[test]
    fn upsert_normalizes_mood_and_deduplicates() {
        let store = SqliteCatalogStore::in_memory().unwrap();

        let first = store.upsert_song(&new_song("One", " Happy ")).unwrap();
        let mut again = new_song("One", "HAPPY");
        again.release_date = "2002".to_string();
        let second = store.upsert_song(&again).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.count_songs().unwrap(), 1);
        let songs = store.find_songs_by_mood("happy").unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].mood, "happy");
        assert_eq!(songs[0].release_date, "2002");
    }

    #[test]
    fn find_by_mood_is_case_insensitive() {
        let store = SqliteCatalogStore::in_memory().unwrap();
        store.upsert_song(&new_song("One", "sad")).unwrap();
        store.upsert_song(&new_song("Two", "sad")).unwrap();
        store.upsert_song(&new_song("Three", "happy")).unwrap();

        let names: Vec<_> = store
            .find_songs_by_mood("SAD")
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["One", "Two"]);
        assert!(store.find_songs_by_mood("calm").unwrap().is_empty());
    }

    #[test]
    fn random_songs_respect_limit_and_mood() {
        let store = SqliteCatalogStore::in_memory().unwrap();
        for i in 0..10 {
            store.upsert_song(&new_song(&format!("S{}", i), "angry")).unwrap();
        }
        store.upsert_song(&new_song("Other", "happy")).unwrap();

        let songs = store.random_songs_by_mood("angry", 5).unwrap();
        assert_eq!(songs.len(), 5);
        assert!(songs.iter().all(|s| s.mood == "angry"));
    }

    #[test]
    fn distinct_moods_are_sorted() {
        let store = SqliteCatalogStore::in_memory().unwrap();
        store.upsert_song(&new_song("A", "sad")).unwrap();
        store.upsert_song(&new_song("B", "happy")).unwrap();
        store.upsert_song(&new_song("C", "sad")).unwrap();

        assert_eq!(store.distinct_moods().unwrap(), vec!["happy", "sad"]);
    }

    #[test]
    fn survey_upsert_replaces_previous_answer() {
        let store = SqliteCatalogStore::in_memory().unwrap();
        assert_eq!(store.find_survey("sad").unwrap(), None);

        store.upsert_survey("Sad", "Happy").unwrap();
        store.upsert_survey("sad", "happy").unwrap();
        assert_eq!(store.find_survey("SAD").unwrap(), Some("happy".to_string()));

        store.upsert_survey("sad", "calm").unwrap();
        assert_eq!(store.find_survey("sad").unwrap(), Some("calm".to_string()));

        let conn = store.conn.lock().unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM survey_response", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn recent_emotions_are_newest_first() {
        let store = SqliteCatalogStore::in_memory().unwrap();
        for emotion in ["happy", "sad", "angry", "fear"] {
            store.append_emotion(emotion).unwrap();
        }

        let recent: Vec<_> = store
            .recent_emotions(3)
            .unwrap()
            .into_iter()
            .map(|e| e.emotion)
            .collect();
        assert_eq!(recent, vec!["fear", "angry", "sad"]);

        let all: Vec<_> = store
            .list_emotions()
            .unwrap()
            .into_iter()
            .map(|e| e.emotion)
            .collect();
        assert_eq!(all, vec!["happy", "sad", "angry", "fear"]);
    }

    #[test]
    fn recommendations_join_songs_newest_first() {
        let store = SqliteCatalogStore::in_memory().unwrap();
        let first = store.upsert_song(&new_song("First", "happy")).unwrap();
        let second = store.upsert_song(&new_song("Second", "happy")).unwrap();

        store.append_recommendation(first).unwrap();
        store.append_recommendation(second).unwrap();

        let names: Vec<_> = store
            .list_recommendations()
            .unwrap()
            .into_iter()
            .map(|r| r.song.name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[test]
    fn recommendation_of_unknown_song_fails() {
        let store = SqliteCatalogStore::in_memory().unwrap();
        assert!(store.append_recommendation(99).is_err());
        assert!(store.list_recommendations().unwrap().is_empty());
    }

    #[test]
    fn reopening_file_database_keeps_data() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("emotune.db");
        {
            let store = SqliteCatalogStore::new(&path).unwrap();
            store.upsert_song(&new_song("Kept", "neutral")).unwrap();
            store.append_emotion("neutral").unwrap();
        }

        let store = SqliteCatalogStore::new(&path).unwrap();
        assert_eq!(store.count_songs().unwrap(), 1);
        assert_eq!(store.list_emotions().unwrap().len(), 1);
    }
}
