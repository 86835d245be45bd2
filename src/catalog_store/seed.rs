//! Bootstraps an empty catalog from a JSON list of songs.

use super::models::NewSong;
use super::trait_def::CatalogStore;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Loads `seed_path` into the catalog if, and only if, it has no songs yet.
/// Returns the number of songs inserted.
pub fn load_seed_if_empty(store: &dyn CatalogStore, seed_path: &Path) -> Result<usize> {
    let existing = store.count_songs()?;
    if existing > 0 {
        info!(
            "Catalog already holds {} songs, skipping seed {:?}",
            existing, seed_path
        );
        return Ok(0);
    }

    let contents = std::fs::read_to_string(seed_path)
        .with_context(|| format!("Failed to read seed catalog {:?}", seed_path))?;
    let songs: Vec<NewSong> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse seed catalog {:?}", seed_path))?;

    for song in &songs {
        store.upsert_song(song)?;
    }
    info!("Seeded catalog with {} songs from {:?}", songs.len(), seed_path);
    Ok(songs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::SqliteCatalogStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SEED: &str = r#"[
        {"name": "Happy", "artist": "Pharrell Williams", "album": "G I R L", "release_date": "2013", "mood": "Happy"},
        {"name": "Someone Like You", "artist": "Adele", "album": "21", "release_date": "2011", "mood": "sad"}
    ]"#;

    fn seed_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn seeds_empty_catalog() {
        let store = SqliteCatalogStore::in_memory().unwrap();
        let file = seed_file(SEED);

        assert_eq!(load_seed_if_empty(&store, file.path()).unwrap(), 2);
        assert_eq!(store.find_songs_by_mood("happy").unwrap().len(), 1);
    }

    #[test]
    fn leaves_populated_catalog_alone() {
        let store = SqliteCatalogStore::in_memory().unwrap();
        let file = seed_file(SEED);
        load_seed_if_empty(&store, file.path()).unwrap();

        assert_eq!(load_seed_if_empty(&store, file.path()).unwrap(), 0);
        assert_eq!(store.count_songs().unwrap(), 2);
    }

    #[test]
    fn malformed_seed_is_an_error() {
        let store = SqliteCatalogStore::in_memory().unwrap();
        let file = seed_file("{not json");

        assert!(load_seed_if_empty(&store, file.path()).is_err());
        assert_eq!(store.count_songs().unwrap(), 0);
    }
}
