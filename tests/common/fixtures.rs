//! Test fixture creation for the catalog database

use super::constants::*;
use anyhow::Result;
use emotune_server::catalog_store::{CatalogStore, NewSong, SqliteCatalogStore};
use emotune_server::config::DB_FILE_NAME;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary database directory holding the default catalog.
/// Returns (temp_dir, db_path)
pub fn create_test_catalog(with_songs: bool) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join(DB_FILE_NAME);

    let store = SqliteCatalogStore::new(&db_path)?;
    if with_songs {
        for (name, artist, album, release_date, mood) in CATALOG_SONGS {
            store.upsert_song(&NewSong {
                name: name.to_string(),
                artist: artist.to_string(),
                album: album.to_string(),
                release_date: release_date.to_string(),
                mood: mood.to_string(),
            })?;
        }
    }

    Ok((dir, db_path))
}
