//! Shared fakes for unit tests.

#![cfg(test)]

use crate::catalog_store::{CatalogStore, NewSong, SqliteCatalogStore};
use crate::classifier::{ClassifierError, EmotionClassifier};
use crate::emotion::Emotion;
use crate::video::{watch_url, ResolverError, VideoLinkResolver};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug)]
pub enum ResolverBehavior {
    Found,
    NotFound,
    Fail,
}

/// Resolver whose answer is fixed at construction.
pub struct FakeResolver {
    behavior: ResolverBehavior,
    pub calls: AtomicUsize,
}

impl FakeResolver {
    pub fn new(behavior: ResolverBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl VideoLinkResolver for FakeResolver {
    async fn resolve(&self, title: &str, _artist: &str) -> Result<Option<String>, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            ResolverBehavior::Found => Ok(Some(watch_url(&title.replace(' ', "_")))),
            ResolverBehavior::NotFound => Ok(None),
            ResolverBehavior::Fail => Err(ResolverError::Status(503)),
        }
    }
}

/// Classifier that returns whatever was last set, or fails when set to `None`.
pub struct FakeClassifier {
    next: Mutex<Option<Emotion>>,
}

impl FakeClassifier {
    pub fn returning(emotion: Emotion) -> Self {
        Self {
            next: Mutex::new(Some(emotion)),
        }
    }

    pub fn failing() -> Self {
        Self {
            next: Mutex::new(None),
        }
    }
}

#[async_trait]
impl EmotionClassifier for FakeClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Emotion, ClassifierError> {
        if image.is_empty() {
            return Err(ClassifierError::Decode("empty image".to_string()));
        }
        let next = *self.next.lock().unwrap();
        next.ok_or_else(|| ClassifierError::Inference("model crashed".to_string()))
    }
}

/// In-memory catalog holding the given (name, mood) songs.
pub fn catalog_with(songs: &[(&str, &str)]) -> Arc<SqliteCatalogStore> {
    let store = SqliteCatalogStore::in_memory().expect("Failed to create in-memory catalog");
    for (name, mood) in songs {
        store
            .upsert_song(&NewSong {
                name: name.to_string(),
                artist: format!("{} Artist", name),
                album: "Album".to_string(),
                release_date: "1999".to_string(),
                mood: mood.to_string(),
            })
            .expect("Failed to insert test song");
    }
    Arc::new(store)
}
