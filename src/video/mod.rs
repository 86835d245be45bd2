//! Maps a (title, artist) pair to a playable video link.

mod youtube;

pub use youtube::{YouTubeResolver, DEFAULT_SEARCH_URL};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Video search request failed: {0}")]
    Request(String),

    #[error("Video search returned status {0}")]
    Status(u16),

    #[error("Invalid video search response: {0}")]
    InvalidResponse(String),

    #[error("No video search backend is configured")]
    Unavailable,
}

#[async_trait]
pub trait VideoLinkResolver: Send + Sync {
    /// Finds the best matching video. `Ok(None)` means the search worked but
    /// returned nothing.
    async fn resolve(&self, title: &str, artist: &str) -> Result<Option<String>, ResolverError>;
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Used when no API key is configured; every lookup fails.
pub struct UnavailableResolver;

#[async_trait]
impl VideoLinkResolver for UnavailableResolver {
    async fn resolve(&self, _title: &str, _artist: &str) -> Result<Option<String>, ResolverError> {
        Err(ResolverError::Unavailable)
    }
}
