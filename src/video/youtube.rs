use super::{watch_url, ResolverError, VideoLinkResolver};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// YouTube Data API v3 search, asking for the single best video match.
pub struct YouTubeResolver {
    client: Client,
    search_url: String,
    api_key: String,
}

impl YouTubeResolver {
    pub fn new(
        search_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            search_url: search_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

fn first_video_link(response: SearchResponse) -> Option<String> {
    response
        .items
        .into_iter()
        .find_map(|item| item.id.video_id)
        .map(|id| watch_url(&id))
}

#[async_trait]
impl VideoLinkResolver for YouTubeResolver {
    async fn resolve(&self, title: &str, artist: &str) -> Result<Option<String>, ResolverError> {
        let query = format!("{} {}", title, artist);
        debug!(query = %query, "Searching video");

        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("part", "snippet"),
                ("q", query.as_str()),
                ("key", self.api_key.as_str()),
                ("type", "video"),
                ("maxResults", "1"),
            ])
            .send()
            .await
            .map_err(|e| ResolverError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolverError::Status(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ResolverError::InvalidResponse(e.to_string()))?;
        Ok(first_video_link(body))
    }
}
