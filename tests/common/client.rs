//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest and provides methods for all server endpoints.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed")
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn home(&self) -> Response {
        self.get("/").await
    }

    // ========================================================================
    // Frames & Music
    // ========================================================================

    pub async fn analyze_frame(&self, image: &str) -> Response {
        self.client
            .post(self.url("/analyze_frame"))
            .json(&json!({ "image": image }))
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn generate_music(&self, emotion: &str) -> Response {
        self.client
            .post(self.url("/generate_emotion_music"))
            .json(&json!({ "emotion": emotion }))
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn generate_music_raw(&self, content_type: &str, body: &str) -> Response {
        self.client
            .post(self.url("/generate_emotion_music"))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Library
    // ========================================================================

    pub async fn submit_survey(&self, happy: &str, sad: &str, angry: &str) -> Response {
        self.post_form(
            "/survey",
            &[
                ("happy_preference", happy),
                ("sad_preference", sad),
                ("angry_preference", angry),
            ],
        )
        .await
    }

    pub async fn add_song(&self, fields: &[(&str, &str)]) -> Response {
        self.post_form("/admin/songs", fields).await
    }

    pub async fn recommendation_history(&self) -> Response {
        self.get("/recommendation_history").await
    }

    pub async fn mood_playlists(&self) -> Response {
        self.get("/mood_playlists").await
    }

    pub async fn emotion_chart(&self) -> Response {
        self.get("/emotion_chart").await
    }

    // ========================================================================
    // Alarms
    // ========================================================================

    pub async fn set_alarm(&self, date: &str, time: &str, mood: &str) -> Response {
        self.post_form("/set_alarm", &[("date", date), ("time", time), ("mood", mood)])
            .await
    }

    pub async fn get_song_info(&self) -> Response {
        self.get("/get_song_info").await
    }

    pub async fn alarm_result(&self) -> Response {
        self.get("/alarm_result").await
    }

    pub async fn get_alarm(&self, id: u64) -> Response {
        self.get(&format!("/alarms/{}", id)).await
    }
}
