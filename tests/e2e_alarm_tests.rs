//! End-to-end tests for wake-up alarms

mod common;

use chrono::{Duration as ChronoDuration, Local};
use common::{TestClient, TestServer, SAD_SONG};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Date and time fields for an instant `secs` seconds from now.
fn in_secs(secs: i64) -> (String, String) {
    let at = Local::now() + ChronoDuration::seconds(secs);
    (
        at.format("%Y-%m-%d").to_string(),
        at.format("%H:%M:%S").to_string(),
    )
}

#[tokio::test]
async fn test_alarm_fires_with_song_for_mood() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let (date, time) = in_secs(2);

    let response = client.set_alarm(&date, &time, "Sad").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Alarm set successfully!");
    assert_eq!(body["alarmDateTime"], format!("{} {}", date, time));
    assert_eq!(body["mood"], "sad");
    let alarm_id = body["alarmId"].as_u64().unwrap();

    let pending: Value = client.get_alarm(alarm_id).await.json().await.unwrap();
    assert_eq!(pending["status"], "pending");
    let before: Value = client.get_song_info().await.json().await.unwrap();
    assert_eq!(before, serde_json::json!({}));

    tokio::time::sleep(Duration::from_millis(3200)).await;

    let info: Value = client.get_song_info().await.json().await.unwrap();
    assert_eq!(info["name"], SAD_SONG);
    assert!(info["youtube_link"]
        .as_str()
        .unwrap()
        .starts_with("https://www.youtube.com/watch?v="));

    let fired: Value = client.get_alarm(alarm_id).await.json().await.unwrap();
    assert_eq!(fired["status"], "fired");
    assert_eq!(fired["result"]["name"], SAD_SONG);

    let page = client.alarm_result().await.text().await.unwrap();
    assert!(page.contains(SAD_SONG));
}

#[tokio::test]
async fn test_alarm_for_unknown_mood_fails_with_message() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let (date, time) = in_secs(2);

    let body: Value = client
        .set_alarm(&date, &time, "melancholy")
        .await
        .json()
        .await
        .unwrap();
    let alarm_id = body["alarmId"].as_u64().unwrap();

    tokio::time::sleep(Duration::from_millis(3200)).await;

    let info: Value = client.get_song_info().await.json().await.unwrap();
    assert_eq!(info["error"], "No songs found for this mood.");

    let failed: Value = client.get_alarm(alarm_id).await.json().await.unwrap();
    assert_eq!(failed["status"], "failed");
}

#[tokio::test]
async fn test_past_alarm_is_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let (date, time) = in_secs(-60);

    let response = client.set_alarm(&date, &time, "sad").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Alarm time must be in the future.");
}

#[tokio::test]
async fn test_alarm_with_missing_fields_is_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.set_alarm("2099-01-01", "", "sad").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client.set_alarm("not-a-date", "07:30", "sad").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_alarm_is_not_found() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_alarm(999).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let page = client.alarm_result().await.text().await.unwrap();
    assert!(page.contains("No alarm has gone off yet."));
}
