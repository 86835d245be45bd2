use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all server metrics
const PREFIX: &str = "emotune";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Domain Metrics
    pub static ref FRAMES_ANALYZED_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_frames_analyzed_total"), "Frames classified, by detected emotion"),
        &["emotion"]
    ).expect("Failed to create frames_analyzed_total metric");

    pub static ref RECOMMENDATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_recommendations_total"), "Recommendation attempts, by outcome"),
        &["outcome"]
    ).expect("Failed to create recommendations_total metric");

    pub static ref ALARMS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_alarms_total"), "Alarms that left the pending state, by status"),
        &["status"]
    ).expect("Failed to create alarms_total metric");

    pub static ref ALARMS_PENDING: Gauge = Gauge::new(
        format!("{PREFIX}_alarms_pending"),
        "Alarms waiting to fire"
    ).expect("Failed to create alarms_pending metric");

    pub static ref CATALOG_SONGS_TOTAL: Gauge = Gauge::new(
        format!("{PREFIX}_catalog_songs_total"),
        "Songs in the catalog"
    ).expect("Failed to create catalog_songs_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Registration errors only mean the metric is already registered (tests).
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(FRAMES_ANALYZED_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(RECOMMENDATIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ALARMS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ALARMS_PENDING.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_SONGS_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

pub fn set_catalog_songs(count: usize) {
    CATALOG_SONGS_TOTAL.set(count as f64);
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

pub fn record_frame_analyzed(emotion: &str) {
    FRAMES_ANALYZED_TOTAL.with_label_values(&[emotion]).inc();
}

/// `outcome` is one of "song", "no_songs", "no_link", "storage_error".
pub fn record_recommendation(outcome: &str) {
    RECOMMENDATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_alarm_finished(status: &str) {
    ALARMS_TOTAL.with_label_values(&[status]).inc();
    ALARMS_PENDING.dec();
}

pub fn record_alarm_registered() {
    ALARMS_PENDING.inc();
}

/// API routes reported under their own path label.
const API_ENDPOINTS: &[&str] = &[
    "/",
    "/analyze_frame",
    "/generate_emotion_music",
    "/recommendation_history",
    "/mood_playlists",
    "/emotion_chart",
    "/survey",
    "/admin/songs",
    "/set_alarm",
    "/get_song_info",
    "/alarm_result",
];

/// Collapses parameterized paths and frontend files so label cardinality
/// stays bounded.
pub fn categorize_endpoint(path: &str) -> String {
    if path.starts_with("/alarms/") {
        "/alarms/{id}".to_string()
    } else if API_ENDPOINTS.contains(&path) {
        path.to_string()
    } else {
        "/static".to_string()
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
