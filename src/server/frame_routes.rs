use super::api_error::ApiError;
use super::state::{GuardedFramePipeline, ServerState};
use super::ServerConfig;
use crate::emotion::normalize_label;
use crate::midi;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Deserialize, Debug)]
struct AnalyzeFrameBody {
    image: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateMusicBody {
    emotion: Option<String>,
}

async fn analyze_frame(
    State(pipeline): State<GuardedFramePipeline>,
    body: Result<Json<AnalyzeFrameBody>, JsonRejection>,
) -> Response {
    let image = match body {
        Ok(Json(AnalyzeFrameBody { image: Some(image) })) => image,
        Ok(_) => return ApiError::BadRequest("Missing 'image' field.".to_string()).into_response(),
        Err(rejection) => return ApiError::BadRequest(rejection.body_text()).into_response(),
    };

    match pipeline.analyze(&image).await {
        Ok(analysis) => Json(analysis).into_response(),
        Err(err) => {
            warn!("Frame analysis failed: {}", err);
            ApiError::from(err).into_response()
        }
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

async fn generate_emotion_music(
    State(config): State<ServerConfig>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !is_json_content_type(&headers) {
        return ApiError::UnsupportedMediaType("Content-Type must be application/json".to_string())
            .into_response();
    }
    let request: GenerateMusicBody = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return ApiError::BadRequest(format!("Invalid JSON body: {}", e)).into_response(),
    };
    let emotion = normalize_label(request.emotion.as_deref().unwrap_or("neutral"));
    debug!("Generating music for '{}'", emotion);

    let bytes = match midi::generate(&emotion) {
        Ok(bytes) => bytes,
        Err(e) => return ApiError::from(e).into_response(),
    };
    let filename = midi::download_filename(&emotion);

    if let Some(dir) = &config.midi_output_dir {
        let path = dir.join(&filename);
        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            warn!("Failed to save generated MIDI to {:?}: {}", path, e);
        }
    }

    (
        [
            (header::CONTENT_TYPE, "audio/midi".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

// =============================================================================
// Router Construction
// =============================================================================

/// Build the frame analysis and music routes.
///
/// - POST /analyze_frame
/// - POST /generate_emotion_music
pub fn frame_routes() -> Router<ServerState> {
    Router::new()
        .route("/analyze_frame", post(analyze_frame))
        .route("/generate_emotion_music", post(generate_emotion_music))
}
