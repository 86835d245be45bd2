use super::api_error::ApiError;
use super::html;
use super::state::{GuardedAlarmEngine, ServerState};
use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
struct SetAlarmForm {
    date: Option<String>,
    time: Option<String>,
    mood: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SetAlarmResponse {
    message: &'static str,
    alarm_id: u64,
    alarm_date_time: String,
    mood: String,
}

async fn set_alarm(
    State(alarms): State<GuardedAlarmEngine>,
    form: Result<Form<SetAlarmForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return ApiError::BadRequest(rejection.body_text()).into_response(),
    };
    let registered = alarms.register(
        form.date.as_deref().unwrap_or_default(),
        form.time.as_deref().unwrap_or_default(),
        form.mood.as_deref().unwrap_or_default(),
    );
    match registered {
        Ok(alarm) => Json(SetAlarmResponse {
            message: "Alarm set successfully!",
            alarm_id: alarm.id,
            alarm_date_time: alarm.alarm_date_time,
            mood: alarm.mood,
        })
        .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn get_song_info(State(alarms): State<GuardedAlarmEngine>) -> Response {
    match alarms.poll_latest() {
        Some(outcome) => Json(outcome).into_response(),
        None => Json(serde_json::json!({})).into_response(),
    }
}

async fn alarm_result(State(alarms): State<GuardedAlarmEngine>) -> Html<String> {
    Html(html::alarm_result(alarms.poll_latest().as_ref()))
}

async fn get_alarm(State(alarms): State<GuardedAlarmEngine>, Path(id): Path<u64>) -> Response {
    match alarms.get(id) {
        Some(alarm) => Json(alarm).into_response(),
        None => ApiError::NotFound(format!("Alarm {} not found.", id)).into_response(),
    }
}

// =============================================================================
// Router Construction
// =============================================================================

/// Build the alarm routes.
///
/// - POST /set_alarm
/// - GET /get_song_info
/// - GET /alarm_result
/// - GET /alarms/{id}
pub fn alarm_routes() -> Router<ServerState> {
    Router::new()
        .route("/set_alarm", post(set_alarm))
        .route("/get_song_info", get(get_song_info))
        .route("/alarm_result", get(alarm_result))
        .route("/alarms/{id}", get(get_alarm))
}
