use super::api_error::ApiError;
use super::html;
use super::metrics;
use super::state::{GuardedCatalogStore, ServerState};
use crate::catalog_store::NewSong;
use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::info;

/// Songs shown per mood on the playlists page.
const PLAYLIST_SIZE: usize = 10;

#[derive(Deserialize, Debug)]
struct SurveyForm {
    happy_preference: Option<String>,
    sad_preference: Option<String>,
    angry_preference: Option<String>,
}

async fn recommendation_history(State(store): State<GuardedCatalogStore>) -> Response {
    match store.list_recommendations() {
        Ok(records) => Html(html::recommendation_history(&records)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn mood_playlists(State(store): State<GuardedCatalogStore>) -> Response {
    let playlists = store.distinct_moods().and_then(|moods| {
        moods
            .into_iter()
            .map(|mood| {
                let songs = store.random_songs_by_mood(&mood, PLAYLIST_SIZE)?;
                Ok((mood, songs))
            })
            .collect::<anyhow::Result<Vec<_>>>()
    });
    match playlists {
        Ok(playlists) => Html(html::mood_playlists(&playlists)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn emotion_chart(State(store): State<GuardedCatalogStore>) -> Response {
    match store.list_emotions() {
        Ok(entries) => Html(html::emotion_chart(&entries)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

async fn post_survey(
    State(store): State<GuardedCatalogStore>,
    form: Result<Form<SurveyForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return ApiError::BadRequest(rejection.body_text()).into_response(),
    };
    let answers = match (
        required(form.happy_preference),
        required(form.sad_preference),
        required(form.angry_preference),
    ) {
        (Some(happy), Some(sad), Some(angry)) => [("happy", happy), ("sad", sad), ("angry", angry)],
        _ => {
            return ApiError::BadRequest("Missing required parameters.".to_string())
                .into_response()
        }
    };

    for (mood, preferred) in &answers {
        if let Err(e) = store.upsert_survey(mood, preferred) {
            return ApiError::from(e).into_response();
        }
    }
    info!("Survey preferences updated");
    Redirect::to("/").into_response()
}

async fn post_admin_song(
    State(store): State<GuardedCatalogStore>,
    form: Result<Form<NewSong>, FormRejection>,
) -> Response {
    let Form(song) = match form {
        Ok(form) => form,
        Err(rejection) => return ApiError::BadRequest(rejection.body_text()).into_response(),
    };
    if song.name.trim().is_empty() || song.artist.trim().is_empty() || song.mood.trim().is_empty()
    {
        return ApiError::BadRequest("Missing required parameters.".to_string()).into_response();
    }

    let result = store
        .upsert_song(&song)
        .and_then(|id| Ok((id, store.count_songs()?)));
    match result {
        Ok((id, count)) => {
            info!("Added song {} '{}' ({})", id, song.name, song.mood);
            metrics::set_catalog_songs(count);
            "Song added successfully!".into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

// =============================================================================
// Router Construction
// =============================================================================

/// Build the catalog, survey and history routes.
///
/// - GET /recommendation_history
/// - GET /mood_playlists
/// - GET /emotion_chart
/// - POST /survey
/// - POST /admin/songs
pub fn library_routes() -> Router<ServerState> {
    Router::new()
        .route("/recommendation_history", get(recommendation_history))
        .route("/mood_playlists", get(mood_playlists))
        .route("/emotion_chart", get(emotion_chart))
        .route("/survey", post(post_survey))
        .route("/admin/songs", post(post_admin_song))
}
