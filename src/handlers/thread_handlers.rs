use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use crate::repositories::thread_repository::{self, UpdateThreadData};
use crate::repositories::vote_repository::{self, VoteData};
use crate::AppState;

pub async fn get_thread_handler(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> Response {
    match thread_repository::resolve_thread(&state.db_pool, &slug_or_id).await {
        Ok(thread) => (StatusCode::OK, Json(thread)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_thread_handler(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(payload): Json<UpdateThreadData>,
) -> Response {
    match thread_repository::update_thread(&state.db_pool, &slug_or_id, payload).await {
        Ok(thread) => (StatusCode::OK, Json(thread)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Casts or re-casts a vote on the thread and responds with the thread
/// carrying its refreshed tally.
pub async fn vote_handler(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(payload): Json<VoteData>,
) -> Response {
    let thread = match thread_repository::resolve_thread(&state.db_pool, &slug_or_id).await {
        Ok(thread) => thread,
        Err(err) => return err.into_response(),
    };

    match vote_repository::vote(&state.db_pool, &thread, &payload).await {
        Ok(thread) => {
            info!(thread = thread.id, voter = %payload.nickname, voice = payload.voice, "applied vote");
            (StatusCode::OK, Json(thread)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
