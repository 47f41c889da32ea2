use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use crate::repositories::forum_repository::{self, CreateForumData, CreatedForum};
use crate::repositories::thread_repository::{self, CreateThreadData, CreatedThread};
use crate::utils::ListingParams;
use crate::AppState;

pub async fn create_forum_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateForumData>,
) -> Response {
    match forum_repository::create_forum(&state.db_pool, payload).await {
        Ok(CreatedForum::Created(forum)) => {
            info!(slug = %forum.slug, "created forum");
            (StatusCode::CREATED, Json(forum)).into_response()
        }
        Ok(CreatedForum::Conflict(existing)) => {
            (StatusCode::CONFLICT, Json(existing)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn get_forum_handler(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match forum_repository::get_forum(&state.db_pool, &slug).await {
        Ok(forum) => (StatusCode::OK, Json(forum)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Opens a thread in the forum from the path. A duplicate slug returns the
/// existing thread with 409.
pub async fn create_thread_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<CreateThreadData>,
) -> Response {
    match thread_repository::create_thread(&state.db_pool, &slug, payload).await {
        Ok(CreatedThread::Created(thread)) => {
            info!(thread = thread.id, forum = %thread.forum, "created thread");
            (StatusCode::CREATED, Json(thread)).into_response()
        }
        Ok(CreatedThread::Conflict(existing)) => {
            (StatusCode::CONFLICT, Json(existing)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn list_threads_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ListingParams>,
) -> Response {
    match forum_repository::threads_in_forum(&state.db_pool, &slug, &params).await {
        Ok(threads) => (StatusCode::OK, Json(threads)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_forum_users_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ListingParams>,
) -> Response {
    match forum_repository::users_in_forum(&state.db_pool, &slug, &params).await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => err.into_response(),
    }
}
