use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::repositories::post_repository::{self, CreatePostData, UpdatePostData};
use crate::repositories::thread_repository;
use crate::utils::ListingParams;
use crate::AppState;

/// Inserts a batch of posts into the thread addressed by id or slug.
/// The batch is atomic: an unknown author or a parent outside the thread
/// rejects all of it.
pub async fn create_posts_handler(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(payload): Json<Vec<CreatePostData>>,
) -> Response {
    let thread = match thread_repository::resolve_thread(&state.db_pool, &slug_or_id).await {
        Ok(thread) => thread,
        Err(err) => return err.into_response(),
    };

    match post_repository::create_posts(&state.db_pool, &thread, payload).await {
        Ok(posts) => {
            info!(thread = thread.id, count = posts.len(), "created posts");
            (StatusCode::CREATED, Json(posts)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Lists the thread's posts under the requested sort mode (`flat`, `tree`
/// or `parent_tree`; anything else is flat) with `limit`/`since`/`desc`
/// pagination. An existing thread with no posts yields an empty array.
pub async fn list_thread_posts_handler(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Query(params): Query<ListingParams>,
) -> Response {
    let thread = match thread_repository::resolve_thread(&state.db_pool, &slug_or_id).await {
        Ok(thread) => thread,
        Err(err) => return err.into_response(),
    };

    match post_repository::posts_in_thread(
        &state.db_pool,
        thread.id,
        params.sort(),
        params.limit,
        params.since_id(),
        params.desc,
    )
    .await
    {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Deserialize)]
pub struct RelatedParams {
    #[serde(default)]
    related: String,
}

pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<RelatedParams>,
) -> Response {
    let related: Vec<&str> = params
        .related
        .split(',')
        .filter(|s| !s.is_empty())
        .collect();

    match post_repository::get_post_full(&state.db_pool, id, &related).await {
        Ok(full) => (StatusCode::OK, Json(full)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_post_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePostData>,
) -> Response {
    match post_repository::update_post(&state.db_pool, id, payload).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(err) => err.into_response(),
    }
}
