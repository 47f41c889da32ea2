use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use crate::repositories::user_repository::{self, CreatedUser, UserProfileData};
use crate::AppState;

/// Registers a user under the nickname from the path. A clash with an
/// existing nickname or email returns the clashing profiles.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    Json(payload): Json<UserProfileData>,
) -> Response {
    match user_repository::create_user(&state.db_pool, &nickname, payload).await {
        Ok(CreatedUser::Created(user)) => {
            info!(nickname = %user.nickname, "registered user");
            (StatusCode::CREATED, Json(user)).into_response()
        }
        Ok(CreatedUser::Conflict(existing)) => {
            (StatusCode::CONFLICT, Json(existing)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> Response {
    match user_repository::get_user(&state.db_pool, &nickname).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
    Json(payload): Json<UserProfileData>,
) -> Response {
    match user_repository::update_user(&state.db_pool, &nickname, payload).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => err.into_response(),
    }
}
