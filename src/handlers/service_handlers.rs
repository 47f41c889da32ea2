use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use crate::repositories::service_repository;
use crate::status::COUNTERS;
use crate::AppState;

/// Best-effort entity counts; see the status module for the accuracy
/// caveats.
pub async fn status_handler() -> Response {
    (StatusCode::OK, Json(COUNTERS.snapshot())).into_response()
}

pub async fn clear_handler(State(state): State<AppState>) -> Response {
    warn!("clearing all forum data");
    match service_repository::clear(&state.db_pool).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => err.into_response(),
    }
}
