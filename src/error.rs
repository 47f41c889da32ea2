use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure taxonomy for repository operations.
#[derive(Debug, Error)]
pub enum ForumError {
    /// A referenced entity (user, forum, thread, post) does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The request clashes with existing state: a duplicate slug, nickname
    /// or email, or a parent post that lives in another thread.
    #[error("{0}")]
    Conflict(&'static str),

    /// Unexpected store failure; opaque to clients.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, ForumError>;

impl IntoResponse for ForumError {
    fn into_response(self) -> Response {
        match self {
            ForumError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": format!("{what} not found") })),
            )
                .into_response(),
            ForumError::Conflict(why) => {
                (StatusCode::CONFLICT, Json(json!({ "message": why }))).into_response()
            }
            ForumError::Database(err) => {
                error!(error = %err, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

/// True when the error is a Postgres unique-constraint violation (23505).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}
