use axum::routing::{get, post};
use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod status;
pub mod tree;
pub mod utils;

use handlers::forum_handlers::{
    create_forum_handler, create_thread_handler, get_forum_handler, list_forum_users_handler,
    list_threads_handler,
};
use handlers::post_handlers::{
    create_posts_handler, get_post_handler, list_thread_posts_handler, update_post_handler,
};
use handlers::service_handlers::{clear_handler, status_handler};
use handlers::thread_handlers::{get_thread_handler, update_thread_handler, vote_handler};
use handlers::user_handlers::{create_user_handler, get_user_handler, update_user_handler};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
}

pub fn create_router(db_pool: PgPool) -> Router {
    let app_state = AppState { db_pool };

    Router::new()
        .route("/api/user/:nickname/create", post(create_user_handler))
        .route(
            "/api/user/:nickname/profile",
            get(get_user_handler).post(update_user_handler),
        )
        .route("/api/forum/create", post(create_forum_handler))
        .route("/api/forum/:slug/details", get(get_forum_handler))
        .route("/api/forum/:slug/create", post(create_thread_handler))
        .route("/api/forum/:slug/threads", get(list_threads_handler))
        .route("/api/forum/:slug/users", get(list_forum_users_handler))
        .route("/api/thread/:slug_or_id/create", post(create_posts_handler))
        .route("/api/thread/:slug_or_id/vote", post(vote_handler))
        .route(
            "/api/thread/:slug_or_id/details",
            get(get_thread_handler).post(update_thread_handler),
        )
        .route(
            "/api/thread/:slug_or_id/posts",
            get(list_thread_posts_handler),
        )
        .route(
            "/api/post/:id/details",
            get(get_post_handler).post(update_post_handler),
        )
        .route("/api/service/status", get(status_handler))
        .route("/api/service/clear", post(clear_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
