//! Shared helpers for the API integration tests.

use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

pub fn test_app(pool: PgPool) -> Router {
    treeboard::create_router(pool)
}

pub async fn send_json(
    app: &Router,
    method: http::Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send_json(app, http::Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send_json(app, http::Method::POST, uri, Some(body)).await
}

pub async fn register_user(app: &Router, nickname: &str) {
    let (status, body) = post(
        app,
        &format!("/api/user/{nickname}/create"),
        json!({
            "fullname": format!("{nickname} fullname"),
            "about": "registered from tests",
            "email": format!("{nickname}@example.com"),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "failed to register {nickname}: {body}");
}

pub async fn create_forum(app: &Router, slug: &str, owner: &str) {
    let (status, body) = post(
        app,
        "/api/forum/create",
        json!({ "title": format!("{slug} forum"), "user": owner, "slug": slug }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "failed to create forum {slug}: {body}");
}

pub async fn create_thread(app: &Router, forum: &str, author: &str, slug: Option<&str>) -> i64 {
    let mut body = json!({
        "title": "a thread",
        "author": author,
        "message": "opening message",
    });
    if let Some(slug) = slug {
        body["slug"] = json!(slug);
    }
    let (status, value) = post(app, &format!("/api/forum/{forum}/create"), body).await;
    assert_eq!(status, StatusCode::CREATED, "failed to create thread: {value}");
    value["id"].as_i64().unwrap()
}

pub async fn create_posts(app: &Router, thread: i64, batch: Value) -> Value {
    let (status, value) = post(app, &format!("/api/thread/{thread}/create"), batch).await;
    assert_eq!(status, StatusCode::CREATED, "failed to create posts: {value}");
    value
}

/// Post ids of a listing response, in response order.
pub fn ids(posts: &Value) -> Vec<i64> {
    posts
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["id"].as_i64().unwrap())
        .collect()
}

/// Materialized path of one post in a creation/listing response.
pub fn path_of(posts: &Value, index: usize) -> Vec<i64> {
    posts.as_array().unwrap()[index]["path"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect()
}
