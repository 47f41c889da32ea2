mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{get, post, register_user, test_app};

#[sqlx::test]
async fn register_and_fetch_profile(pool: PgPool) {
    let app = test_app(pool);

    let (status, user) = post(
        &app,
        "/api/user/dana/create",
        json!({ "fullname": "Dana Scully", "about": "fbi", "email": "dana@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["nickname"], "dana");

    let (status, profile) = get(&app, "/api/user/dana/profile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["fullname"], "Dana Scully");
    assert_eq!(profile["email"], "dana@example.com");
}

#[sqlx::test]
async fn unknown_profile_is_not_found(pool: PgPool) {
    let app = test_app(pool);
    let (status, _) = get(&app, "/api/user/nobody/profile").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn duplicate_registration_returns_clashing_profiles(pool: PgPool) {
    let app = test_app(pool);
    register_user(&app, "alice").await;
    register_user(&app, "bob").await;

    // Same nickname as alice, same email as bob: both come back.
    let (status, clashing) = post(
        &app,
        "/api/user/alice/create",
        json!({ "fullname": "impostor", "about": "", "email": "bob@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let nicknames: Vec<&str> = clashing
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["nickname"].as_str().unwrap())
        .collect();
    assert!(nicknames.contains(&"alice"));
    assert!(nicknames.contains(&"bob"));
}

#[sqlx::test]
async fn profile_update_is_partial(pool: PgPool) {
    let app = test_app(pool);
    register_user(&app, "alice").await;

    let (status, updated) = post(
        &app,
        "/api/user/alice/profile",
        json!({ "about": "rustacean" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["about"], "rustacean");
    assert_eq!(updated["fullname"], "alice fullname");
    assert_eq!(updated["email"], "alice@example.com");
}

#[sqlx::test]
async fn update_to_taken_email_is_a_conflict(pool: PgPool) {
    let app = test_app(pool);
    register_user(&app, "alice").await;
    register_user(&app, "bob").await;

    let (status, _) = post(
        &app,
        "/api/user/alice/profile",
        json!({ "email": "bob@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test]
async fn updating_unknown_user_is_not_found(pool: PgPool) {
    let app = test_app(pool);
    let (status, _) = post(
        &app,
        "/api/user/nobody/profile",
        json!({ "about": "whatever" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
