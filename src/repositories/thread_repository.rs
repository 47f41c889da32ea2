use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::{is_unique_violation, ForumError, Result};
use crate::models::Thread;
use crate::repositories::{forum_repository, user_repository};
use crate::status::COUNTERS;

#[derive(serde::Deserialize)]
pub struct CreateThreadData {
    pub title: String,
    pub author: String,
    pub message: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Partial update payload; empty fields keep their current value.
#[derive(serde::Deserialize)]
pub struct UpdateThreadData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

/// Outcome of a thread creation; a duplicate slug hands back the thread it
/// clashed with.
pub enum CreatedThread {
    Created(Thread),
    Conflict(Thread),
}

pub async fn get_thread_by_id(pool: &PgPool, id: i64) -> Result<Thread> {
    sqlx::query_as::<_, Thread>(
        "SELECT id, title, author, forum, message, votes, slug, created \
         FROM threads WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(ForumError::NotFound("thread"))
}

pub async fn get_thread_by_slug(pool: &PgPool, slug: &str) -> Result<Thread> {
    sqlx::query_as::<_, Thread>(
        "SELECT id, title, author, forum, message, votes, slug, created \
         FROM threads WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?
    .ok_or(ForumError::NotFound("thread"))
}

/// Threads are addressed by numeric id or by slug; a numeric string is
/// always treated as an id.
pub async fn resolve_thread(pool: &PgPool, slug_or_id: &str) -> Result<Thread> {
    match slug_or_id.parse::<i64>() {
        Ok(id) => get_thread_by_id(pool, id).await,
        Err(_) => get_thread_by_slug(pool, slug_or_id).await,
    }
}

pub async fn create_thread(
    pool: &PgPool,
    forum_slug: &str,
    data: CreateThreadData,
) -> Result<CreatedThread> {
    let author = user_repository::get_user(pool, &data.author).await?;
    let forum = forum_repository::get_forum(pool, forum_slug).await?;

    if let Some(slug) = data.slug.as_deref() {
        if let Ok(existing) = get_thread_by_slug(pool, slug).await {
            return Ok(CreatedThread::Conflict(existing));
        }
    }

    let mut tx = pool.begin().await?;
    let inserted = sqlx::query_as::<_, Thread>(
        "INSERT INTO threads (slug, forum, author, title, message, created) \
         VALUES ($1, $2, $3, $4, $5, COALESCE($6, now())) \
         RETURNING id, title, author, forum, message, votes, slug, created",
    )
    .bind(&data.slug)
    .bind(&forum.slug)
    .bind(&author.nickname)
    .bind(&data.title)
    .bind(&data.message)
    .bind(data.created)
    .fetch_one(&mut *tx)
    .await;

    let thread = match inserted {
        Ok(thread) => thread,
        // Lost a slug race to a concurrent writer; surface the winner.
        Err(err) if is_unique_violation(&err) => {
            let slug = data.slug.as_deref().unwrap_or_default();
            let existing = get_thread_by_slug(pool, slug).await?;
            return Ok(CreatedThread::Conflict(existing));
        }
        Err(err) => return Err(err.into()),
    };

    sqlx::query("UPDATE forums SET threads = threads + 1 WHERE slug = $1")
        .bind(&forum.slug)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    COUNTERS.add_thread();
    Ok(CreatedThread::Created(thread))
}

/// Updates title and/or message; empty payload fields leave the stored
/// value untouched.
pub async fn update_thread(
    pool: &PgPool,
    slug_or_id: &str,
    data: UpdateThreadData,
) -> Result<Thread> {
    let thread = resolve_thread(pool, slug_or_id).await?;

    let updated = sqlx::query_as::<_, Thread>(
        "UPDATE threads SET \
             title = COALESCE(NULLIF($1, ''), title), \
             message = COALESCE(NULLIF($2, ''), message) \
         WHERE id = $3 \
         RETURNING id, title, author, forum, message, votes, slug, created",
    )
    .bind(&data.title)
    .bind(&data.message)
    .bind(thread.id)
    .fetch_one(pool)
    .await?;
    Ok(updated)
}
