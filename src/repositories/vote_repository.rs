use sqlx::PgPool;

use crate::error::{ForumError, Result};
use crate::models::Thread;

#[derive(serde::Deserialize)]
pub struct VoteData {
    pub nickname: String,
    pub voice: i32,
}

/// Applies one vote per (voter, thread): the first vote inserts a row, a
/// repeat vote overwrites its strength in place. The thread tally is
/// recomputed from the votes table in the same transaction, so the caller
/// reads its own write. Fails with NotFound for unknown voters; a repeat
/// vote is never an error.
pub async fn vote(pool: &PgPool, thread: &Thread, data: &VoteData) -> Result<Thread> {
    let voter: Option<String> = sqlx::query_scalar("SELECT nickname FROM users WHERE nickname = $1")
        .bind(&data.nickname)
        .fetch_optional(pool)
        .await?;
    if voter.is_none() {
        return Err(ForumError::NotFound("voter"));
    }

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO votes (author, thread, voice) VALUES ($1, $2, $3) \
         ON CONFLICT (author, thread) DO UPDATE SET voice = EXCLUDED.voice",
    )
    .bind(&data.nickname)
    .bind(thread.id)
    .bind(data.voice)
    .execute(&mut *tx)
    .await?;

    let votes: i64 = sqlx::query_scalar(
        "UPDATE threads \
         SET votes = (SELECT COALESCE(SUM(voice), 0) FROM votes WHERE thread = $1) \
         WHERE id = $1 RETURNING votes",
    )
    .bind(thread.id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    let mut thread = thread.clone();
    thread.votes = votes;
    Ok(thread)
}
