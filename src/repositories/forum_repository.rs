use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::{ForumError, Result};
use crate::models::{Forum, Thread, User};
use crate::repositories::user_repository;
use crate::status::COUNTERS;
use crate::utils::ListingParams;

#[derive(serde::Deserialize)]
pub struct CreateForumData {
    pub title: String,
    pub user: String,
    pub slug: String,
}

/// Outcome of a forum registration; a duplicate slug hands back the row it
/// clashed with.
pub enum CreatedForum {
    Created(Forum),
    Conflict(Forum),
}

pub async fn get_forum(pool: &PgPool, slug: &str) -> Result<Forum> {
    sqlx::query_as::<_, Forum>(
        "SELECT title, owner, slug, posts, threads FROM forums WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?
    .ok_or(ForumError::NotFound("forum"))
}

pub async fn create_forum(pool: &PgPool, data: CreateForumData) -> Result<CreatedForum> {
    // Resolve the owner first; the stored nickname is the canonical one.
    let owner = user_repository::get_user(pool, &data.user).await?;

    let inserted = sqlx::query(
        "INSERT INTO forums (slug, title, owner) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
    )
    .bind(&data.slug)
    .bind(&data.title)
    .bind(&owner.nickname)
    .execute(pool)
    .await?;

    if inserted.rows_affected() == 0 {
        let existing = get_forum(pool, &data.slug).await?;
        return Ok(CreatedForum::Conflict(existing));
    }

    COUNTERS.add_forum();
    Ok(CreatedForum::Created(Forum {
        title: data.title,
        user: owner.nickname,
        slug: data.slug,
        posts: 0,
        threads: 0,
    }))
}

/// Threads in a forum ordered by creation time. The `since` boundary is
/// inclusive on `created`, matching the thread listing contract.
pub async fn threads_in_forum(
    pool: &PgPool,
    slug: &str,
    params: &ListingParams,
) -> Result<Vec<Thread>> {
    let forum = get_forum(pool, slug).await?;

    let mut query = QueryBuilder::<Postgres>::new(
        "SELECT id, title, author, forum, message, votes, slug, created FROM threads WHERE forum = ",
    );
    query.push_bind(&forum.slug);
    if let Some(since) = params.since_time() {
        query.push(if params.desc {
            " AND created <= "
        } else {
            " AND created >= "
        });
        query.push_bind(since);
    }
    query.push(if params.desc {
        " ORDER BY created DESC"
    } else {
        " ORDER BY created"
    });
    if let Some(limit) = params.limit {
        query.push(" LIMIT ");
        query.push_bind(limit);
    }

    let threads = query.build_query_as::<Thread>().fetch_all(pool).await?;
    Ok(threads)
}

/// Users who opened a thread or wrote a post in the forum, ordered by
/// nickname with a strict `since` cursor.
pub async fn users_in_forum(
    pool: &PgPool,
    slug: &str,
    params: &ListingParams,
) -> Result<Vec<User>> {
    let forum = get_forum(pool, slug).await?;

    let mut query = QueryBuilder::<Postgres>::new(
        "SELECT nickname, fullname, about, email FROM users WHERE nickname IN \
         (SELECT author FROM threads WHERE forum = ",
    );
    query.push_bind(&forum.slug);
    query.push(" UNION SELECT author FROM posts WHERE forum = ");
    query.push_bind(&forum.slug);
    query.push(")");
    if let Some(since) = params.since_str() {
        query.push(if params.desc {
            " AND nickname < "
        } else {
            " AND nickname > "
        });
        query.push_bind(since.to_string());
    }
    query.push(if params.desc {
        " ORDER BY nickname DESC"
    } else {
        " ORDER BY nickname"
    });
    if let Some(limit) = params.limit {
        query.push(" LIMIT ");
        query.push_bind(limit);
    }

    let users = query.build_query_as::<User>().fetch_all(pool).await?;
    Ok(users)
}
