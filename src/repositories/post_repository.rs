use std::collections::HashMap;

use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::debug;

use crate::error::{ForumError, Result};
use crate::models::{Post, PostFull, Thread};
use crate::repositories::{forum_repository, thread_repository, user_repository};
use crate::status::COUNTERS;
use crate::tree::{self, PostSort, NO_PARENT};

/// One candidate post in a creation batch. `parent` 0 means a new root.
#[derive(serde::Deserialize)]
pub struct CreatePostData {
    pub author: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub parent: i64,
}

/// Update payload for a single post; an absent or empty message is a no-op.
#[derive(serde::Deserialize)]
pub struct UpdatePostData {
    #[serde(default)]
    pub message: String,
}

/// Inserts a batch of posts into a thread, all or nothing.
///
/// Authors are resolved in submission order and the first unknown one
/// aborts the batch. A non-zero parent must already exist in the target
/// thread; intra-batch parenting is not a thing, so parent paths can be
/// read up front. Ids are reserved from the posts sequence inside the
/// transaction and each path embeds its row's final id, so no reader ever
/// observes a post without its path. The whole batch shares one creation
/// timestamp.
pub async fn create_posts(
    pool: &PgPool,
    thread: &Thread,
    batch: Vec<CreatePostData>,
) -> Result<Vec<Post>> {
    if batch.is_empty() {
        return Ok(Vec::new());
    }
    let created = Utc::now();
    let mut tx = pool.begin().await?;

    for item in &batch {
        let known: Option<String> =
            sqlx::query_scalar("SELECT nickname FROM users WHERE nickname = $1")
                .bind(&item.author)
                .fetch_optional(&mut *tx)
                .await?;
        if known.is_none() {
            return Err(ForumError::NotFound("post author"));
        }
    }

    let mut parent_paths: HashMap<i64, Vec<i64>> = HashMap::new();
    for item in &batch {
        if item.parent == NO_PARENT || parent_paths.contains_key(&item.parent) {
            continue;
        }
        let parent = sqlx::query("SELECT thread, path FROM posts WHERE id = $1")
            .bind(item.parent)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(parent) = parent else {
            return Err(ForumError::Conflict("parent post not in target thread"));
        };
        if parent.get::<i64, _>("thread") != thread.id {
            return Err(ForumError::Conflict("parent post not in target thread"));
        }
        parent_paths.insert(item.parent, parent.get("path"));
    }

    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT nextval(pg_get_serial_sequence('posts', 'id')) FROM generate_series(1, $1)",
    )
    .bind(batch.len() as i64)
    .fetch_all(&mut *tx)
    .await?;

    let mut posts = Vec::with_capacity(batch.len());
    for (item, id) in batch.into_iter().zip(ids) {
        let path = tree::child_path(parent_paths.get(&item.parent).map(Vec::as_slice), id);
        posts.push(Post {
            id,
            parent: item.parent,
            author: item.author,
            message: item.message,
            is_edited: false,
            forum: thread.forum.clone(),
            thread: thread.id,
            created,
            path,
        });
    }

    let mut insert = QueryBuilder::<Postgres>::new(
        "INSERT INTO posts (id, parent, author, message, forum, thread, created, path) ",
    );
    insert.push_values(&posts, |mut row, post| {
        row.push_bind(post.id)
            .push_bind(post.parent)
            .push_bind(post.author.as_str())
            .push_bind(post.message.as_str())
            .push_bind(post.forum.as_str())
            .push_bind(post.thread)
            .push_bind(post.created)
            .push_bind(post.path.as_slice());
    });
    insert.build().execute(&mut *tx).await?;

    sqlx::query("UPDATE forums SET posts = posts + $1 WHERE slug = $2")
        .bind(posts.len() as i64)
        .bind(&thread.forum)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    COUNTERS.add_posts(posts.len() as i64);
    debug!(thread = thread.id, count = posts.len(), "inserted post batch");
    Ok(posts)
}

/// Posts of a thread under the requested traversal mode. `since` is always
/// an exclusive cursor (the cursor post itself is never returned); absent
/// `limit` means every matching row.
pub async fn posts_in_thread(
    pool: &PgPool,
    thread_id: i64,
    sort: PostSort,
    limit: Option<i64>,
    since: Option<i64>,
    desc: bool,
) -> Result<Vec<Post>> {
    let posts = match sort {
        PostSort::Flat => flat_page(pool, thread_id, limit, since, desc).await?,
        PostSort::Tree => tree_page(pool, thread_id, limit, since, desc).await?,
        PostSort::ParentTree => parent_tree_page(pool, thread_id, limit, since, desc).await?,
    };
    Ok(posts)
}

const POST_COLUMNS: &str = "id, parent, author, message, is_edited, forum, thread, created, path";

/// Plain id order; the cursor is a strict id bound.
async fn flat_page(
    pool: &PgPool,
    thread_id: i64,
    limit: Option<i64>,
    since: Option<i64>,
    desc: bool,
) -> sqlx::Result<Vec<Post>> {
    let mut query = QueryBuilder::<Postgres>::new(format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE thread = "
    ));
    query.push_bind(thread_id);
    if let Some(since) = since {
        query.push(if desc { " AND id < " } else { " AND id > " });
        query.push_bind(since);
    }
    query.push(if desc { " ORDER BY id DESC" } else { " ORDER BY id" });
    if let Some(limit) = limit {
        query.push(" LIMIT ");
        query.push_bind(limit);
    }
    query.build_query_as::<Post>().fetch_all(pool).await
}

/// Depth-first path order. The cursor restricts to paths strictly after
/// (ascending) or before (descending) the cursor post's full path, so a
/// page resumes mid-traversal without repeating the cursor.
async fn tree_page(
    pool: &PgPool,
    thread_id: i64,
    limit: Option<i64>,
    since: Option<i64>,
    desc: bool,
) -> sqlx::Result<Vec<Post>> {
    let mut query = QueryBuilder::<Postgres>::new(format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE thread = "
    ));
    query.push_bind(thread_id);
    if let Some(since) = since {
        query.push(if desc { " AND path < " } else { " AND path > " });
        query.push("(SELECT path FROM posts WHERE id = ");
        query.push_bind(since);
        query.push(")");
    }
    query.push(if desc {
        " ORDER BY path DESC, id DESC"
    } else {
        " ORDER BY path, id"
    });
    if let Some(limit) = limit {
        query.push(" LIMIT ");
        query.push_bind(limit);
    }
    query.build_query_as::<Post>().fetch_all(pool).await
}

/// Whole-subtree pagination. Roots are selected by id with the cursor
/// applied to the cursor post's root branch (path[1]) and the limit
/// counting roots; every post whose branch matches a selected root is then
/// returned, subtrees grouped and internally path-ordered.
async fn parent_tree_page(
    pool: &PgPool,
    thread_id: i64,
    limit: Option<i64>,
    since: Option<i64>,
    desc: bool,
) -> sqlx::Result<Vec<Post>> {
    let mut query = QueryBuilder::<Postgres>::new(format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE thread = "
    ));
    query.push_bind(thread_id);
    query.push(" AND path[1] = ANY (SELECT id FROM posts WHERE thread = ");
    query.push_bind(thread_id);
    query.push(" AND parent = 0");
    if let Some(since) = since {
        query.push(if desc {
            " AND path[1] < "
        } else {
            " AND path[1] > "
        });
        query.push("(SELECT path[1] FROM posts WHERE id = ");
        query.push_bind(since);
        query.push(")");
    }
    query.push(if desc { " ORDER BY id DESC" } else { " ORDER BY id" });
    if let Some(limit) = limit {
        query.push(" LIMIT ");
        query.push_bind(limit);
    }
    query.push(")");
    query.push(if desc {
        " ORDER BY path[1] DESC, path, id"
    } else {
        " ORDER BY path[1], path, id"
    });
    query.build_query_as::<Post>().fetch_all(pool).await
}

pub async fn get_post(pool: &PgPool, id: i64) -> Result<Post> {
    sqlx::query_as::<_, Post>(
        "SELECT id, parent, author, message, is_edited, forum, thread, created, path \
         FROM posts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(ForumError::NotFound("post"))
}

/// The post plus whichever of user/thread/forum the caller asked for.
pub async fn get_post_full(pool: &PgPool, id: i64, related: &[&str]) -> Result<PostFull> {
    let post = get_post(pool, id).await?;
    let mut full = PostFull {
        post,
        author: None,
        thread: None,
        forum: None,
    };
    for relation in related {
        match *relation {
            "user" => {
                full.author = Some(user_repository::get_user(pool, &full.post.author).await?);
            }
            "thread" => {
                full.thread =
                    Some(thread_repository::get_thread_by_id(pool, full.post.thread).await?);
            }
            "forum" => {
                full.forum = Some(forum_repository::get_forum(pool, &full.post.forum).await?);
            }
            _ => {}
        }
    }
    Ok(full)
}

/// Rewrites a post's message. An empty or identical message changes
/// nothing; a real change also flips the edited flag, permanently.
pub async fn update_post(pool: &PgPool, id: i64, data: UpdatePostData) -> Result<Post> {
    sqlx::query_as::<_, Post>(
        "UPDATE posts SET \
             message = COALESCE(NULLIF($1, ''), message), \
             is_edited = CASE WHEN $1 = '' OR message = $1 THEN is_edited ELSE TRUE END \
         WHERE id = $2 \
         RETURNING id, parent, author, message, is_edited, forum, thread, created, path",
    )
    .bind(&data.message)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(ForumError::NotFound("post"))
}
