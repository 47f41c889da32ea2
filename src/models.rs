use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered forum member, keyed by nickname.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub nickname: String,
    pub fullname: String,
    #[serde(default)]
    pub about: String,
    pub email: String,
}

/// Top-level board, keyed by slug. `posts` and `threads` are denormalized
/// counts maintained inside the write transactions.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Forum {
    pub title: String,
    #[sqlx(rename = "owner")]
    pub user: String,
    pub slug: String,
    #[serde(default)]
    pub posts: i64,
    #[serde(default)]
    pub threads: i64,
}

/// Discussion thread inside a forum. `votes` is the denormalized tally of
/// the votes table, recomputed whenever a vote lands.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Thread {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub author: String,
    pub forum: String,
    pub message: String,
    #[serde(default)]
    pub votes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub created: DateTime<Utc>,
}

/// Single post within a thread. `parent` is 0 for root posts; `path` is the
/// materialized ancestor chain ending in the post's own id.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub parent: i64,
    pub author: String,
    pub message: String,
    #[serde(rename = "isEdited", default)]
    pub is_edited: bool,
    pub forum: String,
    pub thread: i64,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<i64>,
}

/// Post detail envelope: the post plus whichever related entities the
/// caller asked to expand.
#[derive(Serialize, Debug, Clone)]
pub struct PostFull {
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum: Option<Forum>,
}

/// Best-effort entity counts reported by the status endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub struct Status {
    pub user: i64,
    pub forum: i64,
    pub thread: i64,
    pub post: i64,
}
