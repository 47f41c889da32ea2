use sqlx::PgPool;

use crate::error::{is_unique_violation, ForumError, Result};
use crate::models::User;
use crate::status::COUNTERS;

/// Profile fields accepted by the create and update endpoints. Absent
/// fields arrive as empty strings and are treated as "leave unchanged"
/// on update.
#[derive(serde::Deserialize)]
pub struct UserProfileData {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub email: String,
}

/// Outcome of a registration attempt. A clash returns the existing rows so
/// the handler can echo them in the conflict response.
pub enum CreatedUser {
    Created(User),
    Conflict(Vec<User>),
}

pub async fn get_user(pool: &PgPool, nickname: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        "SELECT nickname, fullname, about, email FROM users WHERE nickname = $1",
    )
    .bind(nickname)
    .fetch_optional(pool)
    .await?
    .ok_or(ForumError::NotFound("user"))
}

/// Rows clashing with the given nickname or email.
async fn users_on_conflict(pool: &PgPool, nickname: &str, email: &str) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT nickname, fullname, about, email FROM users WHERE nickname = $1 OR email = $2",
    )
    .bind(nickname)
    .bind(email)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn create_user(
    pool: &PgPool,
    nickname: &str,
    data: UserProfileData,
) -> Result<CreatedUser> {
    let inserted = sqlx::query(
        "INSERT INTO users (nickname, fullname, about, email) VALUES ($1, $2, $3, $4)
         ON CONFLICT DO NOTHING",
    )
    .bind(nickname)
    .bind(&data.fullname)
    .bind(&data.about)
    .bind(&data.email)
    .execute(pool)
    .await?;

    if inserted.rows_affected() == 0 {
        let clashing = users_on_conflict(pool, nickname, &data.email).await?;
        return Ok(CreatedUser::Conflict(clashing));
    }

    COUNTERS.add_user();
    Ok(CreatedUser::Created(User {
        nickname: nickname.to_string(),
        fullname: data.fullname,
        about: data.about,
        email: data.email,
    }))
}

/// Partial profile update: empty fields keep their current value. Fails
/// with NotFound for unknown nicknames and Conflict when the new email is
/// already registered.
pub async fn update_user(pool: &PgPool, nickname: &str, data: UserProfileData) -> Result<User> {
    let mut user = get_user(pool, nickname).await?;
    if !data.fullname.is_empty() {
        user.fullname = data.fullname;
    }
    if !data.email.is_empty() {
        user.email = data.email;
    }
    if !data.about.is_empty() {
        user.about = data.about;
    }

    let updated = sqlx::query("UPDATE users SET fullname = $1, email = $2, about = $3 WHERE nickname = $4")
        .bind(&user.fullname)
        .bind(&user.email)
        .bind(&user.about)
        .bind(&user.nickname)
        .execute(pool)
        .await;

    match updated {
        Ok(_) => Ok(user),
        Err(err) if is_unique_violation(&err) => {
            Err(ForumError::Conflict("email already registered"))
        }
        Err(err) => Err(err.into()),
    }
}
