use sqlx::PgPool;

use crate::error::Result;
use crate::status::COUNTERS;

/// Wipes every table and resets the status counters. Exists for test
/// harness resets; there is deliberately no partial variant.
pub async fn clear(pool: &PgPool) -> Result<()> {
    sqlx::query("TRUNCATE TABLE users, forums, threads, posts, votes CASCADE")
        .execute(pool)
        .await?;
    COUNTERS.reset();
    Ok(())
}
