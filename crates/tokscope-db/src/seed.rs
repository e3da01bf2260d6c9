use sqlx::PgPool;
use tokscope_core::CreatorConfig;

use crate::DbError;

/// Upsert creators from the seed file.
///
/// Existing creators keep their follower count; only the niche is refreshed.
/// Returns the number of creators processed. All upserts run inside a single
/// transaction; if any fails the batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_creators(pool: &PgPool, creators: &[CreatorConfig]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for creator in creators {
        sqlx::query(
            "INSERT INTO creators (username, niche) \
             VALUES ($1, $2) \
             ON CONFLICT (username) DO UPDATE SET \
                 niche = EXCLUDED.niche, \
                 updated_at = NOW()",
        )
        .bind(&creator.username)
        .bind(&creator.niche)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
