//! Database operations for the `creators` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{to_db_count, DbError};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `creators` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CreatorRow {
    pub id: i64,
    pub public_id: Uuid,
    pub username: String,
    pub niche: String,
    pub follower_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreatorRow {
    #[must_use]
    pub fn follower_count(&self) -> u64 {
        crate::from_db_count(self.follower_count)
    }
}

const CREATOR_COLUMNS: &str =
    "id, public_id, username, niche, follower_count, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every tracked creator, ordered by username.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_creators(pool: &PgPool) -> Result<Vec<CreatorRow>, DbError> {
    let rows = sqlx::query_as::<_, CreatorRow>(&format!(
        "SELECT {CREATOR_COLUMNS} FROM creators ORDER BY username"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single creator by username, or `None` if not tracked.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_creator_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<CreatorRow>, DbError> {
    let row = sqlx::query_as::<_, CreatorRow>(&format!(
        "SELECT {CREATOR_COLUMNS} FROM creators WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns a single creator by internal id, or `None` if absent.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_creator(pool: &PgPool, creator_id: i64) -> Result<Option<CreatorRow>, DbError> {
    let row = sqlx::query_as::<_, CreatorRow>(&format!(
        "SELECT {CREATOR_COLUMNS} FROM creators WHERE id = $1"
    ))
    .bind(creator_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a new creator and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::CreatorExists`] if the username is already tracked, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn create_creator(
    pool: &PgPool,
    username: &str,
    niche: &str,
) -> Result<CreatorRow, DbError> {
    let row = sqlx::query_as::<_, CreatorRow>(&format!(
        "INSERT INTO creators (username, niche) \
         VALUES ($1, $2) \
         ON CONFLICT (username) DO NOTHING \
         RETURNING {CREATOR_COLUMNS}"
    ))
    .bind(username)
    .bind(niche)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| DbError::CreatorExists(username.to_string()))
}

/// Replaces a creator's niche label.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no creator has the username, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn update_creator_niche(
    pool: &PgPool,
    username: &str,
    niche: &str,
) -> Result<CreatorRow, DbError> {
    let row = sqlx::query_as::<_, CreatorRow>(&format!(
        "UPDATE creators \
         SET niche = $2, updated_at = NOW() \
         WHERE username = $1 \
         RETURNING {CREATOR_COLUMNS}"
    ))
    .bind(username)
    .bind(niche)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}

/// Overwrites `creators.follower_count`.
///
/// This applies no plausibility policy; callers decide whether a value is
/// trustworthy enough to store.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the creator does not exist, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn update_creator_follower_count(
    pool: &PgPool,
    creator_id: i64,
    follower_count: u64,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE creators \
         SET follower_count = $2, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(creator_id)
    .bind(to_db_count(follower_count))
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Deletes a creator and all of its videos in one transaction.
///
/// Returns the number of videos removed.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the creator does not exist (nothing is
/// deleted), or [`DbError::Sqlx`] if either statement fails.
pub async fn delete_creator(pool: &PgPool, creator_id: i64) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;

    let videos = sqlx::query("DELETE FROM videos WHERE creator_id = $1")
        .bind(creator_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let creators = sqlx::query("DELETE FROM creators WHERE id = $1")
        .bind(creator_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if creators == 0 {
        tx.rollback().await?;
        return Err(DbError::NotFound);
    }

    tx.commit().await?;
    Ok(videos)
}
