//! Database operations for the `videos` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokscope_core::VideoRecord;

use crate::{from_db_count, to_db_count, DbError};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `videos` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoRow {
    pub id: i64,
    pub creator_id: i64,
    pub external_id: String,
    pub caption: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub share_count: i64,
    pub posted_at: Option<DateTime<Utc>>,
    pub duration_seconds: f64,
    pub hashtags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRow {
    /// Converts the stored row back into the domain record, attributed to `author_username`.
    #[must_use]
    pub fn to_record(&self, author_username: &str) -> VideoRecord {
        VideoRecord {
            external_id: self.external_id.clone(),
            author_username: author_username.to_string(),
            caption: self.caption.clone(),
            view_count: from_db_count(self.view_count),
            like_count: from_db_count(self.like_count),
            comment_count: from_db_count(self.comment_count),
            share_count: from_db_count(self.share_count),
            posted_at: self.posted_at,
            duration_seconds: self.duration_seconds,
            hashtags: self.hashtags.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all videos owned by a creator, newest first (undated last).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_videos_for_creator(
    pool: &PgPool,
    creator_id: i64,
) -> Result<Vec<VideoRow>, DbError> {
    let rows = sqlx::query_as::<_, VideoRow>(
        "SELECT id, creator_id, external_id, caption, view_count, like_count, comment_count, \
                share_count, posted_at, duration_seconds, hashtags, created_at, updated_at \
         FROM videos \
         WHERE creator_id = $1 \
         ORDER BY posted_at DESC NULLS LAST, id",
    )
    .bind(creator_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Merges a batch of records into `videos`, keyed by `external_id`.
///
/// Existing rows get their four metric columns overwritten; caption,
/// timestamp, duration and hashtags are never touched after first insert.
/// The whole batch runs in one transaction. Each record is locked with
/// `SELECT ... FOR UPDATE` before the insert-or-update decision, and the
/// insert itself resolves `ON CONFLICT (external_id)` so a concurrent writer
/// cannot produce a duplicate.
///
/// Records with an empty `external_id` are skipped. Returns the number of
/// records written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the batch is rolled back.
pub async fn upsert_videos(
    pool: &PgPool,
    creator_id: i64,
    videos: &[VideoRecord],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;
    let mut updated = 0usize;

    for video in videos {
        if video.external_id.is_empty() {
            continue;
        }

        let existing: Option<i64> = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM videos WHERE external_id = $1 FOR UPDATE",
        )
        .bind(&video.external_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(video_id) = existing {
            sqlx::query(
                "UPDATE videos SET \
                     view_count    = $2, \
                     like_count    = $3, \
                     comment_count = $4, \
                     share_count   = $5, \
                     updated_at    = NOW() \
                 WHERE id = $1",
            )
            .bind(video_id)
            .bind(to_db_count(video.view_count))
            .bind(to_db_count(video.like_count))
            .bind(to_db_count(video.comment_count))
            .bind(to_db_count(video.share_count))
            .execute(&mut *tx)
            .await?;
            updated += 1;
        } else {
            sqlx::query(
                "INSERT INTO videos \
                     (creator_id, external_id, caption, view_count, like_count, comment_count, \
                      share_count, posted_at, duration_seconds, hashtags) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
                 ON CONFLICT (external_id) DO UPDATE SET \
                     view_count    = EXCLUDED.view_count, \
                     like_count    = EXCLUDED.like_count, \
                     comment_count = EXCLUDED.comment_count, \
                     share_count   = EXCLUDED.share_count, \
                     updated_at    = NOW()",
            )
            .bind(creator_id)
            .bind(&video.external_id)
            .bind(&video.caption)
            .bind(to_db_count(video.view_count))
            .bind(to_db_count(video.like_count))
            .bind(to_db_count(video.comment_count))
            .bind(to_db_count(video.share_count))
            .bind(video.posted_at)
            .bind(video.duration_seconds)
            .bind(&video.hashtags)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }
    }

    tx.commit().await?;
    tracing::debug!(creator_id, inserted, updated, "videos upserted");
    Ok(inserted + updated)
}
