//! Offline unit tests for tokscope-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::path::PathBuf;

use tokscope_core::{AppConfig, Environment};
use tokscope_db::{CreatorRow, PoolConfig, VideoRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        creators_path: PathBuf::from("./config/creators.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        platform_base_url: "https://www.tiktok.com".to_string(),
        scraper_user_agent: "ua".to_string(),
        scraper_headless: true,
        scraper_navigation_timeout_secs: 30,
        scraper_settle_secs: 5,
        scraper_scroll_pause_ms: 2000,
        scraper_video_limit: 30,
        scraper_max_concurrent_creators: 1,
        debug_dir: None,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn creator_row_negative_follower_count_reads_as_zero() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = CreatorRow {
        id: 1,
        public_id: Uuid::new_v4(),
        username: "khaby.lame".to_string(),
        niche: "Comedy".to_string(),
        follower_count: -1,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.follower_count(), 0);
}

/// Compile-time smoke test: confirm that [`VideoRow`] maps back onto the
/// domain record with the supplied author. No database required.
#[test]
fn video_row_to_record_carries_author_and_metrics() {
    use chrono::Utc;

    let now = Utc::now();
    let row = VideoRow {
        id: 10,
        creator_id: 1,
        external_id: "7300000000000000001".to_string(),
        caption: "Wait for it".to_string(),
        view_count: 1_200_000,
        like_count: 90_000,
        comment_count: 1_500,
        share_count: 700,
        posted_at: Some(now),
        duration_seconds: 21.5,
        hashtags: vec!["fyp".to_string(), "comedy".to_string()],
        created_at: now,
        updated_at: now,
    };

    let record = row.to_record("khaby.lame");
    assert_eq!(record.author_username, "khaby.lame");
    assert_eq!(record.external_id, "7300000000000000001");
    assert_eq!(record.view_count, 1_200_000);
    assert_eq!(record.share_count, 700);
    assert_eq!(record.posted_at, Some(now));
    assert_eq!(record.hashtags, vec!["fyp", "comedy"]);
}
