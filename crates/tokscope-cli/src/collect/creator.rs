//! Scrape → resolve → persist for a single creator.

use tokscope_scraper::{ScrapeResult, ScraperConfig, ScraperError, Tier};

/// What one creator's run wrote.
#[derive(Debug)]
pub(super) struct PersistOutcome {
    pub written: usize,
    pub synthetic: bool,
    pub source: Option<Tier>,
    pub follower_count: Option<u64>,
}

/// Scrapes a creator, substituting synthetic data when the result is not
/// authentic, then applies the follower policy and upserts the videos.
///
/// A crashed scrape worker is treated like a blocked scrape.
///
/// # Errors
///
/// Returns an error for an invalid scrape request or any database failure.
pub(super) async fn scrape_and_persist(
    pool: &sqlx::PgPool,
    scraper: &ScraperConfig,
    creator: &tokscope_db::CreatorRow,
    limit: usize,
) -> anyhow::Result<PersistOutcome> {
    let result = match tokscope_scraper::scrape_creator(scraper, &creator.username, limit).await {
        Ok(result) => result,
        Err(ScraperError::Worker(e)) => {
            tracing::error!(username = %creator.username, error = %e, "scrape worker crashed");
            ScrapeResult::default()
        }
        Err(e) => return Err(e.into()),
    };
    let source = result.source;

    let resolution = {
        let mut rng = rand::rng();
        tokscope_scraper::resolve_scrape(
            result,
            &creator.username,
            creator.follower_count(),
            &mut rng,
            chrono::Utc::now(),
        )
    };

    if let Some(count) = resolution.follower_count {
        tokscope_db::update_creator_follower_count(pool, creator.id, count).await?;
    }
    let written = tokscope_db::upsert_videos(pool, creator.id, &resolution.videos).await?;

    tracing::info!(
        username = %creator.username,
        written,
        synthetic = resolution.synthetic,
        source = ?source,
        "creator persisted"
    );

    Ok(PersistOutcome {
        written,
        synthetic: resolution.synthetic,
        source,
        follower_count: resolution.follower_count,
    })
}

pub(super) fn describe(username: &str, outcome: &PersistOutcome) -> String {
    let origin = match (outcome.synthetic, outcome.source) {
        (true, _) => "synthetic (live scrape blocked)".to_string(),
        (false, Some(tier)) => format!("scraped via {tier}"),
        (false, None) => "scraped".to_string(),
    };
    match outcome.follower_count {
        Some(followers) => format!(
            "{username}: {} videos, {origin}, followers set to {followers}",
            outcome.written
        ),
        None => format!("{username}: {} videos, {origin}", outcome.written),
    }
}
