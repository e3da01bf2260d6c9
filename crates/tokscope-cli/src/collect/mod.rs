//! `scrape` and `collect` command handlers.
//!
//! Called from `main` after the pool and config are established. In a
//! multi-creator run one bad creator never aborts the others.

mod creator;
mod runner;

use creator::{describe, scrape_and_persist};

/// Ensures `username` is tracked, creating it with an empty niche if needed.
async fn ensure_creator(
    pool: &sqlx::PgPool,
    username: &str,
) -> anyhow::Result<tokscope_db::CreatorRow> {
    if let Some(existing) = tokscope_db::get_creator_by_username(pool, username).await? {
        return Ok(existing);
    }
    tracing::info!(username, "creator not tracked yet; creating");
    Ok(tokscope_db::create_creator(pool, username, "").await?)
}

/// Scrape summary printed by `scrape --dry-run`; nothing here is persisted.
fn dry_run_summary(
    username: &str,
    result: &tokscope_scraper::ScrapeResult,
    base_url: &str,
) -> serde_json::Value {
    let failures: Vec<String> = result.failures.iter().map(ToString::to_string).collect();
    let videos: Vec<serde_json::Value> = result
        .videos
        .iter()
        .map(|video| {
            let mut value = serde_json::json!(video);
            value["url"] = video.canonical_url(base_url).into();
            value
        })
        .collect();
    serde_json::json!({
        "username": username,
        "source": result.source,
        "authentic": tokscope_scraper::is_authentic(&result.videos),
        "video_count": result.videos.len(),
        "profile": result.profile,
        "failures": failures,
        "videos": videos,
    })
}

/// Scrape a single creator and persist the resolved result.
///
/// With `dry_run` the raw scrape summary is printed and nothing is written.
///
/// # Errors
///
/// Returns an error for an invalid username or limit, or any database failure.
pub(crate) async fn run_scrape(
    pool: &sqlx::PgPool,
    config: &tokscope_core::AppConfig,
    username: &str,
    limit: usize,
    dry_run: bool,
) -> anyhow::Result<()> {
    let username = tokscope_core::validate_username(username)?;
    let scraper = tokscope_scraper::ScraperConfig::from_app_config(config);

    if dry_run {
        let result = tokscope_scraper::scrape_creator(&scraper, &username, limit).await?;
        let summary = dry_run_summary(&username, &result, &scraper.base_url);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let creator = ensure_creator(pool, &username).await?;
    let outcome = scrape_and_persist(pool, &scraper, &creator, limit).await?;
    println!("{}", describe(&creator.username, &outcome));
    Ok(())
}

/// Resolve the creators a `collect` run should cover.
///
/// # Errors
///
/// Returns an error if the filter is not a valid username or is not tracked.
async fn load_creators_for_collect(
    pool: &sqlx::PgPool,
    creator_filter: Option<&str>,
) -> anyhow::Result<Vec<tokscope_db::CreatorRow>> {
    let Some(raw) = creator_filter else {
        return Ok(tokscope_db::list_creators(pool).await?);
    };
    let username = tokscope_core::validate_username(raw)?;
    let creator = tokscope_db::get_creator_by_username(pool, &username)
        .await?
        .ok_or_else(|| anyhow::anyhow!("creator '{username}' not found"))?;
    Ok(vec![creator])
}

/// Scrape every tracked creator (or just `creator_filter`) with bounded concurrency.
///
/// # Errors
///
/// Returns an error if the filter names an untracked creator or every creator fails.
pub(crate) async fn run_collect(
    pool: &sqlx::PgPool,
    config: &tokscope_core::AppConfig,
    creator_filter: Option<&str>,
) -> anyhow::Result<()> {
    let creators = load_creators_for_collect(pool, creator_filter).await?;

    if creators.is_empty() {
        println!("no creators tracked; run `tokscope db seed` or `tokscope creators add`");
        return Ok(());
    }

    let totals = runner::run_collection(pool, config, &creators).await;
    if totals.all_failed() {
        anyhow::bail!("all {} creators failed collection", totals.failed);
    }

    println!(
        "collected {} videos across {} creators ({} synthetic, {} failed)",
        totals.videos, totals.creators, totals.synthetic, totals.failed
    );
    Ok(())
}

/// Scrape and persist a freshly added creator. Used by `creators add`.
pub(crate) async fn collect_new_creator(
    pool: &sqlx::PgPool,
    config: &tokscope_core::AppConfig,
    creator: &tokscope_db::CreatorRow,
) -> anyhow::Result<String> {
    let scraper = tokscope_scraper::ScraperConfig::from_app_config(config);
    let outcome =
        scrape_and_persist(pool, &scraper, creator, config.scraper_video_limit).await?;
    Ok(describe(&creator.username, &outcome))
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
