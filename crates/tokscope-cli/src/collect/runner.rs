//! Bounded-concurrency driver for multi-creator collection.

use futures::stream::{self, StreamExt};
use tracing::Instrument as _;

use super::creator::{describe, scrape_and_persist, PersistOutcome};

/// Aggregated totals returned by [`run_collection`].
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct CollectionTotals {
    pub creators: usize,
    pub failed: usize,
    pub videos: usize,
    pub synthetic: usize,
}

impl CollectionTotals {
    fn record(&mut self, outcome: &anyhow::Result<PersistOutcome>) {
        self.creators += 1;
        match outcome {
            Ok(o) => {
                self.videos += o.written;
                if o.synthetic {
                    self.synthetic += 1;
                }
            }
            Err(_) => self.failed += 1,
        }
    }

    /// A run fails only when every creator failed.
    pub fn all_failed(&self) -> bool {
        self.creators > 0 && self.failed == self.creators
    }
}

/// Scrapes and persists every creator, at most `max_concurrent` at a time.
///
/// Per-creator failures are logged and counted rather than propagated.
pub(super) async fn run_collection(
    pool: &sqlx::PgPool,
    config: &tokscope_core::AppConfig,
    creators: &[tokscope_db::CreatorRow],
) -> CollectionTotals {
    let scraper = tokscope_scraper::ScraperConfig::from_app_config(config);
    let limit = config.scraper_video_limit;
    let max_concurrent = config.scraper_max_concurrent_creators.max(1);

    let results: Vec<(&tokscope_db::CreatorRow, anyhow::Result<PersistOutcome>)> =
        stream::iter(creators)
            .map(|c| {
                let span = tracing::info_span!("collect_creator", username = %c.username);
                let fut = scrape_and_persist(pool, &scraper, c, limit);
                async move { (c, fut.await) }.instrument(span)
            })
            .buffer_unordered(max_concurrent)
            .collect()
            .await;

    let mut totals = CollectionTotals::default();
    for (creator, outcome) in &results {
        match outcome {
            Ok(o) => println!("{}", describe(&creator.username, o)),
            Err(e) => {
                tracing::error!(username = %creator.username, error = %e, "collection failed");
                eprintln!("error: {}: {e:#}", creator.username);
            }
        }
        totals.record(outcome);
    }

    if totals.failed > 0 {
        tracing::warn!(
            failed = totals.failed,
            total = totals.creators,
            "some creators failed during collection"
        );
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(written: usize, synthetic: bool) -> anyhow::Result<PersistOutcome> {
        Ok(PersistOutcome {
            written,
            synthetic,
            source: None,
            follower_count: None,
        })
    }

    #[test]
    fn totals_count_videos_and_synthetic_runs() {
        let mut totals = CollectionTotals::default();
        totals.record(&ok(30, false));
        totals.record(&ok(24, true));
        totals.record(&Err(anyhow::anyhow!("db down")));

        assert_eq!(
            totals,
            CollectionTotals {
                creators: 3,
                failed: 1,
                videos: 54,
                synthetic: 1,
            }
        );
        assert!(!totals.all_failed());
    }

    #[test]
    fn all_failed_requires_at_least_one_creator() {
        assert!(!CollectionTotals::default().all_failed());

        let mut totals = CollectionTotals::default();
        totals.record(&Err(anyhow::anyhow!("boom")));
        assert!(totals.all_failed());
    }
}
