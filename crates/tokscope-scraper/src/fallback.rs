//! Decides what a finished attempt contributes to storage.

use chrono::{DateTime, Utc};
use rand::Rng;
use tokscope_core::{VideoRecord, PLAUSIBLE_FOLLOWER_FLOOR};

use crate::authenticity::is_authentic;
use crate::orchestrator::ScrapeResult;
use crate::synthetic::{generate_synthetic_videos, synthetic_follower_count};

/// Bounds of the synthetic batch size drawn for a blocked scrape.
pub const SYNTHETIC_BATCH_SIZE: std::ops::RangeInclusive<usize> = 20..=30;

/// What to persist for one creator after an attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub videos: Vec<VideoRecord>,
    /// New follower count to store, if any.
    pub follower_count: Option<u64>,
    /// `true` when `videos` came from the synthetic generator.
    pub synthetic: bool,
}

/// Applies the authenticity check and the follower-count policy.
///
/// Inauthentic results are replaced by a synthetic batch. A scraped follower
/// count is kept only when it clears [`PLAUSIBLE_FOLLOWER_FLOOR`]; otherwise a
/// synthetic placeholder is proposed only for creators whose stored count is
/// itself at or below the floor.
pub fn resolve_scrape<R: Rng + ?Sized>(
    result: ScrapeResult,
    username: &str,
    stored_follower_count: u64,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Resolution {
    let scraped_followers = result
        .profile
        .has_plausible_follower_count()
        .then_some(result.profile.follower_count);

    if is_authentic(&result.videos) {
        return Resolution {
            videos: result.videos,
            follower_count: scraped_followers,
            synthetic: false,
        };
    }

    let count = rng.random_range(SYNTHETIC_BATCH_SIZE);
    tracing::info!(username, count, "no usable data scraped; substituting synthetic batch");

    let follower_count = scraped_followers.or_else(|| {
        (stored_follower_count <= PLAUSIBLE_FOLLOWER_FLOOR).then(|| synthetic_follower_count(rng))
    });

    Resolution {
        videos: generate_synthetic_videos(rng, username, count, now),
        follower_count,
        synthetic: true,
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokscope_core::ProfileSummary;

    use super::*;

    fn result(followers: u64, videos: Vec<VideoRecord>) -> ScrapeResult {
        ScrapeResult {
            profile: ProfileSummary {
                follower_count: followers,
                ..ProfileSummary::default()
            },
            videos,
            ..ScrapeResult::default()
        }
    }

    #[test]
    fn authentic_videos_pass_through() {
        let videos = vec![VideoRecord::sparse("1".to_string(), "a".to_string(), 10)];
        let mut rng = StdRng::seed_from_u64(0);
        let resolution = resolve_scrape(result(5_000, videos.clone()), "a", 0, &mut rng, Utc::now());
        assert!(!resolution.synthetic);
        assert_eq!(resolution.videos, videos);
        assert_eq!(resolution.follower_count, Some(5_000));
    }

    #[test]
    fn implausible_follower_count_is_not_stored() {
        let videos = vec![VideoRecord::sparse("1".to_string(), "a".to_string(), 10)];
        let mut rng = StdRng::seed_from_u64(0);
        let resolution = resolve_scrape(result(1_000, videos), "a", 0, &mut rng, Utc::now());
        assert_eq!(resolution.follower_count, None);
    }

    #[test]
    fn empty_result_gets_synthetic_batch_and_placeholder() {
        let mut rng = StdRng::seed_from_u64(11);
        let resolution = resolve_scrape(ScrapeResult::default(), "khaby.lame", 0, &mut rng, Utc::now());
        assert!(resolution.synthetic);
        assert!(SYNTHETIC_BATCH_SIZE.contains(&resolution.videos.len()));
        assert!(resolution.videos.iter().all(|v| v.author_username == "khaby.lame"));
        let placeholder = resolution.follower_count.unwrap();
        assert!((500_000..=20_000_000).contains(&placeholder));
    }

    #[test]
    fn placeholder_never_overwrites_a_plausible_stored_count() {
        let zeroed = vec![VideoRecord::sparse("1".to_string(), "a".to_string(), 0)];
        let mut rng = StdRng::seed_from_u64(5);
        let resolution = resolve_scrape(result(0, zeroed), "a", 2_000_000, &mut rng, Utc::now());
        assert!(resolution.synthetic);
        assert_eq!(resolution.follower_count, None);
    }

    #[test]
    fn plausible_scraped_followers_survive_synthetic_substitution() {
        let mut rng = StdRng::seed_from_u64(5);
        let resolution = resolve_scrape(result(80_000, Vec::new()), "a", 0, &mut rng, Utc::now());
        assert!(resolution.synthetic);
        assert_eq!(resolution.follower_count, Some(80_000));
    }
}
