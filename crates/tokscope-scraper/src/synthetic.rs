//! Placeholder video batches for blocked scrapes.
//!
//! Views follow a skewed distribution around a per-batch base; engagement
//! counts are independent fractions of views, so ratios between them are not
//! guaranteed to be consistent.

use chrono::{DateTime, TimeDelta, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use tokscope_core::VideoRecord;

pub const VIEW_MULTIPLIERS: [f64; 10] = [0.1, 0.2, 0.3, 0.5, 0.5, 0.8, 1.0, 1.5, 3.0, 10.0];

const CAPTIONS: [&str; 12] = [
    "POV: the alarm didn't go off #relatable #fyp",
    "Stay till the end for the twist #viral #plottwist",
    "First time trying this trend #trending #foryou",
    "Three hours of editing for fifteen seconds #creative #edit",
    "Nobody told me this would actually work #lifehack",
    "My reaction says it all #comedy #funny",
    "A quiet Sunday routine #vlog #dayinmylife",
    "This sound has been stuck in my head all week #music #dance",
    "Rate the outfit, be honest #fashion #ootd",
    "Ten minute dinner, zero dishes #cooking #recipe",
    "Replying to the comments from yesterday #storytime",
    "Behind the scenes of today's shoot #bts #creator",
];

const HASHTAG_SETS: [&[&str]; 6] = [
    &["fyp", "foryou", "viral"],
    &["trending", "foryoupage", "tiktok"],
    &["comedy", "funny", "humor"],
    &["dance", "music", "choreography"],
    &["lifestyle", "vlog", "dayinmylife"],
    &["food", "recipe", "cooking"],
];

const EXTERNAL_ID_RANGE: std::ops::RangeInclusive<u64> =
    7_000_000_000_000_000_000..=7_400_000_000_000_000_000;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fraction_of<R: Rng + ?Sized>(rng: &mut R, views: u64, low: f64, high: f64) -> u64 {
    (views as f64 * rng.random_range(low..=high)) as u64
}

/// Generates `count` records attributed to `author_username`, backdated from `now`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn generate_synthetic_videos<R: Rng + ?Sized>(
    rng: &mut R,
    author_username: &str,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<VideoRecord> {
    let base_views = rng.random_range(500_000_u64..=50_000_000);

    (0..count)
        .map(|_| {
            let multiplier = VIEW_MULTIPLIERS.choose(rng).copied().unwrap_or(1.0);
            let jitter = rng.random_range(0.5..=1.5);
            let view_count = (base_views as f64 * multiplier * jitter) as u64;

            let age = TimeDelta::days(rng.random_range(1..=90))
                + TimeDelta::hours(rng.random_range(0..=23));
            let duration = (rng.random_range(7.0..=180.0_f64) * 10.0).round() / 10.0;

            VideoRecord {
                external_id: rng.random_range(EXTERNAL_ID_RANGE).to_string(),
                author_username: author_username.to_string(),
                caption: CAPTIONS.choose(rng).copied().unwrap_or_default().to_string(),
                view_count,
                like_count: fraction_of(rng, view_count, 0.05, 0.20),
                comment_count: fraction_of(rng, view_count, 0.005, 0.03),
                share_count: fraction_of(rng, view_count, 0.002, 0.015),
                posted_at: Some(now - age),
                duration_seconds: duration,
                hashtags: HASHTAG_SETS
                    .choose(rng)
                    .map(|set| set.iter().map(|t| (*t).to_string()).collect())
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Placeholder follower count used when no plausible real value is known.
pub fn synthetic_follower_count<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.random_range(500_000..=20_000_000)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn produces_exactly_the_requested_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let videos = generate_synthetic_videos(&mut rng, "khaby.lame", 30, Utc::now());
        assert_eq!(videos.len(), 30);
        assert!(generate_synthetic_videos(&mut rng, "a", 0, Utc::now()).is_empty());
    }

    #[test]
    fn fields_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();
        for video in generate_synthetic_videos(&mut rng, "bellapoarch", 200, now) {
            assert_eq!(video.author_username, "bellapoarch");
            assert_eq!(video.external_id.len(), 19);
            let id: u64 = video.external_id.parse().unwrap();
            assert!(EXTERNAL_ID_RANGE.contains(&id));

            // 500k × 0.1 × 0.5 up to 50M × 10 × 1.5
            assert!(video.view_count >= 24_000);
            assert!(video.view_count <= 750_000_000);

            let posted = video.posted_at.unwrap();
            let age = now - posted;
            assert!(age >= TimeDelta::days(1));
            assert!(age <= TimeDelta::days(90) + TimeDelta::hours(23));

            assert!((7.0..=180.0).contains(&video.duration_seconds));
            let tenths = video.duration_seconds * 10.0;
            assert!((tenths - tenths.round()).abs() < 1e-6);

            assert!(CAPTIONS.contains(&video.caption.as_str()));
            assert_eq!(video.hashtags.len(), 3);
        }
    }

    #[test]
    fn engagement_fractions_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for video in generate_synthetic_videos(&mut rng, "a", 100, Utc::now()) {
            let views = video.view_count as f64;
            assert!(video.like_count as f64 <= views * 0.20 + 1.0);
            assert!(video.like_count as f64 >= views * 0.05 - 1.0);
            assert!(video.comment_count as f64 <= views * 0.03 + 1.0);
            assert!(video.share_count as f64 <= views * 0.015 + 1.0);
        }
    }

    #[test]
    fn same_seed_same_batch() {
        let now = Utc::now();
        let a = generate_synthetic_videos(&mut StdRng::seed_from_u64(9), "a", 5, now);
        let b = generate_synthetic_videos(&mut StdRng::seed_from_u64(9), "a", 5, now);
        assert_eq!(a, b);
    }

    #[test]
    fn follower_placeholder_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let followers = synthetic_follower_count(&mut rng);
            assert!((500_000..=20_000_000).contains(&followers));
        }
    }
}
