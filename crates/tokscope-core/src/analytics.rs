//! Engagement analytics over stored video records.
//!
//! Everything here is pure arithmetic; callers load the records and pass them in.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::Serialize;

use crate::videos::VideoRecord;

/// Number of videos returned by [`content_performance`] by default.
pub const TOP_VIDEO_COUNT: usize = 10;

/// `(likes + comments + shares) / views` as a percentage; `0.0` when there are no views.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn engagement_rate(likes: u64, comments: u64, shares: u64, views: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    let interactions = likes.saturating_add(comments).saturating_add(shares);
    interactions as f64 / views as f64 * 100.0
}

fn record_engagement(video: &VideoRecord) -> f64 {
    engagement_rate(
        video.like_count,
        video.comment_count,
        video.share_count,
        video.view_count,
    )
}

/// Sum of one metric across `videos`, saturating at `u64::MAX`.
fn total(videos: &[VideoRecord], metric: impl Fn(&VideoRecord) -> u64) -> u64 {
    videos
        .iter()
        .fold(0u64, |acc, video| acc.saturating_add(metric(video)))
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Dated posts per day across the posting span; the span is at least one day.
#[allow(clippy::cast_precision_loss)]
fn posting_frequency(dates: &[DateTime<Utc>]) -> f64 {
    let (Some(earliest), Some(latest)) = (dates.iter().min(), dates.iter().max()) else {
        return 0.0;
    };
    let span_days = (*latest - *earliest).num_days().max(1);
    round_to(dates.len() as f64 / span_days as f64, 2)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatorStats {
    pub username: String,
    pub total_videos: usize,
    pub total_views: u64,
    pub total_likes: u64,
    pub avg_engagement_rate: f64,
    pub follower_count: u64,
    pub earliest_post: Option<DateTime<Utc>>,
    pub latest_post: Option<DateTime<Utc>>,
}

/// Aggregate totals and mean engagement for one creator.
#[must_use]
pub fn creator_stats(username: &str, follower_count: u64, videos: &[VideoRecord]) -> CreatorStats {
    let rates: Vec<f64> = videos.iter().map(record_engagement).collect();
    let dates: Vec<DateTime<Utc>> = videos.iter().filter_map(|v| v.posted_at).collect();

    CreatorStats {
        username: username.to_string(),
        total_videos: videos.len(),
        total_views: total(videos, |v| v.view_count),
        total_likes: total(videos, |v| v.like_count),
        avg_engagement_rate: round_to(mean(&rates), 2),
        follower_count,
        earliest_post: dates.iter().min().copied(),
        latest_post: dates.iter().max().copied(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourEngagement {
    pub hour: u32,
    pub avg_engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEngagement {
    pub day: &'static str,
    pub avg_engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostingPatterns {
    /// Top three posting hours (UTC) by mean engagement, best first.
    pub best_hours: Vec<HourEngagement>,
    /// Every weekday with at least one post, best first.
    pub best_days: Vec<DayEngagement>,
    pub posting_frequency: f64,
    /// Includes videos without a timestamp.
    pub total_posts: usize,
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Mean engagement by posting hour and weekday, plus posting cadence.
#[must_use]
pub fn posting_patterns(videos: &[VideoRecord]) -> PostingPatterns {
    let mut by_hour: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    let mut by_day: BTreeMap<u32, (Weekday, Vec<f64>)> = BTreeMap::new();
    let mut dates = Vec::new();

    for video in videos {
        let Some(posted_at) = video.posted_at else {
            continue;
        };
        let rate = record_engagement(video);
        by_hour.entry(posted_at.hour()).or_default().push(rate);
        by_day
            .entry(posted_at.weekday().num_days_from_monday())
            .or_insert_with(|| (posted_at.weekday(), Vec::new()))
            .1
            .push(rate);
        dates.push(posted_at);
    }

    let mut best_hours: Vec<HourEngagement> = by_hour
        .into_iter()
        .map(|(hour, rates)| HourEngagement {
            hour,
            avg_engagement_rate: round_to(mean(&rates), 3),
        })
        .collect();
    best_hours.sort_by(|a, b| b.avg_engagement_rate.total_cmp(&a.avg_engagement_rate));
    best_hours.truncate(3);

    let mut best_days: Vec<DayEngagement> = by_day
        .into_values()
        .map(|(day, rates)| DayEngagement {
            day: weekday_name(day),
            avg_engagement_rate: round_to(mean(&rates), 3),
        })
        .collect();
    best_days.sort_by(|a, b| b.avg_engagement_rate.total_cmp(&a.avg_engagement_rate));

    PostingPatterns {
        best_hours,
        best_days,
        posting_frequency: posting_frequency(&dates),
        total_posts: videos.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoPerformance {
    pub external_id: String,
    pub caption: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
    pub engagement_rate: f64,
    pub posted_at: Option<DateTime<Utc>>,
}

/// The `limit` best videos by engagement rate, best first.
#[must_use]
pub fn content_performance(videos: &[VideoRecord], limit: usize) -> Vec<VideoPerformance> {
    let mut scored: Vec<VideoPerformance> = videos
        .iter()
        .map(|v| VideoPerformance {
            external_id: v.external_id.clone(),
            caption: v.caption.clone(),
            view_count: v.view_count,
            like_count: v.like_count,
            comment_count: v.comment_count,
            share_count: v.share_count,
            engagement_rate: round_to(record_engagement(v), 2),
            posted_at: v.posted_at,
        })
        .collect();
    scored.sort_by(|a, b| b.engagement_rate.total_cmp(&a.engagement_rate));
    scored.truncate(limit);
    scored
}

/// One creator's stored videos, as input to [`compare_creators`].
#[derive(Debug, Clone, Copy)]
pub struct CreatorVideos<'a> {
    pub username: &'a str,
    pub follower_count: u64,
    pub videos: &'a [VideoRecord],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatorComparison {
    pub username: String,
    pub avg_views: u64,
    pub avg_likes: u64,
    pub avg_comments: u64,
    pub avg_engagement_rate: f64,
    pub total_videos: usize,
    pub posting_frequency: f64,
    pub follower_count: u64,
}

/// Side-by-side averages for several creators, in input order.
#[must_use]
pub fn compare_creators(creators: &[CreatorVideos<'_>]) -> Vec<CreatorComparison> {
    creators
        .iter()
        .map(|c| {
            let n = c.videos.len() as u64;
            let avg = |total: u64| total.checked_div(n).unwrap_or(0);
            let rates: Vec<f64> = c.videos.iter().map(record_engagement).collect();
            let dates: Vec<DateTime<Utc>> = c.videos.iter().filter_map(|v| v.posted_at).collect();

            CreatorComparison {
                username: c.username.to_string(),
                avg_views: avg(total(c.videos, |v| v.view_count)),
                avg_likes: avg(total(c.videos, |v| v.like_count)),
                avg_comments: avg(total(c.videos, |v| v.comment_count)),
                avg_engagement_rate: round_to(mean(&rates), 2),
                total_videos: c.videos.len(),
                posting_frequency: if dates.len() >= 2 {
                    posting_frequency(&dates)
                } else {
                    0.0
                },
                follower_count: c.follower_count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn video(id: &str, views: u64, likes: u64, posted_at: Option<DateTime<Utc>>) -> VideoRecord {
        VideoRecord {
            external_id: id.to_string(),
            author_username: "creator".to_string(),
            caption: format!("caption {id}"),
            view_count: views,
            like_count: likes,
            comment_count: 0,
            share_count: 0,
            posted_at,
            duration_seconds: 15.0,
            hashtags: vec![],
        }
    }

    fn at(day: u32, hour: u32) -> Option<DateTime<Utc>> {
        // 2026-06-01 is a Monday.
        Some(Utc.with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap())
    }

    #[test]
    fn engagement_rate_is_zero_without_views() {
        assert!(engagement_rate(10, 5, 1, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn engagement_rate_is_percentage() {
        assert!((engagement_rate(80, 15, 5, 1_000) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn creator_stats_for_empty_videos() {
        let stats = creator_stats("nobody", 42, &[]);
        assert_eq!(stats.total_videos, 0);
        assert_eq!(stats.total_views, 0);
        assert!(stats.avg_engagement_rate.abs() < f64::EPSILON);
        assert_eq!(stats.follower_count, 42);
        assert!(stats.earliest_post.is_none());
    }

    #[test]
    fn creator_stats_totals_and_date_range() {
        let videos = vec![
            video("1", 1_000, 100, at(1, 9)),
            video("2", 2_000, 100, at(8, 18)),
            video("3", 0, 0, None),
        ];
        let stats = creator_stats("creator", 5_000, &videos);
        assert_eq!(stats.total_videos, 3);
        assert_eq!(stats.total_views, 3_000);
        assert_eq!(stats.total_likes, 200);
        // (10 + 5 + 0) / 3
        assert!((stats.avg_engagement_rate - 5.0).abs() < 1e-9);
        assert_eq!(stats.earliest_post, at(1, 9));
        assert_eq!(stats.latest_post, at(8, 18));
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let videos = vec![video("a", u64::MAX, u64::MAX, None), video("b", 5, 5, None)];

        let stats = creator_stats("creator", 0, &videos);
        assert_eq!(stats.total_views, u64::MAX);
        assert_eq!(stats.total_likes, u64::MAX);

        let compared = compare_creators(&[CreatorVideos {
            username: "creator",
            follower_count: 0,
            videos: &videos,
        }]);
        assert_eq!(compared[0].avg_views, u64::MAX / 2);
        assert_eq!(compared[0].avg_likes, u64::MAX / 2);
    }

    #[test]
    fn posting_patterns_ranks_hours_and_days() {
        let videos = vec![
            video("1", 1_000, 300, at(1, 9)),
            video("2", 1_000, 100, at(2, 12)),
            video("3", 1_000, 50, at(3, 20)),
            video("4", 1_000, 10, at(4, 23)),
            video("5", 1_000, 500, None),
        ];
        let patterns = posting_patterns(&videos);
        let hours: Vec<u32> = patterns.best_hours.iter().map(|h| h.hour).collect();
        assert_eq!(hours, vec![9, 12, 20]);
        assert_eq!(patterns.best_days[0].day, "Monday");
        assert_eq!(patterns.best_days.len(), 4);
        assert_eq!(patterns.total_posts, 5);
        // 4 dated posts over 3 days.
        assert!((patterns.posting_frequency - 1.33).abs() < 1e-9);
    }

    #[test]
    fn posting_patterns_same_day_span_counts_as_one_day() {
        let videos = vec![video("1", 10, 1, at(1, 9)), video("2", 10, 1, at(1, 10))];
        assert!((posting_patterns(&videos).posting_frequency - 2.0).abs() < 1e-9);
    }

    #[test]
    fn content_performance_orders_by_engagement() {
        let videos = vec![
            video("low", 1_000, 10, None),
            video("high", 1_000, 200, None),
            video("mid", 1_000, 50, None),
        ];
        let top = content_performance(&videos, 2);
        let ids: Vec<&str> = top.iter().map(|v| v.external_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid"]);
        assert!((top[0].engagement_rate - 20.0).abs() < 1e-9);
    }

    #[test]
    fn compare_creators_handles_empty_and_sparse_dates() {
        let busy = vec![
            video("1", 1_000, 100, at(1, 9)),
            video("2", 3_001, 100, at(11, 9)),
        ];
        let single = vec![video("3", 500, 5, at(1, 9))];
        let rows = compare_creators(&[
            CreatorVideos {
                username: "busy",
                follower_count: 10,
                videos: &busy,
            },
            CreatorVideos {
                username: "single",
                follower_count: 20,
                videos: &single,
            },
            CreatorVideos {
                username: "empty",
                follower_count: 30,
                videos: &[],
            },
        ]);
        assert_eq!(rows[0].avg_views, 2_000);
        assert!((rows[0].posting_frequency - 0.2).abs() < 1e-9);
        assert!(rows[1].posting_frequency.abs() < f64::EPSILON);
        assert_eq!(rows[2].total_videos, 0);
        assert_eq!(rows[2].avg_views, 0);
        assert_eq!(rows[2].follower_count, 30);
    }
}
