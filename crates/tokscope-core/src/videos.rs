use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Follower counts at or below this value are treated as anti-bot placeholders
/// and never overwrite a stored value.
pub const PLAUSIBLE_FOLLOWER_FLOOR: u64 = 1_000;

/// Profile statistics read from a creator's page during one scrape attempt.
///
/// All fields are zero/empty when extraction fails. Only `follower_count`
/// ever reaches storage, and only when it clears [`PLAUSIBLE_FOLLOWER_FLOOR`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub follower_count: u64,
    pub following_count: u64,
    pub total_likes: u64,
    pub video_count: u64,
}

impl ProfileSummary {
    /// Returns `true` when the follower count is high enough to trust.
    #[must_use]
    pub fn has_plausible_follower_count(&self) -> bool {
        self.follower_count > PLAUSIBLE_FOLLOWER_FLOOR
    }
}

/// A single published video, regardless of which extraction tier (or the
/// synthetic generator) produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Platform-assigned numeric id, kept as a string to avoid precision loss.
    pub external_id: String,
    pub author_username: String,
    pub caption: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
    pub posted_at: Option<DateTime<Utc>>,
    pub duration_seconds: f64,
    /// Hashtag names without the leading `#`, in caption order.
    pub hashtags: Vec<String>,
}

impl VideoRecord {
    /// A record carrying only an id and view count, as recovered from the
    /// rendered DOM.
    #[must_use]
    pub fn sparse(external_id: String, author_username: String, view_count: u64) -> Self {
        Self {
            external_id,
            author_username,
            caption: String::new(),
            view_count,
            like_count: 0,
            comment_count: 0,
            share_count: 0,
            posted_at: None,
            duration_seconds: 0.0,
            hashtags: Vec::new(),
        }
    }

    /// Public page for this video under `base_url` (e.g. `https://www.tiktok.com`).
    #[must_use]
    pub fn canonical_url(&self, base_url: &str) -> String {
        format!(
            "{}/@{}/video/{}",
            base_url.trim_end_matches('/'),
            self.author_username,
            self.external_id
        )
    }

    /// Returns `true` if any headline metric is non-zero.
    #[must_use]
    pub fn has_engagement(&self) -> bool {
        self.view_count > 0 || self.like_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_url_joins_author_and_id() {
        let record = VideoRecord::sparse("7301".to_string(), "khaby.lame".to_string(), 0);
        assert_eq!(
            record.canonical_url("https://www.tiktok.com/"),
            "https://www.tiktok.com/@khaby.lame/video/7301"
        );
    }

    #[test]
    fn follower_floor_is_exclusive() {
        let mut profile = ProfileSummary {
            follower_count: PLAUSIBLE_FOLLOWER_FLOOR,
            ..ProfileSummary::default()
        };
        assert!(!profile.has_plausible_follower_count());
        profile.follower_count += 1;
        assert!(profile.has_plausible_follower_count());
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let record = VideoRecord::sparse("1".to_string(), "a".to_string(), 5);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["external_id"], "1");
        assert_eq!(value["view_count"], 5);
        assert!(value["posted_at"].is_null());
    }
}
