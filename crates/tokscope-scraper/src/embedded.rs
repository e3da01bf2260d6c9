//! Server-rendered rehydration state embedded in the profile markup.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tokscope_core::{ProfileSummary, VideoRecord};

use crate::error::ExtractionFailure;
use crate::item::{json_str, json_u64, map_items};
use crate::tier::{Tier, TierOutcome};

static STATE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script[^>]*id="__UNIVERSAL_DATA_FOR_REHYDRATION__"[^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

const USER_DETAIL_SCOPE: &str = "webapp.user-detail";

/// Profile and videos read from the embedded state of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedState {
    pub profile: ProfileSummary,
    pub videos: TierOutcome,
}

impl EmbeddedState {
    fn empty(videos: TierOutcome) -> Self {
        Self {
            profile: ProfileSummary::default(),
            videos,
        }
    }
}

/// Returns the raw JSON payload of the rehydration script, if present.
#[must_use]
pub fn locate_state_payload(html: &str) -> Option<&str> {
    STATE_SCRIPT
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

fn read_profile(scope: &Value, requested_username: &str) -> ProfileSummary {
    let user_info = scope.get(USER_DETAIL_SCOPE).and_then(|d| d.get("userInfo"));
    let user = user_info.and_then(|u| u.get("user"));
    let stats = user_info.and_then(|u| u.get("stats"));
    let user_field = |key: &str| user.and_then(|u| u.get(key));
    let stat = |key: &str| stats.and_then(|s| s.get(key));

    let unique_id = json_str(user_field("uniqueId"));
    ProfileSummary {
        username: if unique_id.is_empty() {
            requested_username.to_string()
        } else {
            unique_id
        },
        display_name: json_str(user_field("nickname")),
        bio: json_str(user_field("signature")),
        follower_count: json_u64(stat("followerCount")),
        following_count: json_u64(stat("followingCount")),
        total_likes: json_u64(stat("heartCount")),
        video_count: json_u64(stat("videoCount")),
    }
}

/// Every `itemList` found directly under any scope entry, mapped in scope order.
fn read_scope_items(scope: &Value, author_username: &str) -> Vec<VideoRecord> {
    let Some(entries) = scope.as_object() else {
        return Vec::new();
    };
    entries
        .values()
        .filter_map(|entry| entry.get("itemList").and_then(Value::as_array))
        .flat_map(|items| map_items(items, author_username))
        .collect()
}

/// Parses the rehydration state out of `html`.
///
/// A missing script yields an empty profile and [`TierOutcome::Empty`]. A
/// script that is not valid JSON yields an empty profile and a decode failure.
#[must_use]
pub fn extract_embedded_state(html: &str, requested_username: &str) -> EmbeddedState {
    let Some(payload) = locate_state_payload(html) else {
        tracing::debug!(username = requested_username, "no rehydration script in page");
        return EmbeddedState::empty(TierOutcome::Empty);
    };

    let root: Value = match serde_json::from_str(payload) {
        Ok(root) => root,
        Err(e) => {
            tracing::warn!(username = requested_username, error = %e, "rehydration state is not valid JSON");
            return EmbeddedState::empty(TierOutcome::Failed(ExtractionFailure::Decode {
                tier: Tier::EmbeddedState,
                reason: e.to_string(),
            }));
        }
    };

    let Some(scope) = root.get("__DEFAULT_SCOPE__") else {
        return EmbeddedState::empty(TierOutcome::Empty);
    };

    EmbeddedState {
        profile: read_profile(scope, requested_username),
        videos: TierOutcome::from_videos(read_scope_items(scope, requested_username)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(state: &str) -> String {
        format!(
            "<html><head><script id=\"__UNIVERSAL_DATA_FOR_REHYDRATION__\" type=\"application/json\">{state}</script></head><body></body></html>"
        )
    }

    #[test]
    fn reads_profile_with_numeric_strings() {
        let html = page(
            r#"{"__DEFAULT_SCOPE__":{"webapp.user-detail":{"userInfo":{
                "user":{"uniqueId":"khaby.lame","nickname":"Khabane lame","signature":"If u wanna laugh u r in the right place"},
                "stats":{"followerCount":162400000,"followingCount":"78","heartCount":2500000000,"videoCount":1293}
            }}}}"#,
        );

        let state = extract_embedded_state(&html, "requested");
        assert_eq!(state.profile.username, "khaby.lame");
        assert_eq!(state.profile.display_name, "Khabane lame");
        assert_eq!(state.profile.follower_count, 162_400_000);
        assert_eq!(state.profile.following_count, 78);
        assert_eq!(state.profile.total_likes, 2_500_000_000);
        assert_eq!(state.profile.video_count, 1293);
        assert_eq!(state.videos, TierOutcome::Empty);
    }

    #[test]
    fn missing_keys_default_and_username_falls_back() {
        let html = page(r#"{"__DEFAULT_SCOPE__":{"webapp.user-detail":{"userInfo":{}}}}"#);
        let state = extract_embedded_state(&html, "requested");
        assert_eq!(state.profile.username, "requested");
        assert_eq!(state.profile.follower_count, 0);
        assert!(state.profile.bio.is_empty());
    }

    #[test]
    fn scans_every_scope_for_item_lists() {
        let html = page(
            r#"{"__DEFAULT_SCOPE__":{
                "webapp.app-context":{"language":"en"},
                "webapp.video-list":{"itemList":[{"id":"1","stats":{"playCount":5}},{"desc":"no id"}]},
                "webapp.more":{"itemList":[{"id":2}]}
            }}"#,
        );
        let state = extract_embedded_state(&html, "a");
        let TierOutcome::Found(videos) = state.videos else {
            panic!("expected videos");
        };
        assert_eq!(videos.len(), 2);
        assert!(videos.iter().any(|v| v.external_id == "2"));
    }

    #[test]
    fn absent_script_is_empty_not_failed() {
        let state = extract_embedded_state("<html><body>blocked</body></html>", "a");
        assert_eq!(state.profile, ProfileSummary::default());
        assert_eq!(state.videos, TierOutcome::Empty);
    }

    #[test]
    fn malformed_json_is_decode_failure() {
        let state = extract_embedded_state(&page("{not json"), "a");
        assert_eq!(state.profile, ProfileSummary::default());
        assert!(matches!(
            state.videos,
            TierOutcome::Failed(ExtractionFailure::Decode {
                tier: Tier::EmbeddedState,
                ..
            })
        ));
    }
}
