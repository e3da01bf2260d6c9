//! Maps a raw platform item object onto a [`VideoRecord`].
//!
//! The same item shape appears in intercepted API responses and in the
//! embedded rehydration state, so both tiers share this mapper.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokscope_core::VideoRecord;

/// Reads an unsigned integer that may be encoded as a JSON number or a
/// numeric string. Anything else is `0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn json_u64(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

pub(crate) fn json_str(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn json_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
    .max(0.0)
}

/// The item id, accepted as a string or an integer under `id` or `video_id`.
fn external_id(item: &Value) -> Option<String> {
    let raw = item.get("id").or_else(|| item.get("video_id"))?;
    let id = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!id.is_empty()).then_some(id)
}

fn posted_at(item: &Value) -> Option<DateTime<Utc>> {
    let secs = json_u64(item.get("createTime"));
    if secs == 0 {
        return None;
    }
    DateTime::from_timestamp(i64::try_from(secs).ok()?, 0)
}

fn hashtags(item: &Value) -> Vec<String> {
    item.get("textExtra")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get("hashtagName").and_then(Value::as_str))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Maps one platform item. Returns `None` when the item has no usable id.
#[must_use]
pub fn map_item(item: &Value, author_username: &str) -> Option<VideoRecord> {
    let external_id = external_id(item)?;
    let stats = item.get("stats");
    let stat = |key: &str| stats.and_then(|s| s.get(key));

    let like_count = match stat("diggCount") {
        Some(digg) if !digg.is_null() => json_u64(Some(digg)),
        _ => json_u64(stat("likeCount")),
    };

    Some(VideoRecord {
        external_id,
        author_username: author_username.to_string(),
        caption: json_str(item.get("desc")),
        view_count: json_u64(stat("playCount")),
        like_count,
        comment_count: json_u64(stat("commentCount")),
        share_count: json_u64(stat("shareCount")),
        posted_at: posted_at(item),
        duration_seconds: json_f64(item.get("video").and_then(|v| v.get("duration"))),
        hashtags: hashtags(item),
    })
}

/// Maps every entry of an item array, dropping entries without an id.
#[must_use]
pub fn map_items(items: &[Value], author_username: &str) -> Vec<VideoRecord> {
    items
        .iter()
        .filter_map(|item| map_item(item, author_username))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn maps_full_item() {
        let item = json!({
            "id": "7301234567890123456",
            "desc": "Wait for it #fyp #comedy",
            "createTime": 1_717_243_200,
            "stats": {
                "playCount": 1_200_000,
                "diggCount": 95_000,
                "commentCount": 1_200,
                "shareCount": "340"
            },
            "video": { "duration": 21 },
            "textExtra": [
                { "hashtagName": "fyp" },
                { "hashtagName": "" },
                { "userId": "123" },
                { "hashtagName": "comedy" }
            ]
        });

        let record = map_item(&item, "khaby.lame").unwrap();
        assert_eq!(record.external_id, "7301234567890123456");
        assert_eq!(record.author_username, "khaby.lame");
        assert_eq!(record.caption, "Wait for it #fyp #comedy");
        assert_eq!(record.view_count, 1_200_000);
        assert_eq!(record.like_count, 95_000);
        assert_eq!(record.comment_count, 1_200);
        assert_eq!(record.share_count, 340);
        assert!((record.duration_seconds - 21.0).abs() < f64::EPSILON);
        assert_eq!(record.hashtags, vec!["fyp", "comedy"]);
        assert_eq!(
            record.posted_at.map(|t| t.timestamp()),
            Some(1_717_243_200)
        );
    }

    #[test]
    fn missing_id_is_dropped() {
        let item = json!({ "desc": "no id", "stats": { "playCount": 10 } });
        assert!(map_item(&item, "a").is_none());
        assert!(map_item(&json!({ "id": "" }), "a").is_none());
        assert!(map_item(&json!({ "id": null }), "a").is_none());
    }

    #[test]
    fn numeric_and_alternate_ids() {
        let numeric = json!({ "id": 7_300_000_000_000_000_001_u64 });
        assert_eq!(
            map_item(&numeric, "a").unwrap().external_id,
            "7300000000000000001"
        );
        let alternate = json!({ "video_id": "42" });
        assert_eq!(map_item(&alternate, "a").unwrap().external_id, "42");
    }

    #[test]
    fn like_count_falls_back_when_digg_count_absent() {
        let item = json!({ "id": "1", "stats": { "likeCount": 77 } });
        assert_eq!(map_item(&item, "a").unwrap().like_count, 77);

        let both = json!({ "id": "1", "stats": { "diggCount": 5, "likeCount": 77 } });
        assert_eq!(map_item(&both, "a").unwrap().like_count, 5);
    }

    #[test]
    fn missing_stats_default_to_zero() {
        let record = map_item(&json!({ "id": "1" }), "a").unwrap();
        assert_eq!(record.view_count, 0);
        assert_eq!(record.like_count, 0);
        assert!(record.posted_at.is_none());
        assert!(record.hashtags.is_empty());
        assert!(record.caption.is_empty());
    }

    #[test]
    fn json_u64_accepts_numeric_strings() {
        assert_eq!(json_u64(Some(&json!("1500"))), 1500);
        assert_eq!(json_u64(Some(&json!("1.5K"))), 0);
        assert_eq!(json_u64(Some(&json!(-3))), 0);
        assert_eq!(json_u64(Some(&json!(12.7))), 12);
        assert_eq!(json_u64(None), 0);
    }
}
