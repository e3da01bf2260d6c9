//! Last-resort extraction from the rendered DOM: ids and view counts only.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tokscope_core::VideoRecord;

use crate::count::parse_count;
use crate::error::ExtractionFailure;
use crate::session::{DomCandidate, PageSession};
use crate::tier::TierOutcome;

pub const POST_ITEM_SELECTOR: &str = r#"[data-e2e="user-post-item"]"#;
pub const VIDEO_LINK_SELECTOR: &str = r#"a[href*="/video/"]"#;
pub const VIEW_LABEL_SELECTOR: &str = r#"[data-e2e="video-views"], strong"#;

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/video/(\d+)").expect("valid regex"));

fn video_id(href: &str) -> Option<&str> {
    VIDEO_ID
        .captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Turns candidates into sparse records, skipping ones without an id and
/// repeats within the pass.
#[must_use]
pub fn candidates_to_records(
    candidates: &[DomCandidate],
    author_username: &str,
    limit: usize,
) -> Vec<VideoRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for candidate in candidates.iter().take(limit) {
        let Some(id) = candidate
            .href
            .as_deref()
            .and_then(video_id)
            .or_else(|| candidate.child_href.as_deref().and_then(video_id))
        else {
            continue;
        };
        if !seen.insert(id.to_string()) {
            continue;
        }
        let views = candidate.view_label.as_deref().map_or(0, parse_count);
        records.push(VideoRecord::sparse(
            id.to_string(),
            author_username.to_string(),
            views,
        ));
    }

    records
}

/// Queries the post-item grid, falling back to any video link when the grid
/// selector matches nothing.
pub fn extract_dom_videos<S: PageSession + ?Sized>(
    session: &mut S,
    author_username: &str,
    limit: usize,
) -> TierOutcome {
    let candidates = match session.video_candidates(POST_ITEM_SELECTOR, limit) {
        Ok(found) if !found.is_empty() => Ok(found),
        Ok(_) => session.video_candidates(VIDEO_LINK_SELECTOR, limit),
        Err(e) => Err(e),
    };

    match candidates {
        Ok(candidates) => {
            TierOutcome::from_videos(candidates_to_records(&candidates, author_username, limit))
        }
        Err(e) => {
            tracing::warn!(username = author_username, error = %e, "DOM query failed");
            TierOutcome::Failed(ExtractionFailure::from(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(href: Option<&str>, child: Option<&str>, views: Option<&str>) -> DomCandidate {
        DomCandidate {
            href: href.map(str::to_string),
            child_href: child.map(str::to_string),
            view_label: views.map(str::to_string),
        }
    }

    #[test]
    fn resolves_own_then_child_href() {
        let records = candidates_to_records(
            &[
                candidate(Some("/@a/video/111"), None, Some("1.2M")),
                candidate(None, Some("https://www.tiktok.com/@a/video/222?lang=en"), Some("980")),
                candidate(Some("/@a/photo/333"), Some("/@a/video/444"), None),
            ],
            "a",
            10,
        );
        let ids: Vec<&str> = records.iter().map(|r| r.external_id.as_str()).collect();
        assert_eq!(ids, vec!["111", "222", "444"]);
        assert_eq!(records[0].view_count, 1_200_000);
        assert_eq!(records[1].view_count, 980);
        assert_eq!(records[2].view_count, 0);
    }

    #[test]
    fn skips_missing_ids_and_duplicates() {
        let records = candidates_to_records(
            &[
                candidate(Some("/@a/live"), None, Some("5K")),
                candidate(Some("/@a/video/1"), None, Some("5K")),
                candidate(None, Some("/@a/video/1"), Some("6K")),
            ],
            "a",
            10,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].view_count, 5_000);
    }

    #[test]
    fn bounded_by_limit() {
        let candidates: Vec<DomCandidate> = (0..10)
            .map(|i| candidate(Some(&format!("/video/{i}")), None, None))
            .collect();
        assert_eq!(candidates_to_records(&candidates, "a", 4).len(), 4);
    }

    #[test]
    fn records_are_sparse() {
        let records =
            candidates_to_records(&[candidate(Some("/video/9"), None, Some("10"))], "a", 1);
        assert!(records[0].caption.is_empty());
        assert_eq!(records[0].like_count, 0);
        assert!(records[0].posted_at.is_none());
        assert!(records[0].hashtags.is_empty());
    }
}
