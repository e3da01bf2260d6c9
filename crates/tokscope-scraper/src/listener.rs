//! Collects video records from intercepted internal API responses.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tokscope_core::VideoRecord;

use crate::error::{ExtractionFailure, SessionError};
use crate::item::map_items;
use crate::tier::{Tier, TierOutcome};

/// URL fragments of the internal endpoints that carry item lists.
pub const ITEM_ENDPOINTS: [&str; 2] = ["/api/post/item_list", "/api/comment/list"];

#[must_use]
pub fn matches_endpoint(url: &str) -> bool {
    ITEM_ENDPOINTS.iter().any(|pattern| url.contains(pattern))
}

/// Reads `itemList`, falling back to `items`, from one response body.
///
/// # Errors
///
/// Returns a description of the problem when the body is not JSON.
pub fn decode_item_list(body: &str, author_username: &str) -> Result<Vec<VideoRecord>, String> {
    let payload: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let items = payload
        .get("itemList")
        .and_then(Value::as_array)
        .or_else(|| payload.get("items").and_then(Value::as_array));
    Ok(items
        .map(|items| map_items(items, author_username))
        .unwrap_or_default())
}

#[derive(Debug, Default)]
struct ListenerState {
    videos: Vec<VideoRecord>,
    seen: HashSet<String>,
    responses: usize,
    decode_failures: usize,
    last_failure: Option<String>,
}

/// Shared accumulator handed to the browser's response hook.
///
/// Clones share state. Observations from any thread are merged in arrival
/// order; a repeated external id keeps its first occurrence.
#[derive(Debug, Clone)]
pub struct ApiResponseListener {
    author_username: Arc<str>,
    state: Arc<Mutex<ListenerState>>,
}

impl ApiResponseListener {
    #[must_use]
    pub fn new(author_username: &str) -> Self {
        Self {
            author_username: Arc::from(author_username),
            state: Arc::new(Mutex::new(ListenerState::default())),
        }
    }

    // A panic in another observer must not discard what was already collected.
    fn lock(&self) -> MutexGuard<'_, ListenerState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Handles one network response. `fetch_body` is only called for URLs that
    /// match [`ITEM_ENDPOINTS`]. Returns the number of new records.
    pub fn observe<F>(&self, url: &str, fetch_body: F) -> usize
    where
        F: FnOnce() -> Result<String, SessionError>,
    {
        if !matches_endpoint(url) {
            return 0;
        }

        let decoded = fetch_body()
            .map_err(|e| e.to_string())
            .and_then(|body| decode_item_list(&body, &self.author_username));

        let mut state = self.lock();
        state.responses += 1;
        match decoded {
            Ok(videos) => {
                let before = state.videos.len();
                for video in videos {
                    if state.seen.insert(video.external_id.clone()) {
                        state.videos.push(video);
                    }
                }
                let added = state.videos.len() - before;
                tracing::debug!(url, added, "item list response captured");
                added
            }
            Err(reason) => {
                tracing::warn!(url, error = %reason, "skipping undecodable item list response");
                state.decode_failures += 1;
                state.last_failure = Some(reason);
                0
            }
        }
    }

    #[must_use]
    pub fn video_count(&self) -> usize {
        self.lock().videos.len()
    }

    #[must_use]
    pub fn decode_failures(&self) -> usize {
        self.lock().decode_failures
    }

    /// Everything collected so far as a tier outcome.
    ///
    /// Reports `Failed` only when no response decoded into any record and at
    /// least one matching response was malformed.
    #[must_use]
    pub fn outcome(&self) -> TierOutcome {
        let state = self.lock();
        if !state.videos.is_empty() {
            return TierOutcome::Found(state.videos.clone());
        }
        match &state.last_failure {
            Some(reason) => TierOutcome::Failed(ExtractionFailure::Decode {
                tier: Tier::ApiResponses,
                reason: format!(
                    "{} of {} responses undecodable; last: {reason}",
                    state.decode_failures, state.responses
                ),
            }),
            None => TierOutcome::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_URL: &str = "https://www.tiktok.com/api/post/item_list/?count=30&cursor=0";

    fn body(ids: &[&str]) -> String {
        let items: Vec<Value> = ids
            .iter()
            .map(|id| serde_json::json!({ "id": id, "stats": { "playCount": 10 } }))
            .collect();
        serde_json::json!({ "itemList": items }).to_string()
    }

    #[test]
    fn ignores_unrelated_urls_without_fetching() {
        let listener = ApiResponseListener::new("a");
        let added = listener.observe("https://www.tiktok.com/api/user/detail", || {
            panic!("body must not be fetched")
        });
        assert_eq!(added, 0);
        assert!(matches!(listener.outcome(), TierOutcome::Empty));
    }

    #[test]
    fn accumulates_and_dedupes_across_responses() {
        let listener = ApiResponseListener::new("a");
        assert_eq!(listener.observe(LIST_URL, || Ok(body(&["1", "2"]))), 2);
        assert_eq!(listener.observe(LIST_URL, || Ok(body(&["2", "3"]))), 1);
        assert_eq!(listener.video_count(), 3);

        let TierOutcome::Found(videos) = listener.outcome() else {
            panic!("expected videos");
        };
        let ids: Vec<&str> = videos.iter().map(|v| v.external_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(videos.iter().all(|v| v.author_username == "a"));
    }

    #[test]
    fn falls_back_to_items_key() {
        let records = decode_item_list(r#"{"items":[{"id":"9"}]}"#, "a").unwrap();
        assert_eq!(records.len(), 1);
        assert!(decode_item_list(r#"{"status":0}"#, "a").unwrap().is_empty());
    }

    #[test]
    fn malformed_response_is_counted_not_fatal() {
        let listener = ApiResponseListener::new("a");
        listener.observe("https://x/api/comment/list/?aweme_id=1", || {
            Ok("<html>".to_string())
        });
        assert_eq!(listener.decode_failures(), 1);
        assert!(matches!(
            listener.outcome(),
            TierOutcome::Failed(ExtractionFailure::Decode {
                tier: Tier::ApiResponses,
                ..
            })
        ));

        listener.observe(LIST_URL, || Ok(body(&["5"])));
        assert_eq!(listener.outcome().len(), 1);
    }

    #[test]
    fn body_fetch_failure_is_counted() {
        let listener = ApiResponseListener::new("a");
        listener.observe(LIST_URL, || Err(SessionError::new("response body", "evicted")));
        assert_eq!(listener.decode_failures(), 1);
    }

    #[test]
    fn clones_share_state() {
        let listener = ApiResponseListener::new("a");
        let hook = listener.clone();
        std::thread::spawn(move || {
            hook.observe(LIST_URL, || Ok(body(&["1"])));
        })
        .join()
        .unwrap();
        assert_eq!(listener.video_count(), 1);
    }
}
