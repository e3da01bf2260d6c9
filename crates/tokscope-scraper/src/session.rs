//! The browser primitives the orchestrator drives.

use std::time::Duration;

use serde::Deserialize;

use crate::error::SessionError;
use crate::listener::ApiResponseListener;

/// One rendered element that may link to a video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomCandidate {
    /// The element's own `href`, if it is a link.
    pub href: Option<String>,
    /// `href` of the first descendant link.
    pub child_href: Option<String>,
    /// Text of the first view-count label inside the element.
    pub view_label: Option<String>,
}

/// A single page in a single browser, alive for one scrape attempt.
///
/// All calls block. Implementations release the underlying browser when
/// dropped.
pub trait PageSession {
    /// Route every network response of the page through `listener`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the hook cannot be installed.
    fn attach_listener(&mut self, listener: ApiResponseListener) -> Result<(), SessionError>;

    /// Load `url` and wait for navigation to finish within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] on network failure or timeout.
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), SessionError>;

    fn pause(&mut self, duration: Duration);

    /// # Errors
    ///
    /// Returns [`SessionError`] if the page rejects the scroll.
    fn scroll_by(&mut self, pixels: u32) -> Result<(), SessionError>;

    /// Click the first visible button whose text matches one of `labels`
    /// (case-insensitive). Returns whether anything was clicked.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the page cannot be queried.
    fn click_retry_affordance(&mut self, labels: &[&str]) -> Result<bool, SessionError>;

    /// Current page markup.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the markup cannot be read.
    fn content(&mut self) -> Result<String, SessionError>;

    /// Up to `limit` elements matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the DOM cannot be queried.
    fn video_candidates(
        &mut self,
        selector: &str,
        limit: usize,
    ) -> Result<Vec<DomCandidate>, SessionError>;

    /// PNG of the current viewport.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if capture fails.
    fn screenshot_png(&mut self) -> Result<Vec<u8>, SessionError>;
}
