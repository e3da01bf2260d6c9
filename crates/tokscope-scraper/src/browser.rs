//! [`PageSession`] backed by a headless Chrome process.

use std::sync::Arc;
use std::time::Duration;

use headless_chrome::protocol::cdp::Network::events::ResponseReceivedEventParams;
use headless_chrome::protocol::cdp::Network::GetResponseBodyReturnObject;
use headless_chrome::protocol::cdp::Page::{self, CaptureScreenshotFormatOption};
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;

use crate::config::{ScraperConfig, VIEWPORT};
use crate::dom::VIEW_LABEL_SELECTOR;
use crate::error::SessionError;
use crate::listener::ApiResponseListener;
use crate::session::{DomCandidate, PageSession};

const LISTENER_NAME: &str = "tokscope-item-list";
/// Slack on top of the longest scripted wait before Chrome reaps an idle session.
const IDLE_GRACE: Duration = Duration::from_secs(60);

fn session_error(operation: &'static str, err: &anyhow::Error) -> SessionError {
    SessionError::new(operation, format!("{err:#}"))
}

/// Clip covering the whole laid-out document, or `None` (viewport only) when
/// the reported size is unusable.
fn full_page_clip(width: f64, height: f64) -> Option<Page::Viewport> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    (usable(width) && usable(height)).then_some(Page::Viewport {
        x: 0.0,
        y: 0.0,
        width,
        height,
        scale: 1.0,
    })
}

fn js_literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// One Chrome process with one tab. Dropping it terminates the process.
pub struct ChromeSession {
    tab: Arc<Tab>,
    // Held for its Drop; the process dies with it.
    _browser: Browser,
}

impl ChromeSession {
    /// Starts Chrome with the configured headless flag, viewport and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if Chrome cannot be started or the tab cannot
    /// be prepared.
    pub fn launch(config: &ScraperConfig) -> Result<Self, SessionError> {
        let options = LaunchOptions {
            headless: config.headless,
            window_size: Some(VIEWPORT),
            idle_browser_timeout: config.navigation_timeout
                + config.settle_delay
                + config.scroll_pause
                + IDLE_GRACE,
            ..LaunchOptions::default()
        };

        let browser = Browser::new(options).map_err(|e| session_error("launch", &e))?;
        let tab = browser.new_tab().map_err(|e| session_error("open tab", &e))?;
        if !config.user_agent.is_empty() {
            tab.set_user_agent(&config.user_agent, Some("en-US,en"), None)
                .map_err(|e| session_error("set user agent", &e))?;
        }

        Ok(Self {
            tab,
            _browser: browser,
        })
    }

    fn evaluate(&self, operation: &'static str, script: &str) -> Result<Option<Value>, SessionError> {
        self.tab
            .evaluate(script, false)
            .map(|remote| remote.value)
            .map_err(|e| session_error(operation, &e))
    }
}

impl PageSession for ChromeSession {
    fn attach_listener(&mut self, listener: ApiResponseListener) -> Result<(), SessionError> {
        self.tab
            .register_response_handling(
                LISTENER_NAME,
                Box::new(
                    move |params: ResponseReceivedEventParams,
                          fetch_body: &dyn Fn() -> anyhow::Result<GetResponseBodyReturnObject>| {
                        listener.observe(&params.response.url, || {
                            let body =
                                fetch_body().map_err(|e| session_error("response body", &e))?;
                            if body.base_64_encoded {
                                return Err(SessionError::new("response body", "binary payload"));
                            }
                            Ok(body.body)
                        });
                    },
                ),
            )
            .map_err(|e| session_error("attach listener", &e))?;
        Ok(())
    }

    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), SessionError> {
        self.tab.set_default_timeout(timeout);
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| session_error("navigate", &e))?;
        Ok(())
    }

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn scroll_by(&mut self, pixels: u32) -> Result<(), SessionError> {
        self.evaluate("scroll", &format!("window.scrollBy(0, {pixels})"))?;
        Ok(())
    }

    fn click_retry_affordance(&mut self, labels: &[&str]) -> Result<bool, SessionError> {
        let script = format!(
            r"(() => {{
                const labels = {labels};
                const target = Array.from(document.querySelectorAll('button')).find((b) => {{
                    const text = (b.innerText || '').trim().toLowerCase();
                    return b.offsetParent !== null && labels.some((l) => text.includes(l));
                }});
                if (!target) return false;
                target.click();
                return true;
            }})()",
            labels = js_literal(labels),
        );
        Ok(matches!(
            self.evaluate("retry click", &script)?,
            Some(Value::Bool(true))
        ))
    }

    fn content(&mut self) -> Result<String, SessionError> {
        self.tab
            .get_content()
            .map_err(|e| session_error("read content", &e))
    }

    fn video_candidates(
        &mut self,
        selector: &str,
        limit: usize,
    ) -> Result<Vec<DomCandidate>, SessionError> {
        let script = format!(
            r"(() => {{
                const items = Array.from(document.querySelectorAll({selector})).slice(0, {limit});
                return JSON.stringify(items.map((el) => {{
                    const link = el.querySelector('a[href]');
                    const label = el.querySelector({view});
                    return {{
                        href: el.getAttribute('href'),
                        childHref: link ? link.getAttribute('href') : null,
                        viewLabel: label ? label.textContent : null,
                    }};
                }}));
            }})()",
            selector = js_literal(selector),
            view = js_literal(VIEW_LABEL_SELECTOR),
        );

        match self.evaluate("query candidates", &script)? {
            Some(Value::String(json)) => serde_json::from_str(&json)
                .map_err(|e| SessionError::new("query candidates", e)),
            _ => Ok(Vec::new()),
        }
    }

    fn screenshot_png(&mut self) -> Result<Vec<u8>, SessionError> {
        let clip = match self.tab.call_method(Page::GetLayoutMetrics(None)) {
            Ok(metrics) => full_page_clip(
                metrics.css_content_size.width,
                metrics.css_content_size.height,
            ),
            Err(e) => {
                tracing::debug!(error = %e, "layout metrics unavailable; capturing viewport");
                None
            }
        };
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, clip, true)
            .map_err(|e| session_error("screenshot", &e))
    }
}
