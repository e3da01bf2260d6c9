use std::path::PathBuf;
use std::time::Duration;

use tokscope_core::AppConfig;

/// Pixels per scroll step.
pub const SCROLL_STEP_PX: u32 = 1000;
/// Upper bound on scroll cycles in the first scrolling phase.
pub const MAX_SCROLL_CYCLES: usize = 10;
/// Scroll cycles after a retry-button click.
pub const RESCROLL_CYCLES: usize = 5;
pub const VIEWPORT: (u32, u32) = (1280, 720);

/// Button texts treated as the platform's "try again" affordance.
pub const RETRY_LABELS: [&str; 3] = ["refresh", "retry", "try again"];

/// Fixed parameters of one scrape attempt.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub user_agent: String,
    pub headless: bool,
    pub navigation_timeout: Duration,
    pub settle_delay: Duration,
    pub scroll_pause: Duration,
    pub scroll_step_px: u32,
    pub max_scroll_cycles: usize,
    pub rescroll_cycles: usize,
    /// `None` skips debug artifacts.
    pub debug_dir: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.tiktok.com".to_string(),
            user_agent: String::new(),
            headless: true,
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(5),
            scroll_pause: Duration::from_millis(2000),
            scroll_step_px: SCROLL_STEP_PX,
            max_scroll_cycles: MAX_SCROLL_CYCLES,
            rescroll_cycles: RESCROLL_CYCLES,
            debug_dir: None,
        }
    }
}

impl ScraperConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.platform_base_url.clone(),
            user_agent: config.scraper_user_agent.clone(),
            headless: config.scraper_headless,
            navigation_timeout: Duration::from_secs(config.scraper_navigation_timeout_secs),
            settle_delay: Duration::from_secs(config.scraper_settle_secs),
            scroll_pause: Duration::from_millis(config.scraper_scroll_pause_ms),
            debug_dir: config.debug_dir.clone(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn profile_url(&self, username: &str) -> String {
        format!("{}/@{username}", self.base_url.trim_end_matches('/'))
    }

    /// `min(max_scroll_cycles, limit / 3)`.
    #[must_use]
    pub fn scroll_cycles(&self, limit: usize) -> usize {
        self.max_scroll_cycles.min(limit / 3)
    }
}
