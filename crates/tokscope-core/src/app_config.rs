use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub creators_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Origin of the tracked platform, e.g. `https://www.tiktok.com`.
    pub platform_base_url: String,
    pub scraper_user_agent: String,
    pub scraper_headless: bool,
    pub scraper_navigation_timeout_secs: u64,
    pub scraper_settle_secs: u64,
    pub scraper_scroll_pause_ms: u64,
    pub scraper_video_limit: usize,
    pub scraper_max_concurrent_creators: usize,
    /// `None` disables screenshot and JSON debug dumps.
    pub debug_dir: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("creators_path", &self.creators_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("platform_base_url", &self.platform_base_url)
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_headless", &self.scraper_headless)
            .field(
                "scraper_navigation_timeout_secs",
                &self.scraper_navigation_timeout_secs,
            )
            .field("scraper_settle_secs", &self.scraper_settle_secs)
            .field("scraper_scroll_pause_ms", &self.scraper_scroll_pause_ms)
            .field("scraper_video_limit", &self.scraper_video_limit)
            .field(
                "scraper_max_concurrent_creators",
                &self.scraper_max_concurrent_creators,
            )
            .field("debug_dir", &self.debug_dir)
            .finish()
    }
}
