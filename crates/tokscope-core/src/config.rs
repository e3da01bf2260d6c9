use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Chrome 131 desktop UA; the platform serves a degraded page to obvious bots.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Load application configuration from environment variables already in the process.
///
/// Does NOT load `.env` files; the binary calls `dotenvy::dotenv()` first.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(invalid(var, format!("expected a boolean, got \"{raw}\""))),
        }
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("TOKSCOPE_ENV", "development"))?;
    let log_level = or_default("TOKSCOPE_LOG_LEVEL", "info");
    let creators_path = PathBuf::from(or_default(
        "TOKSCOPE_CREATORS_PATH",
        "./config/creators.yaml",
    ));

    let db_max_connections = parse_u32("TOKSCOPE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("TOKSCOPE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("TOKSCOPE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let platform_base_url = or_default("TOKSCOPE_PLATFORM_BASE_URL", "https://www.tiktok.com")
        .trim_end_matches('/')
        .to_string();
    if !platform_base_url.starts_with("http://") && !platform_base_url.starts_with("https://") {
        return Err(invalid(
            "TOKSCOPE_PLATFORM_BASE_URL",
            "must start with http:// or https://".to_string(),
        ));
    }

    let scraper_user_agent = or_default("TOKSCOPE_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_headless = parse_bool("TOKSCOPE_SCRAPER_HEADLESS", "true")?;
    let scraper_navigation_timeout_secs =
        parse_u64("TOKSCOPE_SCRAPER_NAVIGATION_TIMEOUT_SECS", "30")?;
    let scraper_settle_secs = parse_u64("TOKSCOPE_SCRAPER_SETTLE_SECS", "5")?;
    let scraper_scroll_pause_ms = parse_u64("TOKSCOPE_SCRAPER_SCROLL_PAUSE_MS", "2000")?;
    let scraper_video_limit = parse_usize("TOKSCOPE_SCRAPER_VIDEO_LIMIT", "30")?;
    if scraper_video_limit == 0 {
        return Err(invalid(
            "TOKSCOPE_SCRAPER_VIDEO_LIMIT",
            "must be at least 1".to_string(),
        ));
    }
    let scraper_max_concurrent_creators =
        parse_usize("TOKSCOPE_SCRAPER_MAX_CONCURRENT_CREATORS", "1")?;

    let debug_dir = Some(or_default("TOKSCOPE_DEBUG_DIR", "./data/debug"))
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        creators_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        platform_base_url,
        scraper_user_agent,
        scraper_headless,
        scraper_navigation_timeout_secs,
        scraper_settle_secs,
        scraper_scroll_pause_ms,
        scraper_video_limit,
        scraper_max_concurrent_creators,
        debug_dir,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TOKSCOPE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
