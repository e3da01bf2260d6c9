//! Shared domain types, configuration, and analytics for tokscope.

pub mod analytics;
pub mod app_config;
pub mod config;
pub mod creators;
pub mod username;
pub mod videos;

use thiserror::Error;

pub use analytics::{
    compare_creators, content_performance, creator_stats, engagement_rate, posting_patterns,
    CreatorComparison, CreatorStats, CreatorVideos, DayEngagement, HourEngagement,
    PostingPatterns, VideoPerformance, TOP_VIDEO_COUNT,
};
pub use app_config::{AppConfig, Environment};
pub use config::load_app_config_from_env;
pub use creators::{load_creators, CreatorConfig, CreatorsFile};
pub use username::{validate_username, MAX_USERNAME_LEN};
pub use videos::{ProfileSummary, VideoRecord, PLAUSIBLE_FOLLOWER_FLOOR};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("invalid username \"{username}\": {reason}")]
    InvalidUsername { username: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read creators file {path}: {source}")]
    CreatorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse creators file: {0}")]
    CreatorsFileParse(#[from] serde_yaml::Error),

    #[error("creators file validation failed: {0}")]
    Validation(String),
}
