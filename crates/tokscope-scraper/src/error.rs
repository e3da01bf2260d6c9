use thiserror::Error;
use tokscope_core::CoreError;

use crate::tier::Tier;

/// Hard failures of [`crate::scrape_creator`]. Platform-side conditions never
/// surface here; they degrade to an empty [`crate::ScrapeResult`].
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error(transparent)]
    InvalidUsername(#[from] CoreError),

    #[error("video limit must be at least 1")]
    InvalidVideoLimit,

    #[error("scrape worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// A recoverable reason one attempt (or one tier of it) produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    #[error("browser could not be launched: {reason}")]
    Launch { reason: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("{tier} payload could not be decoded: {reason}")]
    Decode { tier: Tier, reason: String },

    #[error("browser {operation} failed: {reason}")]
    Session {
        operation: &'static str,
        reason: String,
    },
}

/// Failure of a single browser primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation}: {reason}")]
pub struct SessionError {
    pub operation: &'static str,
    pub reason: String,
}

impl SessionError {
    pub fn new(operation: &'static str, reason: impl std::fmt::Display) -> Self {
        Self {
            operation,
            reason: reason.to_string(),
        }
    }
}

impl From<SessionError> for ExtractionFailure {
    fn from(err: SessionError) -> Self {
        ExtractionFailure::Session {
            operation: err.operation,
            reason: err.reason,
        }
    }
}
