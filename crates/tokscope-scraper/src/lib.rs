//! Acquisition pipeline for creator profiles.
//!
//! One attempt loads a profile page in a headless browser and extracts videos
//! from three independent tiers: intercepted API responses, embedded
//! rehydration state, and the rendered DOM. The highest-priority tier with
//! data wins. [`resolve_scrape`] then substitutes a synthetic batch when the
//! result looks like anti-bot placeholder data.

pub mod authenticity;
pub mod browser;
pub mod config;
pub mod count;
pub mod debug;
pub mod dom;
pub mod embedded;
pub mod error;
pub mod fallback;
pub mod item;
pub mod listener;
pub mod orchestrator;
pub mod session;
pub mod synthetic;
pub mod tier;

pub use authenticity::is_authentic;
pub use browser::ChromeSession;
pub use config::ScraperConfig;
pub use count::parse_count;
pub use error::{ExtractionFailure, ScraperError, SessionError};
pub use fallback::{resolve_scrape, Resolution, SYNTHETIC_BATCH_SIZE};
pub use listener::ApiResponseListener;
pub use orchestrator::{run_attempt, scrape_creator, scrape_with, AttemptState, ScrapeResult};
pub use session::{DomCandidate, PageSession};
pub use synthetic::{generate_synthetic_videos, synthetic_follower_count};
pub use tier::{merge_tiers, Tier, TierOutcome};
