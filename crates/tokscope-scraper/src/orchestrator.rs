//! Drives one scrape attempt through its fixed interaction sequence.

use chrono::Utc;
use tokscope_core::{validate_username, ProfileSummary, VideoRecord};

use crate::config::{ScraperConfig, RETRY_LABELS};
use crate::debug;
use crate::dom::extract_dom_videos;
use crate::embedded::extract_embedded_state;
use crate::error::{ExtractionFailure, ScraperError, SessionError};
use crate::listener::ApiResponseListener;
use crate::session::PageSession;
use crate::tier::{merge_tiers, MergedVideos, Tier, TierOutcome};

/// Everything one attempt produced. Platform failures show up in `failures`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeResult {
    pub profile: ProfileSummary,
    pub videos: Vec<VideoRecord>,
    /// Tier the videos came from; `None` when every tier came up empty.
    pub source: Option<Tier>,
    pub failures: Vec<ExtractionFailure>,
}

/// Steps of a single attempt. `Done` and `Error` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptState {
    Navigating,
    Settling,
    Scrolling,
    RetryClick,
    Rescrolling,
    Extracting,
    Done,
    Error(ExtractionFailure),
}

fn scroll_cycles<S: PageSession + ?Sized>(
    session: &mut S,
    config: &ScraperConfig,
    cycles: usize,
    failures: &mut Vec<ExtractionFailure>,
) {
    for cycle in 0..cycles {
        if let Err(e) = session.scroll_by(config.scroll_step_px) {
            tracing::warn!(cycle, error = %e, "scroll failed; skipping remaining cycles");
            failures.push(e.into());
            return;
        }
        session.pause(config.scroll_pause);
    }
}

fn log_tier(tier: Tier, outcome: &TierOutcome) {
    match outcome {
        TierOutcome::Found(videos) => tracing::debug!(%tier, count = videos.len(), "tier found videos"),
        TierOutcome::Empty => tracing::debug!(%tier, "tier empty"),
        TierOutcome::Failed(failure) => tracing::warn!(%tier, error = %failure, "tier failed"),
    }
}

fn extract<S: PageSession + ?Sized>(
    session: &mut S,
    config: &ScraperConfig,
    username: &str,
    limit: usize,
    listener: &ApiResponseListener,
) -> (ProfileSummary, MergedVideos) {
    if let Some(dir) = &config.debug_dir {
        match session.screenshot_png() {
            Ok(png) => debug::write_screenshot(dir, username, &png),
            Err(e) => tracing::warn!(error = %e, "screenshot capture failed"),
        }
    }

    let (profile, embedded) = match session.content() {
        Ok(html) => {
            let state = extract_embedded_state(&html, username);
            (state.profile, state.videos)
        }
        Err(e) => (ProfileSummary::default(), TierOutcome::Failed(e.into())),
    };
    let dom = extract_dom_videos(session, username, limit);
    let api = listener.outcome();

    let outcomes = vec![
        (Tier::ApiResponses, api),
        (Tier::EmbeddedState, embedded),
        (Tier::Dom, dom),
    ];
    for (tier, outcome) in &outcomes {
        log_tier(*tier, outcome);
    }

    (profile, merge_tiers(outcomes, limit))
}

/// Runs one attempt on an open session. Never fails; platform problems
/// degrade to an empty or partial result.
pub fn run_attempt<S: PageSession + ?Sized>(
    session: &mut S,
    config: &ScraperConfig,
    username: &str,
    limit: usize,
) -> ScrapeResult {
    let span = tracing::info_span!("scrape_attempt", username, limit);
    let _entered = span.enter();

    let listener = ApiResponseListener::new(username);
    let mut failures = Vec::new();
    if let Err(e) = session.attach_listener(listener.clone()) {
        tracing::warn!(error = %e, "response listener unavailable");
        failures.push(e.into());
    }

    let url = config.profile_url(username);
    let mut extracted = None;
    let mut state = AttemptState::Navigating;

    loop {
        tracing::trace!(state = ?state, "attempt state");
        state = match state {
            AttemptState::Navigating => match session.navigate(&url, config.navigation_timeout) {
                Ok(()) => AttemptState::Settling,
                Err(e) => AttemptState::Error(ExtractionFailure::Navigation {
                    url: url.clone(),
                    reason: e.to_string(),
                }),
            },
            AttemptState::Settling => {
                session.pause(config.settle_delay);
                AttemptState::Scrolling
            }
            AttemptState::Scrolling => {
                scroll_cycles(session, config, config.scroll_cycles(limit), &mut failures);
                AttemptState::RetryClick
            }
            AttemptState::RetryClick => match session.click_retry_affordance(&RETRY_LABELS) {
                Ok(true) => {
                    tracing::info!("retry affordance clicked");
                    session.pause(config.settle_delay);
                    AttemptState::Rescrolling
                }
                Ok(false) => AttemptState::Extracting,
                Err(e) => {
                    failures.push(e.into());
                    AttemptState::Extracting
                }
            },
            AttemptState::Rescrolling => {
                scroll_cycles(session, config, config.rescroll_cycles, &mut failures);
                AttemptState::Extracting
            }
            AttemptState::Extracting => {
                extracted = Some(extract(session, config, username, limit, &listener));
                AttemptState::Done
            }
            AttemptState::Done => break,
            AttemptState::Error(failure) => {
                tracing::warn!(error = %failure, "attempt aborted; returning empty result");
                failures.push(failure);
                break;
            }
        };
    }

    let result = match extracted {
        Some((profile, merged)) => {
            failures.extend(merged.failures);
            ScrapeResult {
                profile,
                videos: merged.videos,
                source: merged.source,
                failures,
            }
        }
        None => ScrapeResult {
            failures,
            ..ScrapeResult::default()
        },
    };

    if let Some(dir) = &config.debug_dir {
        debug::write_dump(dir, username, Utc::now(), &result.profile, &result.videos);
    }

    tracing::info!(
        source = ?result.source,
        count = result.videos.len(),
        failures = result.failures.len(),
        "scrape attempt finished"
    );
    result
}

/// Validates arguments, opens a session with `open`, and runs one attempt on
/// a blocking worker thread. The session is dropped before this returns.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUsername`] or [`ScraperError::InvalidVideoLimit`]
/// before any browser work, or [`ScraperError::Worker`] if the worker panicked.
pub async fn scrape_with<S, F>(
    config: &ScraperConfig,
    username: &str,
    limit: usize,
    open: F,
) -> Result<ScrapeResult, ScraperError>
where
    S: PageSession,
    F: FnOnce(&ScraperConfig) -> Result<S, SessionError> + Send + 'static,
{
    let username = validate_username(username)?;
    if limit == 0 {
        return Err(ScraperError::InvalidVideoLimit);
    }

    let config = config.clone();
    let span = tracing::Span::current();
    let worker = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        match open(&config) {
            Ok(mut session) => run_attempt(&mut session, &config, &username, limit),
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "browser unavailable; returning empty result");
                ScrapeResult {
                    failures: vec![ExtractionFailure::Launch {
                        reason: e.to_string(),
                    }],
                    ..ScrapeResult::default()
                }
            }
        }
    });

    Ok(worker.await?)
}

/// Scrapes `username` with a fresh headless Chrome session.
///
/// # Errors
///
/// See [`scrape_with`]. A browser that cannot be launched is not an error.
pub async fn scrape_creator(
    config: &ScraperConfig,
    username: &str,
    limit: usize,
) -> Result<ScrapeResult, ScraperError> {
    scrape_with(config, username, limit, crate::browser::ChromeSession::launch).await
}
