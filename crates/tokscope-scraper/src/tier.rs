//! Per-tier outcomes and the fixed-priority merge.

use serde::Serialize;
use tokscope_core::VideoRecord;

use crate::error::ExtractionFailure;

/// An extraction strategy. Declaration order is merge priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    ApiResponses,
    EmbeddedState,
    Dom,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::ApiResponses => write!(f, "api_responses"),
            Tier::EmbeddedState => write!(f, "embedded_state"),
            Tier::Dom => write!(f, "dom"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TierOutcome {
    Found(Vec<VideoRecord>),
    Empty,
    Failed(ExtractionFailure),
}

impl TierOutcome {
    /// `Found` for a non-empty list, `Empty` otherwise.
    #[must_use]
    pub fn from_videos(videos: Vec<VideoRecord>) -> Self {
        if videos.is_empty() {
            TierOutcome::Empty
        } else {
            TierOutcome::Found(videos)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            TierOutcome::Found(videos) => videos.len(),
            TierOutcome::Empty | TierOutcome::Failed(_) => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct MergedVideos {
    pub source: Option<Tier>,
    pub videos: Vec<VideoRecord>,
    pub failures: Vec<ExtractionFailure>,
}

/// Picks the highest-priority tier with data, truncated to `limit`.
///
/// Lower tiers never supplement a winner's partial list. Failures from every
/// tier are collected regardless of which tier wins.
#[must_use]
pub fn merge_tiers(mut outcomes: Vec<(Tier, TierOutcome)>, limit: usize) -> MergedVideos {
    outcomes.sort_by_key(|(tier, _)| *tier);

    let mut merged = MergedVideos::default();
    for (tier, outcome) in outcomes {
        match outcome {
            TierOutcome::Found(mut videos) if merged.source.is_none() && !videos.is_empty() => {
                videos.truncate(limit);
                merged.source = Some(tier);
                merged.videos = videos;
            }
            TierOutcome::Found(_) | TierOutcome::Empty => {}
            TierOutcome::Failed(failure) => merged.failures.push(failure),
        }
    }
    merged
}
