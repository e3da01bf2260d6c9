//! Best-effort debug artifacts: a viewport screenshot and a JSON dump per attempt.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokscope_core::{ProfileSummary, VideoRecord};

#[derive(Serialize)]
struct ScrapeDump<'a> {
    username: &'a str,
    scraped_at: DateTime<Utc>,
    profile: &'a ProfileSummary,
    video_count: usize,
    videos: &'a [VideoRecord],
}

#[must_use]
pub fn screenshot_path(dir: &Path, username: &str) -> PathBuf {
    dir.join(format!("{username}.png"))
}

#[must_use]
pub fn dump_path(dir: &Path, username: &str) -> PathBuf {
    dir.join(format!("{username}.json"))
}

fn write_artifact(path: &Path, bytes: &[u8]) {
    let written = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|()| std::fs::write(path, bytes));
    match written {
        Ok(()) => tracing::debug!(path = %path.display(), "debug artifact written"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to write debug artifact"),
    }
}

pub fn write_screenshot(dir: &Path, username: &str, png: &[u8]) {
    write_artifact(&screenshot_path(dir, username), png);
}

pub fn write_dump(
    dir: &Path,
    username: &str,
    scraped_at: DateTime<Utc>,
    profile: &ProfileSummary,
    videos: &[VideoRecord],
) {
    let dump = ScrapeDump {
        username,
        scraped_at,
        profile,
        video_count: videos.len(),
        videos,
    };
    match serde_json::to_vec_pretty(&dump) {
        Ok(bytes) => write_artifact(&dump_path(dir, username), &bytes),
        Err(e) => tracing::warn!(username, error = %e, "failed to serialize debug dump"),
    }
}
