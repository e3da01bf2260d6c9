//! `analytics` command handlers. All output is pretty-printed JSON.

use clap::Subcommand;
use tokscope_core::VideoRecord;

#[derive(Debug, Subcommand)]
pub enum AnalyticsCommands {
    /// Totals and average engagement for a creator
    Stats { username: String },
    /// Best posting hours and weekdays
    Patterns { username: String },
    /// Top videos by engagement rate
    Top {
        username: String,

        #[arg(long, default_value_t = tokscope_core::TOP_VIDEO_COUNT)]
        limit: usize,
    },
    /// Side-by-side averages for several creators
    Compare {
        #[arg(required = true, num_args = 1..)]
        usernames: Vec<String>,
    },
}

struct LoadedCreator {
    username: String,
    follower_count: u64,
    videos: Vec<VideoRecord>,
}

async fn load(pool: &sqlx::PgPool, raw: &str) -> anyhow::Result<LoadedCreator> {
    let username = tokscope_core::validate_username(raw)?;
    let creator = tokscope_db::get_creator_by_username(pool, &username)
        .await?
        .ok_or_else(|| anyhow::anyhow!("creator '{username}' not found"))?;
    let videos = tokscope_db::list_videos_for_creator(pool, creator.id)
        .await?
        .iter()
        .map(|row| row.to_record(&creator.username))
        .collect();

    Ok(LoadedCreator {
        follower_count: creator.follower_count(),
        username: creator.username,
        videos,
    })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run(pool: &sqlx::PgPool, command: AnalyticsCommands) -> anyhow::Result<()> {
    match command {
        AnalyticsCommands::Stats { username } => {
            let c = load(pool, &username).await?;
            print_json(&tokscope_core::creator_stats(
                &c.username,
                c.follower_count,
                &c.videos,
            ))
        }
        AnalyticsCommands::Patterns { username } => {
            let c = load(pool, &username).await?;
            print_json(&tokscope_core::posting_patterns(&c.videos))
        }
        AnalyticsCommands::Top { username, limit } => {
            let c = load(pool, &username).await?;
            print_json(&tokscope_core::content_performance(&c.videos, limit))
        }
        AnalyticsCommands::Compare { usernames } => {
            let mut loaded = Vec::with_capacity(usernames.len());
            for username in &usernames {
                loaded.push(load(pool, username).await?);
            }
            let inputs: Vec<tokscope_core::CreatorVideos<'_>> = loaded
                .iter()
                .map(|c| tokscope_core::CreatorVideos {
                    username: &c.username,
                    follower_count: c.follower_count,
                    videos: &c.videos,
                })
                .collect();
            print_json(&tokscope_core::compare_creators(&inputs))
        }
    }
}
