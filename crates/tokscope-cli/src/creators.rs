use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum CreatorCommands {
    /// List tracked creators
    List,
    /// Show one creator with its stored video count
    Show { username: String },
    /// Track a new creator and run an initial scrape
    Add {
        username: String,

        /// Content category, e.g. "Comedy"
        #[arg(long, default_value = "")]
        niche: String,
    },
    /// Change a creator's niche
    SetNiche { username: String, niche: String },
    /// Stop tracking a creator and delete its videos
    Delete { username: String },
}

fn creator_json(creator: &tokscope_db::CreatorRow) -> serde_json::Value {
    serde_json::json!({
        "id": creator.public_id,
        "username": creator.username,
        "niche": creator.niche,
        "follower_count": creator.follower_count(),
        "created_at": creator.created_at,
        "updated_at": creator.updated_at,
    })
}

async fn require_creator(
    pool: &sqlx::PgPool,
    raw: &str,
) -> anyhow::Result<tokscope_db::CreatorRow> {
    let username = tokscope_core::validate_username(raw)?;
    tokscope_db::get_creator_by_username(pool, &username)
        .await?
        .ok_or_else(|| anyhow::anyhow!("creator '{username}' not found"))
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &tokscope_core::AppConfig,
    command: CreatorCommands,
) -> anyhow::Result<()> {
    match command {
        CreatorCommands::List => {
            let creators = tokscope_db::list_creators(pool).await?;
            let rows: Vec<serde_json::Value> = creators.iter().map(creator_json).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        CreatorCommands::Show { username } => {
            let creator = require_creator(pool, &username).await?;
            let videos = tokscope_db::list_videos_for_creator(pool, creator.id).await?;
            let mut value = creator_json(&creator);
            value["video_count"] = videos.len().into();
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        CreatorCommands::Add { username, niche } => {
            let username = tokscope_core::validate_username(&username)?;
            if tokscope_db::get_creator_by_username(pool, &username)
                .await?
                .is_some()
            {
                anyhow::bail!("creator '{username}' is already tracked");
            }
            let creator = tokscope_db::create_creator(pool, &username, niche.trim()).await?;
            tracing::info!(username = %creator.username, "creator added");

            let summary = crate::collect::collect_new_creator(pool, config, &creator).await?;
            println!("{summary}");
        }
        CreatorCommands::SetNiche { username, niche } => {
            let username = tokscope_core::validate_username(&username)?;
            let creator = tokscope_db::update_creator_niche(pool, &username, niche.trim()).await?;
            println!("{}", serde_json::to_string_pretty(&creator_json(&creator))?);
        }
        CreatorCommands::Delete { username } => {
            let creator = require_creator(pool, &username).await?;
            let removed = tokscope_db::delete_creator(pool, creator.id).await?;
            tracing::info!(username = %creator.username, removed, "creator deleted");
            println!("deleted {} and {removed} videos", creator.username);
        }
    }
    Ok(())
}
